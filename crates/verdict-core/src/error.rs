//! Error types for Verdict Core

use thiserror::Error;

use crate::types::Value;

/// Failure of a data type transformer to coerce a raw value.
///
/// Every variant carries a stable error code so callers can match on the
/// `DEC-01` code family instead of message text.
#[derive(Error, Debug)]
pub enum TypeError {
    /// The source value cannot be represented in the target type at all
    #[error("DEC-01001 cannot transform value '{value}' into type '{type_name}'")]
    UnsupportedValue { type_name: &'static str, value: Value },

    /// The value is numeric but does not fit the target width
    #[error("DEC-01002 value '{value}' is out of range for type '{type_name}'")]
    OutOfRange { type_name: &'static str, value: Value },

    /// A string literal that does not parse as the target type
    #[error("DEC-01003 cannot parse '{literal}' as type '{type_name}'")]
    UnparseableLiteral { type_name: &'static str, literal: String },

    /// Date-only, time-only, duration and period values are not supported
    /// by the `date` type
    #[error("DEC-01004 unsupported temporal value '{literal}': '{form}' cannot be converted to a date")]
    UnsupportedTemporal { form: &'static str, literal: String },
}

impl TypeError {
    /// Stable machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            TypeError::UnsupportedValue { .. } => "DEC-01001",
            TypeError::OutOfRange { .. } => "DEC-01002",
            TypeError::UnparseableLiteral { .. } => "DEC-01003",
            TypeError::UnsupportedTemporal { .. } => "DEC-01004",
        }
    }
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, TypeError>;

//! Unary test transform errors

use thiserror::Error;

/// Failure to rewrite a unary test expression.
///
/// Each variant names the offending fragment and carries a stable code in
/// the `FEEL-01` family.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FeelError {
    #[error("FEEL-01001 unable to transform unary test '{0}'")]
    MalformedTest(String),

    #[error("FEEL-01002 malformed comparison '{0}'")]
    MalformedComparison(String),

    #[error("FEEL-01003 malformed interval '{0}'")]
    MalformedInterval(String),

    #[error("FEEL-01004 unterminated not expression '{0}'")]
    UnterminatedNot(String),

    #[error("FEEL-01005 empty element in unary test list '{0}'")]
    EmptyListElement(String),
}

impl FeelError {
    /// Stable machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            FeelError::MalformedTest(_) => "FEEL-01001",
            FeelError::MalformedComparison(_) => "FEEL-01002",
            FeelError::MalformedInterval(_) => "FEEL-01003",
            FeelError::UnterminatedNot(_) => "FEEL-01004",
            FeelError::EmptyListElement(_) => "FEEL-01005",
        }
    }
}

/// Result type for transform operations
pub type Result<T> = std::result::Result<T, FeelError>;

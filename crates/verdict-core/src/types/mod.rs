//! Runtime value types and the data type transformer registry

pub mod transformer;
pub mod typed_value;
pub mod value;

pub use typed_value::TypedValue;
pub use value::Value;

use std::collections::HashMap;

/// Name-to-value variable binding handed in by the caller of an evaluation.
pub type VariableMap = HashMap<String, Value>;

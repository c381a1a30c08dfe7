//! Typed decision values
//!
//! A `TypedValue` is a value tagged with its decision-level type, produced by
//! the data type transformers from a raw [`Value`]. Equality is strict per
//! type tag: `Integer(4)` and `Long(4)` are not equal.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Value;

/// A value tagged with its decision-level type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TypedValue {
    Null,
    Boolean(bool),
    Integer(i32),
    Long(i64),
    Double(f64),
    String(String),
    Date(DateTime<Utc>),
    /// Passthrough for values of unknown or undeclared types
    Untyped(Value),
}

impl TypedValue {
    /// The decision-level type name of this value.
    pub fn type_name(&self) -> &'static str {
        match self {
            TypedValue::Null => "null",
            TypedValue::Boolean(_) => "boolean",
            TypedValue::Integer(_) => "integer",
            TypedValue::Long(_) => "long",
            TypedValue::Double(_) => "double",
            TypedValue::String(_) => "string",
            TypedValue::Date(_) => "date",
            TypedValue::Untyped(_) => "untyped",
        }
    }

    /// The raw value carried by this typed value.
    pub fn as_value(&self) -> Value {
        match self {
            TypedValue::Null => Value::Null,
            TypedValue::Boolean(b) => Value::Bool(*b),
            TypedValue::Integer(i) => Value::Int(*i as i64),
            TypedValue::Long(l) => Value::Int(*l),
            TypedValue::Double(d) => Value::Float(*d),
            TypedValue::String(s) => Value::String(s.clone()),
            TypedValue::Date(d) => Value::Date(*d),
            TypedValue::Untyped(v) => v.clone(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, TypedValue::Null)
    }
}

//! Data type transformers
//!
//! Each decision table input and output declares a type name. A
//! `DataTypeTransformer` coerces the raw evaluation value into the matching
//! [`TypedValue`], or fails with a [`TypeError`]. The registry maps type
//! names to transformers and falls back to an untyped passthrough for names
//! nothing was registered for.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use std::collections::HashMap;

use super::{TypedValue, Value};
use crate::error::{Result, TypeError};

/// Coercion from a raw value into a typed decision value.
///
/// Transformers are never invoked for `Value::Null`; the registry
/// short-circuits null to `TypedValue::Null` for every type.
pub trait DataTypeTransformer: Send + Sync {
    fn transform(&self, value: &Value) -> Result<TypedValue>;
}

/// Registry of data type transformers, keyed by declared type name.
///
/// Built with the built-in transformers for `string`, `boolean`, `integer`,
/// `long`, `double` and `date`. Callers may register additional transformers
/// or override the built-ins before evaluation begins.
pub struct DataTypeTransformerRegistry {
    transformers: HashMap<String, Box<dyn DataTypeTransformer>>,
}

impl DataTypeTransformerRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            transformers: HashMap::new(),
        };
        registry.register("string", Box::new(StringTransformer));
        registry.register("boolean", Box::new(BooleanTransformer));
        registry.register("integer", Box::new(IntegerTransformer));
        registry.register("long", Box::new(LongTransformer));
        registry.register("double", Box::new(DoubleTransformer));
        registry.register("date", Box::new(DateTransformer));
        registry
    }

    /// Register a transformer for a type name, replacing any existing one.
    pub fn register(&mut self, type_name: &str, transformer: Box<dyn DataTypeTransformer>) {
        self.transformers.insert(type_name.to_string(), transformer);
    }

    /// Coerce `value` into the type declared as `type_name`.
    ///
    /// A missing type name or an unregistered one passes the value through
    /// untyped. Null bypasses the transformer entirely.
    pub fn transform(&self, type_name: Option<&str>, value: &Value) -> Result<TypedValue> {
        if value.is_null() {
            return Ok(TypedValue::Null);
        }
        match type_name.and_then(|name| self.transformers.get(name)) {
            Some(transformer) => transformer.transform(value),
            None => {
                if let Some(name) = type_name {
                    log::debug!("no transformer registered for type '{}', passing value through untyped", name);
                }
                Ok(TypedValue::Untyped(value.clone()))
            }
        }
    }
}

impl Default for DataTypeTransformerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Any value via its natural string form.
struct StringTransformer;

impl DataTypeTransformer for StringTransformer {
    fn transform(&self, value: &Value) -> Result<TypedValue> {
        Ok(TypedValue::String(value.to_string()))
    }
}

/// Booleans and the literal strings `"true"` / `"false"`.
struct BooleanTransformer;

impl DataTypeTransformer for BooleanTransformer {
    fn transform(&self, value: &Value) -> Result<TypedValue> {
        match value {
            Value::Bool(b) => Ok(TypedValue::Boolean(*b)),
            Value::String(s) if s == "true" => Ok(TypedValue::Boolean(true)),
            Value::String(s) if s == "false" => Ok(TypedValue::Boolean(false)),
            other => Err(TypeError::UnsupportedValue {
                type_name: "boolean",
                value: other.clone(),
            }),
        }
    }
}

/// Exact whole numerics and numeric strings within the i32 range.
struct IntegerTransformer;

impl DataTypeTransformer for IntegerTransformer {
    fn transform(&self, value: &Value) -> Result<TypedValue> {
        match value {
            Value::Int(i) => {
                if let Ok(narrow) = i32::try_from(*i) {
                    Ok(TypedValue::Integer(narrow))
                } else {
                    Err(TypeError::OutOfRange {
                        type_name: "integer",
                        value: value.clone(),
                    })
                }
            }
            Value::Float(f) => match exact_whole(*f) {
                Some(whole) => i32::try_from(whole)
                    .map(TypedValue::Integer)
                    .map_err(|_| TypeError::OutOfRange {
                        type_name: "integer",
                        value: value.clone(),
                    }),
                None => Err(TypeError::UnsupportedValue {
                    type_name: "integer",
                    value: value.clone(),
                }),
            },
            Value::String(s) => {
                let parsed = s.trim().parse::<i64>().map_err(|_| TypeError::UnparseableLiteral {
                    type_name: "integer",
                    literal: s.clone(),
                })?;
                i32::try_from(parsed)
                    .map(TypedValue::Integer)
                    .map_err(|_| TypeError::OutOfRange {
                        type_name: "integer",
                        value: value.clone(),
                    })
            }
            other => Err(TypeError::UnsupportedValue {
                type_name: "integer",
                value: other.clone(),
            }),
        }
    }
}

/// Exact whole numerics and numeric strings within the i64 range.
struct LongTransformer;

impl DataTypeTransformer for LongTransformer {
    fn transform(&self, value: &Value) -> Result<TypedValue> {
        match value {
            Value::Int(i) => Ok(TypedValue::Long(*i)),
            Value::Float(f) => exact_whole(*f).map(TypedValue::Long).ok_or_else(|| {
                TypeError::UnsupportedValue {
                    type_name: "long",
                    value: value.clone(),
                }
            }),
            Value::String(s) => s
                .trim()
                .parse::<i64>()
                .map(TypedValue::Long)
                .map_err(|_| TypeError::UnparseableLiteral {
                    type_name: "long",
                    literal: s.clone(),
                }),
            other => Err(TypeError::UnsupportedValue {
                type_name: "long",
                value: other.clone(),
            }),
        }
    }
}

/// Any numeric value or parseable numeric string; widening is lossless.
struct DoubleTransformer;

impl DataTypeTransformer for DoubleTransformer {
    fn transform(&self, value: &Value) -> Result<TypedValue> {
        match value {
            Value::Int(i) => Ok(TypedValue::Double(*i as f64)),
            Value::Float(f) => Ok(TypedValue::Double(*f)),
            Value::String(s) => s
                .trim()
                .parse::<f64>()
                .map(TypedValue::Double)
                .map_err(|_| TypeError::UnparseableLiteral {
                    type_name: "double",
                    literal: s.clone(),
                }),
            other => Err(TypeError::UnsupportedValue {
                type_name: "double",
                value: other.clone(),
            }),
        }
    }
}

/// The canonical `%Y-%m-%dT%H:%M:%S` timestamp and offset timestamps
/// normalized to UTC. Date-only, time-only, duration and period values are
/// explicitly unsupported.
struct DateTransformer;

impl DataTypeTransformer for DateTransformer {
    fn transform(&self, value: &Value) -> Result<TypedValue> {
        match value {
            Value::Date(d) => Ok(TypedValue::Date(*d)),
            Value::String(s) => parse_date(s.trim()).map(TypedValue::Date),
            other => Err(TypeError::UnsupportedValue {
                type_name: "date",
                value: other.clone(),
            }),
        }
    }
}

/// The whole-number value of `f`, if it has one that i64 can hold exactly.
fn exact_whole(f: f64) -> Option<i64> {
    if f.is_finite() && f == f.trunc() && f >= i64::MIN as f64 && f <= i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

fn parse_date(literal: &str) -> Result<DateTime<Utc>> {
    // canonical timestamp without offset, interpreted as UTC
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(literal, format) {
            return Ok(Utc.from_utc_datetime(&naive));
        }
    }
    // offset timestamp, normalized by applying the offset
    if let Ok(with_offset) = DateTime::parse_from_rfc3339(literal) {
        return Ok(with_offset.with_timezone(&Utc));
    }
    if let Some(form) = unsupported_temporal_form(literal) {
        return Err(TypeError::UnsupportedTemporal {
            form,
            literal: literal.to_string(),
        });
    }
    Err(TypeError::UnparseableLiteral {
        type_name: "date",
        literal: literal.to_string(),
    })
}

/// Classify literals that are valid temporal values of a kind the `date`
/// type does not accept, so the error can name what was rejected.
fn unsupported_temporal_form(literal: &str) -> Option<&'static str> {
    if chrono::NaiveDate::parse_from_str(literal, "%Y-%m-%d").is_ok() {
        return Some("date");
    }
    if chrono::NaiveTime::parse_from_str(literal, "%H:%M:%S").is_ok() {
        return Some("time");
    }
    let body = literal.strip_prefix('-').unwrap_or(literal);
    if body.starts_with('P') && body.len() > 1 {
        return if body.contains('T') {
            Some("duration")
        } else {
            Some("period")
        };
    }
    None
}

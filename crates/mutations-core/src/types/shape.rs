//! Declarative parameter shapes.
//!
//! A shape is written as JSON: type names as strings (`"string"`,
//! `"number"`, `"integer"`, `"boolean"`, `"object"`, `"array"`, `"any"`),
//! a `?` prefix for values that may be missing or null (`"?string"`),
//! nested objects for keyed fields and a one-element array for
//! homogeneous lists (`["string"]`).

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;
use serde_json::Value;

/// Structural description of a parameter value.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "serde_json::Value")]
pub enum ParamsShape {
    /// Any value, including null.
    Any,
    /// A JSON string.
    String,
    /// Any JSON number.
    Number,
    /// A JSON number without a fractional part.
    Integer,
    /// A JSON boolean.
    Boolean,
    /// Any JSON object.
    AnyObject,
    /// Any JSON array.
    AnyArray,
    /// The inner shape, or null/missing.
    Maybe(Box<ParamsShape>),
    /// An object with exactly these keys.
    Object(BTreeMap<String, ParamsShape>),
    /// An array whose elements all match the inner shape.
    ArrayOf(Box<ParamsShape>),
}

impl ParamsShape {
    /// Builds an object shape from `(key, shape)` pairs.
    pub fn object<I, K>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, ParamsShape)>,
        K: Into<String>,
    {
        Self::Object(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Wraps this shape so that null or a missing key is accepted.
    pub fn maybe(self) -> Self {
        match self {
            Self::Maybe(_) => self,
            other => Self::Maybe(Box::new(other)),
        }
    }

    /// Returns whether some JSON object satisfies this shape.
    ///
    /// Call parameters are always an object, so only such shapes can
    /// describe them.
    pub fn accepts_object(&self) -> bool {
        match self {
            Self::Any | Self::AnyObject | Self::Object(_) => true,
            Self::Maybe(inner) => inner.accepts_object(),
            _ => false,
        }
    }

    /// Parses a shape from its JSON description.
    pub fn parse(value: &Value) -> Result<Self, String> {
        match value {
            Value::String(name) => Self::parse_name(name),
            Value::Object(fields) => {
                let mut parsed = BTreeMap::new();
                for (key, field) in fields {
                    let shape =
                        Self::parse(field).map_err(|e| format!("field '{key}': {e}"))?;
                    parsed.insert(key.clone(), shape);
                }
                Ok(Self::Object(parsed))
            }
            Value::Array(items) => match items.as_slice() {
                [item] => Ok(Self::ArrayOf(Box::new(Self::parse(item)?))),
                _ => Err(format!(
                    "array shapes take exactly one element shape, got {}",
                    items.len()
                )),
            },
            other => Err(format!("{} is not a shape", type_name(other))),
        }
    }

    fn parse_name(name: &str) -> Result<Self, String> {
        if let Some(inner) = name.strip_prefix('?') {
            return Ok(Self::parse_name(inner)?.maybe());
        }

        match name {
            "any" => Ok(Self::Any),
            "string" => Ok(Self::String),
            "number" => Ok(Self::Number),
            "integer" => Ok(Self::Integer),
            "boolean" => Ok(Self::Boolean),
            "object" => Ok(Self::AnyObject),
            "array" => Ok(Self::AnyArray),
            other => Err(format!("unknown type '{other}'")),
        }
    }

    /// Checks `value` against this shape.
    ///
    /// On mismatch returns a message naming the offending path.
    pub fn matches(&self, value: &Value) -> Result<(), String> {
        self.matches_at(value, "params")
    }

    fn matches_at(&self, value: &Value, path: &str) -> Result<(), String> {
        let ok = match self {
            Self::Any => true,
            Self::String => value.is_string(),
            Self::Number => value.is_number(),
            Self::Integer => {
                value.is_i64()
                    || value.is_u64()
                    || value.as_f64().is_some_and(|n| n.is_finite() && n.fract() == 0.0)
            }
            Self::Boolean => value.is_boolean(),
            Self::AnyObject => value.is_object(),
            Self::AnyArray => value.is_array(),
            Self::Maybe(inner) => {
                return if value.is_null() {
                    Ok(())
                } else {
                    inner.matches_at(value, path)
                };
            }
            Self::Object(fields) => {
                let Some(map) = value.as_object() else {
                    return Err(mismatch(self, value, path));
                };

                for key in map.keys() {
                    if !fields.contains_key(key) {
                        return Err(format!("Unknown key '{key}' in {path}"));
                    }
                }

                for (key, shape) in fields {
                    let field_path = format!("{path}.{key}");
                    match map.get(key) {
                        Some(field) => shape.matches_at(field, &field_path)?,
                        None if matches!(shape, Self::Maybe(_) | Self::Any) => {}
                        None => return Err(format!("Missing key '{key}' in {path}")),
                    }
                }
                true
            }
            Self::ArrayOf(inner) => {
                let Some(items) = value.as_array() else {
                    return Err(mismatch(self, value, path));
                };
                for (i, item) in items.iter().enumerate() {
                    inner.matches_at(item, &format!("{path}[{i}]"))?;
                }
                true
            }
        };

        if ok {
            Ok(())
        } else {
            Err(mismatch(self, value, path))
        }
    }
}

impl TryFrom<Value> for ParamsShape {
    type Error = String;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl fmt::Display for ParamsShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => write!(f, "any"),
            Self::String => write!(f, "string"),
            Self::Number => write!(f, "number"),
            Self::Integer => write!(f, "integer"),
            Self::Boolean => write!(f, "boolean"),
            Self::AnyObject | Self::Object(_) => write!(f, "object"),
            Self::AnyArray | Self::ArrayOf(_) => write!(f, "array"),
            Self::Maybe(inner) => write!(f, "?{inner}"),
        }
    }
}

fn mismatch(shape: &ParamsShape, value: &Value, path: &str) -> String {
    format!("Expected {shape} at {path}, got {}", type_name(value))
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

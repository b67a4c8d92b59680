//! Bound parameter values

use serde::{Deserialize, Serialize};

/// A value bound to a placeholder of a rendered statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Null,
    Bool(bool),
    I32(i32),
    I64(i64),
    F64(f64),
    String(String),
    Bytes(Vec<u8>),
    Json(serde_json::Value),
    /// Bound as a single parameter; use `in_list` to expand into one placeholder per item
    Array(Vec<Value>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Short lowercase name of the variant, for error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::I32(_) | Value::I64(_) => "integer",
            Value::F64(_) => "float",
            Value::String(_) => "string",
            Value::Bytes(_) => "bytes",
            Value::Json(_) => "json",
            Value::Array(_) => "array",
        }
    }

    /// Convert into a JSON value, used when a driver has no native binding for the variant
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::I32(i) => serde_json::Value::from(*i),
            Value::I64(i) => serde_json::Value::from(*i),
            Value::F64(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Bytes(b) => serde_json::Value::Array(
                b.iter().map(|byte| serde_json::Value::from(*byte)).collect(),
            ),
            Value::Json(j) => j.clone(),
            Value::Array(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json).collect())
            }
        }
    }
}

macro_rules! value_from {
    ($($source:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$source> for Value {
                fn from(inner: $source) -> Self {
                    Value::$variant(inner.into())
                }
            }
        )+
    };
}

value_from! {
    bool => Bool,
    i32 => I32,
    i16 => I32,
    i64 => I64,
    u32 => I64,
    f64 => F64,
    f32 => F64,
    String => String,
    &str => String,
    Vec<u8> => Bytes,
    serde_json::Value => Json,
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Null
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Clone + Into<Value>> From<&[T]> for Value {
    fn from(items: &[T]) -> Self {
        Value::Array(items.iter().cloned().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(inner: Option<T>) -> Self {
        inner.map_or(Value::Null, Into::into)
    }
}

// Types without a portable native binding travel as their canonical text form

#[cfg(feature = "uuid-support")]
impl From<uuid::Uuid> for Value {
    fn from(inner: uuid::Uuid) -> Self {
        Value::String(inner.hyphenated().to_string())
    }
}

#[cfg(feature = "datetime-support")]
impl From<chrono::NaiveDate> for Value {
    fn from(inner: chrono::NaiveDate) -> Self {
        Value::String(inner.format("%Y-%m-%d").to_string())
    }
}

#[cfg(feature = "datetime-support")]
impl From<chrono::NaiveDateTime> for Value {
    fn from(inner: chrono::NaiveDateTime) -> Self {
        Value::String(inner.format("%Y-%m-%d %H:%M:%S%.f").to_string())
    }
}

#[cfg(feature = "datetime-support")]
impl From<chrono::DateTime<chrono::Utc>> for Value {
    fn from(inner: chrono::DateTime<chrono::Utc>) -> Self {
        Value::String(inner.to_rfc3339())
    }
}

#[cfg(feature = "decimal-support")]
impl From<rust_decimal::Decimal> for Value {
    fn from(inner: rust_decimal::Decimal) -> Self {
        Value::String(inner.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_conversions() {
        assert_eq!(Value::from(18), Value::I32(18));
        assert_eq!(Value::from(7u32), Value::I64(7));
        assert_eq!(Value::from(3i16), Value::I32(3));
        assert_eq!(Value::from(0.5f32), Value::F64(0.5));
        assert_eq!(Value::from("active"), Value::String("active".into()));
        assert_eq!(Value::from(vec![0u8, 255]), Value::Bytes(vec![0, 255]));
        assert!(Value::from(()).is_null());
    }

    #[test]
    fn test_lists_and_options() {
        assert_eq!(
            Value::from(&["a", "b"][..]),
            Value::Array(vec![Value::from("a"), Value::from("b")])
        );
        assert_eq!(Value::from(Some("x")), Value::from("x"));
        assert!(Value::from(None::<i64>).is_null());
    }

    #[test]
    fn test_to_json() {
        assert_eq!(Value::I64(3).to_json(), serde_json::json!(3));
        assert_eq!(Value::F64(f64::NAN).to_json(), serde_json::Value::Null);
        assert_eq!(Value::Bytes(vec![1, 2]).to_json(), serde_json::json!([1, 2]));
        assert_eq!(
            Value::from(vec![Value::Null, Value::from(true)]).to_json(),
            serde_json::json!([null, true])
        );
    }

    #[test]
    fn test_kind() {
        assert_eq!(Value::I64(1).kind(), "integer");
        assert_eq!(Value::from("s").kind(), "string");
        assert_eq!(Value::Array(Vec::new()).kind(), "array");
    }
}

//! Scalar values bound as positional parameters.
//!
//! [`SqlValue`] is the closed set of scalars a client can put in an update
//! payload or a filter. It binds to `tokio-postgres` in the text wire format,
//! so the server parses every parameter with the type of the expression it is
//! compared against or assigned to (`integer`, `numeric`, `text`, ...).

use crate::error::{SqlError, SqlResult};
use bytes::BytesMut;
use serde::de::{self, Deserialize, Deserializer, Visitor};
use serde::Serialize;
use std::error::Error;
use std::fmt;
use tokio_postgres::types::{Format, IsNull, ToSql, Type};

/// A scalar parameter value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SqlValue {
    /// SQL `NULL`
    Null,
    /// Boolean
    Bool(bool),
    /// Integer
    Int(i64),
    /// Floating point number
    Float(f64),
    /// Text
    Text(String),
}

impl SqlValue {
    /// Truthiness used by flag filters.
    ///
    /// Text is false for `""`, `"false"` and `"0"` (case-insensitive) so that
    /// query-string flags like `?hasEquity=false` behave as expected.
    pub fn is_truthy(&self) -> bool {
        match self {
            SqlValue::Null => false,
            SqlValue::Bool(b) => *b,
            SqlValue::Int(i) => *i != 0,
            SqlValue::Float(f) => *f != 0.0 && !f.is_nan(),
            SqlValue::Text(s) => {
                let s = s.trim();
                !(s.is_empty() || s == "0" || s.eq_ignore_ascii_case("false"))
            }
        }
    }

    /// Integer view, parsing numeric text.
    ///
    /// Floats must be whole and inside the `i64` range.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            SqlValue::Int(i) => Some(*i),
            SqlValue::Float(f)
                if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64 =>
            {
                Some(*f as i64)
            }
            SqlValue::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Numeric view, parsing numeric text.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            SqlValue::Int(i) => Some(*i as f64),
            SqlValue::Float(f) if f.is_finite() => Some(*f),
            SqlValue::Text(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
            _ => None,
        }
    }

    /// Type name used in log fields.
    pub fn type_name(&self) -> &'static str {
        match self {
            SqlValue::Null => "null",
            SqlValue::Bool(_) => "bool",
            SqlValue::Int(_) => "int",
            SqlValue::Float(_) => "float",
            SqlValue::Text(_) => "text",
        }
    }
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlValue::Null => f.write_str("NULL"),
            SqlValue::Bool(b) => write!(f, "{b}"),
            SqlValue::Int(i) => write!(f, "{i}"),
            SqlValue::Float(x) => write!(f, "{x}"),
            SqlValue::Text(s) => f.write_str(s),
        }
    }
}

impl ToSql for SqlValue {
    fn to_sql(
        &self,
        _ty: &Type,
        out: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
        match self {
            SqlValue::Null => return Ok(IsNull::Yes),
            SqlValue::Text(s) => out.extend_from_slice(s.as_bytes()),
            other => out.extend_from_slice(other.to_string().as_bytes()),
        }
        Ok(IsNull::No)
    }

    fn accepts(_ty: &Type) -> bool {
        true
    }

    fn encode_format(&self, _ty: &Type) -> Format {
        Format::Text
    }

    tokio_postgres::types::to_sql_checked!();
}

impl From<bool> for SqlValue {
    fn from(v: bool) -> Self {
        SqlValue::Bool(v)
    }
}

impl From<i32> for SqlValue {
    fn from(v: i32) -> Self {
        SqlValue::Int(i64::from(v))
    }
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        SqlValue::Int(v)
    }
}

impl From<f64> for SqlValue {
    fn from(v: f64) -> Self {
        SqlValue::Float(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::Text(v.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::Text(v)
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(SqlValue::Null, Into::into)
    }
}

impl<'de> Deserialize<'de> for SqlValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SqlValueVisitor;

        impl Visitor<'_> for SqlValueVisitor {
            type Value = SqlValue;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("null, a boolean, a number or a string")
            }

            fn visit_unit<E: de::Error>(self) -> Result<SqlValue, E> {
                Ok(SqlValue::Null)
            }

            fn visit_none<E: de::Error>(self) -> Result<SqlValue, E> {
                Ok(SqlValue::Null)
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> Result<SqlValue, E> {
                Ok(SqlValue::Bool(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<SqlValue, E> {
                Ok(SqlValue::Int(v))
            }

            // Integers past i64::MAX would lose precision as floats.
            fn visit_u64<E: de::Error>(self, v: u64) -> Result<SqlValue, E> {
                i64::try_from(v).map(SqlValue::Int).map_err(|_| {
                    E::invalid_value(de::Unexpected::Unsigned(v), &"an integer within i64 range")
                })
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<SqlValue, E> {
                Ok(SqlValue::Float(v))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<SqlValue, E> {
                Ok(SqlValue::Text(v.to_string()))
            }

            fn visit_string<E: de::Error>(self, v: String) -> Result<SqlValue, E> {
                Ok(SqlValue::Text(v))
            }
        }

        deserializer.deserialize_any(SqlValueVisitor)
    }
}

impl TryFrom<serde_json::Value> for SqlValue {
    type Error = SqlError;

    fn try_from(value: serde_json::Value) -> SqlResult<Self> {
        use serde_json::Value;

        match value {
            Value::Null => Ok(SqlValue::Null),
            Value::Bool(b) => Ok(SqlValue::Bool(b)),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Ok(SqlValue::Int(i)),
                None if n.is_u64() => Err(SqlError::UnsupportedValue(n.to_string())),
                None => n
                    .as_f64()
                    .map(SqlValue::Float)
                    .ok_or_else(|| SqlError::UnsupportedValue(n.to_string())),
            },
            Value::String(s) => Ok(SqlValue::Text(s)),
            other @ (Value::Array(_) | Value::Object(_)) => {
                Err(SqlError::UnsupportedValue(other.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(value: &SqlValue) -> Option<String> {
        let mut buf = BytesMut::new();
        match value.to_sql(&Type::TEXT, &mut buf).unwrap() {
            IsNull::Yes => None,
            IsNull::No => Some(String::from_utf8(buf.to_vec()).unwrap()),
        }
    }

    #[test]
    fn encodes_as_postgres_text() {
        assert_eq!(encode(&SqlValue::Int(500)).as_deref(), Some("500"));
        assert_eq!(encode(&SqlValue::Float(10000.99)).as_deref(), Some("10000.99"));
        assert_eq!(encode(&SqlValue::Bool(true)).as_deref(), Some("true"));
        assert_eq!(encode(&"it's".into()).as_deref(), Some("it's"));
        assert_eq!(encode(&SqlValue::Null), None);
        assert!(matches!(
            SqlValue::Int(1).encode_format(&Type::INT4),
            Format::Text
        ));
    }

    #[test]
    fn truthiness() {
        assert!(SqlValue::Bool(true).is_truthy());
        assert!(!SqlValue::Bool(false).is_truthy());
        assert!(!SqlValue::Null.is_truthy());
        assert!(!SqlValue::Int(0).is_truthy());
        assert!(SqlValue::Float(0.5).is_truthy());
        assert!(!SqlValue::Float(f64::NAN).is_truthy());
        assert!(SqlValue::from("true").is_truthy());
        assert!(!SqlValue::from("FALSE").is_truthy());
        assert!(!SqlValue::from("0").is_truthy());
        assert!(!SqlValue::from("").is_truthy());
    }

    #[test]
    fn numeric_views_parse_text() {
        assert_eq!(SqlValue::from(" 42 ").as_i64(), Some(42));
        assert_eq!(SqlValue::from("4.5").as_i64(), None);
        assert_eq!(SqlValue::Float(3.0).as_i64(), Some(3));
        assert_eq!(SqlValue::from("4.5").as_f64(), Some(4.5));
        assert_eq!(SqlValue::from("NaN").as_f64(), None);
        assert_eq!(SqlValue::Bool(true).as_f64(), None);
    }

    #[test]
    fn type_names_for_log_fields() {
        assert_eq!(SqlValue::Null.type_name(), "null");
        assert_eq!(SqlValue::from("x").type_name(), "text");
        assert_eq!(SqlValue::Float(1.5).type_name(), "float");
    }

    #[test]
    fn whole_floats_outside_i64_are_not_integers() {
        assert_eq!(SqlValue::Float(1e19).as_i64(), None);
        assert_eq!(SqlValue::Float(-1e19).as_i64(), None);
        assert_eq!(SqlValue::Float(9.223372036854775807e18).as_i64(), None);
        assert_eq!(SqlValue::Float(-9.223372036854775808e18).as_i64(), Some(i64::MIN));
        assert_eq!(SqlValue::Float(f64::INFINITY).as_i64(), None);
    }

    #[test]
    fn integers_past_i64_are_rejected() {
        let big: serde_json::Value = serde_json::from_str("18446744073709551615").unwrap();
        assert!(matches!(
            SqlValue::try_from(big),
            Err(SqlError::UnsupportedValue(_))
        ));
        assert!(serde_json::from_str::<SqlValue>("18446744073709551615").is_err());
        assert_eq!(
            serde_json::from_str::<SqlValue>("9223372036854775807").unwrap(),
            SqlValue::Int(i64::MAX)
        );
        assert!(serde_json::from_str::<SqlValue>("[1]").is_err());
    }

    #[test]
    fn from_json_keeps_integer_and_float_apart() {
        let v = SqlValue::try_from(serde_json::json!(500)).unwrap();
        assert_eq!(v, SqlValue::Int(500));
        let v = SqlValue::try_from(serde_json::json!(10000.99)).unwrap();
        assert_eq!(v, SqlValue::Float(10000.99));
        assert!(matches!(
            SqlValue::try_from(serde_json::json!([1, 2])),
            Err(SqlError::UnsupportedValue(_))
        ));
    }

    #[test]
    fn serde_round_trips_untagged() {
        let values: Vec<SqlValue> = serde_json::from_str(r#"[null, true, 3, 1.5, "x"]"#).unwrap();
        assert_eq!(
            values,
            vec![
                SqlValue::Null,
                SqlValue::Bool(true),
                SqlValue::Int(3),
                SqlValue::Float(1.5),
                SqlValue::from("x"),
            ]
        );
        assert_eq!(serde_json::to_string(&values).unwrap(), r#"[null,true,3,1.5,"x"]"#);
    }
}

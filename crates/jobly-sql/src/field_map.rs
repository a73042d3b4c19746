//! Insertion-ordered field maps and column aliases.
//!
//! Positional parameters are numbered in key order, so a [`FieldMap`] never
//! reorders its entries: JSON payloads, query-string pairs and programmatic
//! inserts all keep the order the client supplied.

use crate::error::{SqlError, SqlResult};
use crate::value::SqlValue;
use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use std::collections::HashMap;
use std::fmt;

/// Ordered mapping from logical field name to value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldMap {
    entries: Vec<(String, SqlValue)>,
}

impl FieldMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a field.
    ///
    /// An existing key keeps its position and gets the new value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<SqlValue>) -> &mut Self {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((key, value)),
        }
        self
    }

    /// Chainable insert (consumes self, returns Self).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Build from raw query-string pairs; every value becomes text.
    ///
    /// Filter builders coerce the text to the shape each key needs.
    pub fn from_query_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let mut map = Self::new();
        for (k, v) in pairs {
            map.insert(k, SqlValue::Text(v.into()));
        }
        map
    }

    pub fn get(&self, key: &str) -> Option<&SqlValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SqlValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &SqlValue> {
        self.entries.iter().map(|(_, v)| v)
    }
}

impl<K, V> FromIterator<(K, V)> for FieldMap
where
    K: Into<String>,
    V: Into<SqlValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl IntoIterator for FieldMap {
    type Item = (String, SqlValue);
    type IntoIter = std::vec::IntoIter<(String, SqlValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl TryFrom<serde_json::Map<String, serde_json::Value>> for FieldMap {
    type Error = SqlError;

    fn try_from(object: serde_json::Map<String, serde_json::Value>) -> SqlResult<Self> {
        let mut map = Self::new();
        for (k, v) in object {
            map.insert(k, SqlValue::try_from(v)?);
        }
        Ok(map)
    }
}

impl TryFrom<serde_json::Value> for FieldMap {
    type Error = SqlError;

    fn try_from(value: serde_json::Value) -> SqlResult<Self> {
        match value {
            serde_json::Value::Object(object) => Self::try_from(object),
            other => Err(SqlError::UnsupportedValue(other.to_string())),
        }
    }
}

impl<'de> Deserialize<'de> for FieldMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct FieldMapVisitor;

        impl<'de> Visitor<'de> for FieldMapVisitor {
            type Value = FieldMap;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object of scalar fields")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<FieldMap, A::Error> {
                let mut map = FieldMap::new();
                while let Some((k, v)) = access.next_entry::<String, SqlValue>()? {
                    map.insert(k, v);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(FieldMapVisitor)
    }
}

/// Mapping from logical field name to physical column name.
///
/// Names without an alias are used verbatim as the column name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnAliases {
    aliases: HashMap<String, String>,
}

impl ColumnAliases {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an alias (consuming builder form).
    pub fn alias(mut self, field: impl Into<String>, column: impl Into<String>) -> Self {
        self.aliases.insert(field.into(), column.into());
        self
    }

    /// Resolve the column for a logical field name.
    pub fn column<'a>(&'a self, field: &'a str) -> &'a str {
        self.aliases.get(field).map_or(field, String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for ColumnAliases
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            aliases: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

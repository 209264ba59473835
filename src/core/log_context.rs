//! Structured key-value fields
//!
//! This module provides:
//! - `FieldValue`: a typed field value
//! - `Field`: one key-value pair
//! - `Fields`: an ordered field set where a later value for an existing key
//!   replaces the earlier one in place

use std::fmt;
use std::time::Duration;

use super::timestamp::format_duration;

/// Value type for structured logging fields
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    String(String),
    Int(i64),
    Uint(u64),
    Float(f64),
    Bool(bool),
    Duration(Duration),
    Null,
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::String(s) => write!(f, "{}", s),
            FieldValue::Int(i) => write!(f, "{}", i),
            FieldValue::Uint(u) => write!(f, "{}", u),
            FieldValue::Float(fl) => write!(f, "{}", fl),
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Duration(d) => write!(f, "{}", format_duration(*d)),
            FieldValue::Null => write!(f, "null"),
        }
    }
}

impl FieldValue {
    /// Convert to serde_json::Value, rendering durations as `1.5s` strings
    #[must_use]
    pub fn to_json_value(&self) -> serde_json::Value {
        self.to_json_value_with(|d| serde_json::Value::String(format_duration(d)))
    }

    /// Convert to serde_json::Value with a caller-chosen duration rendering
    pub(crate) fn to_json_value_with(
        &self,
        duration: impl Fn(Duration) -> serde_json::Value,
    ) -> serde_json::Value {
        match self {
            FieldValue::String(s) => serde_json::Value::String(s.clone()),
            FieldValue::Int(i) => serde_json::Value::Number((*i).into()),
            FieldValue::Uint(u) => serde_json::Value::Number((*u).into()),
            FieldValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            FieldValue::Bool(b) => serde_json::Value::Bool(*b),
            FieldValue::Duration(d) => duration(*d),
            FieldValue::Null => serde_json::Value::Null,
        }
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::String(s)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::String(s.to_string())
    }
}

impl From<&String> for FieldValue {
    fn from(s: &String) -> Self {
        FieldValue::String(s.clone())
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        FieldValue::Int(i)
    }
}

impl From<i32> for FieldValue {
    fn from(i: i32) -> Self {
        FieldValue::Int(i as i64)
    }
}

impl From<u64> for FieldValue {
    fn from(u: u64) -> Self {
        FieldValue::Uint(u)
    }
}

impl From<u32> for FieldValue {
    fn from(u: u32) -> Self {
        FieldValue::Uint(u as u64)
    }
}

impl From<u16> for FieldValue {
    fn from(u: u16) -> Self {
        FieldValue::Uint(u as u64)
    }
}

impl From<usize> for FieldValue {
    fn from(u: usize) -> Self {
        FieldValue::Uint(u as u64)
    }
}

impl From<f64> for FieldValue {
    fn from(f: f64) -> Self {
        FieldValue::Float(f)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl From<Duration> for FieldValue {
    fn from(d: Duration) -> Self {
        FieldValue::Duration(d)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(FieldValue::Null)
    }
}

/// A single structured field
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub key: String,
    pub value: FieldValue,
}

impl Field {
    pub fn new(key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Ordered set of structured fields
///
/// Keys are unique. Adding a key that already exists replaces its value and
/// keeps its original position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fields {
    fields: Vec<Field>,
}

impl Fields {
    /// Create a new empty field set
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Add a field to the set
    #[must_use]
    pub fn with<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        self.add(key, value);
        self
    }

    /// Add a field to the set (mutable version)
    pub fn add<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        self.push(Field::new(key, value));
    }

    /// Add an already-built field
    pub fn push(&mut self, field: Field) {
        match self.fields.iter_mut().find(|f| f.key == field.key) {
            Some(existing) => existing.value = field.value,
            None => self.fields.push(field),
        }
    }

    /// Merge `other` into this set; values from `other` win on collision
    pub fn extend(&mut self, other: impl IntoIterator<Item = Field>) {
        for field in other {
            self.push(field);
        }
    }

    /// Return a new set holding `self` overlaid with `other`
    #[must_use]
    pub fn merged(&self, other: &Fields) -> Fields {
        let mut merged = self.clone();
        merged.extend(other.iter().cloned());
        merged
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|f| f.key == key).map(|f| &f.value)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Format fields as key=value pairs
    pub fn format_fields(&self) -> String {
        self.fields
            .iter()
            .map(|f| format!("{}={}", f.key, f.value))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for Fields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_fields())
    }
}

impl From<Vec<Field>> for Fields {
    fn from(fields: Vec<Field>) -> Self {
        fields.into_iter().collect()
    }
}

impl From<Field> for Fields {
    fn from(field: Field) -> Self {
        Fields {
            fields: vec![field],
        }
    }
}

impl FromIterator<Field> for Fields {
    fn from_iter<I: IntoIterator<Item = Field>>(iter: I) -> Self {
        let mut fields = Fields::new();
        fields.extend(iter);
        fields
    }
}

impl IntoIterator for Fields {
    type Item = Field;
    type IntoIter = std::vec::IntoIter<Field>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fields_creation() {
        let fields = Fields::new();
        assert!(fields.is_empty());
    }

    #[test]
    fn test_fields_keep_insertion_order() {
        let fields = Fields::new()
            .with("user_id", 123)
            .with("username", "john_doe")
            .with("active", true);

        let keys: Vec<&str> = fields.iter().map(|f| f.key.as_str()).collect();
        assert_eq!(keys, vec!["user_id", "username", "active"]);
    }

    #[test]
    fn test_fields_later_value_wins() {
        let fields = Fields::new()
            .with("key", "first")
            .with("other", 1)
            .with("key", "second");

        assert_eq!(fields.len(), 2);
        assert_eq!(fields.get("key"), Some(&FieldValue::from("second")));
        assert_eq!(fields.iter().next().map(|f| f.key.as_str()), Some("key"));
    }

    #[test]
    fn test_merged_does_not_touch_parent() {
        let parent = Fields::new().with("service", "api").with("region", "eu");
        let child = parent.merged(&Fields::new().with("region", "us").with("shard", 3));

        assert_eq!(parent.get("region"), Some(&FieldValue::from("eu")));
        assert_eq!(parent.len(), 2);
        assert_eq!(child.get("region"), Some(&FieldValue::from("us")));
        assert_eq!(child.len(), 3);
    }

    #[test]
    fn test_format_fields() {
        let fields = Fields::new()
            .with("key1", "value1")
            .with("key2", 42)
            .with("took", Duration::from_millis(1500));

        assert_eq!(fields.format_fields(), "key1=value1 key2=42 took=1.5s");
    }

    #[test]
    fn test_json_value_conversion() {
        assert_eq!(FieldValue::Float(f64::NAN).to_json_value(), serde_json::Value::Null);
        assert_eq!(FieldValue::from(7u64).to_json_value(), serde_json::json!(7));
        assert_eq!(
            FieldValue::from(Duration::from_millis(250)).to_json_value(),
            serde_json::json!("250ms")
        );
        assert_eq!(FieldValue::from(None::<i64>), FieldValue::Null);
    }
}

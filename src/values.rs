//! Loosely typed values passed across the provider boundary. Callers hand the
//! provider a column → value map the same way an editor form would: numbers
//! may arrive as text, optional fields may be null. Validation decides what is
//! acceptable; these types only carry data and bind it to SQLite.

use std::collections::BTreeMap;
use std::fmt;

use rusqlite::types::{ToSql, ToSqlOutput, Type, Value as SqlValue, ValueRef};

/// A single SQL value as read from or written to the store.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl Value {
    /// Lenient integer view: integers as-is, whole reals converted, text
    /// parsed after trimming. Fractional or out-of-range reals, null, and
    /// unparseable text yield `None`; nothing is ever rounded.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(value) => Some(*value),
            Value::Real(value) => real_to_integer(*value),
            Value::Text(text) => text.trim().parse().ok(),
            Value::Null | Value::Blob(_) => None,
        }
    }

    /// Lenient string view. Numbers are rendered; null and blobs yield `None`.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Value::Text(text) => Some(text.clone()),
            Value::Integer(value) => Some(value.to_string()),
            Value::Real(value) => Some(value.to_string()),
            Value::Null | Value::Blob(_) => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// SQLite storage class of this value.
    pub fn sql_type(&self) -> Type {
        match self {
            Value::Null => Type::Null,
            Value::Integer(_) => Type::Integer,
            Value::Real(_) => Type::Real,
            Value::Text(_) => Type::Text,
            Value::Blob(_) => Type::Blob,
        }
    }
}

/// `i64::MAX as f64` rounds up to 2^63, so the upper bound is exclusive.
fn real_to_integer(value: f64) -> Option<i64> {
    let in_range = value >= i64::MIN as f64 && value < i64::MAX as f64;
    (value.fract() == 0.0 && in_range).then_some(value as i64)
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("NULL"),
            Value::Integer(value) => write!(f, "{value}"),
            Value::Real(value) => write!(f, "{value}"),
            Value::Text(text) => write!(f, "{text}"),
            Value::Blob(bytes) => write!(f, "<{} bytes>", bytes.len()),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Integer(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Real(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Value::Blob(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl From<ValueRef<'_>> for Value {
    fn from(value: ValueRef<'_>) -> Self {
        match value {
            ValueRef::Null => Value::Null,
            ValueRef::Integer(value) => Value::Integer(value),
            ValueRef::Real(value) => Value::Real(value),
            ValueRef::Text(bytes) => Value::Text(String::from_utf8_lossy(bytes).into_owned()),
            ValueRef::Blob(bytes) => Value::Blob(bytes.to_vec()),
        }
    }
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Value::Null => ToSqlOutput::Owned(SqlValue::Null),
            Value::Integer(value) => ToSqlOutput::Owned(SqlValue::Integer(*value)),
            Value::Real(value) => ToSqlOutput::Owned(SqlValue::Real(*value)),
            Value::Text(text) => ToSqlOutput::Borrowed(ValueRef::Text(text.as_bytes())),
            Value::Blob(bytes) => ToSqlOutput::Borrowed(ValueRef::Blob(bytes)),
        })
    }
}

/// Column → value map used for inserts and updates. Keys are kept sorted so
/// the generated SQL is deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentValues {
    values: BTreeMap<String, Value>,
}

impl ContentValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style `put`.
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.put(key, value);
        self
    }

    pub fn put(&mut self, key: &str, value: impl Into<Value>) {
        self.values.insert(key.to_string(), value.into());
    }

    pub fn put_null(&mut self, key: &str) {
        self.values.insert(key.to_string(), Value::Null);
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// `None` when the key is absent, null, or not readable as text.
    pub fn get_as_string(&self, key: &str) -> Option<String> {
        self.get(key).and_then(Value::as_text)
    }

    /// `None` when the key is absent, null, or not readable as an integer.
    pub fn get_as_integer(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(Value::as_integer)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// A `WHERE` clause with `?` placeholders and the arguments bound to them.
/// An empty selection matches every row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    clause: Option<String>,
    args: Vec<Value>,
}

impl Selection {
    /// Matches every row.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn new(clause: impl Into<String>) -> Self {
        let clause = clause.into();
        Self {
            clause: (!clause.trim().is_empty()).then_some(clause),
            args: Vec::new(),
        }
    }

    /// Append the next positional argument.
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.args.push(value.into());
        self
    }

    /// `_id = ?` bound to `id`.
    pub fn by_id(id: i64) -> Self {
        Self::new(format!("{} = ?", crate::contract::COLUMN_ID)).arg(id)
    }

    pub fn clause(&self) -> Option<&str> {
        self.clause.as_deref()
    }

    pub fn args(&self) -> &[Value] {
        &self.args
    }

    pub fn is_empty(&self) -> bool {
        self.clause.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

impl Direction {
    pub(crate) fn as_sql(self) -> &'static str {
        match self {
            Direction::Ascending => "ASC",
            Direction::Descending => "DESC",
        }
    }
}

/// Ordered list of `(column, direction)` sort keys.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SortOrder {
    keys: Vec<(String, Direction)>,
}

impl SortOrder {
    pub fn asc(column: &str) -> Self {
        Self::default().then_asc(column)
    }

    pub fn desc(column: &str) -> Self {
        Self::default().then_desc(column)
    }

    pub fn then_asc(mut self, column: &str) -> Self {
        self.keys.push((column.to_string(), Direction::Ascending));
        self
    }

    pub fn then_desc(mut self, column: &str) -> Self {
        self.keys.push((column.to_string(), Direction::Descending));
        self
    }

    pub fn keys(&self) -> &[(String, Direction)] {
        &self.keys
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_coercion_from_text() {
        assert_eq!(Value::from(" 14 ").as_integer(), Some(14));
        assert_eq!(Value::from("fourteen").as_integer(), None);
        assert_eq!(Value::from("").as_integer(), None);
        assert_eq!(Value::Null.as_integer(), None);
    }

    #[test]
    fn test_integer_coercion_never_rounds_reals() {
        assert_eq!(Value::Real(14.0).as_integer(), Some(14));
        assert_eq!(Value::Real(-3.0).as_integer(), Some(-3));
        assert_eq!(Value::Real(14.9).as_integer(), None);
        assert_eq!(Value::Real(-0.5).as_integer(), None);
        assert_eq!(Value::Real(f64::NAN).as_integer(), None);
        assert_eq!(Value::Real(1e300).as_integer(), None);
        assert_eq!(Value::from("14.9").as_integer(), None);
    }

    #[test]
    fn test_text_coercion() {
        assert_eq!(Value::from(3).as_text().as_deref(), Some("3"));
        assert_eq!(Value::Null.as_text(), None);
    }

    #[test]
    fn test_option_converts_to_null() {
        let breed: Option<&str> = None;
        assert!(Value::from(breed).is_null());
        assert_eq!(Value::from(Some("Terrier")), Value::Text("Terrier".into()));
    }

    #[test]
    fn test_content_values_accessors() {
        let values = ContentValues::new()
            .with("name", "Toto")
            .with("weight", "14")
            .with("breed", None::<String>);

        assert_eq!(values.len(), 3);
        assert!(values.contains_key("breed"));
        assert_eq!(values.get_as_string("breed"), None);
        assert_eq!(values.get_as_integer("weight"), Some(14));
        assert_eq!(values.keys().collect::<Vec<_>>(), vec!["breed", "name", "weight"]);
    }

    #[test]
    fn test_blank_selection_matches_everything() {
        assert!(Selection::new("   ").is_empty());
        assert!(Selection::all().is_empty());

        let by_id = Selection::by_id(7);
        assert_eq!(by_id.clause(), Some("_id = ?"));
        assert_eq!(by_id.args(), &[Value::Integer(7)]);
    }

    #[test]
    fn test_sort_order_keeps_key_order() {
        let order = SortOrder::asc("name").then_desc("weight");
        assert_eq!(
            order.keys(),
            &[
                ("name".to_string(), Direction::Ascending),
                ("weight".to_string(), Direction::Descending),
            ]
        );
    }
}

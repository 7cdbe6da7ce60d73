use bigdecimal::BigDecimal;
use std::cmp::Ordering;

/// A single column value, detached from its SQL type.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Int(i64),
    Bool(bool),
    Text(String),
    Decimal(BigDecimal),
    Timestamp(jiff::Timestamp),
    Date(jiff::civil::Date),
    Json(serde_json::Value),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(v) => Some(v),
            _ => None,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value as Json;
        match self {
            Value::Null => Json::Null,
            Value::Int(v) => Json::from(*v),
            Value::Bool(v) => Json::Bool(*v),
            Value::Text(v) => Json::String(v.clone()),
            Value::Decimal(v) => Json::String(v.to_string()),
            Value::Timestamp(v) => Json::String(v.to_string()),
            Value::Date(v) => Json::String(v.to_string()),
            Value::Json(v) => v.clone(),
        }
    }
}

impl Value {
    /// Orders two values the way `ORDER BY` does: nulls sort last and values
    /// of different kinds compare equal.
    pub fn sort_cmp(&self, other: &Value) -> Ordering {
        match (self, other) {
            (Value::Null, Value::Null) => Ordering::Equal,
            (Value::Null, _) => Ordering::Greater,
            (_, Value::Null) => Ordering::Less,
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::Text(a), Value::Text(b)) => a.cmp(b),
            (Value::Decimal(a), Value::Decimal(b)) => a.cmp(b),
            (Value::Timestamp(a), Value::Timestamp(b)) => a.cmp(b),
            (Value::Date(a), Value::Date(b)) => a.cmp(b),
            _ => Ordering::Equal,
        }
    }
}

pub fn to_json_map(
    row: &dyn Columns,
    columns: &[&str],
) -> serde_json::Map<String, serde_json::Value> {
    columns
        .iter()
        .map(|name| {
            let value = row.column(name).unwrap_or(Value::Null);
            ((*name).to_owned(), value.to_json())
        })
        .collect()
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v.into())
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

pub trait Columns {
    fn column(&self, name: &str) -> Option<Value>;
}

pub trait ColumnsMut: Columns {
    fn set_column(&mut self, name: &str, value: Value) -> Result<(), crate::Error>;
}

pub trait IntoValue {
    fn to_value(&self) -> Value;
}

pub trait FromValue: Sized {
    const EXPECTED: &'static str;

    fn from_value(value: Value) -> Option<Self>;
}

pub(crate) fn convert<T: FromValue>(column: &str, value: Value) -> Result<T, crate::Error> {
    T::from_value(value).ok_or_else(|| crate::Error::ColumnValue {
        column: column.to_owned(),
        expected: T::EXPECTED,
    })
}

impl IntoValue for i64 {
    fn to_value(&self) -> Value {
        Value::Int(*self)
    }
}

impl FromValue for i64 {
    const EXPECTED: &'static str = "integer";

    fn from_value(value: Value) -> Option<Self> {
        value.as_int()
    }
}

impl IntoValue for i32 {
    fn to_value(&self) -> Value {
        Value::Int((*self).into())
    }
}

impl FromValue for i32 {
    const EXPECTED: &'static str = "integer";

    fn from_value(value: Value) -> Option<Self> {
        value.as_int().and_then(|v| i32::try_from(v).ok())
    }
}

impl IntoValue for bool {
    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }
}

impl FromValue for bool {
    const EXPECTED: &'static str = "boolean";

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Bool(v) => Some(v),
            _ => None,
        }
    }
}

impl IntoValue for String {
    fn to_value(&self) -> Value {
        Value::Text(self.clone())
    }
}

impl FromValue for String {
    const EXPECTED: &'static str = "text";

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Text(v) => Some(v),
            _ => None,
        }
    }
}

impl IntoValue for BigDecimal {
    fn to_value(&self) -> Value {
        Value::Decimal(self.clone())
    }
}

impl FromValue for BigDecimal {
    const EXPECTED: &'static str = "decimal";

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Decimal(v) => Some(v),
            Value::Int(v) => Some(BigDecimal::from(v)),
            _ => None,
        }
    }
}

impl IntoValue for jiff_diesel::Timestamp {
    fn to_value(&self) -> Value {
        Value::Timestamp(self.to_jiff())
    }
}

impl FromValue for jiff_diesel::Timestamp {
    const EXPECTED: &'static str = "timestamp";

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Timestamp(v) => Some(v.into()),
            _ => None,
        }
    }
}

impl IntoValue for jiff_diesel::Date {
    fn to_value(&self) -> Value {
        Value::Date(self.to_jiff())
    }
}

impl FromValue for jiff_diesel::Date {
    const EXPECTED: &'static str = "date";

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Date(v) => Some(v.into()),
            _ => None,
        }
    }
}

impl IntoValue for serde_json::Value {
    fn to_value(&self) -> Value {
        Value::Json(self.clone())
    }
}

impl FromValue for serde_json::Value {
    const EXPECTED: &'static str = "json";

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Json(v) => Some(v),
            _ => None,
        }
    }
}

impl<T: IntoValue> IntoValue for Option<T> {
    fn to_value(&self) -> Value {
        match self {
            Some(v) => v.to_value(),
            None => Value::Null,
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    const EXPECTED: &'static str = T::EXPECTED;

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Null => Some(None),
            v => T::from_value(v).map(Some),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_columns_accept_null_but_required_ones_do_not() {
        assert_eq!(Option::<i64>::from_value(Value::Null), Some(None));
        assert_eq!(i64::from_value(Value::Null), None);
        assert_eq!(Option::<i64>::from_value(Value::Int(4)), Some(Some(4)));
    }

    #[test]
    fn conversion_errors_name_the_column() {
        let err = convert::<bool>("is_primary", Value::Text("yes".into())).unwrap_err();
        assert!(matches!(
            err,
            crate::Error::ColumnValue { ref column, expected: "boolean" } if column == "is_primary"
        ));
    }

    #[test]
    fn nulls_sort_after_everything_else() {
        let mut values = vec![Value::Null, Value::Int(3), Value::Int(1)];
        values.sort_by(Value::sort_cmp);
        assert_eq!(values, vec![Value::Int(1), Value::Int(3), Value::Null]);
    }

    #[test]
    fn json_rendering_keeps_integers_numeric() {
        assert_eq!(Value::Int(7).to_json(), serde_json::json!(7));
        assert_eq!(Value::Null.to_json(), serde_json::Value::Null);
    }
}

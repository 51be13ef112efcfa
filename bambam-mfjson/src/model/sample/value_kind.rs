use std::fmt::Display;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{NormalizeError, PropertyValue};

/// the semantic type a property value is coerced into during normalization.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    Numeric,
    IntegerEnum,
    Text,
}

impl Display for ValueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ValueKind::Numeric => "numeric",
            ValueKind::IntegerEnum => "integer enum",
            ValueKind::Text => "text",
        };
        write!(f, "{s}")
    }
}

impl ValueKind {
    /// guesses the kind of a property that has no catalog entry. arrays and
    /// objects have no scalar kind.
    pub fn infer(value: &Value) -> Option<ValueKind> {
        match value {
            Value::Number(n) if n.is_i64() || n.is_u64() => Some(ValueKind::IntegerEnum),
            Value::Number(_) => Some(ValueKind::Numeric),
            Value::String(_) | Value::Bool(_) => Some(ValueKind::Text),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }

    /// coerces a raw JSON value into this kind. `null` is an absent value, not an error.
    pub fn coerce(
        &self,
        name: &str,
        value: &Value,
    ) -> Result<Option<PropertyValue>, NormalizeError> {
        if value.is_null() {
            return Ok(None);
        }
        let coerced = match self {
            ValueKind::Numeric => as_finite_f64(value).map(PropertyValue::Number),
            ValueKind::IntegerEnum => as_integer(value).map(PropertyValue::Integer),
            ValueKind::Text => as_text(value).map(PropertyValue::Text),
        };
        coerced
            .map(Some)
            .ok_or_else(|| NormalizeError::PropertyTypeError {
                name: name.to_string(),
                expected: *self,
                found: value.to_string(),
            })
    }
}

fn as_finite_f64(value: &Value) -> Option<f64> {
    let f = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    f.is_finite().then_some(f)
}

/// integral floats such as `2.0` are accepted since some decoders emit every
/// number as a double.
fn as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

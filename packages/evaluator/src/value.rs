//! Run-time values
//!
//! Every resolution step produces a [`Value`]. `Value::Empty` is the only
//! failure channel: missing data, grammar failures and type-incompatible
//! operations all resolve to it and it propagates upward through the
//! combinators.

use crate::element::ElementStructure;
use crate::error::{TemplateError, TemplateResult};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Absence or failure (null, undefined, not-a-number)
    #[default]
    Empty,
    Number(f64),
    String(String),
    Boolean(bool),
    Array(Vec<Value>),
    Object(BTreeMap<String, Value>),
    Element(Box<ElementStructure>),
}

/// Fine-grained type of a value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Empty,
    Number,
    String,
    Boolean,
    Array,
    Object,
    Element,
}

/// Coarse category used by operators whose meaning does not depend on
/// the concrete type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueCategory {
    Empty,
    Literal,
    Structure,
}

impl ValueKind {
    pub fn category(self) -> ValueCategory {
        match self {
            ValueKind::Empty => ValueCategory::Empty,
            ValueKind::Number | ValueKind::String | ValueKind::Boolean => ValueCategory::Literal,
            ValueKind::Array | ValueKind::Object | ValueKind::Element => ValueCategory::Structure,
        }
    }
}

impl Value {
    /// Parse data given as JSON text
    pub fn from_json(json: &str) -> TemplateResult<Self> {
        serde_json::from_str::<serde_json::Value>(json)
            .map(Value::from)
            .map_err(TemplateError::InvalidData)
    }

    /// Numbers that are not numbers are empty
    pub fn number(number: f64) -> Self {
        if number.is_nan() {
            Value::Empty
        } else {
            Value::Number(number)
        }
    }

    pub fn string(text: impl Into<String>) -> Self {
        Value::String(text.into())
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Empty => ValueKind::Empty,
            Value::Number(number) if number.is_nan() => ValueKind::Empty,
            Value::Number(_) => ValueKind::Number,
            Value::String(_) => ValueKind::String,
            Value::Boolean(_) => ValueKind::Boolean,
            Value::Array(_) => ValueKind::Array,
            Value::Object(_) => ValueKind::Object,
            Value::Element(_) => ValueKind::Element,
        }
    }

    pub fn category(&self) -> ValueCategory {
        self.kind().category()
    }

    pub fn is_empty(&self) -> bool {
        self.kind() == ValueKind::Empty
    }

    /// Empty, or an empty string, array or object
    pub fn is_strictly_empty(&self) -> bool {
        match self {
            Value::String(text) => text.is_empty(),
            Value::Array(items) => items.is_empty(),
            Value::Object(map) => map.is_empty(),
            other => other.is_empty(),
        }
    }

    /// Truthiness used by `|` and `&`: `false` counts as absent
    pub fn is_truthy(&self) -> bool {
        !self.is_empty() && *self != Value::Boolean(false)
    }

    pub fn is_literal(&self) -> bool {
        self.category() == ValueCategory::Literal
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(number) => Some(*number),
            _ => None,
        }
    }

    pub fn as_element(&self) -> Option<&ElementStructure> {
        match self {
            Value::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Text form of a literal; `None` for everything else
    pub fn literal_text(&self) -> Option<String> {
        match self {
            Value::Number(number) => Some(format_number(*number)),
            Value::String(text) => Some(text.clone()),
            Value::Boolean(flag) => Some(flag.to_string()),
            _ => None,
        }
    }

    /// Text used when joining array items: literals as text, nested
    /// arrays comma-joined, anything else blank
    pub fn join_text(&self) -> String {
        match self {
            Value::Array(items) => items
                .iter()
                .map(Value::join_text)
                .collect::<Vec<_>>()
                .join(","),
            other => other.literal_text().unwrap_or_default(),
        }
    }

    /// Result normalization for whole expressions: NaN and empty
    /// collections become `Empty`
    pub fn normalized(self) -> Self {
        match self {
            Value::Number(number) if number.is_nan() => Value::Empty,
            Value::Array(ref items) if items.is_empty() => Value::Empty,
            Value::Object(ref map) if map.is_empty() => Value::Empty,
            other => other,
        }
    }
}

/// Render a number the way the template language prints it: integral
/// values without a fraction, infinities spelled out
pub fn format_number(number: f64) -> String {
    if number.is_infinite() {
        return if number > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if number == number.trunc() && number.abs() < 1e15 {
        return format!("{}", number as i64);
    }
    format!("{}", number)
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Empty,
            serde_json::Value::Bool(flag) => Value::Boolean(flag),
            serde_json::Value::Number(number) => {
                number.as_f64().map(Value::number).unwrap_or(Value::Empty)
            }
            serde_json::Value::String(text) => Value::String(text),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Object(
                map.into_iter()
                    .map(|(key, value)| (key, Value::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<f64> for Value {
    fn from(number: f64) -> Self {
        Value::number(number)
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::String(text.to_string())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value::String(text)
    }
}

impl From<bool> for Value {
    fn from(flag: bool) -> Self {
        Value::Boolean(flag)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<ElementStructure> for Value {
    fn from(element: ElementStructure) -> Self {
        Value::Element(Box::new(element))
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Empty => serializer.serialize_none(),
            Value::Number(number) if number.is_nan() => serializer.serialize_none(),
            Value::Number(number) if number.fract() == 0.0 && number.abs() < 1e15 => {
                serializer.serialize_i64(*number as i64)
            }
            Value::Number(number) => serializer.serialize_f64(*number),
            Value::String(text) => serializer.serialize_str(text),
            Value::Boolean(flag) => serializer.serialize_bool(*flag),
            Value::Array(items) => items.serialize(serializer),
            Value::Object(map) => map.serialize(serializer),
            Value::Element(element) => element.serialize(serializer),
        }
    }
}

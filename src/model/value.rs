// Copyright 2024 OctoFHIR Team
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Core value types produced by decision evaluation

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Format used when dates are rendered as text
const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Raw (untyped) value of a decision output
///
/// This is the type-erased view handed out by the map-like accessors of a
/// decision output. The declared type travels alongside it in [`TypedValue`].
#[derive(Clone, PartialEq)]
pub enum Value {
    /// Absent value
    Null,

    /// Boolean value
    Boolean(bool),

    /// 32-bit integer value
    Integer(i32),

    /// 64-bit integer value
    Long(i64),

    /// Double precision floating point value
    Double(f64),

    /// String value
    String(String),

    /// Date value (local date and time, no zone)
    Date(NaiveDateTime),
}

/// Declared type of a [`TypedValue`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    /// Type of the null value
    Null,
    /// Boolean type
    Boolean,
    /// 32-bit integer type
    Integer,
    /// 64-bit integer type
    Long,
    /// Double type
    Double,
    /// String type
    String,
    /// Date type
    Date,
}

impl ValueType {
    /// Resolve a DMN `typeRef` name to a value type
    ///
    /// Names are matched case-insensitively, so `String` and `string` are the
    /// same type. Returns `None` for names without a built-in value type.
    pub fn from_type_ref(type_ref: &str) -> Option<Self> {
        match type_ref.trim().to_ascii_lowercase().as_str() {
            "boolean" => Some(Self::Boolean),
            "integer" => Some(Self::Integer),
            "long" => Some(Self::Long),
            "double" => Some(Self::Double),
            "string" => Some(Self::String),
            "date" => Some(Self::Date),
            _ => None,
        }
    }

    /// Canonical DMN name of this type
    pub fn name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Long => "long",
            Self::Double => "double",
            Self::String => "string",
            Self::Date => "date",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Value {
    /// Check if this is the null value
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Natural type of this value
    pub fn value_type(&self) -> ValueType {
        match self {
            Self::Null => ValueType::Null,
            Self::Boolean(_) => ValueType::Boolean,
            Self::Integer(_) => ValueType::Integer,
            Self::Long(_) => ValueType::Long,
            Self::Double(_) => ValueType::Double,
            Self::String(_) => ValueType::String,
            Self::Date(_) => ValueType::Date,
        }
    }

    /// Try to read a boolean
    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to read an integral number, widening integers to 64 bits
    pub fn as_long(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(i64::from(*i)),
            Self::Long(l) => Some(*l),
            _ => None,
        }
    }

    /// Try to read a floating point number
    pub fn as_double(&self) -> Option<f64> {
        match self {
            Self::Double(d) => Some(*d),
            _ => None,
        }
    }

    /// Try to read a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to read a date
    pub fn as_date(&self) -> Option<&NaiveDateTime> {
        match self {
            Self::Date(d) => Some(d),
            _ => None,
        }
    }

    /// Read a JSON value as the given type
    ///
    /// JSON `null` is accepted for every type. Returns `None` when the JSON
    /// value has no representation in `value_type`, e.g. a long that does not
    /// fit an integer or a string that is not a date.
    pub fn from_json_typed(json: &serde_json::Value, value_type: ValueType) -> Option<Self> {
        if json.is_null() {
            return Some(Self::Null);
        }
        match value_type {
            ValueType::Null => None,
            ValueType::Boolean => json.as_bool().map(Self::Boolean),
            ValueType::Integer => json
                .as_i64()
                .and_then(|number| i32::try_from(number).ok())
                .map(Self::Integer),
            ValueType::Long => json.as_i64().map(Self::Long),
            ValueType::Double => json.as_f64().map(Self::Double),
            ValueType::String => json.as_str().map(|s| Self::String(s.to_string())),
            ValueType::Date => json
                .as_str()
                .and_then(|s| NaiveDateTime::parse_from_str(s, DATE_FORMAT).ok())
                .map(Self::Date),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Integer(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Long(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Double(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(value: NaiveDateTime) -> Self {
        Self::Date(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Convert a raw value to JSON
impl From<&Value> for serde_json::Value {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => serde_json::Value::Null,
            Value::Boolean(b) => serde_json::Value::Bool(*b),
            Value::Integer(i) => serde_json::Value::Number((*i).into()),
            Value::Long(l) => serde_json::Value::Number((*l).into()),
            // Non-finite doubles have no JSON number form
            Value::Double(d) => serde_json::Number::from_f64(*d)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Date(d) => serde_json::Value::String(d.format(DATE_FORMAT).to_string()),
        }
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serde_json::Value::from(self).serialize(serializer)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Long(l) => write!(f, "{l}"),
            Self::Double(d) => write!(f, "{d}"),
            Self::String(s) => write!(f, "{s}"),
            Self::Date(d) => write!(f, "{}", d.format(DATE_FORMAT)),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "Null"),
            Self::Boolean(b) => write!(f, "Boolean({b})"),
            Self::Integer(i) => write!(f, "Integer({i})"),
            Self::Long(l) => write!(f, "Long({l})"),
            Self::Double(d) => write!(f, "Double({d})"),
            Self::String(s) => write!(f, "String({s})"),
            Self::Date(d) => write!(f, "Date({})", d.format(DATE_FORMAT)),
        }
    }
}

/// A raw value paired with its declared type
///
/// The declared type matches the value's variant, except for nulls, which may
/// carry the type they were declared with (a `null` string is still a string).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypedValue {
    value: Value,
    #[serde(rename = "type")]
    value_type: ValueType,
}

impl TypedValue {
    /// Wrap a value using its natural type
    pub fn new(value: impl Into<Value>) -> Self {
        let value = value.into();
        let value_type = value.value_type();
        Self { value, value_type }
    }

    /// Untyped null
    pub fn null() -> Self {
        Self::new(Value::Null)
    }

    /// Null declared with a specific type
    pub fn null_of(value_type: ValueType) -> Self {
        Self {
            value: Value::Null,
            value_type,
        }
    }

    /// Boolean typed value
    pub fn boolean(value: bool) -> Self {
        Self::new(value)
    }

    /// Integer typed value
    pub fn integer(value: i32) -> Self {
        Self::new(value)
    }

    /// Long typed value
    pub fn long(value: i64) -> Self {
        Self::new(value)
    }

    /// Double typed value
    pub fn double(value: f64) -> Self {
        Self::new(value)
    }

    /// String typed value
    pub fn string(value: impl Into<String>) -> Self {
        Self::new(Value::String(value.into()))
    }

    /// Date typed value
    pub fn date(value: NaiveDateTime) -> Self {
        Self::new(value)
    }

    /// Underlying raw value
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Declared type
    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    /// Take the raw value, dropping the type
    pub fn into_value(self) -> Value {
        self.value
    }
}

macro_rules! impl_typed_value_from {
    ($($source:ty),* $(,)?) => {
        $(
            impl From<$source> for TypedValue {
                fn from(value: $source) -> Self {
                    Self::new(value)
                }
            }
        )*
    };
}

impl_typed_value_from!(Value, bool, i32, i64, f64, &str, String, NaiveDateTime);

/// Reads the declared `type` first and converts `value` to match it
impl<'de> Deserialize<'de> for TypedValue {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Wire {
            #[serde(default)]
            value: serde_json::Value,
            #[serde(rename = "type")]
            value_type: ValueType,
        }

        let wire = Wire::deserialize(deserializer)?;
        let value = Value::from_json_typed(&wire.value, wire.value_type).ok_or_else(|| {
            <D::Error as serde::de::Error>::custom(format!(
                "{} is not a valid {} value",
                wire.value, wire.value_type
            ))
        })?;
        Ok(Self {
            value,
            value_type: wire.value_type,
        })
    }
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.value, self.value_type)
    }
}

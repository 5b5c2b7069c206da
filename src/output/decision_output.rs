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

//! Immutable, ordered output of one decision evaluation
//!
//! An evaluation fills a [`DecisionOutputBuilder`] and freezes it into a
//! [`DecisionOutput`]. Consumers only ever see the frozen form, which offers
//! both a raw view (`name -> Value`) and a typed view (`name -> TypedValue`).
//! Nothing can change a built output: the map-style mutators exist only to
//! reject the call.

use indexmap::IndexMap;
use indexmap::map::{Iter, Keys, Values};
use serde::Serialize;
use serde::ser::SerializeMap;
use std::fmt;

use crate::error::{OutputError, OutputResult};
use crate::model::{TypedValue, Value};

/// Mutable form of a decision output, owned by the evaluation filling it
#[derive(Debug, Clone, Default)]
pub struct DecisionOutputBuilder {
    values: IndexMap<String, TypedValue>,
}

impl DecisionOutputBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a named value
    ///
    /// Output names are unique; producing the same name twice is an
    /// evaluation bug and fails with [`OutputError::DuplicateOutputName`].
    pub fn put_value(
        &mut self,
        name: impl Into<String>,
        value: impl Into<TypedValue>,
    ) -> OutputResult<()> {
        let name = name.into();
        if self.values.contains_key(&name) {
            return Err(OutputError::duplicate_name(name));
        }
        self.values.insert(name, value.into());
        Ok(())
    }

    /// Number of values appended so far
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if nothing was appended
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Freeze into a decision output
    pub fn build(self) -> DecisionOutput {
        DecisionOutput {
            values: self.values,
        }
    }
}

/// Named typed values produced by one decision evaluation, in insertion order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecisionOutput {
    values: IndexMap<String, TypedValue>,
}

impl DecisionOutput {
    /// Build an output from name/value pairs
    ///
    /// Fails on the first duplicated name.
    pub fn from_values<N, V>(values: impl IntoIterator<Item = (N, V)>) -> OutputResult<Self>
    where
        N: Into<String>,
        V: Into<TypedValue>,
    {
        let mut builder = DecisionOutputBuilder::new();
        for (name, value) in values {
            builder.put_value(name, value)?;
        }
        Ok(builder.build())
    }

    /// Typed value by name
    pub fn get_value_typed(&self, name: &str) -> Option<&TypedValue> {
        self.values.get(name)
    }

    /// Typed value inserted first
    pub fn get_first_value_typed(&self) -> Option<&TypedValue> {
        self.values.first().map(|(_, value)| value)
    }

    /// The only typed value of a single-output decision
    ///
    /// Returns `None` for an empty output and fails with
    /// [`OutputError::MultipleOutputValues`] when there is more than one value.
    pub fn get_single_value_typed(&self) -> OutputResult<Option<&TypedValue>> {
        if self.values.len() > 1 {
            return Err(OutputError::MultipleOutputValues {
                count: self.values.len(),
                names: self.values.keys().cloned().collect(),
            });
        }
        Ok(self.get_first_value_typed())
    }

    /// Raw value by name
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.get_value_typed(name).map(TypedValue::value)
    }

    /// Raw value inserted first
    pub fn get_first_value(&self) -> Option<&Value> {
        self.get_first_value_typed().map(TypedValue::value)
    }

    /// Raw value of a single-output decision, see [`Self::get_single_value_typed`]
    pub fn get_single_value(&self) -> OutputResult<Option<&Value>> {
        Ok(self.get_single_value_typed()?.map(TypedValue::value))
    }

    /// Copy of all raw values keyed by name
    ///
    /// The returned map is owned by the caller; changing it has no effect on
    /// this output.
    pub fn get_value_map(&self) -> IndexMap<String, Value> {
        self.values
            .iter()
            .map(|(name, value)| (name.clone(), value.value().clone()))
            .collect()
    }

    /// Number of values
    pub fn size(&self) -> usize {
        self.values.len()
    }

    /// Check if there are no values
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Check if a value with this name exists
    pub fn contains_key(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Check if any raw value equals `value`
    pub fn contains_value(&self, value: &Value) -> bool {
        self.values().any(|candidate| candidate == value)
    }

    /// Names in insertion order
    pub fn key_set(&self) -> Keys<'_, String, TypedValue> {
        self.values.keys()
    }

    /// Raw values in insertion order
    pub fn values(&self) -> impl ExactSizeIterator<Item = &Value> + '_ {
        self.values.values().map(TypedValue::value)
    }

    /// Typed values in insertion order
    pub fn values_typed(&self) -> Values<'_, String, TypedValue> {
        self.values.values()
    }

    /// Raw-valued entries in insertion order
    pub fn entry_set(&self) -> impl ExactSizeIterator<Item = DecisionOutputEntry<'_>> + '_ {
        self.values
            .iter()
            .map(|(name, typed_value)| DecisionOutputEntry { name, typed_value })
    }

    /// Name/typed value pairs in insertion order
    pub fn iter(&self) -> Iter<'_, String, TypedValue> {
        self.values.iter()
    }

    /// Rejected: outputs are immutable
    pub fn put(&self, _name: &str, _value: Value) -> OutputResult<Option<Value>> {
        Err(OutputError::unsupported("put"))
    }

    /// Rejected: outputs are immutable
    pub fn remove(&self, _name: &str) -> OutputResult<Option<Value>> {
        Err(OutputError::unsupported("remove"))
    }

    /// Rejected: outputs are immutable
    pub fn put_all<I>(&self, _values: I) -> OutputResult<()>
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        Err(OutputError::unsupported("putAll"))
    }

    /// Rejected: outputs are immutable
    pub fn clear(&self) -> OutputResult<()> {
        Err(OutputError::unsupported("clear"))
    }
}

impl<'a> IntoIterator for &'a DecisionOutput {
    type Item = (&'a String, &'a TypedValue);
    type IntoIter = Iter<'a, String, TypedValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

impl fmt::Display for DecisionOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries: Vec<String> = self
            .values
            .iter()
            .map(|(name, value)| format!("{name}={}", value.value()))
            .collect();
        write!(f, "{{{}}}", entries.join(", "))
    }
}

/// Serializes as an object of raw values in insertion order
impl Serialize for DecisionOutput {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (name, value) in &self.values {
            map.serialize_entry(name, value.value())?;
        }
        map.end()
    }
}

/// Read-only entry of a decision output
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecisionOutputEntry<'a> {
    name: &'a str,
    typed_value: &'a TypedValue,
}

impl<'a> DecisionOutputEntry<'a> {
    /// Output name
    pub fn key(&self) -> &'a str {
        self.name
    }

    /// Raw value
    pub fn value(&self) -> &'a Value {
        self.typed_value.value()
    }

    /// Typed value
    pub fn value_typed(&self) -> &'a TypedValue {
        self.typed_value
    }

    /// Rejected: entries are immutable
    pub fn set_value(&self, _value: Value) -> OutputResult<Value> {
        Err(OutputError::unsupported("setValue"))
    }
}

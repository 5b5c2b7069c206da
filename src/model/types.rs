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

//! Type definitions attached to decision expressions

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::value::{TypedValue, ValueType};

/// Name reported by the unspecified type definition
pub const UNSPECIFIED_TYPE_NAME: &str = "unspecified";

/// Declared type of an expression or clause
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeDefinition {
    /// Type name as written in the model (`typeRef`)
    type_name: String,
    /// Value type the name resolves to, if it is a known one
    value_type: Option<ValueType>,
}

impl TypeDefinition {
    /// Sentinel used when nothing was declared
    pub fn unspecified() -> Self {
        Self {
            type_name: UNSPECIFIED_TYPE_NAME.to_string(),
            value_type: None,
        }
    }

    /// Type definition constrained to a value type
    pub fn of(value_type: ValueType) -> Self {
        Self {
            type_name: value_type.name().to_string(),
            value_type: Some(value_type),
        }
    }

    /// Type definition carrying only a name
    pub fn named(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            value_type: None,
        }
    }

    /// Type name
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Value type constraint, if any
    pub fn value_type(&self) -> Option<ValueType> {
        self.value_type
    }

    /// Check if this is the unspecified sentinel
    pub fn is_unspecified(&self) -> bool {
        self.value_type.is_none() && self.type_name == UNSPECIFIED_TYPE_NAME
    }

    /// Check whether a value satisfies this definition
    ///
    /// Nulls pass any definition, as do all values when there is no value type
    /// constraint. Integers are accepted where longs are declared.
    pub fn accepts(&self, value: &TypedValue) -> bool {
        let Some(expected) = self.value_type else {
            return true;
        };
        let actual = value.value_type();
        value.value().is_null()
            || actual == expected
            || (expected == ValueType::Long && actual == ValueType::Integer)
    }
}

impl Default for TypeDefinition {
    fn default() -> Self {
        Self::unspecified()
    }
}

impl fmt::Display for TypeDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeDefinition{{typeName='{}'}}", self.type_name)
    }
}

/// Lookup table from `typeRef` names to type definitions
#[derive(Debug, Clone)]
pub struct TypeRegistry {
    types: FxHashMap<String, TypeDefinition>,
}

impl TypeRegistry {
    /// Create a registry without any types
    pub fn empty() -> Self {
        Self {
            types: FxHashMap::default(),
        }
    }

    /// Create a registry with the built-in DMN types
    pub fn new() -> Self {
        let mut registry = Self::empty();
        for value_type in [
            ValueType::Boolean,
            ValueType::Integer,
            ValueType::Long,
            ValueType::Double,
            ValueType::String,
            ValueType::Date,
        ] {
            registry.register(value_type.name(), TypeDefinition::of(value_type));
        }
        registry
    }

    /// Register a type definition under a name (case-insensitive)
    pub fn register(&mut self, name: &str, definition: TypeDefinition) {
        self.types.insert(name.trim().to_ascii_lowercase(), definition);
    }

    /// Resolve a `typeRef` name
    pub fn resolve(&self, type_ref: &str) -> Option<&TypeDefinition> {
        self.types.get(&type_ref.trim().to_ascii_lowercase())
    }

    /// Number of registered types
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Check if no types are registered
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

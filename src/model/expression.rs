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

//! Expression elements handed to the expression evaluator

use serde::{Deserialize, Serialize};
use std::fmt;

use super::types::TypeDefinition;

/// A keyed expression written in some expression language
///
/// Handlers create it empty and fill it field by field. The evaluator owns all
/// interpretation of the source; this type only carries it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpressionElement {
    key: Option<String>,
    name: Option<String>,
    expression_language: Option<String>,
    expression: Option<String>,
    type_definition: TypeDefinition,
}

impl ExpressionElement {
    /// Create an empty expression with the unspecified type
    pub fn new() -> Self {
        Self::default()
    }

    /// Key correlating this expression with evaluation results
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Set the key
    pub fn set_key(&mut self, key: impl Into<String>) {
        self.key = Some(key.into());
    }

    /// Display name
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Set the display name
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    /// Language the source is written in
    pub fn expression_language(&self) -> Option<&str> {
        self.expression_language.as_deref()
    }

    /// Set the expression language
    pub fn set_expression_language(&mut self, language: impl Into<String>) {
        self.expression_language = Some(language.into());
    }

    /// Expression source text
    pub fn expression(&self) -> Option<&str> {
        self.expression.as_deref()
    }

    /// Set the expression source text
    pub fn set_expression(&mut self, expression: impl Into<String>) {
        self.expression = Some(expression.into());
    }

    /// Declared type; the unspecified sentinel unless replaced
    pub fn type_definition(&self) -> &TypeDefinition {
        &self.type_definition
    }

    /// Replace the declared type
    pub fn set_type_definition(&mut self, type_definition: TypeDefinition) {
        self.type_definition = type_definition;
    }
}

impl fmt::Display for ExpressionElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn field(value: &Option<String>) -> &str {
            value.as_deref().unwrap_or("null")
        }

        write!(
            f,
            "ExpressionElement{{key='{}', name='{}', expressionLanguage='{}', expression='{}', typeDefinition='{}'}}",
            field(&self.key),
            field(&self.name),
            field(&self.expression_language),
            field(&self.expression),
            self.type_definition
        )
    }
}

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

//! Source document tree supplied by the model loader
//!
//! The loader owns parsing of the textual format. It hands over a tree of
//! [`SourceElement`]s whose kind tags drive handler dispatch.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::TransformResult;

/// Attribute holding a DMN type reference
pub const ATTR_TYPE_REF: &str = "typeRef";
/// Attribute holding an expression language URI or name
pub const ATTR_EXPRESSION_LANGUAGE: &str = "expressionLanguage";
/// Attribute holding a decision table hit policy
pub const ATTR_HIT_POLICY: &str = "hitPolicy";
/// Attribute holding a human readable label
pub const ATTR_LABEL: &str = "label";
/// Attribute holding the definitions namespace
pub const ATTR_NAMESPACE: &str = "namespace";
/// Attribute holding the variable name an input is bound to
pub const ATTR_INPUT_VARIABLE: &str = "inputVariable";

/// Kind tag of a source element
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ElementKind {
    /// Root `definitions` element
    Definitions,
    /// `decision`
    Decision,
    /// `decisionTable`
    DecisionTable,
    /// Input clause (`input`)
    Input,
    /// `inputExpression` of an input clause
    InputExpression,
    /// Output clause (`output`)
    Output,
    /// `rule` of a decision table
    Rule,
    /// Unary tests of a rule (`inputEntry`)
    InputEntry,
    /// Literal expression of a rule (`outputEntry`)
    OutputEntry,
    /// Decision logic given as a `literalExpression`
    LiteralExpression,
    /// Any other element kind
    Extension(String),
}

impl ElementKind {
    /// Tag as it appears in the source document
    pub fn as_str(&self) -> &str {
        match self {
            Self::Definitions => "definitions",
            Self::Decision => "decision",
            Self::DecisionTable => "decisionTable",
            Self::Input => "input",
            Self::InputExpression => "inputExpression",
            Self::Output => "output",
            Self::Rule => "rule",
            Self::InputEntry => "inputEntry",
            Self::OutputEntry => "outputEntry",
            Self::LiteralExpression => "literalExpression",
            Self::Extension(tag) => tag,
        }
    }
}

impl From<&str> for ElementKind {
    fn from(tag: &str) -> Self {
        match tag {
            "definitions" => Self::Definitions,
            "decision" => Self::Decision,
            "decisionTable" => Self::DecisionTable,
            "input" => Self::Input,
            "inputExpression" => Self::InputExpression,
            "output" => Self::Output,
            "rule" => Self::Rule,
            "inputEntry" => Self::InputEntry,
            "outputEntry" => Self::OutputEntry,
            "literalExpression" => Self::LiteralExpression,
            other => Self::Extension(other.to_string()),
        }
    }
}

impl From<String> for ElementKind {
    fn from(tag: String) -> Self {
        Self::from(tag.as_str())
    }
}

impl From<ElementKind> for String {
    fn from(kind: ElementKind) -> Self {
        match kind {
            ElementKind::Extension(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One node of the source document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceElement {
    /// Kind tag used for handler dispatch
    pub kind: ElementKind,
    /// Element id, unique within a document
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Element name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Text content (expression source for expression elements)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Remaining attributes, in document order
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub attributes: IndexMap<String, String>,
    /// Child elements, in document order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SourceElement>,
}

impl SourceElement {
    /// Create an element of the given kind
    pub fn new(kind: impl Into<ElementKind>) -> Self {
        Self {
            kind: kind.into(),
            id: None,
            name: None,
            text: None,
            attributes: IndexMap::new(),
            children: Vec::new(),
        }
    }

    /// Parse an element tree from JSON
    pub fn from_json(json: &str) -> TransformResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Set the id
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the text content
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Add an attribute
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Append a child
    pub fn with_child(mut self, child: SourceElement) -> Self {
        self.children.push(child);
        self
    }

    /// Append several children
    pub fn with_children(mut self, children: impl IntoIterator<Item = SourceElement>) -> Self {
        self.children.extend(children);
        self
    }

    /// Look up an attribute, treating blank values as absent
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .get(name)
            .map(String::as_str)
            .filter(|value| !value.trim().is_empty())
    }

    /// Path segment used in diagnostics: `kind[id]` or `kind`
    pub fn segment(&self) -> String {
        match &self.id {
            Some(id) => format!("{}[{id}]", self.kind),
            None => self.kind.to_string(),
        }
    }
}

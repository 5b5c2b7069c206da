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

//! Error types for model transformation and decision outputs

use thiserror::Error;

/// Result type alias for transformation operations
pub type TransformResult<T> = std::result::Result<T, TransformError>;

/// Result type alias for decision output access
pub type OutputResult<T> = std::result::Result<T, OutputError>;

/// Result type alias for the crate-level error
pub type Result<T> = std::result::Result<T, DmnError>;

/// Errors raised while turning a source document into a decision model
///
/// Every variant is fatal to the document being transformed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransformError {
    /// No handler is registered for a source element kind
    #[error("No element handler registered for '{kind}' at {path}")]
    UnhandledElementKind {
        /// Element kind tag
        kind: String,
        /// Path of the element in the document
        path: String,
    },

    /// Required sub-structure is missing or misplaced
    #[error("Malformed '{kind}' element at {path}: {message}")]
    MalformedSourceElement {
        /// Element kind tag
        kind: String,
        /// Path of the element in the document
        path: String,
        /// What is wrong with it
        message: String,
    },

    /// Source document or configuration could not be read
    #[error("Invalid source: {message}")]
    InvalidSource {
        /// Error message
        message: String,
    },
}

impl TransformError {
    /// Create an unhandled element kind error
    pub fn unhandled_element_kind(kind: impl ToString, path: impl Into<String>) -> Self {
        Self::UnhandledElementKind {
            kind: kind.to_string(),
            path: path.into(),
        }
    }

    /// Create a malformed source element error
    pub fn malformed(
        kind: impl ToString,
        path: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::MalformedSourceElement {
            kind: kind.to_string(),
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an invalid source error
    pub fn invalid_source(message: impl Into<String>) -> Self {
        Self::InvalidSource {
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for TransformError {
    fn from(err: serde_json::Error) -> Self {
        Self::invalid_source(err.to_string())
    }
}

/// Errors raised by decision outputs and results
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OutputError {
    /// Single value requested from an output with several entries
    #[error("Decision output has {count} values but a single value was requested: {names:?}")]
    MultipleOutputValues {
        /// Number of entries
        count: usize,
        /// Entry names, in insertion order
        names: Vec<String>,
    },

    /// Single output requested from a result with several outputs
    #[error("Decision result has {count} outputs but a single output was requested")]
    MultipleDecisionOutputs {
        /// Number of outputs
        count: usize,
    },

    /// Mutation attempted on a frozen output
    #[error("Decision output is immutable: '{operation}' is not supported")]
    UnsupportedOperation {
        /// Name of the rejected operation
        operation: &'static str,
    },

    /// Output name produced twice during one evaluation
    #[error("Decision output already contains a value named '{name}'")]
    DuplicateOutputName {
        /// Duplicated name
        name: String,
    },
}

impl OutputError {
    /// Create an unsupported operation error
    pub fn unsupported(operation: &'static str) -> Self {
        Self::UnsupportedOperation { operation }
    }

    /// Create a duplicate output name error
    pub fn duplicate_name(name: impl Into<String>) -> Self {
        Self::DuplicateOutputName { name: name.into() }
    }
}

/// Crate-level error
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DmnError {
    /// Transformation failed
    #[error(transparent)]
    Transform(#[from] TransformError),

    /// Output access failed
    #[error(transparent)]
    Output(#[from] OutputError),
}

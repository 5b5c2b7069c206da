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

//! DMN decision model transformation and decision outputs
//!
//! This crate turns a loaded decision-model document into an executable
//! in-memory decision model, and provides the immutable container holding the
//! output of one decision evaluation.
//!
//! Transformation dispatches every source element to the handler registered
//! for its kind, threading a per-document [`HandlerContext`] through the tree:
//!
//! ```
//! use octofhir_dmn::{ElementKind, SourceElement, Transformer};
//!
//! let document = SourceElement::new(ElementKind::Definitions)
//!     .with_id("definitions")
//!     .with_child(
//!         SourceElement::new(ElementKind::Decision)
//!             .with_id("greeting")
//!             .with_child(
//!                 SourceElement::new(ElementKind::LiteralExpression)
//!                     .with_id("text")
//!                     .with_text("\"Hello \" + name"),
//!             ),
//!     );
//!
//! let transformation = Transformer::new().transform(&document).unwrap();
//! assert!(transformation.model.decision("greeting").is_some());
//! ```
//!
//! Evaluation results are read through [`DecisionOutput`]:
//!
//! ```
//! use octofhir_dmn::{DecisionOutputBuilder, TypedValue, Value};
//!
//! let mut builder = DecisionOutputBuilder::new();
//! builder.put_value("approved", TypedValue::boolean(true)).unwrap();
//! let output = builder.build();
//!
//! assert_eq!(output.get_single_value().unwrap(), Some(&Value::Boolean(true)));
//! assert!(output.clear().is_err());
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod handler;
pub mod model;
pub mod output;
pub mod source;
pub mod transform;

// Re-export main types
pub use config::TransformConfig;
pub use error::{DmnError, OutputError, OutputResult, Result, TransformError, TransformResult};
pub use handler::{Diagnostic, ElementHandler, HandlerContext, HandlerRegistry, Severity};
pub use model::{
    Decision, DecisionLogic, DecisionModel, DecisionTable, ExpressionElement, InputClause,
    ModelElement, OutputClause, Rule, TypeDefinition, TypeRegistry, TypedValue, Value, ValueType,
};
pub use output::{DecisionOutput, DecisionOutputBuilder, DecisionOutputEntry, DecisionResult};
pub use source::{ElementKind, SourceElement};
pub use transform::{Transformation, Transformer};

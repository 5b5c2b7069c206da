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

//! Element handlers turning source elements into decision model elements
//!
//! Each source element kind has one handler, looked up through the
//! [`HandlerRegistry`]. New kinds are supported by registering another handler;
//! existing handlers never change.

pub mod context;
pub mod expression;
pub mod registry;
pub mod structure;

pub use context::{Diagnostic, HandlerContext, Severity};
pub use expression::{
    InputEntryHandler, InputExpressionHandler, LiteralExpressionHandler, OutputEntryHandler,
};
pub use registry::HandlerRegistry;
pub use structure::{
    DecisionHandler, DecisionTableHandler, DefinitionsHandler, InputClauseHandler,
    OutputClauseHandler, RuleHandler,
};

use crate::error::TransformResult;
use crate::model::ModelElement;
use crate::source::SourceElement;

/// Conversion of one source element kind into a model element
///
/// Handlers are shared between concurrent transformations, so they must not
/// keep per-call state; everything a call needs lives in the context. Children
/// are transformed and attached by the transformer after this returns.
pub trait ElementHandler: Send + Sync {
    /// Build the target element for `element`
    fn create_element(
        &self,
        context: &mut HandlerContext<'_>,
        element: &SourceElement,
    ) -> TransformResult<ModelElement>;
}

impl<F> ElementHandler for F
where
    F: Fn(&mut HandlerContext<'_>, &SourceElement) -> TransformResult<ModelElement> + Send + Sync,
{
    fn create_element(
        &self,
        context: &mut HandlerContext<'_>,
        element: &SourceElement,
    ) -> TransformResult<ModelElement> {
        self(context, element)
    }
}

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

//! Handlers for expression-carrying elements

use super::{ElementHandler, HandlerContext};
use crate::error::TransformResult;
use crate::model::{ExpressionElement, ModelElement};
use crate::source::{ATTR_EXPRESSION_LANGUAGE, SourceElement};

/// Build the expression shared by all expression elements
///
/// The source text is required; an explicit `expressionLanguage` wins over
/// `default_language`.
fn build_expression(
    context: &mut HandlerContext<'_>,
    element: &SourceElement,
    default_language: &str,
) -> TransformResult<ExpressionElement> {
    context.register_id(element)?;

    let Some(source) = element.text.as_deref() else {
        return Err(context.malformed(element, "expression has no source text"));
    };

    let mut expression = ExpressionElement::new();
    expression.set_key(context.element_key(element));
    if let Some(name) = &element.name {
        expression.set_name(name);
    }
    expression.set_expression_language(
        element
            .attribute(ATTR_EXPRESSION_LANGUAGE)
            .unwrap_or(default_language),
    );
    expression.set_expression(source);
    Ok(expression)
}

/// Handler for the `inputExpression` of an input clause
#[derive(Debug, Clone, Copy, Default)]
pub struct InputExpressionHandler;

impl ElementHandler for InputExpressionHandler {
    fn create_element(
        &self,
        context: &mut HandlerContext<'_>,
        element: &SourceElement,
    ) -> TransformResult<ModelElement> {
        let language = context.config().default_input_expression_language.as_str();
        let mut expression = build_expression(context, element, language)?;
        expression.set_type_definition(context.resolve_type(element)?);
        Ok(ModelElement::InputExpression(expression))
    }
}

/// Handler for rule input entries (unary tests)
#[derive(Debug, Clone, Copy, Default)]
pub struct InputEntryHandler;

impl ElementHandler for InputEntryHandler {
    fn create_element(
        &self,
        context: &mut HandlerContext<'_>,
        element: &SourceElement,
    ) -> TransformResult<ModelElement> {
        let language = context.config().default_input_entry_language.as_str();
        build_expression(context, element, language).map(ModelElement::InputEntry)
    }
}

/// Handler for rule output entries
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputEntryHandler;

impl ElementHandler for OutputEntryHandler {
    fn create_element(
        &self,
        context: &mut HandlerContext<'_>,
        element: &SourceElement,
    ) -> TransformResult<ModelElement> {
        let language = context.config().default_output_entry_language.as_str();
        build_expression(context, element, language).map(ModelElement::OutputEntry)
    }
}

/// Handler for literal expression decision logic
#[derive(Debug, Clone, Copy, Default)]
pub struct LiteralExpressionHandler;

impl ElementHandler for LiteralExpressionHandler {
    fn create_element(
        &self,
        context: &mut HandlerContext<'_>,
        element: &SourceElement,
    ) -> TransformResult<ModelElement> {
        let language = context.config().default_literal_expression_language.as_str();
        let mut expression = build_expression(context, element, language)?;
        expression.set_type_definition(context.resolve_type(element)?);
        Ok(ModelElement::LiteralExpression(expression))
    }
}

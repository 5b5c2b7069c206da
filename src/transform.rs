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

//! Transformation driver - the main entry point for building decision models

use std::sync::Arc;

use crate::config::TransformConfig;
use crate::error::{TransformError, TransformResult};
use crate::handler::{Diagnostic, HandlerContext, HandlerRegistry};
use crate::model::{DecisionModel, ModelElement, TypeRegistry};
use crate::source::SourceElement;

/// Decision model built from one document, with the diagnostics collected
#[derive(Debug, Clone, PartialEq)]
pub struct Transformation {
    /// Transformed model
    pub model: DecisionModel,
    /// Non-fatal findings
    pub diagnostics: Vec<Diagnostic>,
}

/// Turns source documents into decision models
///
/// A transformer holds only read-only configuration, so one instance can
/// serve concurrent transformations; each call gets its own context.
#[derive(Debug, Clone)]
pub struct Transformer {
    registry: Arc<HandlerRegistry>,
    types: TypeRegistry,
    config: TransformConfig,
}

impl Default for Transformer {
    fn default() -> Self {
        Self::new()
    }
}

impl Transformer {
    /// Create a transformer with the standard handlers, types and settings
    pub fn new() -> Self {
        Self::with_registry(HandlerRegistry::shared_standard())
    }

    /// Create a transformer using a custom handler registry
    pub fn with_registry(registry: Arc<HandlerRegistry>) -> Self {
        Self {
            registry,
            types: TypeRegistry::new(),
            config: TransformConfig::default(),
        }
    }

    /// Replace the settings
    pub fn with_config(mut self, config: TransformConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the type registry
    pub fn with_types(mut self, types: TypeRegistry) -> Self {
        self.types = types;
        self
    }

    /// Handler registry in use
    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    /// Settings in use
    pub fn config(&self) -> &TransformConfig {
        &self.config
    }

    /// Transform a document whose root is a `definitions` element
    ///
    /// Either the whole document is transformed or an error is returned; no
    /// partial model is ever produced.
    pub fn transform(&self, root: &SourceElement) -> TransformResult<Transformation> {
        let mut context = HandlerContext::new(&self.types, &self.config);

        let model = match self.transform_element(&mut context, root)? {
            ModelElement::Definitions(model) => model,
            other => {
                return Err(TransformError::malformed(
                    &root.kind,
                    root.segment(),
                    format!("document root must be 'definitions', found '{}'", other.kind()),
                ));
            }
        };

        let diagnostics = context.into_diagnostics();
        log::debug!(
            "Transformed {} with {} decision(s) and {} diagnostic(s)",
            root.segment(),
            model.decisions.len(),
            diagnostics.len()
        );
        Ok(Transformation { model, diagnostics })
    }

    /// Parse a JSON document and transform it
    pub fn transform_json(&self, json: &str) -> TransformResult<Transformation> {
        self.transform(&SourceElement::from_json(json)?)
    }

    fn transform_element<'a>(
        &self,
        context: &mut HandlerContext<'a>,
        element: &'a SourceElement,
    ) -> TransformResult<ModelElement> {
        context.enter(element);
        let path = context.path();
        log::trace!("Transforming {path} at depth {}", context.depth());

        let handler = self
            .registry
            .handler_for(&element.kind)
            .ok_or_else(|| TransformError::unhandled_element_kind(&element.kind, path.as_str()))?;
        let mut target = handler.create_element(context, element)?;

        for child in &element.children {
            let transformed = self.transform_element(context, child)?;
            target.attach(transformed, &path)?;
        }
        target.validate(&path)?;

        context.leave();
        Ok(target)
    }
}

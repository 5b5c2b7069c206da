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

//! Registry mapping element kinds to their handlers

use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;
use std::sync::Arc;

use super::ElementHandler;
use super::expression::{
    InputEntryHandler, InputExpressionHandler, LiteralExpressionHandler, OutputEntryHandler,
};
use super::structure::{
    DecisionHandler, DecisionTableHandler, DefinitionsHandler, InputClauseHandler,
    OutputClauseHandler, RuleHandler,
};
use crate::source::ElementKind;

static STANDARD_REGISTRY: Lazy<Arc<HandlerRegistry>> =
    Lazy::new(|| Arc::new(HandlerRegistry::standard()));

/// Element handlers by element kind
///
/// Built once while configuring the engine, then shared read-only (usually
/// behind an [`Arc`]) by every transformation.
#[derive(Clone, Default)]
pub struct HandlerRegistry {
    handlers: FxHashMap<ElementKind, Arc<dyn ElementHandler>>,
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut kinds: Vec<&str> = self.handlers.keys().map(ElementKind::as_str).collect();
        kinds.sort_unstable();
        f.debug_struct("HandlerRegistry")
            .field("handler_count", &self.handlers.len())
            .field("kinds", &kinds)
            .finish()
    }
}

impl HandlerRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with handlers for all built-in element kinds
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.register(ElementKind::Definitions, DefinitionsHandler);
        registry.register(ElementKind::Decision, DecisionHandler);
        registry.register(ElementKind::DecisionTable, DecisionTableHandler);
        registry.register(ElementKind::Input, InputClauseHandler);
        registry.register(ElementKind::InputExpression, InputExpressionHandler);
        registry.register(ElementKind::Output, OutputClauseHandler);
        registry.register(ElementKind::Rule, RuleHandler);
        registry.register(ElementKind::InputEntry, InputEntryHandler);
        registry.register(ElementKind::OutputEntry, OutputEntryHandler);
        registry.register(ElementKind::LiteralExpression, LiteralExpressionHandler);
        registry
    }

    /// Process-wide standard registry, built on first use
    pub fn shared_standard() -> Arc<Self> {
        Arc::clone(&STANDARD_REGISTRY)
    }

    /// Register a handler, returning the one it replaces
    pub fn register<H: ElementHandler + 'static>(
        &mut self,
        kind: ElementKind,
        handler: H,
    ) -> Option<Arc<dyn ElementHandler>> {
        log::debug!("Registering element handler for '{kind}'");
        self.handlers.insert(kind, Arc::new(handler))
    }

    /// Handler registered for `kind`
    pub fn handler_for(&self, kind: &ElementKind) -> Option<&dyn ElementHandler> {
        self.handlers.get(kind).map(|handler| handler.as_ref())
    }

    /// Check if a handler is registered for `kind`
    pub fn contains(&self, kind: &ElementKind) -> bool {
        self.handlers.contains_key(kind)
    }

    /// Number of registered handlers
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Check if no handler is registered
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

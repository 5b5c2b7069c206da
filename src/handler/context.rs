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

//! Per-document state shared by element handlers

use rustc_hash::{FxHashMap, FxHashSet};
use serde::Serialize;
use std::fmt;

use crate::config::TransformConfig;
use crate::error::{TransformError, TransformResult};
use crate::model::{TypeDefinition, TypeRegistry};
use crate::source::{ATTR_TYPE_REF, ElementKind, SourceElement};

/// Diagnostic severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Severity {
    /// Information only
    Info,
    /// Accepted, but probably not what the author meant
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
        }
    }
}

/// Non-fatal finding collected during a transformation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Severity
    pub severity: Severity,
    /// Path of the element the finding is about
    pub path: String,
    /// Message
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} ({})", self.severity, self.message, self.path)
    }
}

/// State threaded through one transformation pass
///
/// The transformer owns the context for the duration of one document and
/// lends it to each handler call. It tracks the element being transformed and
/// its ancestors, the ids seen so far, and the diagnostics collected.
#[derive(Debug)]
pub struct HandlerContext<'a> {
    current: Option<&'a SourceElement>,
    ancestors: Vec<&'a SourceElement>,
    element_ids: FxHashSet<String>,
    generated_keys: FxHashMap<String, usize>,
    types: &'a TypeRegistry,
    config: &'a TransformConfig,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> HandlerContext<'a> {
    /// Create a context for one document
    pub fn new(types: &'a TypeRegistry, config: &'a TransformConfig) -> Self {
        Self {
            current: None,
            ancestors: Vec::new(),
            element_ids: FxHashSet::default(),
            generated_keys: FxHashMap::default(),
            types,
            config,
            diagnostics: Vec::new(),
        }
    }

    pub(crate) fn enter(&mut self, element: &'a SourceElement) {
        if let Some(parent) = self.current.replace(element) {
            self.ancestors.push(parent);
        }
    }

    pub(crate) fn leave(&mut self) {
        self.current = self.ancestors.pop();
    }

    /// Element being transformed
    pub fn current(&self) -> Option<&'a SourceElement> {
        self.current
    }

    /// Parent of the element being transformed
    pub fn parent(&self) -> Option<&'a SourceElement> {
        self.ancestors.last().copied()
    }

    /// Ancestors of the element being transformed, root first
    pub fn ancestors(&self) -> &[&'a SourceElement] {
        &self.ancestors
    }

    /// Nesting depth of the current element; the root is at depth 1
    pub fn depth(&self) -> usize {
        self.ancestors.len() + usize::from(self.current.is_some())
    }

    /// Path of the current element, e.g. `definitions[d]/decision[risk]`
    pub fn path(&self) -> String {
        self.ancestors
            .iter()
            .chain(self.current.iter())
            .map(|element| element.segment())
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Transformation settings
    pub fn config(&self) -> &'a TransformConfig {
        self.config
    }

    /// Type registry used to resolve `typeRef`s
    pub fn types(&self) -> &'a TypeRegistry {
        self.types
    }

    /// Record an element's id, rejecting duplicates within the document
    pub fn register_id(&mut self, element: &SourceElement) -> TransformResult<()> {
        if let Some(id) = &element.id {
            if !self.element_ids.insert(id.clone()) {
                return Err(self.malformed(element, format!("duplicate element id '{id}'")));
            }
        }
        Ok(())
    }

    /// Check whether an id was already registered
    pub fn is_registered(&self, id: &str) -> bool {
        self.element_ids.contains(id)
    }

    /// Key for a target element: its id, or a generated `kind_n` key
    ///
    /// Generated keys are registered like ids, so a later element declaring
    /// the same id is rejected as a duplicate.
    pub fn element_key(&mut self, element: &SourceElement) -> String {
        if let Some(id) = &element.id {
            return id.clone();
        }

        loop {
            let counter = self
                .generated_keys
                .entry(element.kind.to_string())
                .or_insert(0);
            *counter += 1;
            let key = format!("{}_{counter}", element.kind);
            if !self.is_registered(&key) {
                self.element_ids.insert(key.clone());
                return key;
            }
        }
    }

    /// Resolve the element's `typeRef` attribute
    ///
    /// Elements without a `typeRef` get the unspecified type. Unknown names
    /// become a named, unconstrained type with a warning, or an error when
    /// `strict_type_refs` is set.
    pub fn resolve_type(&mut self, element: &SourceElement) -> TransformResult<TypeDefinition> {
        let Some(type_ref) = element.attribute(ATTR_TYPE_REF) else {
            return Ok(TypeDefinition::unspecified());
        };

        if let Some(definition) = self.types.resolve(type_ref) {
            return Ok(definition.clone());
        }

        if self.config.strict_type_refs {
            return Err(self.malformed(element, format!("unknown typeRef '{type_ref}'")));
        }

        log::warn!("Unknown typeRef '{type_ref}' at {}", self.path());
        self.warn(format!("unknown typeRef '{type_ref}', value type is not checked"));
        Ok(TypeDefinition::named(type_ref))
    }

    /// Record a warning for the current element
    pub fn warn(&mut self, message: impl Into<String>) {
        self.push_diagnostic(Severity::Warning, message);
    }

    /// Record an informational note for the current element
    pub fn info(&mut self, message: impl Into<String>) {
        self.push_diagnostic(Severity::Info, message);
    }

    fn push_diagnostic(&mut self, severity: Severity, message: impl Into<String>) {
        let diagnostic = Diagnostic {
            severity,
            path: self.path(),
            message: message.into(),
        };
        self.diagnostics.push(diagnostic);
    }

    /// Diagnostics collected so far
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub(crate) fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    /// Build a malformed element error located at the current path
    pub fn malformed(&self, element: &SourceElement, message: impl Into<String>) -> TransformError {
        TransformError::malformed(&element.kind, self.path(), message)
    }

    /// Check whether the parent element has the given kind
    pub fn parent_is(&self, kind: &ElementKind) -> bool {
        self.parent().is_some_and(|parent| &parent.kind == kind)
    }
}

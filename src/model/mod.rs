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

//! Decision model and value types
//!
//! This module provides the typed values produced by evaluation, the type
//! definitions attached to expressions, and the target elements built by
//! transformation.

pub mod elements;
pub mod expression;
pub mod types;
pub mod value;

pub use elements::{
    Decision, DecisionLogic, DecisionModel, DecisionTable, InputClause, ModelElement,
    OutputClause, Rule,
};
pub use expression::ExpressionElement;
pub use types::{TypeDefinition, TypeRegistry};
pub use value::{TypedValue, Value, ValueType};

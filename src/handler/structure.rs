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

//! Handlers for the structural elements of a decision model

use super::{ElementHandler, HandlerContext};
use crate::error::TransformResult;
use crate::model::elements::DEFAULT_HIT_POLICY;
use crate::model::{
    Decision, DecisionModel, DecisionTable, InputClause, ModelElement, OutputClause, Rule,
};
use crate::source::{ATTR_HIT_POLICY, ATTR_INPUT_VARIABLE, ATTR_LABEL, ATTR_NAMESPACE, SourceElement};

/// Hit policies a decision table may declare
pub const HIT_POLICIES: &[&str] = &[
    "UNIQUE",
    "FIRST",
    "PRIORITY",
    "ANY",
    "COLLECT",
    "RULE ORDER",
    "OUTPUT ORDER",
];

/// Handler for the `definitions` root
#[derive(Debug, Clone, Copy, Default)]
pub struct DefinitionsHandler;

impl ElementHandler for DefinitionsHandler {
    fn create_element(
        &self,
        context: &mut HandlerContext<'_>,
        element: &SourceElement,
    ) -> TransformResult<ModelElement> {
        context.register_id(element)?;
        Ok(ModelElement::Definitions(DecisionModel {
            key: Some(context.element_key(element)),
            name: element.name.clone(),
            namespace: element.attribute(ATTR_NAMESPACE).map(str::to_string),
            decisions: Vec::new(),
        }))
    }
}

/// Handler for `decision`
#[derive(Debug, Clone, Copy, Default)]
pub struct DecisionHandler;

impl ElementHandler for DecisionHandler {
    fn create_element(
        &self,
        context: &mut HandlerContext<'_>,
        element: &SourceElement,
    ) -> TransformResult<ModelElement> {
        context.register_id(element)?;
        Ok(ModelElement::Decision(Decision {
            key: Some(context.element_key(element)),
            name: element.name.clone(),
            logic: None,
        }))
    }
}

/// Handler for `decisionTable`
///
/// The hit policy is normalized to upper case and checked against the known
/// policies; resolving it is up to the evaluator.
#[derive(Debug, Clone, Copy, Default)]
pub struct DecisionTableHandler;

impl ElementHandler for DecisionTableHandler {
    fn create_element(
        &self,
        context: &mut HandlerContext<'_>,
        element: &SourceElement,
    ) -> TransformResult<ModelElement> {
        context.register_id(element)?;

        let declared = element.attribute(ATTR_HIT_POLICY);
        let hit_policy = declared
            .map(|policy| policy.trim().replace('_', " ").to_ascii_uppercase())
            .unwrap_or_else(|| DEFAULT_HIT_POLICY.to_string());
        if !HIT_POLICIES.contains(&hit_policy.as_str()) {
            return Err(context.malformed(element, format!("unknown hit policy '{hit_policy}'")));
        }
        if let Some(declared) = declared.filter(|declared| *declared != hit_policy) {
            context.info(format!("hit policy '{declared}' read as '{hit_policy}'"));
        }

        Ok(ModelElement::DecisionTable(DecisionTable {
            key: Some(context.element_key(element)),
            hit_policy,
            ..DecisionTable::default()
        }))
    }
}

/// Handler for input clauses
#[derive(Debug, Clone, Copy, Default)]
pub struct InputClauseHandler;

impl ElementHandler for InputClauseHandler {
    fn create_element(
        &self,
        context: &mut HandlerContext<'_>,
        element: &SourceElement,
    ) -> TransformResult<ModelElement> {
        context.register_id(element)?;

        let mut input = InputClause {
            key: Some(context.element_key(element)),
            name: element
                .attribute(ATTR_LABEL)
                .map(str::to_string)
                .or_else(|| element.name.clone()),
            ..InputClause::default()
        };
        if let Some(variable) = element.attribute(ATTR_INPUT_VARIABLE) {
            input.input_variable = variable.to_string();
        }
        Ok(ModelElement::Input(input))
    }
}

/// Handler for output clauses
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputClauseHandler;

impl ElementHandler for OutputClauseHandler {
    fn create_element(
        &self,
        context: &mut HandlerContext<'_>,
        element: &SourceElement,
    ) -> TransformResult<ModelElement> {
        context.register_id(element)?;
        Ok(ModelElement::Output(OutputClause {
            key: Some(context.element_key(element)),
            name: element.attribute(ATTR_LABEL).map(str::to_string),
            output_name: element.name.clone(),
            type_definition: context.resolve_type(element)?,
        }))
    }
}

/// Handler for decision table rules
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleHandler;

impl ElementHandler for RuleHandler {
    fn create_element(
        &self,
        context: &mut HandlerContext<'_>,
        element: &SourceElement,
    ) -> TransformResult<ModelElement> {
        context.register_id(element)?;
        Ok(ModelElement::Rule(Rule {
            key: Some(context.element_key(element)),
            ..Rule::default()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TransformConfig;
    use crate::model::{TypeDefinition, TypeRegistry, ValueType};
    use crate::source::{ATTR_TYPE_REF, ElementKind};
    use rstest::rstest;

    fn create(handler: &dyn ElementHandler, element: &SourceElement) -> TransformResult<ModelElement> {
        let types = TypeRegistry::new();
        let config = TransformConfig::default();
        let mut context = HandlerContext::new(&types, &config);
        context.enter(element);
        handler.create_element(&mut context, element)
    }

    #[rstest]
    #[case(None, "UNIQUE")]
    #[case(Some("first"), "FIRST")]
    #[case(Some("RULE_ORDER"), "RULE ORDER")]
    #[case(Some("Collect"), "COLLECT")]
    fn test_hit_policy_normalization(#[case] declared: Option<&str>, #[case] expected: &str) {
        let mut element = SourceElement::new(ElementKind::DecisionTable).with_id("table");
        if let Some(policy) = declared {
            element = element.with_attribute(ATTR_HIT_POLICY, policy);
        }

        let ModelElement::DecisionTable(table) = create(&DecisionTableHandler, &element).unwrap()
        else {
            panic!("expected a decision table");
        };
        assert_eq!(table.hit_policy, expected);
    }

    #[test]
    fn test_anonymous_table_gets_generated_key_and_normalization_note() {
        let types = TypeRegistry::new();
        let config = TransformConfig::default();
        let mut context = HandlerContext::new(&types, &config);
        let element = SourceElement::new(ElementKind::DecisionTable)
            .with_attribute(ATTR_HIT_POLICY, "rule_order");
        context.enter(&element);

        let ModelElement::DecisionTable(table) =
            DecisionTableHandler.create_element(&mut context, &element).unwrap()
        else {
            panic!("expected a decision table");
        };
        assert_eq!(table.key.as_deref(), Some("decisionTable_1"));
        assert_eq!(context.diagnostics().len(), 1);
        assert_eq!(context.diagnostics()[0].severity, crate::handler::Severity::Info);
        assert_eq!(
            context.diagnostics()[0].message,
            "hit policy 'rule_order' read as 'RULE ORDER'"
        );
    }

    #[test]
    fn test_unknown_hit_policy_is_malformed() {
        let element = SourceElement::new(ElementKind::DecisionTable)
            .with_attribute(ATTR_HIT_POLICY, "SOMETIMES");
        assert!(create(&DecisionTableHandler, &element).is_err());
    }

    #[test]
    fn test_input_clause_defaults() {
        let element = SourceElement::new(ElementKind::Input)
            .with_id("in1")
            .with_attribute(ATTR_LABEL, "Credit score");

        let ModelElement::Input(input) = create(&InputClauseHandler, &element).unwrap() else {
            panic!("expected an input clause");
        };
        assert_eq!(input.key.as_deref(), Some("in1"));
        assert_eq!(input.name.as_deref(), Some("Credit score"));
        assert_eq!(input.input_variable, "cellInput");
        assert_eq!(input.input_expression, None);
    }

    #[test]
    fn test_output_clause_is_typed() {
        let element = SourceElement::new(ElementKind::Output)
            .with_id("out1")
            .with_name("risk")
            .with_attribute(ATTR_TYPE_REF, "string");

        let ModelElement::Output(output) = create(&OutputClauseHandler, &element).unwrap() else {
            panic!("expected an output clause");
        };
        assert_eq!(output.output_name.as_deref(), Some("risk"));
        assert_eq!(output.type_definition, TypeDefinition::of(ValueType::String));
    }

    #[test]
    fn test_definitions_namespace() {
        let element = SourceElement::new(ElementKind::Definitions)
            .with_id("defs")
            .with_attribute(ATTR_NAMESPACE, "http://camunda.org/schema/1.0/dmn");

        let ModelElement::Definitions(model) = create(&DefinitionsHandler, &element).unwrap() else {
            panic!("expected definitions");
        };
        assert_eq!(model.namespace.as_deref(), Some("http://camunda.org/schema/1.0/dmn"));
        assert!(model.decisions.is_empty());
    }
}

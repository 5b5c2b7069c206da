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

//! Executable decision model produced by transformation

use serde::{Deserialize, Serialize};

use super::expression::ExpressionElement;
use super::types::TypeDefinition;
use crate::error::{TransformError, TransformResult};
use crate::source::ElementKind;

/// Hit policy used when a decision table does not declare one
pub const DEFAULT_HIT_POLICY: &str = "UNIQUE";

/// Variable name an input value is bound to when none is declared
pub const DEFAULT_INPUT_VARIABLE: &str = "cellInput";

/// Transformed `definitions` document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DecisionModel {
    /// Definitions id
    pub key: Option<String>,
    /// Definitions name
    pub name: Option<String>,
    /// Model namespace
    pub namespace: Option<String>,
    /// Decisions, in document order
    pub decisions: Vec<Decision>,
}

impl DecisionModel {
    /// Find a decision by key
    pub fn decision(&self, key: &str) -> Option<&Decision> {
        self.decisions
            .iter()
            .find(|decision| decision.key.as_deref() == Some(key))
    }
}

/// A single decision
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    /// Decision id
    pub key: Option<String>,
    /// Decision name
    pub name: Option<String>,
    /// Decision logic; present once the decision is complete
    pub logic: Option<DecisionLogic>,
}

impl Decision {
    /// Decision table, if that is the decision logic
    pub fn decision_table(&self) -> Option<&DecisionTable> {
        match &self.logic {
            Some(DecisionLogic::Table(table)) => Some(table),
            _ => None,
        }
    }

    /// Literal expression, if that is the decision logic
    pub fn literal_expression(&self) -> Option<&ExpressionElement> {
        match &self.logic {
            Some(DecisionLogic::Literal(expression)) => Some(expression),
            _ => None,
        }
    }
}

/// How a decision computes its outputs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DecisionLogic {
    /// Decision table
    Table(DecisionTable),
    /// Single literal expression
    Literal(ExpressionElement),
}

/// Decision table with its clauses and rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTable {
    /// Table id
    pub key: Option<String>,
    /// Hit policy, carried as declared
    pub hit_policy: String,
    /// Input clauses
    pub inputs: Vec<InputClause>,
    /// Output clauses
    pub outputs: Vec<OutputClause>,
    /// Rules
    pub rules: Vec<Rule>,
}

impl Default for DecisionTable {
    fn default() -> Self {
        Self {
            key: None,
            hit_policy: DEFAULT_HIT_POLICY.to_string(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            rules: Vec::new(),
        }
    }
}

/// Input clause of a decision table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputClause {
    /// Clause id
    pub key: Option<String>,
    /// Clause label
    pub name: Option<String>,
    /// Variable the input value is bound to while testing entries
    pub input_variable: String,
    /// Expression computing the input value
    pub input_expression: Option<ExpressionElement>,
}

impl Default for InputClause {
    fn default() -> Self {
        Self {
            key: None,
            name: None,
            input_variable: DEFAULT_INPUT_VARIABLE.to_string(),
            input_expression: None,
        }
    }
}

/// Output clause of a decision table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputClause {
    /// Clause id
    pub key: Option<String>,
    /// Clause label
    pub name: Option<String>,
    /// Name under which outputs are reported
    pub output_name: Option<String>,
    /// Declared type of the output
    pub type_definition: TypeDefinition,
}

/// Decision table rule
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    /// Rule id
    pub key: Option<String>,
    /// One entry per input clause
    pub input_entries: Vec<ExpressionElement>,
    /// One entry per output clause
    pub output_entries: Vec<ExpressionElement>,
}

/// Element produced by an element handler
#[derive(Debug, Clone, PartialEq)]
pub enum ModelElement {
    /// Whole model
    Definitions(DecisionModel),
    /// Decision
    Decision(Decision),
    /// Decision table
    DecisionTable(DecisionTable),
    /// Input clause
    Input(InputClause),
    /// Input expression of an input clause
    InputExpression(ExpressionElement),
    /// Output clause
    Output(OutputClause),
    /// Rule
    Rule(Rule),
    /// Input entry of a rule
    InputEntry(ExpressionElement),
    /// Output entry of a rule
    OutputEntry(ExpressionElement),
    /// Literal expression decision logic
    LiteralExpression(ExpressionElement),
}

impl ModelElement {
    /// Element kind this target element corresponds to
    pub fn kind(&self) -> ElementKind {
        match self {
            Self::Definitions(_) => ElementKind::Definitions,
            Self::Decision(_) => ElementKind::Decision,
            Self::DecisionTable(_) => ElementKind::DecisionTable,
            Self::Input(_) => ElementKind::Input,
            Self::InputExpression(_) => ElementKind::InputExpression,
            Self::Output(_) => ElementKind::Output,
            Self::Rule(_) => ElementKind::Rule,
            Self::InputEntry(_) => ElementKind::InputEntry,
            Self::OutputEntry(_) => ElementKind::OutputEntry,
            Self::LiteralExpression(_) => ElementKind::LiteralExpression,
        }
    }

    /// Wire a transformed child into this element
    ///
    /// Fails when the child does not belong under this element or when a
    /// single-valued slot is already taken.
    pub fn attach(&mut self, child: ModelElement, path: &str) -> TransformResult<()> {
        let parent_kind = self.kind();
        let misplaced = |child: &ModelElement| {
            TransformError::malformed(
                &parent_kind,
                path,
                format!("'{}' cannot be nested in '{parent_kind}'", child.kind()),
            )
        };

        match (self, child) {
            (Self::Definitions(model), Self::Decision(decision)) => {
                model.decisions.push(decision);
            }
            (Self::Decision(decision), Self::DecisionTable(table)) => {
                set_logic(decision, DecisionLogic::Table(table), path)?;
            }
            (Self::Decision(decision), Self::LiteralExpression(expression)) => {
                set_logic(decision, DecisionLogic::Literal(expression), path)?;
            }
            (Self::DecisionTable(table), Self::Input(input)) => table.inputs.push(input),
            (Self::DecisionTable(table), Self::Output(output)) => table.outputs.push(output),
            (Self::DecisionTable(table), Self::Rule(rule)) => table.rules.push(rule),
            (Self::Input(input), Self::InputExpression(expression)) => {
                if input.input_expression.is_some() {
                    return Err(TransformError::malformed(
                        ElementKind::Input,
                        path,
                        "input clause has more than one input expression",
                    ));
                }
                input.input_expression = Some(expression);
            }
            (Self::Rule(rule), Self::InputEntry(entry)) => rule.input_entries.push(entry),
            (Self::Rule(rule), Self::OutputEntry(entry)) => rule.output_entries.push(entry),
            (_, child) => return Err(misplaced(&child)),
        }
        Ok(())
    }

    /// Check invariants that hold once all children are attached
    pub fn validate(&self, path: &str) -> TransformResult<()> {
        match self {
            Self::Decision(decision) if decision.logic.is_none() => Err(TransformError::malformed(
                ElementKind::Decision,
                path,
                "decision has no decision table or literal expression",
            )),
            Self::Input(input) if input.input_expression.is_none() => Err(
                TransformError::malformed(ElementKind::Input, path, "input clause has no input expression"),
            ),
            Self::DecisionTable(table) => validate_table(table, path),
            _ => Ok(()),
        }
    }
}

fn set_logic(decision: &mut Decision, logic: DecisionLogic, path: &str) -> TransformResult<()> {
    if decision.logic.is_some() {
        return Err(TransformError::malformed(
            ElementKind::Decision,
            path,
            "decision has more than one decision logic",
        ));
    }
    decision.logic = Some(logic);
    Ok(())
}

fn validate_table(table: &DecisionTable, path: &str) -> TransformResult<()> {
    if table.outputs.is_empty() {
        return Err(TransformError::malformed(
            ElementKind::DecisionTable,
            path,
            "decision table has no output clause",
        ));
    }

    if table.outputs.len() > 1 && table.outputs.iter().any(|output| output.output_name.is_none()) {
        return Err(TransformError::malformed(
            ElementKind::DecisionTable,
            path,
            "every output clause needs a name when a table has several outputs",
        ));
    }

    for (index, rule) in table.rules.iter().enumerate() {
        let rule_name = rule.key.clone().unwrap_or_else(|| format!("#{}", index + 1));
        if rule.input_entries.len() != table.inputs.len() {
            return Err(TransformError::malformed(
                ElementKind::DecisionTable,
                path,
                format!(
                    "rule {rule_name} has {} input entries but the table has {} inputs",
                    rule.input_entries.len(),
                    table.inputs.len()
                ),
            ));
        }
        if rule.output_entries.len() != table.outputs.len() {
            return Err(TransformError::malformed(
                ElementKind::DecisionTable,
                path,
                format!(
                    "rule {rule_name} has {} output entries but the table has {} outputs",
                    rule.output_entries.len(),
                    table.outputs.len()
                ),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(source: &str) -> ExpressionElement {
        let mut expression = ExpressionElement::new();
        expression.set_expression(source);
        expression
    }

    #[test]
    fn test_attach_rejects_misplaced_child() {
        let mut rule = ModelElement::Rule(Rule::default());
        let err = rule
            .attach(ModelElement::Decision(Decision::default()), "rule[r1]")
            .unwrap_err();
        assert_eq!(
            err,
            TransformError::malformed("rule", "rule[r1]", "'decision' cannot be nested in 'rule'")
        );
    }

    #[test]
    fn test_decision_accepts_single_logic() {
        let mut decision = ModelElement::Decision(Decision::default());
        decision
            .attach(ModelElement::LiteralExpression(entry("42")), "decision[d]")
            .unwrap();
        assert!(
            decision
                .attach(ModelElement::DecisionTable(DecisionTable::default()), "decision[d]")
                .is_err()
        );
        assert!(decision.validate("decision[d]").is_ok());
    }

    #[test]
    fn test_rule_entry_count_must_match_clauses() {
        let table = DecisionTable {
            inputs: vec![InputClause::default()],
            outputs: vec![OutputClause::default()],
            rules: vec![Rule {
                key: Some("r1".to_string()),
                input_entries: vec![],
                output_entries: vec![entry("\"HIGH\"")],
            }],
            ..DecisionTable::default()
        };

        let err = ModelElement::DecisionTable(table).validate("decisionTable").unwrap_err();
        assert!(err.to_string().contains("rule r1 has 0 input entries"));
    }

    #[test]
    fn test_defaults() {
        assert_eq!(DecisionTable::default().hit_policy, DEFAULT_HIT_POLICY);
        assert_eq!(InputClause::default().input_variable, DEFAULT_INPUT_VARIABLE);
        assert!(
            ModelElement::Input(InputClause::default())
                .validate("input")
                .is_err()
        );
    }
}

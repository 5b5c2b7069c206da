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

//! Ordered outputs of one decision table evaluation, one per matched rule

use indexmap::IndexMap;
use serde::Serialize;

use super::decision_output::DecisionOutput;
use crate::error::{OutputError, OutputResult};
use crate::model::Value;

/// Outputs of all matched rules, in match order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DecisionResult {
    outputs: Vec<DecisionOutput>,
}

impl DecisionResult {
    /// Wrap finished outputs
    pub fn new(outputs: Vec<DecisionOutput>) -> Self {
        Self { outputs }
    }

    /// Output of the first matched rule
    pub fn first_output(&self) -> Option<&DecisionOutput> {
        self.outputs.first()
    }

    /// Output of the only matched rule
    ///
    /// Fails with [`OutputError::MultipleDecisionOutputs`] when more than one
    /// rule matched.
    pub fn single_output(&self) -> OutputResult<Option<&DecisionOutput>> {
        if self.outputs.len() > 1 {
            return Err(OutputError::MultipleDecisionOutputs {
                count: self.outputs.len(),
            });
        }
        Ok(self.first_output())
    }

    /// Raw values named `name`, skipping outputs without it
    pub fn collect_output_values(&self, name: &str) -> Vec<&Value> {
        self.outputs
            .iter()
            .filter_map(|output| output.get(name))
            .collect()
    }

    /// Copies of every output as a raw value map
    pub fn output_list(&self) -> Vec<IndexMap<String, Value>> {
        self.outputs.iter().map(DecisionOutput::get_value_map).collect()
    }

    /// Output by match position
    pub fn get(&self, index: usize) -> Option<&DecisionOutput> {
        self.outputs.get(index)
    }

    /// Number of outputs
    pub fn len(&self) -> usize {
        self.outputs.len()
    }

    /// Check if no rule matched
    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }

    /// Outputs in match order
    pub fn iter(&self) -> std::slice::Iter<'_, DecisionOutput> {
        self.outputs.iter()
    }
}

impl From<Vec<DecisionOutput>> for DecisionResult {
    fn from(outputs: Vec<DecisionOutput>) -> Self {
        Self::new(outputs)
    }
}

impl<'a> IntoIterator for &'a DecisionResult {
    type Item = &'a DecisionOutput;
    type IntoIter = std::slice::Iter<'a, DecisionOutput>;

    fn into_iter(self) -> Self::IntoIter {
        self.outputs.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TypedValue;

    fn output(reason: &str) -> DecisionOutput {
        DecisionOutput::from_values([
            ("approved", TypedValue::boolean(false)),
            ("reason", TypedValue::string(reason)),
        ])
        .unwrap()
    }

    #[test]
    fn test_single_output_is_strict() {
        let result = DecisionResult::new(vec![output("age"), output("income")]);
        assert_eq!(
            result.single_output(),
            Err(OutputError::MultipleDecisionOutputs { count: 2 })
        );
        assert_eq!(result.first_output(), Some(&output("age")));

        let single = DecisionResult::from(vec![output("age")]);
        assert_eq!(single.single_output(), Ok(Some(&output("age"))));
        assert_eq!(DecisionResult::default().single_output(), Ok(None));
    }

    #[test]
    fn test_collect_output_values() {
        let result = DecisionResult::new(vec![
            output("age"),
            DecisionOutput::default(),
            output("income"),
        ]);
        assert_eq!(
            result.collect_output_values("reason"),
            vec![&Value::from("age"), &Value::from("income")]
        );
        assert_eq!(result.output_list().len(), 3);
        assert_eq!(result.iter().filter(|output| output.is_empty()).count(), 1);
    }
}

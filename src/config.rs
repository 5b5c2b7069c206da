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

//! Transformation settings

use serde::{Deserialize, Serialize};

use crate::error::TransformResult;

/// Expression language assumed for expressions evaluated by the engine
pub const DEFAULT_EXPRESSION_LANGUAGE: &str = "juel";

/// Expression language assumed for unary tests
pub const DEFAULT_UNARY_TESTS_LANGUAGE: &str = "feel";

/// Settings applied to every document a transformer handles
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TransformConfig {
    /// Language of input expressions without `expressionLanguage`
    pub default_input_expression_language: String,
    /// Language of input entries without `expressionLanguage`
    pub default_input_entry_language: String,
    /// Language of output entries without `expressionLanguage`
    pub default_output_entry_language: String,
    /// Language of literal expressions without `expressionLanguage`
    pub default_literal_expression_language: String,
    /// Treat unknown `typeRef` names as errors instead of warnings
    pub strict_type_refs: bool,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            default_input_expression_language: DEFAULT_EXPRESSION_LANGUAGE.to_string(),
            default_input_entry_language: DEFAULT_UNARY_TESTS_LANGUAGE.to_string(),
            default_output_entry_language: DEFAULT_EXPRESSION_LANGUAGE.to_string(),
            default_literal_expression_language: DEFAULT_EXPRESSION_LANGUAGE.to_string(),
            strict_type_refs: false,
        }
    }
}

impl TransformConfig {
    /// Read settings from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> TransformResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Set the strict `typeRef` mode
    pub fn with_strict_type_refs(mut self, strict: bool) -> Self {
        self.strict_type_refs = strict;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config =
            TransformConfig::from_json(r#"{"defaultInputEntryLanguage": "juel", "strictTypeRefs": true}"#)
                .unwrap();
        assert_eq!(config.default_input_entry_language, "juel");
        assert_eq!(config.default_input_expression_language, DEFAULT_EXPRESSION_LANGUAGE);
        assert!(config.strict_type_refs);
    }

    #[test]
    fn test_malformed_json() {
        assert!(TransformConfig::from_json("{\"strictTypeRefs\": \"yes\"}").is_err());
    }
}

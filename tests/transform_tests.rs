//! End-to-end transformation tests
//!
//! Documents go through the standard handler registry, from JSON or built in
//! code, and the resulting decision models are checked.

use std::sync::Arc;

use octofhir_dmn::{
    Decision, ElementKind, HandlerContext, HandlerRegistry, ModelElement, Severity, SourceElement,
    TransformConfig, TransformError, TransformResult, Transformer, TypeDefinition, TypeRegistry,
    ValueType,
};
use pretty_assertions::assert_eq;

const CREDIT_RISK: &str = include_str!("fixtures/credit_risk.json");

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn literal_decision(id: &str, text: &str) -> SourceElement {
    SourceElement::new(ElementKind::Decision).with_id(id).with_child(
        SourceElement::new(ElementKind::LiteralExpression)
            .with_id(format!("{id}Expression"))
            .with_text(text),
    )
}

fn single_input_table(rules: Vec<SourceElement>) -> SourceElement {
    SourceElement::new(ElementKind::Definitions)
        .with_id("defs")
        .with_child(
            SourceElement::new(ElementKind::Decision)
                .with_id("eligibility")
                .with_child(
                    SourceElement::new(ElementKind::DecisionTable)
                        .with_id("table")
                        .with_child(
                            SourceElement::new(ElementKind::Input).with_id("age").with_child(
                                SourceElement::new(ElementKind::InputExpression)
                                    .with_id("ageExpression")
                                    .with_text("applicant.age"),
                            ),
                        )
                        .with_child(
                            SourceElement::new(ElementKind::Output)
                                .with_id("eligible")
                                .with_name("eligible"),
                        )
                        .with_children(rules),
                ),
        )
}

fn rule(id: &str, input: &str, output: &str) -> SourceElement {
    SourceElement::new(ElementKind::Rule)
        .with_id(id)
        .with_child(
            SourceElement::new(ElementKind::InputEntry)
                .with_id(format!("{id}In"))
                .with_text(input),
        )
        .with_child(
            SourceElement::new(ElementKind::OutputEntry)
                .with_id(format!("{id}Out"))
                .with_text(output),
        )
}

#[test]
fn test_transform_credit_risk_document() {
    init_logging();
    let transformation = Transformer::new().transform_json(CREDIT_RISK).unwrap();
    let model = &transformation.model;

    assert_eq!(model.key.as_deref(), Some("creditRiskDefinitions"));
    assert_eq!(model.namespace.as_deref(), Some("http://octofhir.dev/dmn/credit"));
    assert_eq!(model.decisions.len(), 2);

    let table = model
        .decision("riskRating")
        .and_then(Decision::decision_table)
        .unwrap();
    assert_eq!(table.hit_policy, "FIRST");
    assert_eq!(table.inputs.len(), 2);
    assert_eq!(table.outputs.len(), 2);
    assert_eq!(table.rules.len(), 2);

    let score = &table.inputs[0];
    assert_eq!(score.name.as_deref(), Some("Credit score"));
    assert_eq!(score.input_variable, "cellInput");
    let score_expression = score.input_expression.as_ref().unwrap();
    assert_eq!(score_expression.key(), Some("scoreExpression"));
    assert_eq!(score_expression.expression(), Some("applicant.score"));
    assert_eq!(score_expression.expression_language(), Some("juel"));
    assert_eq!(
        score_expression.type_definition(),
        &TypeDefinition::of(ValueType::Integer)
    );

    let income = &table.inputs[1];
    assert_eq!(income.input_variable, "income");
    assert_eq!(
        income.input_expression.as_ref().unwrap().expression_language(),
        Some("feel")
    );

    assert_eq!(table.outputs[0].output_name.as_deref(), Some("risk"));
    assert_eq!(
        table.outputs[0].type_definition,
        TypeDefinition::of(ValueType::String)
    );
    assert_eq!(table.outputs[1].type_definition, TypeDefinition::named("tMoney"));

    let good = &table.rules[1];
    assert_eq!(good.key.as_deref(), Some("goodScore"));
    let tests: Vec<&str> = good
        .input_entries
        .iter()
        .filter_map(|entry| entry.expression())
        .collect();
    assert_eq!(tests, vec![">= 600", "> 50000"]);
    assert_eq!(good.input_entries[0].expression_language(), Some("feel"));
    assert_eq!(good.output_entries[1].expression_language(), Some("juel"));
    assert!(good.output_entries[0].type_definition().is_unspecified());

    let greeting = model
        .decision("greeting")
        .and_then(Decision::literal_expression)
        .unwrap();
    assert_eq!(greeting.expression(), Some("\"Dear \" + applicant.name"));
    assert_eq!(greeting.type_definition(), &TypeDefinition::of(ValueType::String));

    assert_eq!(transformation.diagnostics.len(), 1);
    let diagnostic = &transformation.diagnostics[0];
    assert_eq!(diagnostic.severity, Severity::Warning);
    assert_eq!(
        diagnostic.path,
        "definitions[creditRiskDefinitions]/decision[riskRating]/decisionTable[riskTable]/output[limitOutput]"
    );
}

#[test]
fn test_strict_type_refs_reject_unknown_types() {
    let transformer =
        Transformer::new().with_config(TransformConfig::default().with_strict_type_refs(true));
    let err = transformer.transform_json(CREDIT_RISK).unwrap_err();
    assert!(matches!(
        err,
        TransformError::MalformedSourceElement { ref kind, ref message, .. }
            if kind == "output" && message == "unknown typeRef 'tMoney'"
    ));
}

#[test]
fn test_custom_types_resolve_without_diagnostics() {
    let mut types = TypeRegistry::new();
    types.register("tMoney", TypeDefinition::of(ValueType::Double));
    let transformation = Transformer::new()
        .with_types(types)
        .transform_json(CREDIT_RISK)
        .unwrap();

    assert!(transformation.diagnostics.is_empty());
}

#[test]
fn test_unhandled_kind_aborts_the_document() {
    let document = SourceElement::new(ElementKind::Definitions)
        .with_id("defs")
        .with_child(literal_decision("first", "1"))
        .with_child(
            SourceElement::new("textAnnotation")
                .with_id("note")
                .with_text("reviewed"),
        );

    assert_eq!(
        Transformer::new().transform(&document),
        Err(TransformError::unhandled_element_kind(
            "textAnnotation",
            "definitions[defs]/textAnnotation[note]"
        ))
    );
}

#[test]
fn test_registered_extension_kind_is_transformed() {
    fn knowledge_model(
        context: &mut HandlerContext<'_>,
        element: &SourceElement,
    ) -> TransformResult<ModelElement> {
        context.register_id(element)?;
        Ok(ModelElement::Decision(Decision {
            key: element.id.clone(),
            name: element.name.clone(),
            logic: None,
        }))
    }

    let mut registry = HandlerRegistry::standard();
    registry.register(ElementKind::from("businessKnowledgeModel"), knowledge_model);
    let transformer = Transformer::with_registry(Arc::new(registry));

    let document = SourceElement::new(ElementKind::Definitions)
        .with_id("defs")
        .with_child(
            SourceElement::new("businessKnowledgeModel")
                .with_id("bkm")
                .with_child(
                    SourceElement::new(ElementKind::LiteralExpression)
                        .with_id("bkmBody")
                        .with_text("x * 2"),
                ),
        );

    let model = transformer.transform(&document).unwrap().model;
    let body = model
        .decision("bkm")
        .and_then(Decision::literal_expression)
        .unwrap();
    assert_eq!(body.expression(), Some("x * 2"));
}

#[test]
fn test_duplicate_ids_are_rejected() {
    let document = SourceElement::new(ElementKind::Definitions)
        .with_id("defs")
        .with_child(literal_decision("risk", "1"))
        .with_child(literal_decision("risk", "2"));

    let err = Transformer::new().transform(&document).unwrap_err();
    assert_eq!(
        err,
        TransformError::malformed(
            "decision",
            "definitions[defs]/decision[risk]",
            "duplicate element id 'risk'"
        )
    );
}

#[test]
fn test_input_entry_without_text_is_malformed() {
    let broken = SourceElement::new(ElementKind::Rule)
        .with_id("r1")
        .with_child(SourceElement::new(ElementKind::InputEntry).with_id("r1In"))
        .with_child(
            SourceElement::new(ElementKind::OutputEntry)
                .with_id("r1Out")
                .with_text("true"),
        );

    let err = Transformer::new()
        .transform(&single_input_table(vec![broken]))
        .unwrap_err();
    assert_eq!(
        err,
        TransformError::malformed(
            "inputEntry",
            "definitions[defs]/decision[eligibility]/decisionTable[table]/rule[r1]/inputEntry[r1In]",
            "expression has no source text"
        )
    );
}

#[test]
fn test_rule_with_missing_entries_is_malformed() {
    let short = SourceElement::new(ElementKind::Rule).with_id("short").with_child(
        SourceElement::new(ElementKind::OutputEntry)
            .with_id("shortOut")
            .with_text("false"),
    );

    let err = Transformer::new()
        .transform(&single_input_table(vec![rule("ok", ">= 18", "true"), short]))
        .unwrap_err();
    assert!(matches!(err, TransformError::MalformedSourceElement { ref kind, .. } if kind == "decisionTable"));
    assert!(err.to_string().contains("rule short has 0 input entries"));
}

#[test]
fn test_decision_without_logic_is_malformed() {
    let document = SourceElement::new(ElementKind::Definitions)
        .with_id("defs")
        .with_child(SourceElement::new(ElementKind::Decision).with_id("empty"));

    let err = Transformer::new().transform(&document).unwrap_err();
    assert_eq!(
        err,
        TransformError::malformed(
            "decision",
            "definitions[defs]/decision[empty]",
            "decision has no decision table or literal expression"
        )
    );
}

#[test]
fn test_misplaced_child_is_malformed() {
    let document = SourceElement::new(ElementKind::Definitions)
        .with_id("defs")
        .with_child(rule("stray", "-", "1"));

    let err = Transformer::new().transform(&document).unwrap_err();
    assert_eq!(
        err,
        TransformError::malformed(
            "definitions",
            "definitions[defs]",
            "'rule' cannot be nested in 'definitions'"
        )
    );
}

#[test]
fn test_entries_without_ids_get_generated_keys() {
    let anonymous = SourceElement::new(ElementKind::Rule)
        .with_child(SourceElement::new(ElementKind::InputEntry).with_text("< 18"))
        .with_child(SourceElement::new(ElementKind::OutputEntry).with_text("false"));

    let model = Transformer::new()
        .transform(&single_input_table(vec![anonymous]))
        .unwrap()
        .model;
    let rule = &model
        .decision("eligibility")
        .and_then(Decision::decision_table)
        .unwrap()
        .rules[0];

    assert_eq!(rule.key.as_deref(), Some("rule_1"));
    assert_eq!(rule.input_entries[0].key(), Some("inputEntry_1"));
    assert_eq!(rule.output_entries[0].key(), Some("outputEntry_1"));
}

#[test]
fn test_explicit_id_matching_generated_key_is_rejected() {
    let anonymous = SourceElement::new(ElementKind::Rule)
        .with_child(SourceElement::new(ElementKind::InputEntry).with_text("< 18"))
        .with_child(SourceElement::new(ElementKind::OutputEntry).with_text("false"));

    let err = Transformer::new()
        .transform(&single_input_table(vec![anonymous, rule("rule_1", ">= 18", "true")]))
        .unwrap_err();
    assert_eq!(
        err,
        TransformError::malformed(
            "rule",
            "definitions[defs]/decision[eligibility]/decisionTable[table]/rule[rule_1]",
            "duplicate element id 'rule_1'"
        )
    );
}

#[test]
fn test_anonymous_definitions_and_table_get_generated_keys() {
    let document = SourceElement::new(ElementKind::Definitions).with_child(
        SourceElement::new(ElementKind::Decision)
            .with_id("eligibility")
            .with_child(
                SourceElement::new(ElementKind::DecisionTable)
                    .with_child(
                        SourceElement::new(ElementKind::Input).with_id("age").with_child(
                            SourceElement::new(ElementKind::InputExpression)
                                .with_id("ageExpression")
                                .with_text("applicant.age"),
                        ),
                    )
                    .with_child(SourceElement::new(ElementKind::Output).with_id("eligible"))
                    .with_child(rule("adult", ">= 18", "true")),
            ),
    );

    let model = Transformer::new().transform(&document).unwrap().model;
    assert_eq!(model.key.as_deref(), Some("definitions_1"));
    let table = model
        .decision("eligibility")
        .and_then(Decision::decision_table)
        .unwrap();
    assert_eq!(table.key.as_deref(), Some("decisionTable_1"));
}

#[test]
fn test_concurrent_transformations_share_one_transformer() {
    init_logging();
    let transformer = Arc::new(Transformer::new());

    let handles: Vec<_> = (0..4)
        .map(|index| {
            let transformer = Arc::clone(&transformer);
            std::thread::spawn(move || {
                let document = single_input_table(vec![
                    rule(&format!("young{index}"), "< 18", "false"),
                    rule(&format!("adult{index}"), ">= 18", "true"),
                ]);
                transformer.transform(&document).map(|t| t.model)
            })
        })
        .collect();

    for (index, handle) in handles.into_iter().enumerate() {
        let model = handle.join().unwrap().unwrap();
        let table = model
            .decision("eligibility")
            .and_then(Decision::decision_table)
            .unwrap();
        assert_eq!(table.rules[0].key, Some(format!("young{index}")));
    }
}

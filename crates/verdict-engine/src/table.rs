//! Decision table evaluation
//!
//! Inputs are evaluated once per table evaluation, conditions filter the
//! rules column by column, matched rules evaluate their conclusions, and the
//! hit policy resolves what survives. The executed-element count is fixed
//! before any rule is examined: rules × (inputs + outputs), never reduced to
//! the rules that actually matched.

use verdict_core::model::DecisionTable;
use verdict_core::{Value, VariableMap};

use crate::config::EngineConfiguration;
use crate::error::{EngineError, Result};
use crate::event::{
    DecisionTableEvaluationEvent, EvaluatedInput, EvaluatedOutput, EvaluatedRule,
};
use crate::hit_policy::{HitPolicyHandler, PolicyOutcome};
use crate::result::{DecisionResult, ResultEntries};

/// Variable naming the input variable itself inside a condition scope, for
/// custom function transformers that need to reference it by name.
const INPUT_VARIABLE_NAME: &str = "inputVariableName";

pub(crate) struct TableEvaluation {
    pub result: DecisionResult,
    pub executed_elements: u64,
}

/// Evaluate `table` against `variables` and notify the configured table
/// listeners with the finished event.
pub(crate) fn evaluate_table(
    config: &EngineConfiguration,
    decision_key: &str,
    table: &DecisionTable,
    variables: &VariableMap,
) -> Result<TableEvaluation> {
    let executed_elements =
        (table.rules.len() * (table.inputs.len() + table.outputs.len())) as u64;

    let inputs = evaluate_inputs(config, table, variables)?;
    let candidates = match_rules(config, table, variables, &inputs)?;
    let matched = evaluate_conclusions(config, table, variables, &candidates)?;

    let handler = HitPolicyHandler::from_table(table);
    let (result, matching_rules, aggregate) = match handler.apply(table, matched)? {
        PolicyOutcome::Rules(rules) => {
            let result = DecisionResult::new(rules.iter().map(EvaluatedRule::entries).collect());
            (result, rules, None)
        }
        PolicyOutcome::Aggregate { rules, value } => {
            // aggregation already validated the single output column
            let output_name = table.outputs[0].output_name.clone();
            let result = match &value {
                Some(aggregate) => {
                    let mut entries = ResultEntries::new();
                    entries.insert(output_name.clone(), aggregate.clone());
                    DecisionResult::new(vec![entries])
                }
                None => DecisionResult::empty(),
            };
            (result, rules, value.map(|value| (output_name, value)))
        }
    };

    let event = DecisionTableEvaluationEvent {
        decision_key: decision_key.to_string(),
        inputs,
        matching_rules,
        aggregate,
        executed_elements,
    };
    for listener in &config.table_listeners {
        listener.notify(&event);
    }

    Ok(TableEvaluation {
        result,
        executed_elements,
    })
}

/// Evaluate each input expression once and coerce it to the column's type.
fn evaluate_inputs(
    config: &EngineConfiguration,
    table: &DecisionTable,
    variables: &VariableMap,
) -> Result<Vec<EvaluatedInput>> {
    let mut inputs = Vec::with_capacity(table.inputs.len());
    for input in &table.inputs {
        let raw = config
            .evaluator
            .evaluate(&input.expression, variables)
            .map_err(|source| EngineError::Evaluation {
                expression: input.expression.clone(),
                source,
            })?;
        let value = config
            .transformers
            .transform(input.type_name.as_deref(), &raw)
            .map_err(|source| EngineError::TypeTransform {
                element: format!("value of input '{}'", input.id),
                source,
            })?;
        inputs.push(EvaluatedInput {
            id: input.id.clone(),
            name: input.name.clone(),
            input_variable: input.input_variable.clone(),
            value,
        });
    }
    Ok(inputs)
}

/// Filter rule indices column by column. An empty condition cell always
/// holds; a non-empty cell is rewritten against the column's input variable
/// and matches iff the evaluator returns boolean true.
fn match_rules(
    config: &EngineConfiguration,
    table: &DecisionTable,
    variables: &VariableMap,
    inputs: &[EvaluatedInput],
) -> Result<Vec<usize>> {
    let mut candidates: Vec<usize> = (0..table.rules.len()).collect();
    for (column, input) in inputs.iter().enumerate() {
        if candidates.is_empty() {
            break;
        }

        let mut scope = variables.clone();
        scope.insert(input.input_variable.clone(), input.value.as_value());
        scope.insert(
            INPUT_VARIABLE_NAME.to_string(),
            Value::String(input.input_variable.clone()),
        );

        let mut remaining = Vec::with_capacity(candidates.len());
        for rule_index in candidates {
            let condition = table.rules[rule_index]
                .conditions
                .get(column)
                .map(String::as_str)
                .unwrap_or("");
            if condition.trim().is_empty() {
                remaining.push(rule_index);
                continue;
            }

            let rewritten = config
                .unary_test_transform
                .transform_unary_tests(condition, &input.input_variable)?;
            let outcome = config
                .evaluator
                .evaluate(&rewritten, &scope)
                .map_err(|source| EngineError::Evaluation {
                    expression: rewritten.clone(),
                    source,
                })?;
            if outcome == Value::Bool(true) {
                remaining.push(rule_index);
            }
        }
        candidates = remaining;
    }
    Ok(candidates)
}

/// Evaluate the conclusion cells of each matched rule in the global scope.
/// Blank cells produce no output entry.
fn evaluate_conclusions(
    config: &EngineConfiguration,
    table: &DecisionTable,
    variables: &VariableMap,
    candidates: &[usize],
) -> Result<Vec<EvaluatedRule>> {
    let mut matched = Vec::with_capacity(candidates.len());
    for &rule_index in candidates {
        let rule = &table.rules[rule_index];
        let mut outputs = Vec::with_capacity(table.outputs.len());
        for (column, output) in table.outputs.iter().enumerate() {
            let conclusion = rule
                .conclusions
                .get(column)
                .map(String::as_str)
                .unwrap_or("");
            if conclusion.trim().is_empty() {
                continue;
            }

            let raw = config
                .evaluator
                .evaluate(conclusion, variables)
                .map_err(|source| EngineError::Evaluation {
                    expression: conclusion.to_string(),
                    source,
                })?;
            let value = config
                .transformers
                .transform(output.type_name.as_deref(), &raw)
                .map_err(|source| EngineError::TypeTransform {
                    element: format!("value of output '{}' in rule '{}'", output.id, rule.id),
                    source,
                })?;
            outputs.push(EvaluatedOutput {
                id: output.id.clone(),
                name: output.name.clone(),
                output_name: output.output_name.clone(),
                value,
            });
        }
        matched.push(EvaluatedRule {
            id: rule.id.clone(),
            outputs,
        });
    }
    Ok(matched)
}

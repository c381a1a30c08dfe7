//! Decision evaluation orchestration
//!
//! A context walks one decision's requirement tree in post order, evaluates
//! each required decision exactly once per call (diamonds share the cached
//! result), binds each requirement's single output entry into the variable
//! scope and finally evaluates the decision's own logic.

use std::collections::HashMap;

use verdict_core::model::{Decision, DecisionLogic, LiteralExpression};
use verdict_core::VariableMap;

use crate::config::EngineConfiguration;
use crate::error::{EngineError, Result};
use crate::event::DecisionEvaluationEvent;
use crate::result::{DecisionResult, ResultEntries};
use crate::table;

/// Executed-element weight of a literal expression decision.
const LITERAL_EXPRESSION_ELEMENTS: u64 = 1;

pub(crate) struct DecisionContext<'a> {
    config: &'a EngineConfiguration,
    /// Results of required decisions already evaluated in this call,
    /// keyed by decision key
    evaluated: HashMap<String, DecisionResult>,
}

impl<'a> DecisionContext<'a> {
    pub(crate) fn new(config: &'a EngineConfiguration) -> Self {
        Self {
            config,
            evaluated: HashMap::new(),
        }
    }

    /// Evaluate `decision` and everything it requires against `variables`.
    ///
    /// Required decisions see the caller's variables, not the bindings of
    /// their siblings; only the depending decision's scope accumulates.
    pub(crate) fn evaluate(
        &mut self,
        decision: &Decision,
        variables: &VariableMap,
    ) -> Result<DecisionEvaluationEvent> {
        let mut scope = variables.clone();
        let mut required_results = Vec::new();
        let mut executed_elements = 0;

        for required in &decision.required_decisions {
            if let Some(result) = self.evaluated.get(&required.key) {
                let result = result.clone();
                bind_required_result(&mut scope, required, &result)?;
                continue;
            }

            let event = self.evaluate(required, variables)?;
            bind_required_result(&mut scope, required, &event.result)?;
            self.evaluated
                .insert(required.key.clone(), event.result.clone());
            executed_elements += event.executed_elements;
            required_results.push(event);
        }

        let (result, own_elements) = match &decision.logic {
            DecisionLogic::Table(decision_table) => {
                let evaluation =
                    table::evaluate_table(self.config, &decision.key, decision_table, &scope)?;
                (evaluation.result, evaluation.executed_elements)
            }
            DecisionLogic::Expression(expression) => (
                self.evaluate_literal_expression(&decision.key, expression, &scope)?,
                LITERAL_EXPRESSION_ELEMENTS,
            ),
        };

        Ok(DecisionEvaluationEvent {
            decision_key: decision.key.clone(),
            decision_name: decision.name.clone(),
            result,
            executed_elements: executed_elements + own_elements,
            required_results,
        })
    }

    fn evaluate_literal_expression(
        &self,
        decision_key: &str,
        expression: &LiteralExpression,
        scope: &VariableMap,
    ) -> Result<DecisionResult> {
        let raw = self
            .config
            .evaluator
            .evaluate(&expression.expression, scope)
            .map_err(|source| EngineError::Evaluation {
                expression: expression.expression.clone(),
                source,
            })?;
        let value = self
            .config
            .transformers
            .transform(expression.type_name.as_deref(), &raw)
            .map_err(|source| EngineError::TypeTransform {
                element: format!("literal expression of decision '{}'", decision_key),
                source,
            })?;

        let mut entries = ResultEntries::new();
        entries.insert(expression.output_name.clone(), value);
        Ok(DecisionResult::new(vec![entries]))
    }
}

/// Bind a required decision's result into the dependent's scope: a single
/// output entry is bound under its output name, an empty result binds
/// nothing, anything wider cannot be bound.
fn bind_required_result(
    scope: &mut VariableMap,
    required: &Decision,
    result: &DecisionResult,
) -> Result<()> {
    if result.entry_count() == 0 {
        return Ok(());
    }
    match result.single().and_then(ResultEntries::single) {
        Some((name, value)) => {
            scope.insert(name.to_string(), value.as_value());
            Ok(())
        }
        None => Err(EngineError::AmbiguousRequiredResult {
            key: required.key.clone(),
            entries: result.entry_count(),
        }),
    }
}

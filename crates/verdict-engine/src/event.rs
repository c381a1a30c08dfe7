//! Evaluation events and listeners
//!
//! Listeners observe evaluations after the fact: the table listener fires
//! once per decision table evaluation with the fully-built table event, the
//! decision listener fires once per root evaluation with the assembled event
//! tree. Events are never handed out partially built, and a listener cannot
//! influence the evaluation it observes.

use verdict_core::TypedValue;

use crate::result::{DecisionResult, ResultEntries};

/// An evaluated decision table input column.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluatedInput {
    pub id: String,
    pub name: Option<String>,
    /// Variable name the value was bound under for the column's conditions
    pub input_variable: String,
    pub value: TypedValue,
}

/// One evaluated output entry of a matching rule.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluatedOutput {
    pub id: String,
    pub name: Option<String>,
    pub output_name: String,
    pub value: TypedValue,
}

/// A rule that matched, with its evaluated output entries. Blank conclusion
/// cells produce no entry.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluatedRule {
    pub id: String,
    pub outputs: Vec<EvaluatedOutput>,
}

impl EvaluatedRule {
    /// The rule's output entries keyed by output name, in column order.
    pub fn entries(&self) -> ResultEntries {
        let mut entries = ResultEntries::new();
        for output in &self.outputs {
            entries.insert(output.output_name.clone(), output.value.clone());
        }
        entries
    }
}

/// Event describing one decision table evaluation.
///
/// `matching_rules` reflects the hit policy's view: collapsed to one rule
/// under ANY, truncated under FIRST and PRIORITY, sorted under OUTPUT ORDER.
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionTableEvaluationEvent {
    pub decision_key: String,
    pub inputs: Vec<EvaluatedInput>,
    pub matching_rules: Vec<EvaluatedRule>,
    /// Output name and value of the collect aggregate, when one applied
    pub aggregate: Option<(String, TypedValue)>,
    /// Rules × (inputs + outputs), fixed before any rule is examined
    pub executed_elements: u64,
}

/// Event describing one decision evaluation, with the events of its required
/// decisions nested in evaluation order.
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionEvaluationEvent {
    pub decision_key: String,
    pub decision_name: Option<String>,
    pub result: DecisionResult,
    /// Executed elements of this decision and everything below it
    pub executed_elements: u64,
    pub required_results: Vec<DecisionEvaluationEvent>,
}

/// Observer of individual decision table evaluations.
pub trait DecisionTableEvaluationListener: Send + Sync {
    fn notify(&self, event: &DecisionTableEvaluationEvent);
}

/// Observer of completed root decision evaluations.
pub trait DecisionEvaluationListener: Send + Sync {
    fn notify(&self, event: &DecisionEvaluationEvent);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_entries_keep_column_order() {
        let rule = EvaluatedRule {
            id: "rule1".to_string(),
            outputs: vec![
                EvaluatedOutput {
                    id: "output1".to_string(),
                    name: None,
                    output_name: "dish".to_string(),
                    value: TypedValue::String("Stew".to_string()),
                },
                EvaluatedOutput {
                    id: "output2".to_string(),
                    name: None,
                    output_name: "drink".to_string(),
                    value: TypedValue::String("Water".to_string()),
                },
            ],
        };
        let entries = rule.entries();
        let names: Vec<&str> = entries.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["dish", "drink"]);
    }
}

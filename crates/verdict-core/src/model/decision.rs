//! Resolved decisions

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::table::DecisionTable;

/// A resolved decision with its logic and the decisions it requires.
///
/// Immutable once built; shared via `Arc` so diamond dependencies resolve to
/// the same instance and concurrent evaluations can read it freely.
#[derive(Debug)]
pub struct Decision {
    pub key: String,
    pub name: Option<String>,
    pub logic: DecisionLogic,
    /// Required decisions in descriptor order; always resolved before this
    /// decision evaluates
    pub required_decisions: Vec<Arc<Decision>>,
}

impl Decision {
    pub fn is_decision_table(&self) -> bool {
        matches!(self.logic, DecisionLogic::Table(_))
    }
}

/// The evaluatable logic of a decision
#[derive(Debug)]
pub enum DecisionLogic {
    Table(DecisionTable),
    Expression(LiteralExpression),
}

/// A single literal expression producing one named result value
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiteralExpression {
    pub expression: String,
    /// Name the result value is published under
    pub output_name: String,
    #[serde(default)]
    pub type_name: Option<String>,
}

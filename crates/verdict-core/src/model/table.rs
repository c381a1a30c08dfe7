//! Decision table definitions

use serde::{Deserialize, Serialize};

use crate::types::Value;

/// Default input variable name bound for condition cells when the descriptor
/// does not declare one.
pub const DEFAULT_INPUT_VARIABLE: &str = "cellInput";

/// A decision table: ordered inputs, outputs and rules plus the hit policy
/// that resolves multiple matches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTable {
    #[serde(default)]
    pub inputs: Vec<Input>,
    #[serde(default)]
    pub outputs: Vec<Output>,
    #[serde(default)]
    pub rules: Vec<Rule>,
    #[serde(default)]
    pub hit_policy: HitPolicy,
    #[serde(default)]
    pub aggregator: Option<Aggregator>,
}

/// A decision table input column
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Input {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    /// Expression evaluated once per table evaluation to produce the value
    /// the column's conditions test against
    pub expression: String,
    /// Variable name the evaluated input value is bound under for the
    /// column's condition cells
    #[serde(default = "default_input_variable")]
    pub input_variable: String,
    #[serde(default)]
    pub type_name: Option<String>,
}

/// A decision table output column
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Output {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    /// Name the column's values appear under in result entries
    pub output_name: String,
    #[serde(default)]
    pub type_name: Option<String>,
    /// Declared value ordering, used by PRIORITY and OUTPUT ORDER
    #[serde(default)]
    pub output_values: Vec<Value>,
}

/// A decision table rule: one condition per input, one conclusion per output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rule {
    pub id: String,
    #[serde(default)]
    pub conditions: Vec<String>,
    #[serde(default)]
    pub conclusions: Vec<String>,
}

/// How multiple matching rules combine into a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HitPolicy {
    Unique,
    First,
    Priority,
    Any,
    RuleOrder,
    OutputOrder,
    Collect,
}

impl Default for HitPolicy {
    fn default() -> Self {
        HitPolicy::Unique
    }
}

/// Reduction applied to the single output column under COLLECT
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Aggregator {
    Sum,
    Min,
    Max,
    Count,
}

fn default_input_variable() -> String {
    DEFAULT_INPUT_VARIABLE.to_string()
}

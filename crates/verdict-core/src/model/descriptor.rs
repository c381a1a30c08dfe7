//! Raw decision descriptors
//!
//! Descriptors are what the parsing layer hands the engine: decisions named
//! by key with their logic and the keys of the decisions they require. The
//! graph builder resolves them into [`Decision`](super::Decision) instances.

use serde::{Deserialize, Serialize};

use super::decision::LiteralExpression;
use super::table::DecisionTable;

/// An unresolved decision as produced by the parsing layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionDescriptor {
    pub key: String,
    #[serde(default)]
    pub name: Option<String>,
    pub logic: LogicDescriptor,
    /// Keys of the decisions this decision requires, in order
    #[serde(default)]
    pub required_decisions: Vec<String>,
}

/// The declared logic kind of a descriptor.
///
/// Kinds the engine cannot evaluate deserialize as `Unsupported`; whole-model
/// resolution skips them, requesting one directly fails.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum LogicDescriptor {
    DecisionTable(DecisionTable),
    LiteralExpression(LiteralExpression),
    #[serde(other)]
    Unsupported,
}

/// A decision requirements graph descriptor: a keyed, named set of decision
/// descriptors deployed together
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrgDescriptor {
    pub key: String,
    #[serde(default)]
    pub name: Option<String>,
    pub decisions: Vec<DecisionDescriptor>,
}

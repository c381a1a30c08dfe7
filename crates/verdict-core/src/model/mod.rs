//! The decision model
//!
//! Resolved decisions and their table or literal-expression logic. Built once
//! by the graph builder from raw descriptors, then read-only and safe to
//! share across concurrent evaluations.

pub mod decision;
pub mod descriptor;
pub mod table;

pub use decision::{Decision, DecisionLogic, LiteralExpression};
pub use descriptor::{DecisionDescriptor, DrgDescriptor, LogicDescriptor};
pub use table::{Aggregator, DecisionTable, HitPolicy, Input, Output, Rule};

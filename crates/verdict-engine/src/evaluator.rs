//! The expression evaluator seam
//!
//! The engine never evaluates target-syntax expressions itself. Input
//! expressions, rewritten condition cells, conclusion cells and literal
//! expressions are all handed to a caller-supplied evaluator through this
//! trait.

use verdict_core::{Value, VariableMap};

/// Evaluates a target-syntax expression against a variable scope.
///
/// Implementations must be thread-safe; a single engine configuration is
/// shared across concurrent evaluations.
pub trait ExpressionEvaluator: Send + Sync {
    /// Evaluate `expression` with the variables in `scope` and return the
    /// resulting raw value. Any failure aborts the surrounding decision
    /// evaluation.
    fn evaluate(&self, expression: &str, scope: &VariableMap) -> anyhow::Result<Value>;
}

//! The decision engine facade

use std::sync::Arc;

use verdict_core::model::{Decision, DecisionDescriptor, DrgDescriptor};
use verdict_core::VariableMap;

use crate::config::EngineConfiguration;
use crate::context::DecisionContext;
use crate::error::Result;
use crate::graph::{self, DecisionRequirementsGraph};
use crate::result::DecisionResult;

/// Entry point for parsing and evaluating decisions.
///
/// The engine itself is stateless beyond its configuration: parsed decisions
/// are handed back to the caller and can be evaluated concurrently.
pub struct DecisionEngine {
    config: EngineConfiguration,
}

impl DecisionEngine {
    pub fn new(config: EngineConfiguration) -> Self {
        Self { config }
    }

    pub fn configuration(&self) -> &EngineConfiguration {
        &self.config
    }

    /// Resolve every supported decision in `descriptors`.
    pub fn parse_decisions(
        &self,
        descriptors: &[DecisionDescriptor],
    ) -> Result<Vec<Arc<Decision>>> {
        graph::parse_decisions(descriptors)
    }

    /// Resolve the decision `key` and everything it requires.
    pub fn parse_decision(
        &self,
        descriptors: &[DecisionDescriptor],
        key: &str,
    ) -> Result<Arc<Decision>> {
        graph::parse_decision(descriptors, key)
    }

    /// Resolve a whole graph descriptor.
    pub fn parse_decision_requirements_graph(
        &self,
        descriptor: &DrgDescriptor,
    ) -> Result<DecisionRequirementsGraph> {
        graph::parse_decision_requirements_graph(descriptor)
    }

    /// Evaluate a parsed decision against `variables`, notifying the
    /// configured decision listeners once the whole tree has completed.
    pub fn evaluate_decision(
        &self,
        decision: &Decision,
        variables: &VariableMap,
    ) -> Result<DecisionResult> {
        let event = DecisionContext::new(&self.config).evaluate(decision, variables)?;
        for listener in &self.config.decision_listeners {
            listener.notify(&event);
        }
        Ok(event.result)
    }

    /// Parse the decision `key` out of `descriptors` and evaluate it.
    pub fn evaluate_decision_by_key(
        &self,
        descriptors: &[DecisionDescriptor],
        key: &str,
        variables: &VariableMap,
    ) -> Result<DecisionResult> {
        let decision = self.parse_decision(descriptors, key)?;
        self.evaluate_decision(&decision, variables)
    }
}

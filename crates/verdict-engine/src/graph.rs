//! Decision requirements graph resolution
//!
//! Descriptors arrive flat, keyed by decision key. Resolution turns them
//! into `Arc<Decision>` trees: a dense key→index arena with per-node visit
//! marks detects requirement loops, and a memo ensures diamond dependencies
//! resolve to one shared instance.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use verdict_core::model::{
    Decision, DecisionDescriptor, DecisionLogic, DecisionTable, DrgDescriptor, HitPolicy,
    LogicDescriptor,
};

use crate::error::{EngineError, Result};

/// A resolved decision requirements graph.
#[derive(Debug)]
pub struct DecisionRequirementsGraph {
    pub key: String,
    pub name: Option<String>,
    /// Resolved decisions in descriptor order, unsupported ones skipped
    pub decisions: Vec<Arc<Decision>>,
}

impl DecisionRequirementsGraph {
    pub fn decision(&self, key: &str) -> Option<&Arc<Decision>> {
        self.decisions.iter().find(|decision| decision.key == key)
    }
}

/// Resolve every supported decision in `descriptors`.
///
/// Descriptors with an unsupported logic kind are skipped with a warning;
/// a requirement loop anywhere fails the whole operation.
pub fn parse_decisions(descriptors: &[DecisionDescriptor]) -> Result<Vec<Arc<Decision>>> {
    let mut builder = GraphBuilder::new(descriptors);
    let mut decisions = Vec::with_capacity(descriptors.len());
    for (index, descriptor) in descriptors.iter().enumerate() {
        if matches!(descriptor.logic, LogicDescriptor::Unsupported) {
            tracing::warn!(
                key = %descriptor.key,
                "skipping decision with unsupported logic kind"
            );
            continue;
        }
        decisions.push(builder.resolve(index)?);
    }
    Ok(decisions)
}

/// Resolve the single decision `key` and everything it requires.
pub fn parse_decision(descriptors: &[DecisionDescriptor], key: &str) -> Result<Arc<Decision>> {
    let mut builder = GraphBuilder::new(descriptors);
    let index = builder
        .index_of(key)
        .ok_or_else(|| EngineError::DecisionNotFound(key.to_string()))?;
    builder.resolve(index)
}

/// Resolve a whole graph descriptor.
pub fn parse_decision_requirements_graph(
    descriptor: &DrgDescriptor,
) -> Result<DecisionRequirementsGraph> {
    Ok(DecisionRequirementsGraph {
        key: descriptor.key.clone(),
        name: descriptor.name.clone(),
        decisions: parse_decisions(&descriptor.decisions)?,
    })
}

/// Structural table checks applied when a table descriptor is resolved,
/// before any evaluation: compound outputs need distinct non-empty output
/// names, ordered hit policies need declared output values on every column,
/// and an aggregator is only meaningful under COLLECT.
fn validate_table(key: &str, table: &DecisionTable) -> Result<()> {
    if table.outputs.len() > 1 {
        let mut names = HashSet::new();
        for output in &table.outputs {
            if output.output_name.is_empty() || !names.insert(output.output_name.as_str()) {
                return Err(EngineError::CompoundOutputNames {
                    key: key.to_string(),
                    output_name: output.output_name.clone(),
                });
            }
        }
    }

    if matches!(table.hit_policy, HitPolicy::Priority | HitPolicy::OutputOrder) {
        for output in &table.outputs {
            if output.output_values.is_empty() {
                return Err(EngineError::MissingOutputValues {
                    key: key.to_string(),
                    output: output.output_name.clone(),
                });
            }
        }
    }

    if table.aggregator.is_some() && table.hit_policy != HitPolicy::Collect {
        return Err(EngineError::AggregatorNotAllowed {
            key: key.to_string(),
            policy: hit_policy_name(table.hit_policy),
        });
    }

    Ok(())
}

fn hit_policy_name(hit_policy: HitPolicy) -> &'static str {
    match hit_policy {
        HitPolicy::Unique => "UNIQUE",
        HitPolicy::First => "FIRST",
        HitPolicy::Priority => "PRIORITY",
        HitPolicy::Any => "ANY",
        HitPolicy::RuleOrder => "RULE ORDER",
        HitPolicy::OutputOrder => "OUTPUT ORDER",
        HitPolicy::Collect => "COLLECT",
    }
}

/// Per-node resolution state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    /// On the current resolution path; revisiting means a loop
    Visiting,
    Resolved,
}

struct GraphBuilder<'a> {
    descriptors: &'a [DecisionDescriptor],
    index: HashMap<&'a str, usize>,
    marks: Vec<Mark>,
    resolved: Vec<Option<Arc<Decision>>>,
}

impl<'a> GraphBuilder<'a> {
    fn new(descriptors: &'a [DecisionDescriptor]) -> Self {
        let index = descriptors
            .iter()
            .enumerate()
            .map(|(idx, descriptor)| (descriptor.key.as_str(), idx))
            .collect();
        Self {
            descriptors,
            index,
            marks: vec![Mark::Unvisited; descriptors.len()],
            resolved: vec![None; descriptors.len()],
        }
    }

    fn index_of(&self, key: &str) -> Option<usize> {
        self.index.get(key).copied()
    }

    fn resolve(&mut self, index: usize) -> Result<Arc<Decision>> {
        let descriptor = &self.descriptors[index];
        match self.marks[index] {
            Mark::Visiting => {
                return Err(EngineError::RequirementLoop(descriptor.key.clone()));
            }
            Mark::Resolved => {
                if let Some(decision) = &self.resolved[index] {
                    return Ok(Arc::clone(decision));
                }
            }
            Mark::Unvisited => {}
        }

        let logic = match &descriptor.logic {
            LogicDescriptor::DecisionTable(table) => {
                validate_table(&descriptor.key, table)?;
                DecisionLogic::Table(table.clone())
            }
            LogicDescriptor::LiteralExpression(expression) => {
                DecisionLogic::Expression(expression.clone())
            }
            LogicDescriptor::Unsupported => {
                return Err(EngineError::UnsupportedLogic(descriptor.key.clone()));
            }
        };

        self.marks[index] = Mark::Visiting;
        let mut required_decisions = Vec::with_capacity(descriptor.required_decisions.len());
        for required_key in &descriptor.required_decisions {
            let required_index = self.index_of(required_key).ok_or_else(|| {
                EngineError::UnknownRequiredDecision {
                    key: descriptor.key.clone(),
                    required: required_key.clone(),
                }
            })?;
            required_decisions.push(self.resolve(required_index)?);
        }

        let decision = Arc::new(Decision {
            key: descriptor.key.clone(),
            name: descriptor.name.clone(),
            logic,
            required_decisions,
        });
        self.marks[index] = Mark::Resolved;
        self.resolved[index] = Some(Arc::clone(&decision));
        Ok(decision)
    }
}

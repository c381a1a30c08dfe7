//! Verdict Engine - Decision graph resolution and evaluation
//!
//! This crate turns decision descriptors into evaluatable decision trees and
//! evaluates them: decision tables with the full set of hit policies and
//! collect aggregators, literal expressions, and multi-level decision
//! requirements graphs with per-requirement variable binding. Target-syntax
//! expressions are delegated to a caller-supplied [`ExpressionEvaluator`].

pub mod config;
pub mod engine;
pub mod error;
pub mod evaluator;
pub mod event;
pub mod graph;
pub mod result;

mod context;
mod hit_policy;
mod table;

pub use config::{EngineConfiguration, EngineConfigurationBuilder};
pub use engine::DecisionEngine;
pub use error::{EngineError, Result};
pub use evaluator::ExpressionEvaluator;
pub use event::{
    DecisionEvaluationEvent, DecisionEvaluationListener, DecisionTableEvaluationEvent,
    DecisionTableEvaluationListener, EvaluatedInput, EvaluatedOutput, EvaluatedRule,
};
pub use graph::DecisionRequirementsGraph;
pub use result::{DecisionResult, ResultEntries};

//! Engine errors
//!
//! Codes group by family: `DEC-02xxx` graph and structure, `DEC-03xxx` hit
//! policy, `DEC-04001` expression evaluation. Type coercion and unary test
//! rewrite failures keep the `DEC-01xxx` and `FEEL-01xxx` codes of their
//! source errors.

use thiserror::Error;
use verdict_core::{TypeError, Value};
use verdict_feel::FeelError;

/// Failure to resolve or evaluate a decision.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("DEC-02001 no decision with key '{0}'")]
    DecisionNotFound(String),

    #[error("DEC-02002 requirement loop through decision '{0}'")]
    RequirementLoop(String),

    #[error("DEC-02003 decision '{0}' declares logic the engine cannot evaluate")]
    UnsupportedLogic(String),

    #[error("DEC-02004 decision '{key}' requires unknown decision '{required}'")]
    UnknownRequiredDecision { key: String, required: String },

    #[error(
        "DEC-02005 result of required decision '{key}' has {entries} output entries \
         and cannot be bound as a single variable"
    )]
    AmbiguousRequiredResult { key: String, entries: usize },

    #[error(
        "DEC-02006 decision '{key}' declares compound outputs without distinct \
         output names ('{output_name}')"
    )]
    CompoundOutputNames { key: String, output_name: String },

    #[error(
        "DEC-02007 decision '{key}' uses an ordered hit policy but output \
         '{output}' declares no output values"
    )]
    MissingOutputValues { key: String, output: String },

    #[error(
        "DEC-02008 decision '{key}' declares an aggregator for hit policy \
         {policy}, which does not aggregate"
    )]
    AggregatorNotAllowed { key: String, policy: &'static str },

    #[error("DEC-03001 UNIQUE hit policy violated: {0} rules match")]
    UniqueHitPolicyViolated(usize),

    #[error("DEC-03002 ANY hit policy violated: matching rules have divergent outputs")]
    AnyHitPolicyViolated,

    #[error("DEC-03003 {0} hit policy requires at least one matching rule")]
    SortingRequiresMatch(&'static str),

    #[error("DEC-03004 unable to aggregate outputs: {0}")]
    AggregationFailed(String),

    #[error("DEC-03005 output value {value} is not declared for output '{output}'")]
    UndeclaredOutputValue { output: String, value: Value },

    #[error("DEC-04001 unable to evaluate expression '{expression}'")]
    Evaluation {
        expression: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("unable to coerce {element}")]
    TypeTransform {
        element: String,
        #[source]
        source: TypeError,
    },

    #[error(transparent)]
    Feel(#[from] FeelError),
}

impl EngineError {
    /// Stable machine-readable error code. Wrapped coercion and rewrite
    /// failures report the code of their source.
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::DecisionNotFound(_) => "DEC-02001",
            EngineError::RequirementLoop(_) => "DEC-02002",
            EngineError::UnsupportedLogic(_) => "DEC-02003",
            EngineError::UnknownRequiredDecision { .. } => "DEC-02004",
            EngineError::AmbiguousRequiredResult { .. } => "DEC-02005",
            EngineError::CompoundOutputNames { .. } => "DEC-02006",
            EngineError::MissingOutputValues { .. } => "DEC-02007",
            EngineError::AggregatorNotAllowed { .. } => "DEC-02008",
            EngineError::UniqueHitPolicyViolated(_) => "DEC-03001",
            EngineError::AnyHitPolicyViolated => "DEC-03002",
            EngineError::SortingRequiresMatch(_) => "DEC-03003",
            EngineError::AggregationFailed(_) => "DEC-03004",
            EngineError::UndeclaredOutputValue { .. } => "DEC-03005",
            EngineError::Evaluation { .. } => "DEC-04001",
            EngineError::TypeTransform { source, .. } => source.code(),
            EngineError::Feel(source) => source.code(),
        }
    }
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

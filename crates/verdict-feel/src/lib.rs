//! Verdict FEEL - Unary test rewriting for the Verdict decision engine
//!
//! Rewrites the restricted simple-unary-tests grammar used in decision table
//! condition cells into boolean expressions in the target evaluator's syntax,
//! through an ordered chain of pattern transformers. There is no full parser;
//! each grammar level is handled by the first transformer that matches.

pub mod error;
pub mod transform;

pub use error::{FeelError, Result};
pub use transform::{FunctionTransformer, UnaryTestTransform};

//! Verdict Core - Core types and definitions for the Verdict decision engine
//!
//! This crate provides the fundamental types used across the Verdict workspace:
//! - Raw and typed runtime values
//! - The data type transformer registry
//! - The decision model (decisions, tables, rules, hit policies)
//! - Raw decision descriptors consumed from the parsing layer

pub mod error;
pub mod model;
pub mod types;

// Re-export commonly used types
pub use error::TypeError;
pub use types::transformer::{DataTypeTransformer, DataTypeTransformerRegistry};
pub use types::{TypedValue, Value, VariableMap};

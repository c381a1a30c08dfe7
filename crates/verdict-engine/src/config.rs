//! Engine configuration
//!
//! The configuration carries everything an evaluation needs: the target
//! expression evaluator, the data type transformer registry, the unary test
//! transform chain and the listener lists. It is assembled up front through
//! the builder and read-only while evaluations are in flight.

use std::sync::Arc;

use verdict_core::{DataTypeTransformer, DataTypeTransformerRegistry};
use verdict_feel::{FunctionTransformer, UnaryTestTransform};

use crate::engine::DecisionEngine;
use crate::evaluator::ExpressionEvaluator;
use crate::event::{DecisionEvaluationListener, DecisionTableEvaluationListener};

pub struct EngineConfiguration {
    pub(crate) evaluator: Arc<dyn ExpressionEvaluator>,
    pub(crate) transformers: DataTypeTransformerRegistry,
    pub(crate) unary_test_transform: UnaryTestTransform,
    pub(crate) table_listeners: Vec<Box<dyn DecisionTableEvaluationListener>>,
    pub(crate) decision_listeners: Vec<Box<dyn DecisionEvaluationListener>>,
}

impl EngineConfiguration {
    /// A configuration with default transformers and no listeners.
    pub fn new(evaluator: Arc<dyn ExpressionEvaluator>) -> Self {
        Self {
            evaluator,
            transformers: DataTypeTransformerRegistry::new(),
            unary_test_transform: UnaryTestTransform::new(),
            table_listeners: Vec::new(),
            decision_listeners: Vec::new(),
        }
    }

    pub fn builder(evaluator: Arc<dyn ExpressionEvaluator>) -> EngineConfigurationBuilder {
        EngineConfigurationBuilder {
            config: Self::new(evaluator),
        }
    }

    pub fn build_engine(self) -> DecisionEngine {
        DecisionEngine::new(self)
    }
}

/// Builder for [`EngineConfiguration`].
pub struct EngineConfigurationBuilder {
    config: EngineConfiguration,
}

impl EngineConfigurationBuilder {
    /// Replace the whole transformer registry.
    pub fn transformer_registry(mut self, transformers: DataTypeTransformerRegistry) -> Self {
        self.config.transformers = transformers;
        self
    }

    /// Register a data type transformer on the current registry.
    pub fn data_type_transformer(
        mut self,
        type_name: &str,
        transformer: Box<dyn DataTypeTransformer>,
    ) -> Self {
        self.config.transformers.register(type_name, transformer);
        self
    }

    /// Register a custom function transformer on the unary test chain.
    pub fn function_transformer(mut self, transformer: Box<dyn FunctionTransformer>) -> Self {
        self.config
            .unary_test_transform
            .register_function_transformer(transformer);
        self
    }

    pub fn table_listener(mut self, listener: Box<dyn DecisionTableEvaluationListener>) -> Self {
        self.config.table_listeners.push(listener);
        self
    }

    pub fn decision_listener(mut self, listener: Box<dyn DecisionEvaluationListener>) -> Self {
        self.config.decision_listeners.push(listener);
        self
    }

    pub fn build(self) -> EngineConfiguration {
        self.config
    }
}

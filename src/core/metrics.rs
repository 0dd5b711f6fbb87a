//! Metrics resolver: text -> tokens and the two cost estimates

use crate::core::model::Metrics;
use crate::core::pricing::{estimate_cost, PricingModel};
use crate::core::tokenizer::TokenCounter;

/// Binds a token counter to the active input and output pricing models
pub struct MetricsResolver<'a> {
    counter: &'a dyn TokenCounter,
    input_model: &'a PricingModel,
    output_model: &'a PricingModel,
}

impl<'a> MetricsResolver<'a> {
    pub fn new(
        counter: &'a dyn TokenCounter,
        input_model: &'a PricingModel,
        output_model: &'a PricingModel,
    ) -> Self {
        Self {
            counter,
            input_model,
            output_model,
        }
    }

    pub fn resolve(&self, text: &str) -> Metrics {
        let tokens = self.counter.count(text);
        Metrics {
            tokens,
            input_cost: estimate_cost(tokens, self.input_model.input_rate),
            output_cost: self
                .output_model
                .output_rate
                .map(|rate| estimate_cost(tokens, rate)),
        }
    }

    /// Whether resolved metrics will carry an output cost
    pub fn has_output_rate(&self) -> bool {
        self.output_model.output_rate.is_some()
    }
}

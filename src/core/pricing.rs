//! Pricing models
//!
//! Rates are in dollars per 1,000,000 tokens. Embedding models have no
//! output rate and no context window.

use serde::Serialize;

use crate::core::model::TacosError;

/// A named pricing model
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PricingModel {
    pub key: &'static str,
    pub input_rate: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_window: Option<u32>,
}

const fn model(
    key: &'static str,
    input_rate: f64,
    output_rate: Option<f64>,
    context_window: Option<u32>,
) -> PricingModel {
    PricingModel {
        key,
        input_rate,
        output_rate,
        context_window,
    }
}

pub static MODELS: &[PricingModel] = &[
    model("gpt-4-32k", 60.00, Some(120.00), Some(32_000)),
    model("o1", 15.00, Some(60.00), Some(200_000)),
    model("gpt-4", 30.00, Some(60.00), Some(8_000)),
    model("gpt-4 turbo", 10.00, Some(30.00), Some(128_000)),
    model("gpt-4o", 2.50, Some(10.00), Some(128_000)),
    model("o3", 6.00, Some(12.00), Some(200_000)),
    model("o3-mini", 0.15, Some(0.60), Some(128_000)),
    model("o1 mini", 0.60, Some(2.40), Some(128_000)),
    model("gpt-3.5 turbo", 0.50, Some(1.50), Some(16_000)),
    model("gpt-4o mini", 0.15, Some(0.60), Some(128_000)),
    model("text-embedding-3-small", 0.02, None, None),
    model("text-embedding-3-large", 0.13, None, None),
    model("ada v2", 0.10, None, None),
];

/// Shorthand names accepted on the command line
const ALIASES: &[(&str, &str)] = &[
    ("gpt-4-turbo", "gpt-4 turbo"),
    ("3-large", "gpt-3.5 turbo"),
    ("3-small", "gpt-4o mini"),
];

pub const DEFAULT_INPUT_MODEL: &str = "o3-mini";
pub const DEFAULT_OUTPUT_MODEL: &str = "3-small";

/// Which side of the request a model prices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelRole {
    Input,
    Output,
}

impl ModelRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelRole::Input => "input",
            ModelRole::Output => "output",
        }
    }
}

/// Look up a model by name or alias, case-insensitively
pub fn find_model(name: &str) -> Option<&'static PricingModel> {
    let lower = name.trim().to_lowercase();
    let key = ALIASES
        .iter()
        .find(|(alias, _)| *alias == lower)
        .map(|(_, target)| *target)
        .unwrap_or(lower.as_str());
    MODELS.iter().find(|m| m.key.eq_ignore_ascii_case(key))
}

/// Like `find_model`, but unknown names are an error naming the role
pub fn resolve_model(name: &str, role: ModelRole) -> Result<&'static PricingModel, TacosError> {
    find_model(name).ok_or_else(|| TacosError::UnknownModel {
        role: role.as_str(),
        name: name.to_string(),
        available: MODELS.iter().map(|m| m.key).collect::<Vec<_>>().join(", "),
    })
}

/// Cost of `tokens` at `rate_per_million`
pub fn estimate_cost(tokens: usize, rate_per_million: f64) -> f64 {
    (tokens as f64 / 1_000_000.0) * rate_per_million
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_model_case_insensitive() {
        let m = find_model("GPT-4O").unwrap();
        assert_eq!(m.key, "gpt-4o");
        assert_eq!(m.input_rate, 2.50);
    }

    #[test]
    fn test_find_model_aliases() {
        assert_eq!(find_model("3-small").unwrap().key, "gpt-4o mini");
        assert_eq!(find_model("3-LARGE").unwrap().key, "gpt-3.5 turbo");
        assert_eq!(find_model("gpt-4-turbo").unwrap().key, "gpt-4 turbo");
    }

    #[test]
    fn test_find_model_with_space_in_key() {
        assert_eq!(find_model("o1 mini").unwrap().output_rate, Some(2.40));
    }

    #[test]
    fn test_defaults_resolve() {
        assert!(find_model(DEFAULT_INPUT_MODEL).is_some());
        assert!(find_model(DEFAULT_OUTPUT_MODEL).is_some());
    }

    #[test]
    fn test_embedding_has_no_output_rate() {
        let m = find_model("text-embedding-3-small").unwrap();
        assert!(m.output_rate.is_none());
        assert!(m.context_window.is_none());
    }

    #[test]
    fn test_resolve_unknown_model() {
        let err = resolve_model("gpt-9", ModelRole::Output).unwrap_err();
        let msg = err.to_string();
        assert!(msg.starts_with("Unknown output model: gpt-9"));
        assert!(msg.contains("o3-mini"));
    }

    #[test]
    fn test_estimate_cost() {
        assert!((estimate_cost(1_000_000, 2.5) - 2.5).abs() < 1e-12);
        assert!((estimate_cost(300, 10.0) - 0.003).abs() < 1e-12);
        assert_eq!(estimate_cost(0, 60.0), 0.0);
    }
}

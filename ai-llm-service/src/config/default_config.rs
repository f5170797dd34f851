//! Default OpenAI profiles resolved from environment variables.
//!
//! Three roles are provided:
//!
//! - **Quick**     → short, low-latency assessments (small budget, 15s timeout)
//! - **Deep**      → retrieval-augmented assessments (larger budget)
//! - **Embedding** → embedding generator for the document collections
//!
//! # Environment variables
//!
//! - `OPENAI_API_KEY`          = credential (optional; calls fail without it)
//! - `OPENAI_BASE_URL`         = API base, default `https://api.openai.com`
//! - `OPENAI_QUICK_MODEL`      = default `gpt-3.5-turbo`
//! - `OPENAI_DEEP_MODEL`       = default `gpt-4o-mini`
//! - `OPENAI_EMBEDDING_MODEL`  = default `text-embedding-3-small`
//! - `LLM_TIMEOUT_SECS`        = timeout for deep/embedding profiles, default 60
//!
//! Every constructor has a `*_with` twin taking a lookup closure, which keeps
//! the resolution logic independent from the process environment.

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{AiLlmError, lookup_non_empty, lookup_opt_u64, validate_http_endpoint},
};

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_QUICK_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_DEEP_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";

fn env_lookup(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

/// Resolves the OpenAI base URL and key shared by every profile.
fn openai_base<F>(lookup: &F) -> Result<(String, Option<String>), AiLlmError>
where
    F: Fn(&str) -> Option<String>,
{
    let endpoint = lookup_non_empty(lookup, "OPENAI_BASE_URL")
        .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string());
    validate_http_endpoint("OPENAI_BASE_URL", &endpoint)?;
    let api_key = lookup_non_empty(lookup, "OPENAI_API_KEY");
    Ok((endpoint, api_key))
}

/// Blank or unset model variables fall back to `default`.
fn model_or_default<F>(lookup: &F, var: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup_non_empty(lookup, var).unwrap_or_else(|| default.to_string())
}

/// Quick profile: `temperature = 0.2`, `max_tokens = 800`, `timeout = 15s`.
pub fn config_openai_quick_with<F>(lookup: &F) -> Result<LlmModelConfig, AiLlmError>
where
    F: Fn(&str) -> Option<String>,
{
    let (endpoint, api_key) = openai_base(lookup)?;
    Ok(LlmModelConfig {
        provider: LlmProvider::OpenAI,
        model: model_or_default(lookup, "OPENAI_QUICK_MODEL", DEFAULT_QUICK_MODEL),
        endpoint,
        api_key,
        max_tokens: Some(800),
        temperature: Some(0.2),
        top_p: None,
        timeout_secs: Some(15),
    })
}

/// Deep profile: `temperature = 0.1`, `max_tokens = 2000`.
pub fn config_openai_deep_with<F>(lookup: &F) -> Result<LlmModelConfig, AiLlmError>
where
    F: Fn(&str) -> Option<String>,
{
    let (endpoint, api_key) = openai_base(lookup)?;
    let timeout = lookup_opt_u64(lookup, "LLM_TIMEOUT_SECS")?.unwrap_or(60);
    Ok(LlmModelConfig {
        provider: LlmProvider::OpenAI,
        model: model_or_default(lookup, "OPENAI_DEEP_MODEL", DEFAULT_DEEP_MODEL),
        endpoint,
        api_key,
        max_tokens: Some(2000),
        temperature: Some(0.1),
        top_p: None,
        timeout_secs: Some(timeout),
    })
}

/// Embedding profile: deterministic, no generation budget.
pub fn config_openai_embedding_with<F>(lookup: &F) -> Result<LlmModelConfig, AiLlmError>
where
    F: Fn(&str) -> Option<String>,
{
    let (endpoint, api_key) = openai_base(lookup)?;
    let timeout = lookup_opt_u64(lookup, "LLM_TIMEOUT_SECS")?.unwrap_or(60);
    Ok(LlmModelConfig {
        provider: LlmProvider::OpenAI,
        model: model_or_default(lookup, "OPENAI_EMBEDDING_MODEL", DEFAULT_EMBEDDING_MODEL),
        endpoint,
        api_key,
        max_tokens: None,
        temperature: None,
        top_p: None,
        timeout_secs: Some(timeout),
    })
}

pub fn config_openai_quick() -> Result<LlmModelConfig, AiLlmError> {
    config_openai_quick_with(&env_lookup)
}

pub fn config_openai_deep() -> Result<LlmModelConfig, AiLlmError> {
    config_openai_deep_with(&env_lookup)
}

pub fn config_openai_embedding() -> Result<LlmModelConfig, AiLlmError> {
    config_openai_embedding_with(&env_lookup)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn defaults_apply_without_variables() {
        let l = lookup_from(&[]);
        let quick = config_openai_quick_with(&l).unwrap();
        assert_eq!(quick.model, DEFAULT_QUICK_MODEL);
        assert_eq!(quick.endpoint, DEFAULT_OPENAI_BASE_URL);
        assert_eq!(quick.api_key, None);
        assert_eq!(quick.max_tokens, Some(800));
        assert_eq!(quick.timeout_secs, Some(15));

        let deep = config_openai_deep_with(&l).unwrap();
        assert_eq!(deep.model, DEFAULT_DEEP_MODEL);
        assert_eq!(deep.max_tokens, Some(2000));
        assert_eq!(deep.temperature, Some(0.1));

        let emb = config_openai_embedding_with(&l).unwrap();
        assert_eq!(emb.model, DEFAULT_EMBEDDING_MODEL);
    }

    #[test]
    fn overrides_and_invalid_values() {
        let l = lookup_from(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("OPENAI_DEEP_MODEL", "gpt-4o"),
            ("LLM_TIMEOUT_SECS", "5"),
        ]);
        let deep = config_openai_deep_with(&l).unwrap();
        assert_eq!(deep.model, "gpt-4o");
        assert_eq!(deep.api_key.as_deref(), Some("sk-test"));
        assert_eq!(deep.timeout_secs, Some(5));

        let bad = lookup_from(&[("OPENAI_BASE_URL", "api.openai.com")]);
        assert!(config_openai_quick_with(&bad).is_err());

        let bad = lookup_from(&[("LLM_TIMEOUT_SECS", "soon")]);
        assert!(config_openai_embedding_with(&bad).is_err());
    }

    #[test]
    fn blank_model_variable_uses_default() {
        let l = lookup_from(&[("OPENAI_QUICK_MODEL", "   ")]);
        assert_eq!(config_openai_quick_with(&l).unwrap().model, DEFAULT_QUICK_MODEL);
    }
}

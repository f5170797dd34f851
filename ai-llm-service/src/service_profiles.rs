//! Shared LLM service with three profiles: `quick`, `deep` and `embedding`.
//!
//! - Lives in the same Tokio runtime as the application.
//! - Construct once, wrap in `Arc`, and pass clones to dependents.
//! - Caches underlying HTTP clients per config (endpoint+model+key+timeout).
//! - Client construction is lazy: a profile without an API key only fails
//!   when it is actually used, so callers can fall back gracefully.
//!
//! # Example
//! ```no_run
//! use std::sync::Arc;
//! use ai_llm_service::service_profiles::{LlmRole, LlmServiceProfiles};
//!
//! # async fn run() -> Result<(), ai_llm_service::AiLlmError> {
//! let svc = Arc::new(LlmServiceProfiles::from_env()?);
//! let txt = svc.generate(LlmRole::Quick, "Hello", None).await?;
//! let emb = svc.embed("Ferris").await?;
//! println!("{txt} / dim={}", emb.len());
//! # Ok(())
//! # }
//! ```

use std::{collections::HashMap, sync::Arc};

use serde::Serialize;
use tokio::sync::RwLock;
use tracing::debug;

use crate::{
    config::{
        default_config::{config_openai_deep, config_openai_embedding, config_openai_quick},
        llm_model_config::LlmModelConfig,
        llm_provider::LlmProvider,
    },
    error_handler::AiLlmError,
    health_service::{HealthService, HealthStatus},
    services::open_ai_service::OpenAiService,
};

/// Logical model role used by callers instead of raw configs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LlmRole {
    /// Small, fast model with a tight timeout.
    Quick,
    /// Larger model used with retrieved context.
    Deep,
    /// Embedding model.
    Embedding,
}

/// Shared service that manages the three logical profiles.
pub struct LlmServiceProfiles {
    quick: LlmModelConfig,
    deep: LlmModelConfig,
    embedding: LlmModelConfig,

    openai: RwLock<HashMap<ClientKey, Arc<OpenAiService>>>,

    health: HealthService,
}

impl LlmServiceProfiles {
    /// Creates a new service from explicit profiles.
    ///
    /// `health_timeout_secs` bounds each health probe (default 10s).
    pub fn new(
        quick: LlmModelConfig,
        deep: LlmModelConfig,
        embedding: LlmModelConfig,
        health_timeout_secs: Option<u64>,
    ) -> Result<Self, AiLlmError> {
        Ok(Self {
            quick,
            deep,
            embedding,
            openai: RwLock::new(HashMap::new()),
            health: HealthService::new(health_timeout_secs)?,
        })
    }

    /// Builds all profiles from environment variables.
    pub fn from_env() -> Result<Self, AiLlmError> {
        Self::new(
            config_openai_quick()?,
            config_openai_deep()?,
            config_openai_embedding()?,
            None,
        )
    }

    /// Returns the config bound to `role`.
    pub fn profile(&self, role: LlmRole) -> &LlmModelConfig {
        match role {
            LlmRole::Quick => &self.quick,
            LlmRole::Deep => &self.deep,
            LlmRole::Embedding => &self.embedding,
        }
    }

    /// Generates text with the profile bound to `role`.
    ///
    /// # Errors
    /// Returns [`AiLlmError`] if the client cannot be built or the call fails.
    pub async fn generate(
        &self,
        role: LlmRole,
        prompt: &str,
        system: Option<&str>,
    ) -> Result<String, AiLlmError> {
        let cfg = self.profile(role);
        match cfg.provider {
            LlmProvider::OpenAI => {
                let cli = self.get_or_init_openai(cfg).await?;
                cli.generate(prompt, system).await
            }
        }
    }

    /// Computes embeddings using the **embedding** profile.
    pub async fn embed(&self, input: &str) -> Result<Vec<f32>, AiLlmError> {
        match self.embedding.provider {
            LlmProvider::OpenAI => {
                let cli = self.get_or_init_openai(&self.embedding).await?;
                cli.embeddings(input).await
            }
        }
    }

    /// Returns a health snapshot for all distinct profiles.
    pub async fn health_all(&self) -> Vec<HealthStatus> {
        let mut list: Vec<LlmModelConfig> = Vec::with_capacity(3);
        for cfg in [&self.quick, &self.deep, &self.embedding] {
            if !list.contains(cfg) {
                list.push(cfg.clone());
            }
        }
        self.health.check_many(&list).await
    }

    /* --------------------- Internals --------------------- */

    async fn get_or_init_openai(
        &self,
        cfg: &LlmModelConfig,
    ) -> Result<Arc<OpenAiService>, AiLlmError> {
        let key = ClientKey::from(cfg);
        if let Some(cli) = self.openai.read().await.get(&key).cloned() {
            return Ok(cli);
        }
        let mut w = self.openai.write().await;
        if let Some(cli) = w.get(&key).cloned() {
            return Ok(cli);
        }
        debug!(model = %cfg.model, "creating OpenAI client");
        let cli = Arc::new(OpenAiService::new(cfg.clone())?);
        w.insert(key, cli.clone());
        Ok(cli)
    }
}

/// Internal cache key to identify unique client configs.
#[derive(Clone, PartialEq, Eq, Hash)]
struct ClientKey {
    provider: LlmProvider,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    timeout: Option<u64>,
}

impl From<&LlmModelConfig> for ClientKey {
    fn from(cfg: &LlmModelConfig) -> Self {
        Self {
            provider: cfg.provider,
            endpoint: cfg.endpoint.clone(),
            model: cfg.model.clone(),
            api_key: cfg.api_key.clone(),
            timeout: cfg.timeout_secs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_handler::{ProviderError, ProviderErrorKind};

    fn cfg(model: &str, key: Option<&str>) -> LlmModelConfig {
        LlmModelConfig {
            provider: LlmProvider::OpenAI,
            model: model.into(),
            endpoint: "https://api.openai.com".into(),
            api_key: key.map(str::to_string),
            max_tokens: None,
            temperature: None,
            top_p: None,
            timeout_secs: Some(5),
        }
    }

    #[tokio::test]
    async fn missing_key_fails_lazily() {
        let svc = LlmServiceProfiles::new(
            cfg("gpt-3.5-turbo", None),
            cfg("gpt-4o-mini", None),
            cfg("text-embedding-3-small", None),
            Some(1),
        )
        .unwrap();

        let err = svc.generate(LlmRole::Quick, "hi", None).await.unwrap_err();
        assert!(matches!(
            err,
            AiLlmError::Provider(ProviderError {
                kind: ProviderErrorKind::MissingApiKey,
                ..
            })
        ));
        assert!(svc.embed("hi").await.is_err());
    }

    #[tokio::test]
    async fn clients_are_cached_per_config() {
        let svc = LlmServiceProfiles::new(
            cfg("a", Some("sk")),
            cfg("a", Some("sk")),
            cfg("e", Some("sk")),
            Some(1),
        )
        .unwrap();
        let first = svc.get_or_init_openai(svc.profile(LlmRole::Quick)).await.unwrap();
        let second = svc.get_or_init_openai(svc.profile(LlmRole::Deep)).await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(svc.openai.read().await.len(), 1);
    }
}

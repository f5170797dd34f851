//! Runtime configuration loaded from environment variables.

use std::path::{Path, PathBuf};

use crate::errors::KnowledgeError;

pub const DEFAULT_SPEC_URL: &str = "https://api.oneflow.com/static/papi/version_1.yml";
pub const SPEC_FILE_NAME: &str = "oneflow_api_spec.yml";
pub const KNOWLEDGE_BASE_FILE_NAME: &str = "knowledge_base.json";

/// Where the specification comes from and how long the derived cache lives.
#[derive(Clone, Debug)]
pub struct KnowledgeConfig {
    /// Remote OpenAPI document (YAML).
    pub spec_url: String,
    /// Directory holding the raw spec and the derived knowledge base.
    pub cache_dir: PathBuf,
    /// Maximum age of `knowledge_base.json` before it is rebuilt.
    pub refresh_hours: u64,
    /// Download timeout.
    pub fetch_timeout_secs: u64,
}

impl KnowledgeConfig {
    /// Defaults pointing at `cache_dir`.
    pub fn new_default(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            spec_url: DEFAULT_SPEC_URL.to_string(),
            cache_dir: cache_dir.into(),
            refresh_hours: 24,
            fetch_timeout_secs: 30,
        }
    }

    /// Reads `ONEFLOW_API_SPEC_URL`, `KNOWLEDGE_CACHE_DIR`, `CACHE_REFRESH_HOURS`
    /// and `SPEC_FETCH_TIMEOUT_SECS`, falling back to defaults.
    pub fn from_env() -> Self {
        Self {
            spec_url: env("ONEFLOW_API_SPEC_URL", DEFAULT_SPEC_URL),
            cache_dir: PathBuf::from(env("KNOWLEDGE_CACHE_DIR", "data")),
            refresh_hours: parse("CACHE_REFRESH_HOURS", 24),
            fetch_timeout_secs: parse("SPEC_FETCH_TIMEOUT_SECS", 30),
        }
    }

    pub fn validate(&self) -> Result<(), KnowledgeError> {
        if !(self.spec_url.starts_with("http://") || self.spec_url.starts_with("https://")) {
            return Err(KnowledgeError::Config(format!(
                "spec_url must be http(s): {}",
                self.spec_url
            )));
        }
        if self.cache_dir.as_os_str().is_empty() {
            return Err(KnowledgeError::Config("cache_dir is empty".into()));
        }
        Ok(())
    }

    pub fn spec_file(&self) -> PathBuf {
        self.cache_dir.join(SPEC_FILE_NAME)
    }

    pub fn knowledge_base_file(&self) -> PathBuf {
        self.cache_dir.join(KNOWLEDGE_BASE_FILE_NAME)
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }
}

fn env(k: &str, dflt: &str) -> String {
    std::env::var(k)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| dflt.to_string())
}

fn parse<T: std::str::FromStr>(k: &str, dflt: T) -> T {
    std::env::var(k)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(dflt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_live_under_cache_dir() {
        let cfg = KnowledgeConfig::new_default("/tmp/kb");
        assert_eq!(cfg.spec_file(), PathBuf::from("/tmp/kb/oneflow_api_spec.yml"));
        assert_eq!(
            cfg.knowledge_base_file(),
            PathBuf::from("/tmp/kb/knowledge_base.json")
        );
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn non_http_url_is_rejected() {
        let mut cfg = KnowledgeConfig::new_default("data");
        cfg.spec_url = "file:///spec.yml".into();
        assert!(cfg.validate().is_err());
    }
}

/// Result budget for the hybrid retrieval step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HybridConfig {
    /// Final number of search results handed to the model.
    pub result_limit: usize,
    /// Diversity cap: results kept per source type.
    pub max_per_source: usize,
}

impl Default for HybridConfig {
    fn default() -> Self {
        Self {
            result_limit: 8,
            max_per_source: 3,
        }
    }
}

impl HybridConfig {
    /// Reads `HYBRID_RESULT_LIMIT` and `HYBRID_MAX_PER_SOURCE`; zero or junk keeps the default.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Some(n) = env_usize("HYBRID_RESULT_LIMIT") {
            cfg.result_limit = n;
        }
        if let Some(n) = env_usize("HYBRID_MAX_PER_SOURCE") {
            cfg.max_per_source = n;
        }
        cfg
    }

    /// Per-collection `k` for the intent-targeted pass (half the budget over two collections).
    pub fn targeted_k(&self) -> usize {
        (self.result_limit / 2) / 2
    }

    /// Per-collection `k` for the blanket pass over all five collections.
    pub fn cross_k(&self, collections: usize) -> usize {
        ((self.result_limit / 2) / collections.max(1)).max(1)
    }
}

fn env_usize(name: &str) -> Option<usize> {
    std::env::var(name)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .filter(|n| *n > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_budget_splits() {
        let cfg = HybridConfig::default();
        assert_eq!(cfg.targeted_k(), 2);
        assert_eq!(cfg.cross_k(5), 1);

        let wide = HybridConfig {
            result_limit: 20,
            max_per_source: 3,
        };
        assert_eq!(wide.targeted_k(), 5);
        assert_eq!(wide.cross_k(5), 2);
    }
}

//! Configuration for parallel counting.

use serde::{Deserialize, Serialize};

/// Configuration for the parallel count engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParallelCountConfig {
    /// Thread pool size, one shard per thread at a time.
    /// If None, uses the number of CPU cores minus one.
    pub thread_pool_size: Option<usize>,

    /// Whether a run with failed shards still counts as usable.
    pub allow_partial_failures: bool,

    /// Whether to enable metrics collection.
    pub enable_metrics: bool,
}

impl Default for ParallelCountConfig {
    fn default() -> Self {
        Self {
            thread_pool_size: None,
            allow_partial_failures: false,
            enable_metrics: true,
        }
    }
}

impl ParallelCountConfig {
    pub fn with_thread_pool_size(mut self, size: usize) -> Self {
        self.thread_pool_size = Some(size);
        self
    }

    pub fn with_allow_partial_failures(mut self, allow: bool) -> Self {
        self.allow_partial_failures = allow;
        self
    }

    pub fn with_metrics(mut self, enable: bool) -> Self {
        self.enable_metrics = enable;
        self
    }

    pub(crate) fn effective_thread_pool_size(&self) -> usize {
        self.thread_pool_size
            .unwrap_or_else(|| num_cpus::get().saturating_sub(1))
            .max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let config = ParallelCountConfig::default();
        assert_eq!(config.thread_pool_size, None);
        assert!(!config.allow_partial_failures);
        assert!(config.enable_metrics);
        assert!(config.effective_thread_pool_size() >= 1);
    }

    #[test]
    fn test_zero_threads_becomes_one() {
        let config = ParallelCountConfig::default().with_thread_pool_size(0);
        assert_eq!(config.effective_thread_pool_size(), 1);
    }
}

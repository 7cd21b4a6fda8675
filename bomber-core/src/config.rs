//! Engine configuration

use serde::{Deserialize, Serialize};

/// Fixed policy bound on concurrent executors.
///
/// Deliberately independent of the request count: the pool never scales 1:1
/// with the task volume.
pub const DEFAULT_WORKERS: usize = 100;

/// Capacity of the plan and result queues.
pub const DEFAULT_QUEUE_DEPTH: usize = 100;

/// Per-request client timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Static engine configuration, set at node startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Number of concurrent executors in the worker pool
    pub workers: usize,
    /// Bounded capacity of the plan/result queues
    pub queue_depth: usize,
    /// Per-request timeout applied by the HTTP executor
    pub request_timeout_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            queue_depth: DEFAULT_QUEUE_DEPTH,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.workers, 100);
        assert_eq!(config.request_timeout_secs, 30);
    }
}

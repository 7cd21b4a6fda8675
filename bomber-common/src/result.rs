//! Attack summary contract

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Fixed message-bus topic for publishing attack summaries.
pub const RESULT_TOPIC: &str = "bomber.result";

/// Final per-attack summary returned to the caller and/or published to the
/// controller, depending on deployment wiring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BomberResult {
    /// Identity of the node that executed the attack
    pub bomber_id: String,

    /// Form/campaign this attack belonged to
    pub form_id: String,

    /// Requests that failed at the transport level or timed out
    pub timeout_count: u64,

    /// Response count per HTTP status code
    pub status_counts: HashMap<u16, u64>,

    /// Per-request elapsed nanoseconds, ordered by completion time
    pub latency_nanos: Vec<u64>,

    /// When the attack finished
    pub completed_at: chrono::DateTime<chrono::Utc>,
}

impl BomberResult {
    /// Total outcomes observed, successes plus timeouts.
    pub fn total_outcomes(&self) -> u64 {
        self.status_counts.values().sum::<u64>() + self.timeout_count
    }
}

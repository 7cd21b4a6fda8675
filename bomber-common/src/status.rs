//! Node health contract
//!
//! Every bomber node reports a single current status to the fleet controller
//! over the fixed status topic. Transitions are published synchronously on
//! change and reconciled periodically as a safety net.

use serde::{Deserialize, Serialize};

/// Fixed message-bus topic for node health reporting.
pub const STATUS_TOPIC: &str = "bomber.status";

/// Health state of a bomber node.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum BomberStatus {
    /// Idle and accepting tasks
    Up,
    /// Attack in progress
    Working,
    /// Terminal, shutting down
    Down,
}

impl std::fmt::Display for BomberStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BomberStatus::Up => write!(f, "UP"),
            BomberStatus::Working => write!(f, "WORKING"),
            BomberStatus::Down => write!(f, "DOWN"),
        }
    }
}

/// Status-change message published to [`STATUS_TOPIC`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatusChange {
    pub bomber_id: String,
    pub status: BomberStatus,
}

impl StatusChange {
    pub fn new(bomber_id: impl Into<String>, status: BomberStatus) -> Self {
        Self {
            bomber_id: bomber_id.into(),
            status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_format() {
        let change = StatusChange::new("bomber-1", BomberStatus::Working);
        let encoded = serde_json::to_string(&change).unwrap();
        assert_eq!(encoded, r#"{"bomber_id":"bomber-1","status":"WORKING"}"#);
    }

    #[test]
    fn test_status_display() {
        assert_eq!(BomberStatus::Down.to_string(), "DOWN");
    }
}

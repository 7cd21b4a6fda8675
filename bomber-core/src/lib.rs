//! Bomber Engine - Core attack orchestration for bomber worker nodes
//!
//! This crate provides the engine a bomber node runs: task materialization,
//! concurrent dispatch across a bounded worker pool, race-free outcome
//! aggregation with exact completion detection, and the node health state
//! machine published to the fleet controller.

pub mod config;
pub mod error;
pub mod generators;
pub mod node;
pub mod plan;
pub mod session;
pub mod status;
pub mod traits;

#[cfg(test)]
mod tests;

pub use config::{
    EngineConfig, DEFAULT_QUEUE_DEPTH, DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_WORKERS,
};
pub use error::{BomberError, EngineResult};
pub use generators::Generate;
pub use node::BomberNode;
pub use plan::{materialize, RequestPlan};
pub use session::{AttackSession, OutcomeRecord};
pub use status::{StatusController, RECONCILE_INTERVAL};
pub use traits::{HttpExecutor, StatusPublisher};

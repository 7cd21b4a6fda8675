//! Capability seams consumed by the engine
//!
//! HTTP transport and message-bus delivery are external collaborators: the
//! engine only sees these two traits. Production implementations live in the
//! agent crate; tests substitute stubs.

use crate::error::EngineResult;
use crate::plan::RequestPlan;
use async_trait::async_trait;

/// Executes one materialized request plan against the target.
///
/// One call per plan, no retries. A transport-level failure is surfaced as an
/// error and recorded by the caller as a timeout outcome.
#[async_trait]
pub trait HttpExecutor: Send + Sync {
    /// Perform the request and return the response status code.
    async fn execute(&self, plan: &RequestPlan) -> EngineResult<u16>;
}

/// Publishes a payload to a message-bus topic.
///
/// At-most-once delivery, no acknowledgement. Callers treat failures as
/// non-fatal and rely on periodic reconciliation.
#[async_trait]
pub trait StatusPublisher: Send + Sync {
    async fn publish(&self, topic: &str, payload: Vec<u8>) -> EngineResult<()>;
}

//! Bomber node lifecycle
//!
//! [`BomberNode`] is the long-lived identity object: it owns the engine
//! configuration, the HTTP executor and the status controller, and constructs
//! a fresh [`AttackSession`] for every task. Exactly one attack may be active
//! at a time; a second task arriving while one is running is rejected.

use crate::config::EngineConfig;
use crate::error::{BomberError, EngineResult};
use crate::plan;
use crate::session::AttackSession;
use crate::status::StatusController;
use crate::traits::{HttpExecutor, StatusPublisher};
use bomber_common::{BomberResult, BomberStatus, Task};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::info;

pub struct BomberNode {
    bomber_id: String,
    config: EngineConfig,
    executor: Arc<dyn HttpExecutor>,
    status: Arc<StatusController>,
    // Held for the duration of one attack; try_lock failure means busy
    busy: Mutex<()>,
    reconciler: Mutex<Option<JoinHandle<()>>>,
}

impl BomberNode {
    pub fn new(
        bomber_id: impl Into<String>,
        config: EngineConfig,
        executor: Arc<dyn HttpExecutor>,
        publisher: Arc<dyn StatusPublisher>,
    ) -> Self {
        let bomber_id = bomber_id.into();
        Self {
            status: Arc::new(StatusController::new(bomber_id.clone(), publisher)),
            bomber_id,
            config,
            executor,
            busy: Mutex::new(()),
            reconciler: Mutex::new(None),
        }
    }

    pub fn bomber_id(&self) -> &str {
        &self.bomber_id
    }

    pub fn status_controller(&self) -> &Arc<StatusController> {
        &self.status
    }

    pub async fn current_status(&self) -> BomberStatus {
        self.status.current().await
    }

    /// Announce the node to the fleet and start the status reconciler.
    pub async fn start(&self) {
        info!("Bomber node {} starting", self.bomber_id);
        self.status.announce().await;
        let handle = self.status.spawn_reconciler();
        *self.reconciler.lock().await = Some(handle);
    }

    /// Materialize and run one attack to completion.
    ///
    /// Fails fast with [`BomberError::AttackInProgress`] when another attack
    /// holds the node, and with [`BomberError::InvalidTask`] before any
    /// materialization for a malformed task.
    pub async fn execute_task(&self, task: &Task) -> EngineResult<BomberResult> {
        let _attack_guard = self
            .busy
            .try_lock()
            .map_err(|_| BomberError::AttackInProgress)?;

        let plans = plan::materialize(task)?;

        self.status.transition(BomberStatus::Working).await;
        let session = AttackSession::new(
            self.bomber_id.clone(),
            task.form_id.clone(),
            Arc::clone(&self.executor),
            self.config.clone(),
        );
        let result = session.run(plans).await;
        // A no-op after shutdown: Down is terminal
        self.status.transition(BomberStatus::Up).await;

        result
    }

    /// Graceful shutdown: flip to DOWN (terminal), publish the transition and
    /// stop the reconciliation loop. An attack already in flight is not
    /// aborted; its counters complete normally.
    pub async fn shutdown(&self) {
        info!("Bomber node {} shutting down", self.bomber_id);
        self.status.transition(BomberStatus::Down).await;
        self.status.stop();
        if let Some(handle) = self.reconciler.lock().await.take() {
            let _ = handle.await;
        }
    }
}

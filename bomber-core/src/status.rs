//! Node health state machine
//!
//! Holds the single current [`BomberStatus`] value for the node, publishes a
//! [`StatusChange`] synchronously on every transition and runs a periodic
//! reconciliation loop that republishes whenever the last successfully
//! published status has fallen behind the current one. Publishing is
//! best-effort and eventually consistent; failures are logged, never fatal.

use crate::error::EngineResult;
use crate::traits::StatusPublisher;
use bomber_common::{BomberStatus, StatusChange, STATUS_TOPIC};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// How often the reconciliation loop compares published vs current status.
pub const RECONCILE_INTERVAL: Duration = Duration::from_secs(5);

pub struct StatusController {
    bomber_id: String,
    publisher: Arc<dyn StatusPublisher>,
    current: Mutex<BomberStatus>,
    last_published: Mutex<Option<BomberStatus>>,
    reconcile_interval: Duration,
    shutdown_tx: watch::Sender<bool>,
}

impl StatusController {
    pub fn new(bomber_id: impl Into<String>, publisher: Arc<dyn StatusPublisher>) -> Self {
        let (shutdown_tx, _) = watch::channel(false);
        Self {
            bomber_id: bomber_id.into(),
            publisher,
            current: Mutex::new(BomberStatus::Up),
            last_published: Mutex::new(None),
            reconcile_interval: RECONCILE_INTERVAL,
            shutdown_tx,
        }
    }

    /// Override the reconciliation interval (tests use short intervals).
    pub fn with_reconcile_interval(mut self, interval: Duration) -> Self {
        self.reconcile_interval = interval;
        self
    }

    pub async fn current(&self) -> BomberStatus {
        *self.current.lock().await
    }

    /// Move to `status` and synchronously publish the change.
    ///
    /// Down is terminal: transitions away from it are ignored.
    pub async fn transition(&self, status: BomberStatus) {
        {
            let mut current = self.current.lock().await;
            if *current == BomberStatus::Down {
                warn!("Ignoring status transition to {} after shutdown", status);
                return;
            }
            if *current == status {
                return;
            }
            *current = status;
        }
        info!("Bomber status changed to {}", status);
        self.publish(status).await;
    }

    /// Publish the node's current status, e.g. the initial UP announcement.
    pub async fn announce(&self) {
        let status = self.current().await;
        self.publish(status).await;
    }

    async fn publish(&self, status: BomberStatus) {
        let change = StatusChange::new(&self.bomber_id, status);
        let payload = match serde_json::to_vec(&change) {
            Ok(payload) => payload,
            Err(e) => {
                error!("Failed to encode status change: {}", e);
                return;
            }
        };
        match self.publisher.publish(STATUS_TOPIC, payload).await {
            Ok(()) => {
                *self.last_published.lock().await = Some(status);
            }
            Err(e) => error!("Failed to publish status change: {}", e),
        }
    }

    /// Spawn the reconciliation loop. Runs until [`stop`](Self::stop) is
    /// called; republishes only when the published status has diverged from
    /// the current one.
    pub fn spawn_reconciler(self: &Arc<Self>) -> JoinHandle<()> {
        let controller = Arc::clone(self);
        let mut shutdown = controller.shutdown_tx.subscribe();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(controller.reconcile_interval);
            // interval fires immediately; skip the initial tick
            ticker.tick().await;
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let current = *controller.current.lock().await;
                        let published = *controller.last_published.lock().await;
                        if published != Some(current) {
                            info!("Reconciling status: republishing {}", current);
                            controller.publish(current).await;
                        }
                    }
                    _ = shutdown.changed() => {
                        info!("Status reconciler stopped");
                        return;
                    }
                }
            }
        })
    }

    /// Stop the reconciliation loop. The node calls this exactly once, on
    /// shutdown.
    pub fn stop(&self) {
        let _ = self.shutdown_tx.send(true);
    }
}

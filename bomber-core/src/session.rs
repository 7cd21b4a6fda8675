//! Per-attack execution session
//!
//! An [`AttackSession`] is constructed fresh for each task and discarded after
//! the summary is extracted, so no attack state can leak between runs. It owns
//! the whole fan-out/fan-in pipeline:
//!
//! - the dispatcher pushes all plans into a bounded queue in index order;
//! - a fixed pool of executors pulls from the queue, performs one request per
//!   plan and emits an outcome record;
//! - a single aggregator task consumes outcomes, updates counters under a lock
//!   scoped to the update, and signals completion after exactly one record per
//!   dispatched plan.

use crate::config::EngineConfig;
use crate::error::{BomberError, EngineResult};
use crate::plan::RequestPlan;
use crate::traits::HttpExecutor;
use bomber_common::BomberResult;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{mpsc, watch, Mutex};
use tracing::{debug, error, info};

/// Outcome of a single executed request plan.
///
/// Produced by exactly one executor and consumed by exactly one aggregation
/// step. Transport failures carry no status code.
#[derive(Debug, Clone)]
pub struct OutcomeRecord {
    pub status: Option<u16>,
    pub elapsed_nanos: u64,
    pub timed_out: bool,
}

impl OutcomeRecord {
    fn success(status: u16, elapsed_nanos: u64) -> Self {
        Self {
            status: Some(status),
            elapsed_nanos,
            timed_out: false,
        }
    }

    fn timeout() -> Self {
        Self {
            status: None,
            elapsed_nanos: 0,
            timed_out: true,
        }
    }
}

/// Counters for one attack, mutated only by the aggregator.
#[derive(Debug, Default)]
struct AttackState {
    status_counts: HashMap<u16, u64>,
    timeout_count: u64,
    latency_nanos: Vec<u64>,
    received: usize,
}

impl AttackState {
    /// Apply one outcome. Returns the number of records consumed so far.
    fn apply(&mut self, record: &OutcomeRecord) -> usize {
        self.received += 1;
        if record.timed_out {
            self.timeout_count += 1;
        } else if let Some(status) = record.status {
            *self.status_counts.entry(status).or_insert(0) += 1;
            self.latency_nanos.push(record.elapsed_nanos);
        }
        self.received
    }
}

/// One bounded attack run: dispatch, execute, aggregate, summarize.
pub struct AttackSession {
    bomber_id: String,
    form_id: String,
    executor: Arc<dyn HttpExecutor>,
    config: EngineConfig,
}

impl AttackSession {
    pub fn new(
        bomber_id: String,
        form_id: String,
        executor: Arc<dyn HttpExecutor>,
        config: EngineConfig,
    ) -> Self {
        Self {
            bomber_id,
            form_id,
            executor,
            config,
        }
    }

    /// Run the attack to completion and return the summary.
    ///
    /// Blocks the caller until the aggregator has observed exactly one outcome
    /// per dispatched plan.
    pub async fn run(self, plans: Vec<RequestPlan>) -> EngineResult<BomberResult> {
        let total = plans.len();
        if total == 0 {
            return Err(BomberError::execution("no request plans to dispatch"));
        }

        let queue_depth = self.config.queue_depth.max(1);
        let (plan_tx, plan_rx) = mpsc::channel::<RequestPlan>(queue_depth);
        let (outcome_tx, outcome_rx) = mpsc::channel::<OutcomeRecord>(queue_depth);
        let (done_tx, done_rx) = watch::channel(false);

        // Shared receiver turns the plan channel into a bounded MPMC queue.
        let plan_rx = Arc::new(Mutex::new(plan_rx));

        let workers = self.config.workers.max(1);
        let mut handles = Vec::with_capacity(workers);
        for _ in 0..workers {
            handles.push(spawn_executor(
                Arc::clone(&plan_rx),
                outcome_tx.clone(),
                Arc::clone(&self.executor),
                done_rx.clone(),
            ));
        }
        // Workers hold the only remaining outcome senders.
        drop(outcome_tx);

        let state = Arc::new(Mutex::new(AttackState::default()));
        let aggregator = spawn_aggregator(outcome_rx, Arc::clone(&state), done_tx, total);

        info!("Attack started: {} requests for form {}", total, self.form_id);

        // Dispatch every plan in index order, then close the queue. Already
        // dispatched plans run to completion regardless of what happens here.
        for plan in plans {
            if plan_tx.send(plan).await.is_err() {
                break;
            }
        }
        drop(plan_tx);

        // Block until the aggregator signals completion.
        let mut done = done_rx;
        while !*done.borrow() {
            if done.changed().await.is_err() {
                break;
            }
        }

        if let Err(e) = aggregator.await {
            error!("Aggregator task failed: {}", e);
        }
        for handle in handles {
            if let Err(e) = handle.await {
                error!("Executor task failed: {}", e);
            }
        }

        let state = state.lock().await;
        if state.received != total {
            return Err(BomberError::execution(format!(
                "attack ended after {} of {} outcomes",
                state.received, total
            )));
        }

        info!(
            "Attack completed: {} ok, {} timeouts",
            state.latency_nanos.len(),
            state.timeout_count
        );

        Ok(BomberResult {
            bomber_id: self.bomber_id,
            form_id: self.form_id,
            timeout_count: state.timeout_count,
            status_counts: state.status_counts.clone(),
            latency_nanos: state.latency_nanos.clone(),
            completed_at: chrono::Utc::now(),
        })
    }
}

/// One pool executor: pull a plan, perform the request, emit the outcome.
fn spawn_executor(
    plan_rx: Arc<Mutex<mpsc::Receiver<RequestPlan>>>,
    outcome_tx: mpsc::Sender<OutcomeRecord>,
    executor: Arc<dyn HttpExecutor>,
    mut done: watch::Receiver<bool>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            let plan = tokio::select! {
                plan = async { plan_rx.lock().await.recv().await } => match plan {
                    Some(plan) => plan,
                    None => break,
                },
                _ = done.changed() => break,
            };

            let started = Instant::now();
            let record = match executor.execute(&plan).await {
                Ok(status) => {
                    OutcomeRecord::success(status, started.elapsed().as_nanos() as u64)
                }
                Err(e) => {
                    error!("Request {} failed: {}", plan.index, e);
                    OutcomeRecord::timeout()
                }
            };

            if outcome_tx.send(record).await.is_err() {
                break;
            }
        }
    })
}

/// Single consumer of outcome records. Emits exactly one completion signal
/// once every dispatched plan has been accounted for.
fn spawn_aggregator(
    mut outcome_rx: mpsc::Receiver<OutcomeRecord>,
    state: Arc<Mutex<AttackState>>,
    done_tx: watch::Sender<bool>,
    total: usize,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(record) = outcome_rx.recv().await {
            debug!("Outcome received: {:?}", record);
            let received = {
                // Lock scoped to the counter update only
                let mut state = state.lock().await;
                state.apply(&record)
            };
            if received == total {
                let _ = done_tx.send(true);
                return;
            }
        }
    })
}

//! Scenario and property tests for the attack pipeline

use crate::config::EngineConfig;
use crate::error::{BomberError, EngineResult};
use crate::node::BomberNode;
use crate::plan::{self, RequestPlan};
use crate::session::AttackSession;
use crate::traits::{HttpExecutor, StatusPublisher};
use async_trait::async_trait;
use bomber_common::{BomberStatus, StatusChange, Task};
use proptest::prelude::*;
use rand::Rng;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// Executor stub: outcome per plan index, optional random completion jitter.
/// `None` simulates a transport failure.
struct ScriptedExecutor {
    outcomes: Vec<Option<u16>>,
    max_jitter_ms: u64,
}

impl ScriptedExecutor {
    fn all_ok(status: u16, count: usize) -> Arc<Self> {
        Arc::new(Self {
            outcomes: vec![Some(status); count],
            max_jitter_ms: 0,
        })
    }

    fn scripted(outcomes: Vec<Option<u16>>, max_jitter_ms: u64) -> Arc<Self> {
        Arc::new(Self {
            outcomes,
            max_jitter_ms,
        })
    }
}

#[async_trait]
impl HttpExecutor for ScriptedExecutor {
    async fn execute(&self, plan: &RequestPlan) -> EngineResult<u16> {
        if self.max_jitter_ms > 0 {
            let jitter = rand::thread_rng().gen_range(0..=self.max_jitter_ms);
            tokio::time::sleep(Duration::from_millis(jitter)).await;
        }
        match self.outcomes[plan.index % self.outcomes.len()] {
            Some(status) => Ok(status),
            None => Err(BomberError::execution("connection refused")),
        }
    }
}

/// Publisher stub recording the decoded status sequence.
struct RecordingPublisher {
    statuses: Mutex<Vec<BomberStatus>>,
}

impl RecordingPublisher {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            statuses: Mutex::new(Vec::new()),
        })
    }

    async fn statuses(&self) -> Vec<BomberStatus> {
        self.statuses.lock().await.clone()
    }
}

#[async_trait]
impl StatusPublisher for RecordingPublisher {
    async fn publish(&self, topic: &str, payload: Vec<u8>) -> EngineResult<()> {
        let change: StatusChange = serde_json::from_slice(&payload)
            .map_err(|e| BomberError::publish(topic, e.to_string()))?;
        self.statuses.lock().await.push(change.status);
        Ok(())
    }
}

fn test_task(rps: i64, duration_secs: i64) -> Task {
    Task {
        form_id: "form-test".to_string(),
        address: "http://target:8080/hit".to_string(),
        rps,
        duration_secs,
        headers: HashMap::new(),
        body_fields: vec![],
        query_params: vec![],
    }
}

fn test_node(executor: Arc<dyn HttpExecutor>, publisher: Arc<dyn StatusPublisher>) -> BomberNode {
    BomberNode::new("bomber-test", EngineConfig::default(), executor, publisher)
}

#[tokio::test]
async fn test_scenario_all_requests_succeed() {
    let publisher = RecordingPublisher::new();
    let node = test_node(ScriptedExecutor::all_ok(200, 10), publisher.clone());

    let result = node.execute_task(&test_task(10, 1)).await.unwrap();

    assert_eq!(result.timeout_count, 0);
    assert_eq!(result.status_counts.get(&200), Some(&10));
    assert_eq!(result.status_counts.len(), 1);
    assert_eq!(result.latency_nanos.len(), 10);
    assert_eq!(result.bomber_id, "bomber-test");
    assert_eq!(result.form_id, "form-test");
    assert_eq!(
        publisher.statuses().await,
        vec![BomberStatus::Working, BomberStatus::Up]
    );
}

#[tokio::test]
async fn test_scenario_partial_transport_failures() {
    // 3 of 10 requests fail at the transport level
    let mut outcomes = vec![Some(200u16); 10];
    outcomes[1] = None;
    outcomes[4] = None;
    outcomes[8] = None;
    let node = test_node(
        ScriptedExecutor::scripted(outcomes, 5),
        RecordingPublisher::new(),
    );

    let result = node.execute_task(&test_task(10, 1)).await.unwrap();

    assert_eq!(result.timeout_count, 3);
    assert_eq!(result.status_counts.values().sum::<u64>(), 7);
    assert_eq!(result.latency_nanos.len(), 7);
    assert_eq!(result.total_outcomes(), 10);
}

#[tokio::test]
async fn test_scenario_consecutive_attacks_share_no_state() {
    let node = test_node(ScriptedExecutor::all_ok(200, 10), RecordingPublisher::new());

    let first = node.execute_task(&test_task(10, 1)).await.unwrap();
    let second = node.execute_task(&test_task(10, 1)).await.unwrap();

    // The second attack starts from zeroed counters
    assert_eq!(first.total_outcomes(), 10);
    assert_eq!(second.total_outcomes(), 10);
    assert_eq!(second.status_counts.get(&200), Some(&10));
    assert_eq!(second.latency_nanos.len(), 10);
}

#[tokio::test]
async fn test_scenario_shutdown_mid_attack() {
    let publisher = RecordingPublisher::new();
    let executor = ScriptedExecutor::scripted(vec![Some(200); 10], 0);
    let executor = Arc::new(SlowExecutor {
        inner: executor,
        delay: Duration::from_millis(50),
    });
    let node = Arc::new(test_node(executor, publisher.clone()));
    node.start().await;

    let attack_node = Arc::clone(&node);
    let attack = tokio::spawn(async move { attack_node.execute_task(&test_task(10, 1)).await });

    // Let the attack get in flight, then shut the node down
    tokio::time::sleep(Duration::from_millis(10)).await;
    node.shutdown().await;

    let result = attack.await.unwrap().unwrap();

    // In-flight counters were not corrupted by the shutdown
    assert_eq!(result.total_outcomes(), 10);
    assert_eq!(result.status_counts.get(&200), Some(&10));
    // DOWN was published and is terminal: no trailing UP
    assert_eq!(node.current_status().await, BomberStatus::Down);
    assert_eq!(
        publisher.statuses().await,
        vec![BomberStatus::Up, BomberStatus::Working, BomberStatus::Down]
    );
}

#[tokio::test]
async fn test_second_attack_rejected_while_busy() {
    let executor = Arc::new(SlowExecutor {
        inner: ScriptedExecutor::all_ok(200, 10),
        delay: Duration::from_millis(100),
    });
    let node = Arc::new(test_node(executor, RecordingPublisher::new()));

    let attack_node = Arc::clone(&node);
    let attack = tokio::spawn(async move { attack_node.execute_task(&test_task(10, 1)).await });

    tokio::time::sleep(Duration::from_millis(20)).await;
    let rejected = node.execute_task(&test_task(10, 1)).await;
    assert!(matches!(rejected, Err(BomberError::AttackInProgress)));

    // The running attack is unaffected by the rejection
    let result = attack.await.unwrap().unwrap();
    assert_eq!(result.total_outcomes(), 10);
}

#[tokio::test]
async fn test_malformed_task_fails_before_any_transition() {
    let publisher = RecordingPublisher::new();
    let node = test_node(ScriptedExecutor::all_ok(200, 1), publisher.clone());

    let mut task = test_task(10, 1);
    task.address = String::new();
    assert!(node.execute_task(&task).await.is_err());

    task = test_task(0, 1);
    assert!(node.execute_task(&task).await.is_err());

    // Fail-fast: no WORKING transition was ever published
    assert!(publisher.statuses().await.is_empty());
}

/// Wraps an executor with a fixed delay so attacks stay observable in flight.
struct SlowExecutor {
    inner: Arc<ScriptedExecutor>,
    delay: Duration,
}

#[async_trait]
impl HttpExecutor for SlowExecutor {
    async fn execute(&self, plan: &RequestPlan) -> EngineResult<u16> {
        tokio::time::sleep(self.delay).await;
        self.inner.execute(plan).await
    }
}

/// Expected counters for a fixed outcome multiset.
fn expected_counts(outcomes: &[Option<u16>]) -> (HashMap<u16, u64>, u64) {
    let mut counts = HashMap::new();
    let mut timeouts = 0u64;
    for outcome in outcomes {
        match outcome {
            Some(status) => *counts.entry(*status).or_insert(0) += 1,
            None => timeouts += 1,
        }
    }
    (counts, timeouts)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Aggregation is interleaving-independent: any concurrent arrival order
    /// of a fixed outcome multiset yields identical final counters, and the
    /// sum invariant holds exactly.
    #[test]
    fn prop_aggregation_is_order_insensitive(
        outcomes in prop::collection::vec(
            prop::option::weighted(0.8, 100u16..600),
            1..40,
        )
    ) {
        let (expected_counts, expected_timeouts) = expected_counts(&outcomes);
        let total = outcomes.len();

        let result = tokio_test::block_on(async {
            let plans = plan::materialize(&test_task(total as i64, 1)).unwrap();
            let session = AttackSession::new(
                "bomber-test".to_string(),
                "form-test".to_string(),
                ScriptedExecutor::scripted(outcomes, 3),
                EngineConfig {
                    workers: 8,
                    ..EngineConfig::default()
                },
            );
            session.run(plans).await.unwrap()
        });

        prop_assert_eq!(result.status_counts.clone(), expected_counts);
        prop_assert_eq!(result.timeout_count, expected_timeouts);
        prop_assert_eq!(result.total_outcomes(), total as u64);
    }
}

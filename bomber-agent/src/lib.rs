//! Bomber Agent Binary
//!
//! Standalone worker node executable. Wires the engine to its production
//! collaborators: a reqwest-backed HTTP executor and a controller-backed
//! publisher for health and result reporting. Task delivery over the fleet
//! bus is handled upstream; for standalone runs a task file can be supplied
//! on the command line.

use bomber_common::{BomberResult, Task, RESULT_TOPIC};
use bomber_core::{BomberNode, EngineConfig, StatusPublisher};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

pub mod http;
pub mod publisher;

use http::ReqwestExecutor;
use publisher::ControllerPublisher;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Base URL of the fleet controller
    #[arg(long, default_value = "http://127.0.0.1:8825")]
    pub controller_url: String,

    /// Friendly name for this bomber (e.g., "bomber-eu-1")
    #[arg(long)]
    pub name: Option<String>,

    /// Path to a task JSON file to execute on startup
    #[arg(long)]
    pub task: Option<PathBuf>,

    /// Number of concurrent executors in the worker pool
    #[arg(long, default_value_t = bomber_core::DEFAULT_WORKERS)]
    pub workers: usize,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = bomber_core::DEFAULT_REQUEST_TIMEOUT_SECS)]
    pub timeout_secs: u64,
}

pub async fn run_agent(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    // Logging should be initialized by the caller (main or test)

    let bomber_id = args.name.clone().unwrap_or_else(generate_bomber_id);
    tracing::info!("Starting Bomber Agent...");
    tracing::info!("  Identity:   {}", bomber_id);
    tracing::info!("  Controller: {}", args.controller_url);
    tracing::info!("  Workers:    {}", args.workers);

    let config = EngineConfig {
        workers: args.workers,
        request_timeout_secs: args.timeout_secs,
        ..EngineConfig::default()
    };

    let executor = Arc::new(ReqwestExecutor::new(Duration::from_secs(
        config.request_timeout_secs,
    ))?);
    let publisher = Arc::new(ControllerPublisher::new(args.controller_url.clone())?);

    let node = Arc::new(BomberNode::new(
        bomber_id,
        config,
        executor,
        publisher.clone(),
    ));
    node.start().await;

    // Standalone mode: execute the supplied task, report the summary, then
    // keep serving until a shutdown signal arrives.
    let attack = args.task.clone().map(|path| {
        let node = Arc::clone(&node);
        let publisher = Arc::clone(&publisher);
        tokio::spawn(async move {
            if let Err(e) = run_task_file(&node, publisher.as_ref(), &path).await {
                tracing::error!("Task execution failed: {}", e);
            }
        })
    });

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown signal received, stopping bomber node...");
    node.shutdown().await;

    // Shutdown never aborts an attack already in flight
    if let Some(handle) = attack {
        let _ = handle.await;
    }

    Ok(())
}

async fn run_task_file(
    node: &BomberNode,
    publisher: &ControllerPublisher,
    path: &PathBuf,
) -> Result<(), Box<dyn std::error::Error>> {
    let raw = tokio::fs::read_to_string(path).await?;
    let task: Task = serde_json::from_str(&raw)?;

    let result = node.execute_task(&task).await?;
    report_result(publisher, &result).await;
    Ok(())
}

async fn report_result(publisher: &ControllerPublisher, result: &BomberResult) {
    tracing::info!(
        "Attack summary for form {}: {} outcomes, {} timeouts",
        result.form_id,
        result.total_outcomes(),
        result.timeout_count
    );
    let payload = match serde_json::to_vec(result) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::error!("Failed to encode attack summary: {}", e);
            return;
        }
    };
    if let Err(e) = publisher.publish(RESULT_TOPIC, payload).await {
        tracing::error!("Failed to publish attack summary: {}", e);
    }
}

fn generate_bomber_id() -> String {
    let id = Uuid::new_v4().to_string();
    let host = hostname::get()
        .map(|h| h.to_string_lossy().to_string())
        .unwrap_or_default();
    if host.is_empty() {
        format!("bomber-{}", &id[..8])
    } else {
        format!("{}-{}", host, &id[..8])
    }
}

//! Bomber Agent Binary Entry Point

use bomber_agent::{run_agent, Args};
use clap::Parser;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let args = Args::parse();

    if let Err(e) = run_agent(args).await {
        tracing::error!("Bomber node failed: {}", e);
        return Err(e);
    }

    Ok(())
}

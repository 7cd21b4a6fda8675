//! Controller-backed publisher
//!
//! Thin stand-in for the fleet message bus: each topic maps to a controller
//! endpoint and a publish is a single POST. At-most-once, no acknowledgement;
//! callers rely on the status reconciler to heal missed publishes.

use async_trait::async_trait;
use bomber_core::{BomberError, EngineResult, StatusPublisher};

pub struct ControllerPublisher {
    base_url: String,
    client: reqwest::Client,
}

impl ControllerPublisher {
    pub fn new(base_url: impl Into<String>) -> EngineResult<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(BomberError::execution("controller URL is empty"));
        }
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| BomberError::execution(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { base_url, client })
    }
}

#[async_trait]
impl StatusPublisher for ControllerPublisher {
    async fn publish(&self, topic: &str, payload: Vec<u8>) -> EngineResult<()> {
        let url = format!("{}/topics/{}", self.base_url, topic);
        let response = self
            .client
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(payload)
            .send()
            .await
            .map_err(|e| BomberError::publish(topic, e.to_string()))?;

        if !response.status().is_success() {
            return Err(BomberError::publish(
                topic,
                format!("controller returned {}", response.status()),
            ));
        }
        Ok(())
    }
}

//! Reqwest-backed HTTP executor
//!
//! One shared pooled client for the whole node: connection reuse bounds
//! socket and buffer growth under high request volume, and the client-level
//! timeout caps every request.

use async_trait::async_trait;
use bomber_core::{BomberError, EngineResult, HttpExecutor, RequestPlan};
use std::time::Duration;

/// Idle connections kept per target host.
const MAX_IDLE_CONNECTIONS: usize = 20;

pub struct ReqwestExecutor {
    client: reqwest::Client,
}

impl ReqwestExecutor {
    pub fn new(timeout: Duration) -> EngineResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(MAX_IDLE_CONNECTIONS)
            .build()
            .map_err(|e| BomberError::execution(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpExecutor for ReqwestExecutor {
    async fn execute(&self, plan: &RequestPlan) -> EngineResult<u16> {
        // Plans with a body are form submissions, the rest plain fetches
        let method = if plan.body.is_empty() {
            reqwest::Method::GET
        } else {
            reqwest::Method::POST
        };

        let mut builder = self.client.request(method, &plan.url);
        for (key, value) in &plan.headers {
            builder = builder.header(key, value);
        }
        if !plan.body.is_empty() {
            builder = builder.body(plan.body.clone());
        }

        let response = builder
            .send()
            .await
            .map_err(|e| BomberError::execution(e.to_string()))?;
        Ok(response.status().as_u16())
    }
}

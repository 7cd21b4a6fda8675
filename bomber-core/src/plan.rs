//! Task materialization
//!
//! Turns a [`Task`] into the full ordered set of ready-to-send request plans.
//! All value generation happens here, up front; no network I/O is performed.

use crate::error::{BomberError, EngineResult};
use crate::generators::Generate;
use bomber_common::{FieldSpec, Task};
use std::collections::HashMap;
use tracing::{debug, error};

/// A fully materialized, ready-to-send request.
///
/// Immutable once built; owned by the dispatcher until an executor consumes it.
#[derive(Debug, Clone)]
pub struct RequestPlan {
    /// Position in dispatch order, kept for traceability only
    pub index: usize,
    /// Target address with the resolved query string appended
    pub url: String,
    pub headers: HashMap<String, String>,
    /// JSON-encoded body, empty when the task declares no body fields
    pub body: Vec<u8>,
}

/// Materialize a task into `rps * duration_secs` request plans.
///
/// Fails fast on a non-positive request count or a missing address. A build
/// failure at a single index is logged and that index skipped; the attack
/// proceeds with the reduced plan set.
pub fn materialize(task: &Task) -> EngineResult<Vec<RequestPlan>> {
    let count = task.request_count();
    if count <= 0 {
        return Err(BomberError::invalid_task(format!(
            "rps ({}) * duration_secs ({}) must be positive",
            task.rps, task.duration_secs
        )));
    }
    if task.address.trim().is_empty() {
        return Err(BomberError::invalid_task("target address is missing"));
    }

    let count = count as usize;
    let mut plans = Vec::with_capacity(count);
    for index in 0..count {
        match build_plan(task, index) {
            Ok(plan) => plans.push(plan),
            Err(e) => error!("Skipping request plan {}: {}", index, e),
        }
    }

    debug!(
        "Materialized {} of {} request plans for form {}",
        plans.len(),
        count,
        task.form_id
    );
    Ok(plans)
}

fn build_plan(task: &Task, index: usize) -> EngineResult<RequestPlan> {
    let body = build_body(&task.body_fields, index)?;
    let query = build_query(&task.query_params, index)?;

    let url = if query.is_empty() {
        task.address.clone()
    } else {
        format!("{}?{}", task.address, query)
    };

    Ok(RequestPlan {
        index,
        url,
        headers: task.headers.clone(),
        body,
    })
}

/// Assemble the JSON body: generated fields are resolved per plan, literal
/// fields pass through verbatim. No body fields means no body.
fn build_body(fields: &[FieldSpec], index: usize) -> EngineResult<Vec<u8>> {
    if fields.is_empty() {
        return Ok(Vec::new());
    }

    let mut body = serde_json::Map::with_capacity(fields.len());
    for field in fields {
        let value = match &field.generator {
            Some(spec) => spec
                .generate_json()
                .map_err(|e| BomberError::request_build(index, e.to_string()))?,
            None => field.value.clone(),
        };
        body.insert(field.name.clone(), value);
    }

    serde_json::to_vec(&serde_json::Value::Object(body))
        .map_err(|e| BomberError::request_build(index, format!("body encoding failed: {}", e)))
}

/// Assemble the query string (`name=value` pairs joined with `&`, no leading
/// `?`). Literal values are rendered bare for strings and via their JSON
/// encoding otherwise.
fn build_query(params: &[FieldSpec], index: usize) -> EngineResult<String> {
    let mut pairs = Vec::with_capacity(params.len());
    for param in params {
        let value = match &param.generator {
            Some(spec) => spec
                .generate()
                .map_err(|e| BomberError::request_build(index, e.to_string()))?,
            None => match &param.value {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            },
        };
        pairs.push(format!("{}={}", param.name, value));
    }
    Ok(pairs.join("&"))
}

//! Inbound task contract
//!
//! A `Task` is delivered by the fleet controller and describes one bounded
//! attack: target address, request volume (`rps * duration_secs` requests in
//! total) and the schema used to synthesize each request's body and query
//! string. Parsing and validation of the transport envelope happen upstream;
//! this crate only carries the decoded shape.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One attack assignment for a bomber node.
///
/// Immutable for the lifetime of the attack it describes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Identifier of the form/campaign this attack belongs to
    pub form_id: String,

    /// Target address, scheme included (e.g. "http://10.0.0.5:8080/login")
    pub address: String,

    /// Requests per second the controller asked for
    pub rps: i64,

    /// Attack duration in seconds
    pub duration_secs: i64,

    /// Headers applied to every request, overwriting same-named entries
    #[serde(default)]
    pub headers: HashMap<String, String>,

    /// JSON body fields, literal or generator-backed
    #[serde(default)]
    pub body_fields: Vec<FieldSpec>,

    /// URL query parameters, literal or generator-backed
    #[serde(default)]
    pub query_params: Vec<FieldSpec>,
}

impl Task {
    /// Total number of requests this task materializes into.
    pub fn request_count(&self) -> i64 {
        self.rps * self.duration_secs
    }
}

/// A single body field or query parameter.
///
/// When `generator` is set the value is synthesized at materialization time;
/// otherwise `value` is used verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,

    /// Literal value, ignored when a generator is configured
    #[serde(default)]
    pub value: serde_json::Value,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generator: Option<GeneratorSpec>,
}

impl FieldSpec {
    /// Create a literal field.
    pub fn literal(name: impl Into<String>, value: serde_json::Value) -> Self {
        Self {
            name: name.into(),
            value,
            generator: None,
        }
    }

    /// Create a generator-backed field.
    pub fn generated(name: impl Into<String>, generator: GeneratorSpec) -> Self {
        Self {
            name: name.into(),
            value: serde_json::Value::Null,
            generator: Some(generator),
        }
    }
}

/// Synthetic value generator configuration, dispatched by kind.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GeneratorSpec {
    /// Random lowercase word with a length in `min_len..=max_len`
    Word { min_len: usize, max_len: usize },

    /// Random integer in `min..=max`
    Digit { min: i64, max: i64 },

    /// String sampled from a regular expression pattern
    Regex { pattern: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_count() {
        let task = Task {
            form_id: "form-1".to_string(),
            address: "http://localhost:8080".to_string(),
            rps: 10,
            duration_secs: 3,
            headers: HashMap::new(),
            body_fields: vec![],
            query_params: vec![],
        };

        assert_eq!(task.request_count(), 30);
    }

    #[test]
    fn test_generator_spec_roundtrip() {
        let spec = GeneratorSpec::Digit { min: 1, max: 100 };
        let encoded = serde_json::to_string(&spec).unwrap();
        assert!(encoded.contains("\"kind\":\"digit\""));

        let decoded: GeneratorSpec = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, spec);
    }

    #[test]
    fn test_task_deserializes_with_defaults() {
        let raw = r#"{
            "form_id": "f",
            "address": "http://t",
            "rps": 5,
            "duration_secs": 2
        }"#;

        let task: Task = serde_json::from_str(raw).unwrap();
        assert!(task.headers.is_empty());
        assert!(task.body_fields.is_empty());
        assert!(task.query_params.is_empty());
    }
}

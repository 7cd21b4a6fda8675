//! Common Wire Contracts for Bomber Nodes
//!
//! This crate defines the messages exchanged between bomber worker nodes and
//! the fleet controller:
//! - Task: the inbound attack assignment
//! - StatusChange: node health reporting on the status topic
//! - BomberResult: the final attack summary

pub mod result;
pub mod status;
pub mod task;

pub use result::{BomberResult, RESULT_TOPIC};
pub use status::{BomberStatus, StatusChange, STATUS_TOPIC};
pub use task::{FieldSpec, GeneratorSpec, Task};

//! Campaign lifecycle orchestrator.
//!
//! Owns the state machine around campaign generation: submission,
//! dispatch-by-type, webhook reconciliation, and explicit retry. The
//! store (`promogen-db`) is the single source of truth; every
//! read-modify-write of a campaign happens under a per-campaign-id lock.

pub mod locks;
pub mod orchestrator;

pub use orchestrator::{Orchestrator, OrchestratorError, SubmitRequest};

//! Domain types and campaign lifecycle rules for the promogen platform.
//!
//! This crate is pure domain logic: no I/O, no database, no HTTP. The
//! state machine and validation rules here are exercised by the
//! orchestrator and the API layer.

pub mod campaign;
pub mod error;
pub mod types;

use std::sync::Arc;

use promogen_orchestrator::Orchestrator;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool (read paths query the store directly;
    /// all lifecycle mutation goes through the orchestrator).
    pub pool: promogen_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Campaign lifecycle orchestrator.
    pub orchestrator: Arc<Orchestrator>,
}

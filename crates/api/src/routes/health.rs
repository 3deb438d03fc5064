use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    db_healthy: bool,
    ai_service: bool,
}

/// GET /health
///
/// Reports service liveness plus reachability of the database and the
/// AI generation provider. Always returns 200; degraded dependencies
/// show up as `false` fields rather than an error status.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = promogen_db::health_check(&state.pool).await.is_ok();
    let ai_service = state.orchestrator.provider_healthy().await;

    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        ai_service,
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

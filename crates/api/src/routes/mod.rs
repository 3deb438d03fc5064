pub mod campaigns;
pub mod health;
pub mod webhook;

use axum::Router;

use crate::state::AppState;

/// All `/api/v1` routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(campaigns::router())
        .merge(webhook::router())
}

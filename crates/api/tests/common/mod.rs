#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use promogen_api::config::ServerConfig;
use promogen_api::router::build_app_router;
use promogen_api::state::AppState;
use promogen_core::campaign::GenerationParams;
use promogen_core::types::CampaignId;
use promogen_orchestrator::Orchestrator;
use promogen_provider::{GenerationProvider, ProviderError};
use sqlx::PgPool;
use tower::ServiceExt;

/// In-memory stand-in for the AI generation service.
///
/// Text calls return the configured response; image calls are recorded
/// (so tests can assert the correlation token) and accepted or rejected
/// wholesale.
pub struct FakeProvider {
    pub text_response: Result<String, String>,
    pub accept_images: bool,
    pub image_submissions: Mutex<Vec<CampaignId>>,
}

impl FakeProvider {
    pub fn text_ok(text: &str) -> Arc<Self> {
        Arc::new(Self {
            text_response: Ok(text.to_string()),
            accept_images: true,
            image_submissions: Mutex::new(Vec::new()),
        })
    }

    pub fn text_err(message: &str) -> Arc<Self> {
        Arc::new(Self {
            text_response: Err(message.to_string()),
            accept_images: true,
            image_submissions: Mutex::new(Vec::new()),
        })
    }

    pub fn rejecting_images(message: &str) -> Arc<Self> {
        Arc::new(Self {
            text_response: Err(message.to_string()),
            accept_images: false,
            image_submissions: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl GenerationProvider for FakeProvider {
    async fn generate_text(&self, _prompt: &str) -> Result<String, ProviderError> {
        self.text_response.clone().map_err(|message| ProviderError::Api {
            status: 200,
            message,
        })
    }

    async fn submit_image(
        &self,
        _prompt: &str,
        _params: &GenerationParams,
        track_id: CampaignId,
    ) -> Result<(), ProviderError> {
        self.image_submissions.lock().unwrap().push(track_id);
        if self.accept_images {
            Ok(())
        } else {
            Err(ProviderError::Api {
                status: 200,
                message: "Submission rejected".to_string(),
            })
        }
    }

    async fn health_check(&self) -> bool {
        true
    }
}

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:4200".to_string()],
        request_timeout_secs: 30,
        ai_service_url: "http://localhost:8000".to_string(),
        ai_service_timeout_secs: 30,
        webhook_base_url: "http://localhost:3000".to_string(),
    }
}

/// Build the full application router with the given pool and provider.
///
/// Uses [`build_app_router`] so integration tests exercise the same
/// middleware stack (CORS, request ID, timeout, tracing, panic recovery)
/// that production uses.
pub fn build_test_app(pool: PgPool, provider: Arc<dyn GenerationProvider>) -> Router {
    let config = test_config();
    let orchestrator = Arc::new(Orchestrator::new(pool.clone(), provider));

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        orchestrator,
    };

    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send_json(app, Method::POST, uri, body).await
}

pub async fn patch_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send_json(app, Method::PATCH, uri, body).await
}

async fn send_json(
    app: Router,
    method: Method,
    uri: &str,
    body: serde_json::Value,
) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Create a campaign through the API and return its JSON record.
pub async fn create_campaign(app: Router, body: serde_json::Value) -> serde_json::Value {
    let response = post_json(app, "/api/v1/campaigns", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

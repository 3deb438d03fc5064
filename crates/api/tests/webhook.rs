//! Integration tests for the image generation webhook receiver.

mod common;

use axum::http::StatusCode;
use common::{body_json, create_campaign, get, post_json, FakeProvider};
use serde_json::json;
use sqlx::PgPool;

async fn create_image_campaign(app: axum::Router) -> String {
    let campaign = create_campaign(
        app,
        json!({"prompt": "A sunny beach", "type": "image", "width": 512}),
    )
    .await;
    assert_eq!(campaign["status"], "processing");
    campaign["id"].as_str().unwrap().to_string()
}

// ---------------------------------------------------------------------------
// Success callbacks
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn success_callback_completes_campaign(pool: PgPool) {
    let app = common::build_test_app(pool, FakeProvider::text_ok("unused"));
    let id = create_image_campaign(app.clone()).await;

    let response = post_json(
        app.clone(),
        "/api/v1/campaigns/webhook",
        json!({
            "track_id": id,
            "status": "success",
            "output": ["https://cdn.example.com/a.png", "https://cdn.example.com/b.png"]
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "completed");

    // The first output reference becomes the stored content URL.
    let response = get(app, &format!("/api/v1/campaigns/{id}")).await;
    let json = body_json(response).await;
    assert_eq!(
        json["data"]["result"]["content_url"],
        "https://cdn.example.com/a.png"
    );
    assert!(json["data"]["result"]["content_text"].is_null());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn duplicate_success_callback_is_acknowledged(pool: PgPool) {
    let app = common::build_test_app(pool, FakeProvider::text_ok("unused"));
    let id = create_image_campaign(app.clone()).await;

    let payload = json!({
        "track_id": id,
        "status": "success",
        "output": ["https://cdn.example.com/a.png"]
    });

    let first = post_json(app.clone(), "/api/v1/campaigns/webhook", payload.clone()).await;
    assert_eq!(first.status(), StatusCode::OK);

    // Webhook delivery is at-least-once; the replay must not error or
    // overwrite anything.
    let second = post_json(app, "/api/v1/campaigns/webhook", payload).await;
    assert_eq!(second.status(), StatusCode::OK);
    let json = body_json(second).await;
    assert_eq!(json["data"]["status"], "completed");
}

// ---------------------------------------------------------------------------
// Error callbacks
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn error_callback_fails_campaign_with_reason(pool: PgPool) {
    let app = common::build_test_app(pool, FakeProvider::text_ok("unused"));
    let id = create_image_campaign(app.clone()).await;

    let response = post_json(
        app,
        "/api/v1/campaigns/webhook",
        json!({
            "track_id": id,
            "status": "error",
            "message": "NSFW content detected"
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "failed");
    assert_eq!(json["data"]["error_message"], "NSFW content detected");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn error_callback_without_message_uses_default(pool: PgPool) {
    let app = common::build_test_app(pool, FakeProvider::text_ok("unused"));
    let id = create_image_campaign(app.clone()).await;

    let response = post_json(
        app,
        "/api/v1/campaigns/webhook",
        json!({"track_id": id, "status": "error"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "failed");
    assert_eq!(json["data"]["error_message"], "Generation failed");
}

// ---------------------------------------------------------------------------
// Malformed callbacks
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn unknown_track_id_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool, FakeProvider::text_ok("unused"));

    let response = post_json(
        app,
        "/api/v1/campaigns/webhook",
        json!({
            "track_id": "00000000-0000-0000-0000-000000000000",
            "status": "error",
            "message": "boom"
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn malformed_track_id_returns_400(pool: PgPool) {
    let app = common::build_test_app(pool, FakeProvider::text_ok("unused"));

    let response = post_json(
        app,
        "/api/v1/campaigns/webhook",
        json!({"track_id": "not-a-uuid", "status": "error"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn success_without_output_returns_400(pool: PgPool) {
    let app = common::build_test_app(pool, FakeProvider::text_ok("unused"));
    let id = create_image_campaign(app.clone()).await;

    let response = post_json(
        app.clone(),
        "/api/v1/campaigns/webhook",
        json!({"track_id": id, "status": "success", "output": []}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // The campaign is untouched by the rejected callback.
    let response = get(app, &format!("/api/v1/campaigns/{id}")).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "processing");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn unknown_status_returns_400(pool: PgPool) {
    let app = common::build_test_app(pool, FakeProvider::text_ok("unused"));

    let response = post_json(
        app,
        "/api/v1/campaigns/webhook",
        json!({
            "track_id": "11111111-1111-1111-1111-111111111111",
            "status": "maybe"
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

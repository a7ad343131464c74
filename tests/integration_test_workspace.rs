mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use common::TestApp;
use serde_json::{json, Value};
use tower::ServiceExt;

async fn parse_body(response: axum::response::Response) -> Value {
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    if bytes.is_empty() {
        panic!("Response body is empty. Status: {}", status);
    }
    match serde_json::from_slice(&bytes) {
        Ok(v) => v,
        Err(e) => panic!("Failed to parse JSON: {:?}. Status: {}. Body: {:?}", e, status, String::from_utf8_lossy(&bytes))
    }
}

#[tokio::test]
async fn test_bootstrap_is_idempotent() {
    let app = TestApp::new().await;
    app.identity.register("tok-owner", "jane@acme.io", "USER");

    let first = app.router.clone().oneshot(
        Request::builder().method("POST").uri("/api/v1/workspaces/bootstrap")
            .header(header::AUTHORIZATION, "Bearer tok-owner")
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(first.status(), StatusCode::OK);
    let ws1 = parse_body(first).await;
    assert_eq!(ws1["slug"], "jane");

    // Default settings document is seeded.
    assert!(ws1["settings_json"].as_str().unwrap().contains("branding"));

    let second = app.router.clone().oneshot(
        Request::builder().method("POST").uri("/api/v1/workspaces/bootstrap")
            .header(header::AUTHORIZATION, "Bearer tok-owner")
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    let ws2 = parse_body(second).await;
    assert_eq!(ws1["id"], ws2["id"]);

    // Creator is listed as OWNER member.
    let ws_id = ws1["id"].as_str().unwrap();
    let members_res = app.router.clone().oneshot(
        Request::builder().method("GET").uri(format!("/api/v1/{}/members", ws_id))
            .header(header::AUTHORIZATION, "Bearer tok-owner")
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    let members = parse_body(members_res).await;
    assert_eq!(members.as_array().unwrap().len(), 1);
    assert_eq!(members[0]["role"], "OWNER");
}

#[tokio::test]
async fn test_bootstrap_deduplicates_slug() {
    let app = TestApp::new().await;
    app.identity.register("tok-a", "sales@first.io", "USER");
    app.identity.register("tok-b", "sales@second.io", "USER");

    let first = parse_body(app.router.clone().oneshot(
        Request::builder().method("POST").uri("/api/v1/workspaces/bootstrap")
            .header(header::AUTHORIZATION, "Bearer tok-a")
            .body(Body::empty()).unwrap()
    ).await.unwrap()).await;
    assert_eq!(first["slug"], "sales");

    let second = parse_body(app.router.clone().oneshot(
        Request::builder().method("POST").uri("/api/v1/workspaces/bootstrap")
            .header(header::AUTHORIZATION, "Bearer tok-b")
            .body(Body::empty()).unwrap()
    ).await.unwrap()).await;

    let slug = second["slug"].as_str().unwrap();
    assert_ne!(slug, "sales");
    assert!(slug.starts_with("sales-"));
}

#[tokio::test]
async fn test_update_workspace_and_slug_conflict() {
    let app = TestApp::new().await;
    let ws_a = app.bootstrap_workspace("tok-a", "alpha@acme.io").await;
    let _ws_b = app.bootstrap_workspace("tok-b", "beta@acme.io").await;

    let update = app.router.clone().oneshot(
        Request::builder().method("PUT").uri(format!("/api/v1/workspaces/{}", ws_a))
            .header(header::AUTHORIZATION, "Bearer tok-a")
            .header("Content-Type", "application/json")
            .body(Body::from(json!({
                "name": "Alpha Corp",
                "logo_url": "http://logo.test/a.png"
            }).to_string())).unwrap()
    ).await.unwrap();
    assert_eq!(update.status(), StatusCode::OK);
    let updated = parse_body(update).await;
    assert_eq!(updated["name"], "Alpha Corp");
    assert_eq!(updated["logo_url"], "http://logo.test/a.png");

    // Beta already holds the "beta" slug.
    let conflict = app.router.clone().oneshot(
        Request::builder().method("PUT").uri(format!("/api/v1/workspaces/{}", ws_a))
            .header(header::AUTHORIZATION, "Bearer tok-a")
            .header("Content-Type", "application/json")
            .body(Body::from(json!({ "slug": "beta" }).to_string())).unwrap()
    ).await.unwrap();
    assert_eq!(conflict.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_settings_merge_is_deep() {
    let app = TestApp::new().await;
    let ws_id = app.bootstrap_workspace("tok-owner", "owner@acme.io").await;

    let patch = app.router.clone().oneshot(
        Request::builder().method("PUT").uri(format!("/api/v1/workspaces/{}/settings", ws_id))
            .header(header::AUTHORIZATION, "Bearer tok-owner")
            .header("Content-Type", "application/json")
            .body(Body::from(json!({
                "branding": { "primary_color": "#ff0000" },
                "notifications": { "whatsapp_enabled": true }
            }).to_string())).unwrap()
    ).await.unwrap();
    assert_eq!(patch.status(), StatusCode::OK);
    let merged = parse_body(patch).await;

    // Patched keys win, untouched siblings survive.
    assert_eq!(merged["branding"]["primary_color"], "#ff0000");
    assert_eq!(merged["booking"]["require_phone"], false);
    assert_eq!(merged["notifications"]["whatsapp_enabled"], true);

    let fetched = parse_body(app.router.clone().oneshot(
        Request::builder().method("GET").uri(format!("/api/v1/workspaces/{}/settings", ws_id))
            .header(header::AUTHORIZATION, "Bearer tok-owner")
            .body(Body::empty()).unwrap()
    ).await.unwrap()).await;
    assert_eq!(fetched["branding"]["primary_color"], "#ff0000");

    // Non-object payload is rejected.
    let bad = app.router.clone().oneshot(
        Request::builder().method("PUT").uri(format!("/api/v1/workspaces/{}/settings", ws_id))
            .header(header::AUTHORIZATION, "Bearer tok-owner")
            .header("Content-Type", "application/json")
            .body(Body::from("[1,2,3]")).unwrap()
    ).await.unwrap();
    assert_eq!(bad.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_foreign_workspace_is_forbidden() {
    let app = TestApp::new().await;
    let ws_a = app.bootstrap_workspace("tok-a", "alpha@acme.io").await;
    let _ws_b = app.bootstrap_workspace("tok-b", "beta@acme.io").await;

    let response = app.router.clone().oneshot(
        Request::builder().method("GET").uri(format!("/api/v1/{}/members", ws_a))
            .header(header::AUTHORIZATION, "Bearer tok-b")
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let anonymous = app.router.clone().oneshot(
        Request::builder().method("GET").uri(format!("/api/v1/{}/members", ws_a))
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);
}

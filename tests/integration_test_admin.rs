mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use common::TestApp;
use serde_json::Value;
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
async fn test_superadmin_role_is_required() {
    let app = TestApp::new().await;
    app.identity.register("tok-user", "user@acme.io", "USER");

    let forbidden = app.router.clone().oneshot(
        Request::builder().method("GET").uri("/api/v1/admin/workspaces")
            .header(header::AUTHORIZATION, "Bearer tok-user")
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);

    let anonymous = app.router.clone().oneshot(
        Request::builder().method("GET").uri("/api/v1/admin/stats")
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_cross_workspace_listing_and_pagination() {
    let app = TestApp::new().await;
    app.identity.register("tok-root", "root@platform.io", "SUPERADMIN");

    for i in 0..3 {
        app.bootstrap_workspace(&format!("tok-{}", i), &format!("owner{}@acme.io", i)).await;
    }

    let page = parse_body(app.router.clone().oneshot(
        Request::builder().method("GET").uri("/api/v1/admin/workspaces?limit=2&offset=0")
            .header(header::AUTHORIZATION, "Bearer tok-root")
            .body(Body::empty()).unwrap()
    ).await.unwrap()).await;

    assert_eq!(page["total"], 3);
    assert_eq!(page["workspaces"].as_array().unwrap().len(), 2);

    let rest = parse_body(app.router.clone().oneshot(
        Request::builder().method("GET").uri("/api/v1/admin/workspaces?limit=2&offset=2")
            .header(header::AUTHORIZATION, "Bearer tok-root")
            .body(Body::empty()).unwrap()
    ).await.unwrap()).await;
    assert_eq!(rest["workspaces"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_inspect_and_delete_workspace() {
    let app = TestApp::new().await;
    app.identity.register("tok-root", "root@platform.io", "SUPERADMIN");
    let ws_id = app.bootstrap_workspace("tok-owner", "owner@acme.io").await;

    let inspected = parse_body(app.router.clone().oneshot(
        Request::builder().method("GET").uri(format!("/api/v1/admin/workspaces/{}", ws_id))
            .header(header::AUTHORIZATION, "Bearer tok-root")
            .body(Body::empty()).unwrap()
    ).await.unwrap()).await;
    assert_eq!(inspected["workspace"]["id"], ws_id.as_str());
    assert_eq!(inspected["members"].as_array().unwrap().len(), 1);

    let delete = app.router.clone().oneshot(
        Request::builder().method("DELETE").uri(format!("/api/v1/admin/workspaces/{}", ws_id))
            .header(header::AUTHORIZATION, "Bearer tok-root")
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(delete.status(), StatusCode::OK);

    let gone = app.router.clone().oneshot(
        Request::builder().method("GET").uri(format!("/api/v1/admin/workspaces/{}", ws_id))
            .header(header::AUTHORIZATION, "Bearer tok-root")
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);

    // Child rows went with the workspace.
    let orphans: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM members WHERE workspace_id = ?")
        .bind(&ws_id)
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(orphans, 0);

    // The former owner is not locked out: bootstrap starts a fresh workspace.
    let again = app.router.clone().oneshot(
        Request::builder().method("POST").uri("/api/v1/workspaces/bootstrap")
            .header(header::AUTHORIZATION, "Bearer tok-owner")
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(again.status(), StatusCode::OK);
    let fresh = parse_body(again).await;
    assert_ne!(fresh["id"], ws_id.as_str());
}

#[tokio::test]
async fn test_platform_stats() {
    let app = TestApp::new().await;
    app.identity.register("tok-root", "root@platform.io", "SUPERADMIN");
    app.bootstrap_workspace("tok-a", "a@acme.io").await;
    app.bootstrap_workspace("tok-b", "b@acme.io").await;

    let stats = parse_body(app.router.clone().oneshot(
        Request::builder().method("GET").uri("/api/v1/admin/stats")
            .header(header::AUTHORIZATION, "Bearer tok-root")
            .body(Body::empty()).unwrap()
    ).await.unwrap()).await;

    assert_eq!(stats["workspaces"], 2);
    assert_eq!(stats["bookings"], 0);
    assert_eq!(stats["contacts"], 0);
}

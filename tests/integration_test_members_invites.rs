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

async fn create_invite(app: &TestApp, ws_id: &str, token: &str, email: &str, role: &str) -> Value {
    let response = app.router.clone().oneshot(
        Request::builder().method("POST").uri(format!("/api/v1/{}/invites", ws_id))
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .header("Content-Type", "application/json")
            .body(Body::from(json!({ "email": email, "role": role }).to_string())).unwrap()
    ).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    parse_body(response).await
}

#[tokio::test]
async fn test_invite_accept_flow() {
    let app = TestApp::new().await;
    let ws_id = app.bootstrap_workspace("tok-owner", "owner@acme.io").await;

    let invite = create_invite(&app, &ws_id, "tok-owner", "Dev@Acme.io", "ADMIN").await;
    // Invite email is stored normalized.
    assert_eq!(invite["email"], "dev@acme.io");
    assert_eq!(invite["status"], "PENDING");
    let invite_token = invite["token"].as_str().unwrap().to_string();

    app.identity.register("tok-dev", "dev@acme.io", "USER");

    let accept = app.router.clone().oneshot(
        Request::builder().method("POST").uri("/api/v1/invites/accept")
            .header(header::AUTHORIZATION, "Bearer tok-dev")
            .header("Content-Type", "application/json")
            .body(Body::from(json!({ "token": invite_token }).to_string())).unwrap()
    ).await.unwrap();
    assert_eq!(accept.status(), StatusCode::OK);
    let member = parse_body(accept).await;
    assert_eq!(member["role"], "ADMIN");
    assert_eq!(member["workspace_id"], ws_id);

    let members = parse_body(app.router.clone().oneshot(
        Request::builder().method("GET").uri(format!("/api/v1/{}/members", ws_id))
            .header(header::AUTHORIZATION, "Bearer tok-owner")
            .body(Body::empty()).unwrap()
    ).await.unwrap()).await;
    assert_eq!(members.as_array().unwrap().len(), 2);

    // A consumed invite cannot be accepted again.
    let again = app.router.clone().oneshot(
        Request::builder().method("POST").uri("/api/v1/invites/accept")
            .header(header::AUTHORIZATION, "Bearer tok-dev")
            .header("Content-Type", "application/json")
            .body(Body::from(json!({ "token": invite_token }).to_string())).unwrap()
    ).await.unwrap();
    assert_eq!(again.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_invite_rejects_wrong_email() {
    let app = TestApp::new().await;
    let ws_id = app.bootstrap_workspace("tok-owner", "owner@acme.io").await;

    let invite = create_invite(&app, &ws_id, "tok-owner", "dev@acme.io", "MEMBER").await;
    let invite_token = invite["token"].as_str().unwrap().to_string();

    app.identity.register("tok-stranger", "stranger@other.io", "USER");

    let accept = app.router.clone().oneshot(
        Request::builder().method("POST").uri("/api/v1/invites/accept")
            .header(header::AUTHORIZATION, "Bearer tok-stranger")
            .header("Content-Type", "application/json")
            .body(Body::from(json!({ "token": invite_token }).to_string())).unwrap()
    ).await.unwrap();
    assert_eq!(accept.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_revoked_invite_is_gone() {
    let app = TestApp::new().await;
    let ws_id = app.bootstrap_workspace("tok-owner", "owner@acme.io").await;

    let invite = create_invite(&app, &ws_id, "tok-owner", "dev@acme.io", "MEMBER").await;
    let invite_id = invite["id"].as_str().unwrap().to_string();
    let invite_token = invite["token"].as_str().unwrap().to_string();

    let revoke = app.router.clone().oneshot(
        Request::builder().method("DELETE").uri(format!("/api/v1/{}/invites/{}", ws_id, invite_id))
            .header(header::AUTHORIZATION, "Bearer tok-owner")
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(revoke.status(), StatusCode::OK);

    app.identity.register("tok-dev", "dev@acme.io", "USER");
    let accept = app.router.clone().oneshot(
        Request::builder().method("POST").uri("/api/v1/invites/accept")
            .header(header::AUTHORIZATION, "Bearer tok-dev")
            .header("Content-Type", "application/json")
            .body(Body::from(json!({ "token": invite_token }).to_string())).unwrap()
    ).await.unwrap();
    assert_eq!(accept.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_member_cannot_update_settings() {
    let app = TestApp::new().await;
    let ws_id = app.bootstrap_workspace("tok-owner", "owner@acme.io").await;

    let invite = create_invite(&app, &ws_id, "tok-owner", "dev@acme.io", "MEMBER").await;
    app.identity.register("tok-dev", "dev@acme.io", "USER");
    let accept = app.router.clone().oneshot(
        Request::builder().method("POST").uri("/api/v1/invites/accept")
            .header(header::AUTHORIZATION, "Bearer tok-dev")
            .header("Content-Type", "application/json")
            .body(Body::from(json!({ "token": invite["token"] }).to_string())).unwrap()
    ).await.unwrap();
    assert_eq!(accept.status(), StatusCode::OK);

    let valid_body = app.router.clone().oneshot(
        Request::builder().method("PUT").uri(format!("/api/v1/workspaces/{}/settings", ws_id))
            .header(header::AUTHORIZATION, "Bearer tok-dev")
            .header("Content-Type", "application/json")
            .body(Body::from(json!({ "branding": { "primary_color": "#000" } }).to_string())).unwrap()
    ).await.unwrap();
    assert_eq!(valid_body.status(), StatusCode::FORBIDDEN);

    // Authorization is decided before the payload shape is inspected.
    let malformed_body = app.router.clone().oneshot(
        Request::builder().method("PUT").uri(format!("/api/v1/workspaces/{}/settings", ws_id))
            .header(header::AUTHORIZATION, "Bearer tok-dev")
            .header("Content-Type", "application/json")
            .body(Body::from(json!("not-an-object").to_string())).unwrap()
    ).await.unwrap();
    assert_eq!(malformed_body.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_member_removal_rules() {
    let app = TestApp::new().await;
    let ws_id = app.bootstrap_workspace("tok-owner", "owner@acme.io").await;

    let invite = create_invite(&app, &ws_id, "tok-owner", "dev@acme.io", "MEMBER").await;
    app.identity.register("tok-dev", "dev@acme.io", "USER");
    let member = parse_body(app.router.clone().oneshot(
        Request::builder().method("POST").uri("/api/v1/invites/accept")
            .header(header::AUTHORIZATION, "Bearer tok-dev")
            .header("Content-Type", "application/json")
            .body(Body::from(json!({ "token": invite["token"] }).to_string())).unwrap()
    ).await.unwrap()).await;
    let member_id = member["id"].as_str().unwrap().to_string();

    let members = parse_body(app.router.clone().oneshot(
        Request::builder().method("GET").uri(format!("/api/v1/{}/members", ws_id))
            .header(header::AUTHORIZATION, "Bearer tok-owner")
            .body(Body::empty()).unwrap()
    ).await.unwrap()).await;
    let owner_id = members.as_array().unwrap().iter()
        .find(|m| m["role"] == "OWNER")
        .and_then(|m| m["id"].as_str())
        .unwrap()
        .to_string();

    // Plain members cannot remove anyone.
    let forbidden = app.router.clone().oneshot(
        Request::builder().method("DELETE").uri(format!("/api/v1/{}/members/{}", ws_id, owner_id))
            .header(header::AUTHORIZATION, "Bearer tok-dev")
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);

    // The owner cannot remove themselves.
    let self_delete = app.router.clone().oneshot(
        Request::builder().method("DELETE").uri(format!("/api/v1/{}/members/{}", ws_id, owner_id))
            .header(header::AUTHORIZATION, "Bearer tok-owner")
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(self_delete.status(), StatusCode::CONFLICT);

    let delete = app.router.clone().oneshot(
        Request::builder().method("DELETE").uri(format!("/api/v1/{}/members/{}", ws_id, member_id))
            .header(header::AUTHORIZATION, "Bearer tok-owner")
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(delete.status(), StatusCode::OK);

    // The removed member lost access.
    let listing = app.router.clone().oneshot(
        Request::builder().method("GET").uri(format!("/api/v1/{}/members", ws_id))
            .header(header::AUTHORIZATION, "Bearer tok-dev")
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(listing.status(), StatusCode::FORBIDDEN);
}

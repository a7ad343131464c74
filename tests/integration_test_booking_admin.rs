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

const BOOKING_DATE: &str = "2030-01-07";

async fn enable_whatsapp(app: &TestApp, ws_id: &str) {
    let response = app.router.clone().oneshot(
        Request::builder().method("PUT").uri(format!("/api/v1/workspaces/{}/settings", ws_id))
            .header(header::AUTHORIZATION, "Bearer tok-owner")
            .header("Content-Type", "application/json")
            .body(Body::from(json!({
                "notifications": { "whatsapp_enabled": true }
            }).to_string())).unwrap()
    ).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

/// Creates workspace, event type (Monday 09:00-11:00 UTC, 30 min) and one
/// embed booking at 09:00 with a reachable phone. Returns
/// (workspace_id, booking_id).
async fn setup_booking(app: &TestApp) -> (String, String) {
    let ws_id = app.bootstrap_workspace("tok-owner", "owner@acme.io").await;

    let create = app.router.clone().oneshot(
        Request::builder().method("POST").uri(format!("/api/v1/{}/event-types", ws_id))
            .header(header::AUTHORIZATION, "Bearer tok-owner")
            .header("Content-Type", "application/json")
            .body(Body::from(json!({
                "slug": "intro-call",
                "title": "Intro Call",
                "duration_min": 30,
                "timezone": "UTC",
                "availability": { "monday": [ { "start": "09:00", "end": "11:00" } ] }
            }).to_string())).unwrap()
    ).await.unwrap();
    assert_eq!(create.status(), StatusCode::OK);

    let book = parse_body(app.router.clone().oneshot(
        Request::builder().method("POST").uri("/api/v1/embed/owner/intro-call/book")
            .header("Content-Type", "application/json")
            .body(Body::from(json!({
                "date": BOOKING_DATE,
                "time": "09:00",
                "name": "Max Muster",
                "email": "max@example.com",
                "phone": "+49 151 2345678"
            }).to_string())).unwrap()
    ).await.unwrap()).await;

    let booking_id = book["booking"]["id"].as_str().unwrap().to_string();
    (ws_id, booking_id)
}

#[tokio::test]
async fn test_cancel_booking_and_job_cleanup() {
    let app = TestApp::new().await;
    let (ws_id, booking_id) = setup_booking(&app).await;
    enable_whatsapp(&app, &ws_id).await;

    let cancel = app.router.clone().oneshot(
        Request::builder().method("POST")
            .uri(format!("/api/v1/{}/bookings/{}/cancel", ws_id, booking_id))
            .header(header::AUTHORIZATION, "Bearer tok-owner")
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(cancel.status(), StatusCode::OK);
    let cancelled = parse_body(cancel).await;
    assert_eq!(cancelled["status"], "CANCELLED");

    // A cancellation notice job was enqueued.
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM jobs WHERE job_type = 'BOOKING_CANCELLED'")
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(count, 1);

    // Cancelling twice conflicts.
    let again = app.router.clone().oneshot(
        Request::builder().method("POST")
            .uri(format!("/api/v1/{}/bookings/{}/cancel", ws_id, booking_id))
            .header(header::AUTHORIZATION, "Bearer tok-owner")
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(again.status(), StatusCode::CONFLICT);

    // The freed slot is bookable again.
    let slots = parse_body(app.router.clone().oneshot(
        Request::builder().method("GET")
            .uri(format!("/api/v1/embed/owner/intro-call/slots?date={}", BOOKING_DATE))
            .body(Body::empty()).unwrap()
    ).await.unwrap()).await;
    assert!(slots["slots"].as_array().unwrap().contains(&json!("2030-01-07T09:00:00+00:00")));
}

#[tokio::test]
async fn test_cancel_without_whatsapp_opt_in_enqueues_nothing() {
    let app = TestApp::new().await;
    // Default settings leave WhatsApp notifications disabled.
    let (ws_id, booking_id) = setup_booking(&app).await;

    let cancel = app.router.clone().oneshot(
        Request::builder().method("POST")
            .uri(format!("/api/v1/{}/bookings/{}/cancel", ws_id, booking_id))
            .header(header::AUTHORIZATION, "Bearer tok-owner")
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(cancel.status(), StatusCode::OK);

    // Neither the booking nor the cancellation produced a notification job,
    // even though the contact has a phone.
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM jobs")
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn test_reschedule_validates_target_slot() {
    let app = TestApp::new().await;
    let (ws_id, booking_id) = setup_booking(&app).await;

    // Outside the weekday windows.
    let invalid = app.router.clone().oneshot(
        Request::builder().method("POST")
            .uri(format!("/api/v1/{}/bookings/{}/reschedule", ws_id, booking_id))
            .header(header::AUTHORIZATION, "Bearer tok-owner")
            .header("Content-Type", "application/json")
            .body(Body::from(json!({ "date": BOOKING_DATE, "time": "15:00" }).to_string())).unwrap()
    ).await.unwrap();
    assert_eq!(invalid.status(), StatusCode::CONFLICT);

    let valid = app.router.clone().oneshot(
        Request::builder().method("POST")
            .uri(format!("/api/v1/{}/bookings/{}/reschedule", ws_id, booking_id))
            .header(header::AUTHORIZATION, "Bearer tok-owner")
            .header("Content-Type", "application/json")
            .body(Body::from(json!({ "date": BOOKING_DATE, "time": "10:00" }).to_string())).unwrap()
    ).await.unwrap();
    assert_eq!(valid.status(), StatusCode::OK);
    let moved = parse_body(valid).await;
    assert_eq!(moved["start_time"], "2030-01-07T10:00:00Z");
    assert_eq!(moved["end_time"], "2030-01-07T10:30:00Z");

    // Moving back onto its own old slot works: the booking being moved is
    // excluded from the occupancy check.
    let back = app.router.clone().oneshot(
        Request::builder().method("POST")
            .uri(format!("/api/v1/{}/bookings/{}/reschedule", ws_id, booking_id))
            .header(header::AUTHORIZATION, "Bearer tok-owner")
            .header("Content-Type", "application/json")
            .body(Body::from(json!({ "date": BOOKING_DATE, "time": "09:00" }).to_string())).unwrap()
    ).await.unwrap();
    assert_eq!(back.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_get_list_and_delete_booking() {
    let app = TestApp::new().await;
    let (ws_id, booking_id) = setup_booking(&app).await;

    let fetched = parse_body(app.router.clone().oneshot(
        Request::builder().method("GET")
            .uri(format!("/api/v1/{}/bookings/{}", ws_id, booking_id))
            .header(header::AUTHORIZATION, "Bearer tok-owner")
            .body(Body::empty()).unwrap()
    ).await.unwrap()).await;
    assert_eq!(fetched["id"], booking_id.as_str());

    let missing = app.router.clone().oneshot(
        Request::builder().method("GET")
            .uri(format!("/api/v1/{}/bookings/nope", ws_id))
            .header(header::AUTHORIZATION, "Bearer tok-owner")
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);

    let delete = app.router.clone().oneshot(
        Request::builder().method("DELETE")
            .uri(format!("/api/v1/{}/bookings/{}", ws_id, booking_id))
            .header(header::AUTHORIZATION, "Bearer tok-owner")
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(delete.status(), StatusCode::OK);

    let listing = parse_body(app.router.clone().oneshot(
        Request::builder().method("GET").uri(format!("/api/v1/{}/bookings", ws_id))
            .header(header::AUTHORIZATION, "Bearer tok-owner")
            .body(Body::empty()).unwrap()
    ).await.unwrap()).await;
    assert!(listing.as_array().unwrap().is_empty());
}

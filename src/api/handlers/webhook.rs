use axum::{extract::{Query, State}, http::StatusCode, response::IntoResponse, Json};
use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

use crate::api::dtos::requests::WebhookVerifyQuery;
use crate::domain::services::contacts::normalize_phone;
use crate::state::AppState;

/// Meta's webhook subscription handshake: echo `hub.challenge` back when the
/// verify token matches, 403 otherwise.
pub async fn verify(
    State(state): State<Arc<AppState>>,
    Query(query): Query<WebhookVerifyQuery>,
) -> impl IntoResponse {
    let mode_ok = query.mode.as_deref() == Some("subscribe");
    let token_ok = query.verify_token.as_deref() == Some(state.config.whatsapp_verify_token.as_str());

    match (mode_ok && token_ok, query.challenge) {
        (true, Some(challenge)) => (StatusCode::OK, challenge).into_response(),
        _ => {
            warn!("WhatsApp webhook verification rejected");
            StatusCode::FORBIDDEN.into_response()
        }
    }
}

/// Inbound message notifications. Always 200 so the provider stops retrying;
/// processing is limited to logging and touching matching contacts.
pub async fn receive(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<Value>,
) -> impl IntoResponse {
    let entries = payload.get("entry").and_then(|v| v.as_array()).cloned().unwrap_or_default();

    for entry in &entries {
        let changes = entry.get("changes").and_then(|v| v.as_array()).cloned().unwrap_or_default();
        for change in &changes {
            let messages = change
                .pointer("/value/messages")
                .and_then(|v| v.as_array())
                .cloned()
                .unwrap_or_default();

            for message in &messages {
                let from = message.get("from").and_then(|v| v.as_str()).unwrap_or_default();
                let body = message.pointer("/text/body").and_then(|v| v.as_str()).unwrap_or_default();

                let preview: String = body.chars().take(80).collect();
                info!("WhatsApp inbound from {}: {}", from, preview);

                if let Some(digits) = normalize_phone(from) {
                    // Senders arrive without the leading plus; stored contacts
                    // may carry either form.
                    let now = Utc::now();
                    let touched = state.contact_repo
                        .touch_last_seen_by_phone(&digits, now)
                        .await
                        .unwrap_or(0);

                    if touched == 0 {
                        let _ = state.contact_repo
                            .touch_last_seen_by_phone(&format!("+{}", digits), now)
                            .await;
                    }
                }
            }
        }
    }

    Json(serde_json::json!({ "status": "received" }))
}

use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect},
    Json,
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, warn};

use crate::api::dtos::requests::OAuthCallbackQuery;
use crate::api::dtos::responses::{ConnectResponse, IntegrationStatusResponse};
use crate::api::extractors::workspace::WorkspaceMember;
use crate::domain::models::integration::Integration;
use crate::error::AppError;
use crate::state::AppState;

const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const ZOOM_AUTH_URL: &str = "https://zoom.us/oauth/authorize";
const GOOGLE_CALENDAR_SCOPE: &str = "https://www.googleapis.com/auth/calendar.events";

const PROVIDERS: [&str; 3] = ["google", "zoom", "whatsapp"];

#[derive(serde::Serialize, Deserialize)]
struct OAuthState {
    token: String,
    workspace_id: String,
}

/// Returns a usable access token for the integration, refreshing and
/// persisting it first when the stored one is about to expire.
pub async fn fresh_access_token(state: &AppState, integration: &Integration) -> Result<String, AppError> {
    if !integration.is_expired() {
        return Ok(integration.access_token.clone());
    }

    let refresh_token = integration.refresh_token.as_deref().ok_or_else(|| {
        AppError::Validation(format!("{} integration expired and has no refresh token", integration.provider))
    })?;

    let tokens = match integration.provider.as_str() {
        "google" => state.calendar.refresh_access_token(refresh_token).await?,
        "zoom" => state.meetings.refresh_access_token(refresh_token).await?,
        other => return Err(AppError::Validation(format!("Provider {} does not support refresh", other))),
    };

    let mut updated = integration.clone();
    updated.access_token = tokens.access_token.clone();
    if tokens.refresh_token.is_some() {
        updated.refresh_token = tokens.refresh_token;
    }
    updated.expires_at = tokens.expires_in.map(|secs| chrono::Utc::now() + chrono::Duration::seconds(secs));
    updated.updated_at = chrono::Utc::now();

    state.integration_repo.upsert(&updated).await?;
    info!("Refreshed {} credentials for workspace {}", updated.provider, updated.workspace_id);

    Ok(tokens.access_token)
}

pub async fn list_integrations(
    State(state): State<Arc<AppState>>,
    ctx: WorkspaceMember,
) -> Result<impl IntoResponse, AppError> {
    let rows = state.integration_repo.list_by_workspace(&ctx.workspace_id).await?;

    let statuses: Vec<IntegrationStatusResponse> = PROVIDERS
        .iter()
        .map(|provider| {
            let row = rows.iter().find(|r| r.provider == *provider);
            // WhatsApp runs on a platform-level token, not a per-workspace grant.
            let connected = match *provider {
                "whatsapp" => !state.config.whatsapp_access_token.is_empty(),
                _ => row.is_some(),
            };
            IntegrationStatusResponse {
                provider: provider.to_string(),
                connected,
                expires_at: row.and_then(|r| r.expires_at),
            }
        })
        .collect();

    Ok(Json(statuses))
}

pub async fn connect_integration(
    State(state): State<Arc<AppState>>,
    ctx: WorkspaceMember,
    Path((_, provider)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    if !ctx.is_admin() {
        return Err(AppError::Forbidden("Admin role required".into()));
    }

    match provider.as_str() {
        "google" | "zoom" => {}
        "whatsapp" => {
            return Err(AppError::Validation("WhatsApp uses a configured token, not OAuth".into()));
        }
        _ => return Err(AppError::NotFound("Unknown provider".into())),
    }

    let token = state.handoff.issue(ctx.account.id.clone(), ctx.workspace_id.clone(), provider.clone());

    let oauth_state = OAuthState { token, workspace_id: ctx.workspace_id.clone() };
    let encoded_state = URL_SAFE_NO_PAD.encode(
        serde_json::to_vec(&oauth_state).map_err(|_| AppError::Internal)?,
    );

    let authorize_url = match provider.as_str() {
        "google" => reqwest::Url::parse_with_params(GOOGLE_AUTH_URL, &[
            ("client_id", state.config.google_client_id.as_str()),
            ("redirect_uri", state.config.google_redirect_url.as_str()),
            ("response_type", "code"),
            ("scope", GOOGLE_CALENDAR_SCOPE),
            ("access_type", "offline"),
            ("prompt", "consent"),
            ("state", encoded_state.as_str()),
        ]),
        _ => reqwest::Url::parse_with_params(ZOOM_AUTH_URL, &[
            ("client_id", state.config.zoom_client_id.as_str()),
            ("redirect_uri", state.config.zoom_redirect_url.as_str()),
            ("response_type", "code"),
            ("state", encoded_state.as_str()),
        ]),
    }
    .map_err(|_| AppError::Internal)?;

    Ok(Json(ConnectResponse { authorize_url: authorize_url.to_string() }))
}

/// Provider redirect target. The handoff token inside `state` stands in for
/// the session; it is consumed exactly once.
pub async fn oauth_callback(
    State(state): State<Arc<AppState>>,
    Path(provider): Path<String>,
    Query(query): Query<OAuthCallbackQuery>,
) -> Result<impl IntoResponse, AppError> {
    let decoded = URL_SAFE_NO_PAD
        .decode(query.state.as_bytes())
        .map_err(|_| AppError::Validation("Malformed OAuth state".into()))?;
    let oauth_state: OAuthState = serde_json::from_slice(&decoded)
        .map_err(|_| AppError::Validation("Malformed OAuth state".into()))?;

    let entry = state.handoff.consume(&oauth_state.token).ok_or_else(|| {
        warn!("OAuth callback with missing or expired handoff token");
        AppError::Unauthorized
    })?;

    if entry.workspace_id != oauth_state.workspace_id || entry.provider != provider {
        return Err(AppError::Unauthorized);
    }

    let tokens = match provider.as_str() {
        "google" => state.calendar.exchange_code(&query.code).await?,
        "zoom" => state.meetings.exchange_code(&query.code).await?,
        _ => return Err(AppError::Validation("Unknown provider".into())),
    };

    let integration = Integration::new(
        entry.workspace_id.clone(),
        provider.clone(),
        tokens.access_token,
        tokens.refresh_token,
        tokens.expires_in,
    );
    state.integration_repo.upsert(&integration).await?;

    info!("Connected {} for workspace {}", provider, entry.workspace_id);

    let target = format!(
        "{}/settings/integrations?connected={}",
        state.config.frontend_url, provider
    );
    Ok(Redirect::to(&target))
}

pub async fn disconnect_integration(
    State(state): State<Arc<AppState>>,
    ctx: WorkspaceMember,
    Path((_, provider)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    if !ctx.is_admin() {
        return Err(AppError::Forbidden("Admin role required".into()));
    }

    state.integration_repo.find(&ctx.workspace_id, &provider).await?
        .ok_or(AppError::NotFound("Integration not connected".into()))?;

    state.integration_repo.delete(&ctx.workspace_id, &provider).await?;
    info!("Disconnected {} for workspace {}", provider, ctx.workspace_id);

    Ok(Json(serde_json::json!({ "status": "disconnected" })))
}

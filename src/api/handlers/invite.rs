use axum::{extract::{Path, State}, response::IntoResponse, Json};
use chrono::Utc;
use std::sync::Arc;
use tracing::info;

use crate::api::dtos::requests::{AcceptInviteRequest, CreateInviteRequest};
use crate::api::extractors::auth::AuthAccount;
use crate::api::extractors::workspace::WorkspaceMember;
use crate::domain::models::{invite::Invite, member::Member};
use crate::domain::services::contacts::normalize_email;
use crate::error::AppError;
use crate::state::AppState;

pub async fn create_invite(
    State(state): State<Arc<AppState>>,
    ctx: WorkspaceMember,
    Json(payload): Json<CreateInviteRequest>,
) -> Result<impl IntoResponse, AppError> {
    if !ctx.is_admin() {
        return Err(AppError::Forbidden("Admin role required".into()));
    }

    let email = normalize_email(&payload.email)
        .ok_or(AppError::Validation("Invalid email address".into()))?;

    let role = payload.role.unwrap_or_else(|| "MEMBER".to_string());
    if role != "ADMIN" && role != "MEMBER" {
        return Err(AppError::Validation("Role must be ADMIN or MEMBER".into()));
    }

    let invite = Invite::new(ctx.workspace_id.clone(), email, role);
    let created = state.invite_repo.create(&invite).await?;

    info!("Invite {} created for workspace {}", created.id, ctx.workspace_id);

    Ok(Json(created))
}

pub async fn list_invites(
    State(state): State<Arc<AppState>>,
    ctx: WorkspaceMember,
) -> Result<impl IntoResponse, AppError> {
    let invites = state.invite_repo.list_by_workspace(&ctx.workspace_id).await?;
    Ok(Json(invites))
}

pub async fn revoke_invite(
    State(state): State<Arc<AppState>>,
    ctx: WorkspaceMember,
    Path((_, invite_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    if !ctx.is_admin() {
        return Err(AppError::Forbidden("Admin role required".into()));
    }

    state.invite_repo.find_by_id(&ctx.workspace_id, &invite_id).await?
        .ok_or(AppError::NotFound("Invite not found".into()))?;

    state.invite_repo.delete(&ctx.workspace_id, &invite_id).await?;

    Ok(Json(serde_json::json!({ "status": "revoked" })))
}

/// The token arrives out of band (email link). Expiry and status are checked
/// here rather than in the database so a clear error reaches the caller.
pub async fn accept_invite(
    State(state): State<Arc<AppState>>,
    AuthAccount(account): AuthAccount,
    Json(payload): Json<AcceptInviteRequest>,
) -> Result<impl IntoResponse, AppError> {
    let invite = state.invite_repo.find_by_token(&payload.token).await?
        .ok_or(AppError::NotFound("Invite not found".into()))?;

    if invite.status != "PENDING" {
        return Err(AppError::Conflict("Invite is no longer valid".into()));
    }
    if invite.expires_at < Utc::now() {
        return Err(AppError::Conflict("Invite has expired".into()));
    }

    let account_email = normalize_email(&account.email).unwrap_or_else(|| account.email.clone());
    if invite.email != account_email {
        return Err(AppError::Forbidden("Invite was issued to a different email".into()));
    }

    if state.member_repo.find(&invite.workspace_id, &account.id).await?.is_some() {
        return Err(AppError::Conflict("Already a member of this workspace".into()));
    }

    let member = Member::new(
        invite.workspace_id.clone(),
        account.id.clone(),
        account.email.clone(),
        invite.role.clone(),
    );
    let created = state.member_repo.create(&member).await?;

    state.invite_repo.update_status(&invite.id, "ACCEPTED").await?;
    info!("Invite {} accepted by account {}", invite.id, account.id);

    Ok(Json(created))
}

use axum::{extract::State, response::IntoResponse, Json};
use rand::{distributions::Alphanumeric, Rng};
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

use crate::api::dtos::requests::UpdateWorkspaceRequest;
use crate::api::extractors::auth::AuthAccount;
use crate::api::extractors::workspace::WorkspaceMember;
use crate::domain::models::{member::Member, workspace::Workspace};
use crate::domain::services::settings::merge_settings;
use crate::error::AppError;
use crate::state::AppState;

fn derive_slug(email: &str) -> String {
    let local = email.split('@').next().unwrap_or_default();
    let slug: String = local
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect();
    let slug = slug.trim_matches('-').to_string();

    if slug.is_empty() {
        "workspace".to_string()
    } else {
        slug
    }
}

fn random_suffix() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(4)
        .map(char::from)
        .collect::<String>()
        .to_lowercase()
}

/// Get-or-create the caller's workspace. Every account owns at most one
/// workspace; repeat calls return the existing one.
pub async fn bootstrap_workspace(
    State(state): State<Arc<AppState>>,
    AuthAccount(account): AuthAccount,
) -> Result<impl IntoResponse, AppError> {
    if let Some(member) = state.member_repo.find_first_by_account(&account.id).await? {
        let workspace = state.workspace_repo.find_by_id(&member.workspace_id).await?
            .ok_or(AppError::NotFound("Workspace not found".into()))?;
        return Ok(Json(workspace));
    }

    let base_slug = derive_slug(&account.email);
    let slug = if state.workspace_repo.find_by_slug(&base_slug).await?.is_some() {
        format!("{}-{}", base_slug, random_suffix())
    } else {
        base_slug.clone()
    };

    let name = account.email.split('@').next().unwrap_or("My").to_string();
    let workspace = Workspace::new(format!("{}'s workspace", name), slug, account.id.clone());
    let created = state.workspace_repo.create(&workspace).await?;

    let owner = Member::new(created.id.clone(), account.id.clone(), account.email.clone(), "OWNER".to_string());
    state.member_repo.create(&owner).await?;

    info!("Bootstrapped workspace {} for account {}", created.id, account.id);

    Ok(Json(created))
}

pub async fn get_current_workspace(
    State(state): State<Arc<AppState>>,
    AuthAccount(account): AuthAccount,
) -> Result<impl IntoResponse, AppError> {
    let member = state.member_repo.find_first_by_account(&account.id).await?
        .ok_or(AppError::NotFound("No workspace for this account".into()))?;

    let workspace = state.workspace_repo.find_by_id(&member.workspace_id).await?
        .ok_or(AppError::NotFound("Workspace not found".into()))?;

    Ok(Json(workspace))
}

pub async fn update_workspace(
    State(state): State<Arc<AppState>>,
    ctx: WorkspaceMember,
    Json(payload): Json<UpdateWorkspaceRequest>,
) -> Result<impl IntoResponse, AppError> {
    if !ctx.is_admin() {
        return Err(AppError::Forbidden("Admin role required".into()));
    }

    let mut workspace = state.workspace_repo.find_by_id(&ctx.workspace_id).await?
        .ok_or(AppError::NotFound("Workspace not found".into()))?;

    if let Some(name) = payload.name {
        workspace.name = name;
    }
    if let Some(logo) = payload.logo_url {
        workspace.logo_url = Some(logo);
    }
    if let Some(slug) = payload.slug {
        if slug != workspace.slug {
            if let Some(holder) = state.workspace_repo.find_by_slug(&slug).await? {
                if holder.id != workspace.id {
                    return Err(AppError::Conflict("Slug already in use".into()));
                }
            }
            workspace.slug = slug;
        }
    }

    let updated = state.workspace_repo.update(&workspace).await?;
    info!("Workspace updated: {}", updated.id);

    Ok(Json(updated))
}

pub async fn get_settings(
    State(state): State<Arc<AppState>>,
    ctx: WorkspaceMember,
) -> Result<impl IntoResponse, AppError> {
    let workspace = state.workspace_repo.find_by_id(&ctx.workspace_id).await?
        .ok_or(AppError::NotFound("Workspace not found".into()))?;

    let settings: Value = serde_json::from_str(&workspace.settings_json)
        .map_err(|_| AppError::Internal)?;

    Ok(Json(settings))
}

/// Merge-update. Incoming keys win; nested objects merge recursively, any
/// non-object value replaces the stored one wholesale.
pub async fn update_settings(
    State(state): State<Arc<AppState>>,
    ctx: WorkspaceMember,
    Json(patch): Json<Value>,
) -> Result<impl IntoResponse, AppError> {
    if !ctx.is_admin() {
        return Err(AppError::Forbidden("Admin role required".into()));
    }
    if !patch.is_object() {
        return Err(AppError::Validation("Settings payload must be a JSON object".into()));
    }

    let mut workspace = state.workspace_repo.find_by_id(&ctx.workspace_id).await?
        .ok_or(AppError::NotFound("Workspace not found".into()))?;

    let mut settings: Value = serde_json::from_str(&workspace.settings_json)
        .map_err(|_| AppError::Internal)?;

    merge_settings(&mut settings, &patch);

    workspace.settings_json = settings.to_string();
    state.workspace_repo.update(&workspace).await?;

    Ok(Json(settings))
}

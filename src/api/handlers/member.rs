use axum::{extract::{Path, State}, response::IntoResponse, Json};
use std::sync::Arc;
use tracing::info;

use crate::api::extractors::workspace::WorkspaceMember;
use crate::error::AppError;
use crate::state::AppState;

pub async fn list_members(
    State(state): State<Arc<AppState>>,
    ctx: WorkspaceMember,
) -> Result<impl IntoResponse, AppError> {
    let members = state.member_repo.list_by_workspace(&ctx.workspace_id).await?;
    Ok(Json(members))
}

pub async fn delete_member(
    State(state): State<Arc<AppState>>,
    ctx: WorkspaceMember,
    Path((_, member_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    if !ctx.is_admin() {
        return Err(AppError::Forbidden("Admin role required".into()));
    }

    let target = state.member_repo.find_by_id(&ctx.workspace_id, &member_id).await?
        .ok_or(AppError::NotFound("Member not found".into()))?;

    if target.account_id == ctx.account.id {
        return Err(AppError::Conflict("Cannot remove yourself".into()));
    }

    if target.role == "OWNER" && state.member_repo.count_owners(&ctx.workspace_id).await? <= 1 {
        return Err(AppError::Conflict("Cannot remove the last owner".into()));
    }

    state.member_repo.delete(&ctx.workspace_id, &target.id).await?;
    info!("Removed member {} from workspace {}", target.id, ctx.workspace_id);

    Ok(Json(serde_json::json!({ "status": "deleted" })))
}

use axum::{extract::{Path, Query, State}, response::IntoResponse, Json};
use std::sync::Arc;
use tracing::{info, warn};

use crate::api::dtos::requests::AdminListQuery;
use crate::api::dtos::responses::AdminStatsResponse;
use crate::api::extractors::auth::Superadmin;
use crate::error::AppError;
use crate::state::AppState;

pub async fn list_workspaces(
    State(state): State<Arc<AppState>>,
    _admin: Superadmin,
    Query(query): Query<AdminListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let limit = query.limit.unwrap_or(50).clamp(1, 100);
    let offset = query.offset.unwrap_or(0).max(0);

    let workspaces = state.workspace_repo.list(limit, offset).await?;
    let total = state.workspace_repo.count().await?;

    Ok(Json(serde_json::json!({
        "workspaces": workspaces,
        "total": total,
        "limit": limit,
        "offset": offset,
    })))
}

pub async fn get_workspace(
    State(state): State<Arc<AppState>>,
    _admin: Superadmin,
    Path(workspace_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let workspace = state.workspace_repo.find_by_id(&workspace_id).await?
        .ok_or(AppError::NotFound("Workspace not found".into()))?;

    let members = state.member_repo.list_by_workspace(&workspace_id).await?;

    Ok(Json(serde_json::json!({
        "workspace": workspace,
        "members": members,
    })))
}

pub async fn delete_workspace(
    State(state): State<Arc<AppState>>,
    Superadmin(admin): Superadmin,
    Path(workspace_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.workspace_repo.find_by_id(&workspace_id).await?
        .ok_or(AppError::NotFound("Workspace not found".into()))?;

    state.workspace_repo.delete(&workspace_id).await?;
    warn!("Workspace {} hard-deleted by superadmin {}", workspace_id, admin.id);

    Ok(Json(serde_json::json!({ "status": "deleted" })))
}

pub async fn stats(
    State(state): State<Arc<AppState>>,
    _admin: Superadmin,
) -> Result<impl IntoResponse, AppError> {
    let workspaces = state.workspace_repo.count().await?;
    let bookings = state.booking_repo.count().await?;
    let contacts = state.contact_repo.count().await?;

    info!("Superadmin stats requested");

    Ok(Json(AdminStatsResponse { workspaces, bookings, contacts }))
}

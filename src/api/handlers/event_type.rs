use axum::{extract::{Path, State}, response::IntoResponse, Json};
use chrono_tz::Tz;
use std::sync::Arc;
use tracing::info;

use crate::api::dtos::requests::{CreateEventTypeRequest, UpdateEventTypeRequest};
use crate::api::extractors::workspace::WorkspaceMember;
use crate::domain::models::event_type::{EventType, NewEventTypeParams};
use crate::error::AppError;
use crate::state::AppState;

fn validate_timezone(tz: &str) -> Result<(), AppError> {
    tz.parse::<Tz>()
        .map(|_| ())
        .map_err(|_| AppError::Validation(format!("Unknown timezone: {}", tz)))
}

fn validate_location_kind(kind: &str) -> Result<(), AppError> {
    match kind {
        "IN_PERSON" | "GOOGLE_MEET" | "ZOOM" => Ok(()),
        other => Err(AppError::Validation(format!("Unknown location kind: {}", other))),
    }
}

pub async fn create_event_type(
    State(state): State<Arc<AppState>>,
    ctx: WorkspaceMember,
    Json(payload): Json<CreateEventTypeRequest>,
) -> Result<impl IntoResponse, AppError> {
    if !ctx.is_admin() {
        return Err(AppError::Forbidden("Admin role required".into()));
    }

    if payload.duration_min <= 0 {
        return Err(AppError::Validation("Duration must be positive".into()));
    }
    validate_timezone(&payload.timezone)?;

    let location_kind = payload.location_kind.unwrap_or_else(|| "IN_PERSON".to_string());
    validate_location_kind(&location_kind)?;

    if state.event_type_repo.find_by_slug(&ctx.workspace_id, &payload.slug).await?.is_some() {
        return Err(AppError::Conflict("Event type slug already exists".into()));
    }

    let event_type = EventType::new(NewEventTypeParams {
        workspace_id: ctx.workspace_id.clone(),
        slug: payload.slug,
        title: payload.title,
        description: payload.description.unwrap_or_default(),
        duration_min: payload.duration_min,
        timezone: payload.timezone,
        location_kind,
        capacity: payload.capacity.unwrap_or(1).max(1),
        min_notice_min: payload.min_notice_min.unwrap_or(0).max(0),
        availability: payload.availability,
    });

    let created = state.event_type_repo.create(&event_type).await?;
    info!("Event type {} created in workspace {}", created.slug, ctx.workspace_id);

    Ok(Json(created))
}

pub async fn list_event_types(
    State(state): State<Arc<AppState>>,
    ctx: WorkspaceMember,
) -> Result<impl IntoResponse, AppError> {
    let event_types = state.event_type_repo.list(&ctx.workspace_id).await?;
    Ok(Json(event_types))
}

pub async fn get_event_type(
    State(state): State<Arc<AppState>>,
    ctx: WorkspaceMember,
    Path((_, slug)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let event_type = state.event_type_repo.find_by_slug(&ctx.workspace_id, &slug).await?
        .ok_or(AppError::NotFound("Event type not found".into()))?;
    Ok(Json(event_type))
}

pub async fn update_event_type(
    State(state): State<Arc<AppState>>,
    ctx: WorkspaceMember,
    Path((_, slug)): Path<(String, String)>,
    Json(payload): Json<UpdateEventTypeRequest>,
) -> Result<impl IntoResponse, AppError> {
    if !ctx.is_admin() {
        return Err(AppError::Forbidden("Admin role required".into()));
    }

    let mut event_type = state.event_type_repo.find_by_slug(&ctx.workspace_id, &slug).await?
        .ok_or(AppError::NotFound("Event type not found".into()))?;

    if let Some(new_slug) = payload.slug {
        if new_slug != event_type.slug {
            if state.event_type_repo.find_by_slug(&ctx.workspace_id, &new_slug).await?.is_some() {
                return Err(AppError::Conflict("Event type slug already exists".into()));
            }
            event_type.slug = new_slug;
        }
    }
    if let Some(title) = payload.title {
        event_type.title = title;
    }
    if let Some(description) = payload.description {
        event_type.description = description;
    }
    if let Some(duration) = payload.duration_min {
        if duration <= 0 {
            return Err(AppError::Validation("Duration must be positive".into()));
        }
        event_type.duration_min = duration;
    }
    if let Some(tz) = payload.timezone {
        validate_timezone(&tz)?;
        event_type.timezone = tz;
    }
    if let Some(kind) = payload.location_kind {
        validate_location_kind(&kind)?;
        event_type.location_kind = kind;
    }
    if let Some(capacity) = payload.capacity {
        event_type.capacity = capacity.max(1);
    }
    if let Some(notice) = payload.min_notice_min {
        event_type.min_notice_min = notice.max(0);
    }
    if let Some(availability) = payload.availability {
        event_type.availability_json = serde_json::to_string(&availability)
            .map_err(|_| AppError::Internal)?;
    }
    if let Some(active) = payload.active {
        event_type.active = active;
    }

    let updated = state.event_type_repo.update(&event_type).await?;
    Ok(Json(updated))
}

pub async fn delete_event_type(
    State(state): State<Arc<AppState>>,
    ctx: WorkspaceMember,
    Path((_, slug)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    if !ctx.is_admin() {
        return Err(AppError::Forbidden("Admin role required".into()));
    }

    let event_type = state.event_type_repo.find_by_slug(&ctx.workspace_id, &slug).await?
        .ok_or(AppError::NotFound("Event type not found".into()))?;

    state.event_type_repo.delete(&ctx.workspace_id, &event_type.id).await?;
    info!("Deleted event type {} in workspace {}", slug, ctx.workspace_id);

    Ok(Json(serde_json::json!({ "status": "deleted" })))
}

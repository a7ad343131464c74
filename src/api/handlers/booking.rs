use axum::{extract::{Path, Query, State}, response::IntoResponse, Json};
use chrono::Utc;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;

use crate::api::dtos::requests::{ListBookingsQuery, RescheduleBookingRequest};
use crate::api::extractors::workspace::WorkspaceMember;
use crate::domain::models::booking::Booking;
use crate::domain::models::job::Job;
use crate::domain::services::availability::{calculate_slots, day_bounds_utc, parse_slot_start};
use crate::error::AppError;
use crate::state::AppState;

/// Cancellation notices follow the same opt-in as confirmations: the
/// workspace must have WhatsApp notifications enabled and the contact must
/// be reachable by phone.
async fn wants_whatsapp_notice(state: &AppState, workspace_id: &str, booking: &Booking) -> Result<bool, AppError> {
    let workspace = state.workspace_repo.find_by_id(workspace_id).await?
        .ok_or(AppError::NotFound("Workspace not found".into()))?;

    let settings: Value = serde_json::from_str(&workspace.settings_json).unwrap_or_else(|_| json!({}));
    let enabled = settings
        .pointer("/notifications/whatsapp_enabled")
        .and_then(|v| v.as_bool())
        .unwrap_or(false);
    if !enabled {
        return Ok(false);
    }

    let contact = match &booking.contact_id {
        Some(id) => state.contact_repo.find_by_id(workspace_id, id).await?,
        None => None,
    };
    Ok(contact.is_some_and(|c| c.phone.is_some()))
}

pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
    ctx: WorkspaceMember,
    Query(query): Query<ListBookingsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let bookings = state.booking_repo
        .list_by_workspace(&ctx.workspace_id, query.event_type_id.as_deref())
        .await?;
    Ok(Json(bookings))
}

pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    ctx: WorkspaceMember,
    Path((_, booking_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let booking = state.booking_repo.find_by_id(&ctx.workspace_id, &booking_id).await?
        .ok_or(AppError::NotFound("Booking not found".into()))?;
    Ok(Json(booking))
}

pub async fn cancel_booking(
    State(state): State<Arc<AppState>>,
    ctx: WorkspaceMember,
    Path((_, booking_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let mut booking = state.booking_repo.find_by_id(&ctx.workspace_id, &booking_id).await?
        .ok_or(AppError::NotFound("Booking not found".into()))?;

    if booking.status == "CANCELLED" {
        return Err(AppError::Conflict("Booking is already cancelled".into()));
    }

    booking.status = "CANCELLED".to_string();
    let updated = state.booking_repo.update(&booking).await?;

    // Pending confirmations for this booking must not fire anymore.
    state.job_repo.cancel_jobs_for_booking(&updated.id).await?;

    if wants_whatsapp_notice(&state, &ctx.workspace_id, &updated).await? {
        let job = Job::new("BOOKING_CANCELLED", updated.id.clone(), ctx.workspace_id.clone(), Utc::now());
        state.job_repo.create(&job).await?;
    }

    info!("Booking {} cancelled", updated.id);
    Ok(Json(updated))
}

/// Moves a booking to a new slot. The target slot is validated against the
/// live availability of that day, ignoring the booking being moved.
pub async fn reschedule_booking(
    State(state): State<Arc<AppState>>,
    ctx: WorkspaceMember,
    Path((_, booking_id)): Path<(String, String)>,
    Json(payload): Json<RescheduleBookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut booking = state.booking_repo.find_by_id(&ctx.workspace_id, &booking_id).await?
        .ok_or(AppError::NotFound("Booking not found".into()))?;

    if booking.status == "CANCELLED" {
        return Err(AppError::Conflict("Cannot reschedule a cancelled booking".into()));
    }

    let event_type = state.event_type_repo.find_by_id(&ctx.workspace_id, &booking.event_type_id).await?
        .ok_or(AppError::NotFound("Event type not found".into()))?;

    let start = parse_slot_start(&event_type, payload.date, &payload.time)
        .ok_or(AppError::Validation("Invalid booking time".into()))?;

    let (day_start, day_end) = day_bounds_utc(&event_type, payload.date)
        .ok_or(AppError::Validation("Invalid booking date".into()))?;

    let existing: Vec<_> = state.booking_repo
        .list_confirmed_by_range(&event_type.id, day_start, day_end)
        .await?
        .into_iter()
        .filter(|b| b.id != booking.id)
        .collect();

    let open_slots = calculate_slots(&event_type, payload.date, &existing);
    if !open_slots.contains(&start.to_rfc3339()) {
        return Err(AppError::Conflict("Requested slot is not available".into()));
    }

    booking.start_time = start;
    booking.end_time = start + chrono::Duration::minutes(event_type.duration_min as i64);

    let updated = state.booking_repo.update(&booking).await?;
    info!("Booking {} rescheduled to {}", updated.id, updated.start_time);

    Ok(Json(updated))
}

pub async fn delete_booking(
    State(state): State<Arc<AppState>>,
    ctx: WorkspaceMember,
    Path((_, booking_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    state.booking_repo.find_by_id(&ctx.workspace_id, &booking_id).await?
        .ok_or(AppError::NotFound("Booking not found".into()))?;

    state.job_repo.cancel_jobs_for_booking(&booking_id).await?;
    state.booking_repo.delete(&ctx.workspace_id, &booking_id).await?;

    info!("Booking {} deleted", booking_id);
    Ok(Json(serde_json::json!({ "status": "deleted" })))
}

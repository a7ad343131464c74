use axum::{extract::{Path, Query, State}, response::IntoResponse, Json};
use chrono::Utc;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::api::dtos::requests::{EmbedBookingRequest, SlotsQuery};
use crate::api::dtos::responses::SlotsResponse;
use crate::api::handlers::contact::link_contact;
use crate::api::handlers::integration::fresh_access_token;
use crate::domain::models::booking::{Booking, NewBookingParams};
use crate::domain::models::event_type::EventType;
use crate::domain::models::job::Job;
use crate::domain::models::workspace::Workspace;
use crate::domain::ports::{CalendarEventParams, MeetingParams};
use crate::domain::services::availability::{calculate_slots, day_bounds_utc, parse_slot_start};
use crate::domain::services::contacts::{normalize_email, normalize_phone};
use crate::error::AppError;
use crate::state::AppState;

async fn load_workspace(state: &AppState, slug: &str) -> Result<Workspace, AppError> {
    state.workspace_repo.find_by_slug(slug).await?
        .ok_or(AppError::NotFound("Workspace not found".into()))
}

async fn load_event_type(state: &AppState, workspace_id: &str, event_slug: &str) -> Result<EventType, AppError> {
    let event_type = state.event_type_repo.find_by_slug(workspace_id, event_slug).await?
        .ok_or(AppError::NotFound("Event type not found".into()))?;

    if !event_type.active {
        return Err(AppError::NotFound("Event type not found".into()));
    }
    Ok(event_type)
}

fn workspace_settings(workspace: &Workspace) -> Value {
    serde_json::from_str(&workspace.settings_json).unwrap_or_else(|_| json!({}))
}

/// Public workspace profile for the embed widget. Only presentation-safe
/// fields leave the server.
pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let workspace = load_workspace(&state, &slug).await?;
    let event_types = state.event_type_repo.list_active(&workspace.id).await?;

    let settings = workspace_settings(&workspace);

    let events: Vec<Value> = event_types.iter().map(|et| json!({
        "slug": et.slug,
        "title": et.title,
        "description": et.description,
        "duration_min": et.duration_min,
        "timezone": et.timezone,
        "location_kind": et.location_kind,
        "capacity": et.capacity,
    })).collect();

    Ok(Json(json!({
        "workspace": {
            "name": workspace.name,
            "slug": workspace.slug,
            "logo_url": workspace.logo_url,
            "branding": settings.get("branding").cloned().unwrap_or(json!({})),
        },
        "event_types": events,
    })))
}

pub async fn get_slots(
    State(state): State<Arc<AppState>>,
    Path((slug, event_slug)): Path<(String, String)>,
    Query(query): Query<SlotsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let workspace = load_workspace(&state, &slug).await?;
    let event_type = load_event_type(&state, &workspace.id, &event_slug).await?;

    let slots = match day_bounds_utc(&event_type, query.date) {
        Some((start, end)) => {
            let existing = state.booking_repo
                .list_confirmed_by_range(&event_type.id, start, end)
                .await?;
            calculate_slots(&event_type, query.date, &existing)
        }
        None => Vec::new(),
    };

    Ok(Json(SlotsResponse {
        date: query.date,
        timezone: event_type.timezone,
        slots,
    }))
}

pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    Path((slug, event_slug)): Path<(String, String)>,
    Json(payload): Json<EmbedBookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    let workspace = load_workspace(&state, &slug).await?;
    let event_type = load_event_type(&state, &workspace.id, &event_slug).await?;

    let start = parse_slot_start(&event_type, payload.date, &payload.time)
        .ok_or(AppError::Validation("Invalid booking time".into()))?;

    let (day_start, day_end) = day_bounds_utc(&event_type, payload.date)
        .ok_or(AppError::Validation("Invalid booking date".into()))?;

    let existing = state.booking_repo
        .list_confirmed_by_range(&event_type.id, day_start, day_end)
        .await?;

    let open_slots = calculate_slots(&event_type, payload.date, &existing);
    if !open_slots.contains(&start.to_rfc3339()) {
        return Err(AppError::Conflict("Requested slot is not available".into()));
    }

    let email = normalize_email(&payload.email)
        .ok_or(AppError::Validation("Invalid email address".into()))?;
    let phone = match payload.phone.as_deref() {
        Some(raw) => Some(normalize_phone(raw).ok_or(AppError::Validation("Invalid phone number".into()))?),
        None => None,
    };

    let settings = workspace_settings(&workspace);
    let require_phone = settings
        .pointer("/booking/require_phone")
        .and_then(|v| v.as_bool())
        .unwrap_or(false);
    if require_phone && phone.is_none() {
        return Err(AppError::Validation("A phone number is required to book".into()));
    }

    let contact = link_contact(&state, &workspace.id, &payload.name, Some(email), phone).await?;

    let mut booking = Booking::new(NewBookingParams {
        workspace_id: workspace.id.clone(),
        event_type_id: event_type.id.clone(),
        contact_id: Some(contact.id.clone()),
        start,
        duration_min: event_type.duration_min,
        notes: payload.notes,
    });

    booking.meeting_url = provision_meeting(&state, &workspace, &event_type, &booking, &contact.email).await;

    let created = state.booking_repo.create(&booking).await?;
    info!("Booking {} created via embed for workspace {}", created.id, workspace.id);

    let whatsapp_enabled = settings
        .pointer("/notifications/whatsapp_enabled")
        .and_then(|v| v.as_bool())
        .unwrap_or(false);

    if whatsapp_enabled && contact.phone.is_some() {
        let job = Job::new("BOOKING_CONFIRMATION", created.id.clone(), workspace.id.clone(), Utc::now());
        state.job_repo.create(&job).await?;
    }

    let confirmation_message = settings
        .pointer("/booking/confirmation_message")
        .and_then(|v| v.as_str())
        .unwrap_or("Your appointment is confirmed.")
        .to_string();

    Ok(Json(json!({
        "booking": created,
        "confirmation_message": confirmation_message,
    })))
}

/// Attaches a meeting URL when the location kind requires one. Provider
/// outages do not block the booking; the URL just stays empty.
async fn provision_meeting(
    state: &AppState,
    workspace: &Workspace,
    event_type: &EventType,
    booking: &Booking,
    attendee_email: &Option<String>,
) -> Option<String> {
    let provider = match event_type.location_kind.as_str() {
        "ZOOM" => "zoom",
        "GOOGLE_MEET" => "google",
        _ => return None,
    };

    let integration = match state.integration_repo.find(&workspace.id, provider).await {
        Ok(Some(integration)) => integration,
        Ok(None) => {
            warn!("Workspace {} has no {} integration; booking created without meeting URL", workspace.id, provider);
            return None;
        }
        Err(e) => {
            error!("Failed to load {} integration: {:?}", provider, e);
            return None;
        }
    };

    let access_token = match fresh_access_token(state, &integration).await {
        Ok(token) => token,
        Err(e) => {
            error!("Failed to refresh {} credentials: {:?}", provider, e);
            return None;
        }
    };

    match provider {
        "zoom" => {
            let params = MeetingParams {
                topic: event_type.title.clone(),
                start: booking.start_time,
                duration_min: event_type.duration_min,
                timezone: event_type.timezone.clone(),
            };
            match state.meetings.create_meeting(&access_token, &params).await {
                Ok(meeting) => Some(meeting.join_url),
                Err(e) => {
                    error!("Zoom meeting provisioning failed: {:?}", e);
                    None
                }
            }
        }
        _ => {
            let params = CalendarEventParams {
                title: event_type.title.clone(),
                description: event_type.description.clone(),
                start: booking.start_time,
                end: booking.end_time,
                timezone: event_type.timezone.clone(),
                attendee_email: attendee_email.clone(),
                with_meet_link: true,
            };
            match state.calendar.create_event(&access_token, &params).await {
                Ok(event) => event.meet_url,
                Err(e) => {
                    error!("Google Calendar provisioning failed: {:?}", e);
                    None
                }
            }
        }
    }
}

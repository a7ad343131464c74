use axum::{extract::{Path, Query, State}, response::IntoResponse, Json};
use std::sync::Arc;
use tracing::info;

use crate::api::dtos::requests::{ContactSearchQuery, CreateContactRequest, UpdateContactRequest};
use crate::api::extractors::workspace::WorkspaceMember;
use crate::domain::models::contact::Contact;
use crate::domain::services::contacts::{normalize_email, normalize_phone};
use crate::error::AppError;
use crate::state::AppState;

/// Find-or-create by normalized email, then normalized phone. An existing row
/// absorbs any newly supplied fields instead of producing a duplicate.
pub async fn link_contact(
    state: &AppState,
    workspace_id: &str,
    name: &str,
    email: Option<String>,
    phone: Option<String>,
) -> Result<Contact, AppError> {
    let existing = match &email {
        Some(e) => state.contact_repo.find_by_email(workspace_id, e).await?,
        None => None,
    };
    let existing = match existing {
        Some(c) => Some(c),
        None => match &phone {
            Some(p) => state.contact_repo.find_by_phone(workspace_id, p).await?,
            None => None,
        },
    };

    if let Some(mut contact) = existing {
        let mut dirty = false;
        if contact.email.is_none() && email.is_some() {
            contact.email = email;
            dirty = true;
        }
        if contact.phone.is_none() && phone.is_some() {
            contact.phone = phone;
            dirty = true;
        }
        if !name.is_empty() && contact.name != name {
            contact.name = name.to_string();
            dirty = true;
        }
        if dirty {
            return state.contact_repo.update(&contact).await;
        }
        return Ok(contact);
    }

    let contact = Contact::new(workspace_id.to_string(), name.to_string(), email, phone);
    state.contact_repo.create(&contact).await
}

pub async fn list_contacts(
    State(state): State<Arc<AppState>>,
    ctx: WorkspaceMember,
    Query(query): Query<ContactSearchQuery>,
) -> Result<impl IntoResponse, AppError> {
    let contacts = state.contact_repo.search(&ctx.workspace_id, query.q.as_deref()).await?;
    Ok(Json(contacts))
}

pub async fn create_contact(
    State(state): State<Arc<AppState>>,
    ctx: WorkspaceMember,
    Json(payload): Json<CreateContactRequest>,
) -> Result<impl IntoResponse, AppError> {
    let email = match payload.email.as_deref() {
        Some(raw) => Some(normalize_email(raw).ok_or(AppError::Validation("Invalid email address".into()))?),
        None => None,
    };
    let phone = match payload.phone.as_deref() {
        Some(raw) => Some(normalize_phone(raw).ok_or(AppError::Validation("Invalid phone number".into()))?),
        None => None,
    };

    if email.is_none() && phone.is_none() {
        return Err(AppError::Validation("Contact needs an email or a phone number".into()));
    }

    let mut contact = link_contact(&state, &ctx.workspace_id, &payload.name, email, phone).await?;

    if let Some(note) = payload.note {
        contact.note = Some(note);
        contact = state.contact_repo.update(&contact).await?;
    }

    Ok(Json(contact))
}

pub async fn update_contact(
    State(state): State<Arc<AppState>>,
    ctx: WorkspaceMember,
    Path((_, contact_id)): Path<(String, String)>,
    Json(payload): Json<UpdateContactRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut contact = state.contact_repo.find_by_id(&ctx.workspace_id, &contact_id).await?
        .ok_or(AppError::NotFound("Contact not found".into()))?;

    if let Some(name) = payload.name {
        contact.name = name;
    }
    if let Some(raw) = payload.email.as_deref() {
        contact.email = Some(normalize_email(raw).ok_or(AppError::Validation("Invalid email address".into()))?);
    }
    if let Some(raw) = payload.phone.as_deref() {
        contact.phone = Some(normalize_phone(raw).ok_or(AppError::Validation("Invalid phone number".into()))?);
    }
    if let Some(note) = payload.note {
        contact.note = Some(note);
    }

    let updated = state.contact_repo.update(&contact).await?;
    Ok(Json(updated))
}

pub async fn delete_contact(
    State(state): State<Arc<AppState>>,
    ctx: WorkspaceMember,
    Path((_, contact_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    state.contact_repo.find_by_id(&ctx.workspace_id, &contact_id).await?
        .ok_or(AppError::NotFound("Contact not found".into()))?;

    state.contact_repo.delete(&ctx.workspace_id, &contact_id).await?;
    info!("Deleted contact {}", contact_id);

    Ok(Json(serde_json::json!({ "status": "deleted" })))
}

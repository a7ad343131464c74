use axum::{
    body::Body,
    extract::Request,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{classify::ServerErrorsFailureClass, trace::TraceLayer};
use tracing::{error, info, info_span, Span};
use uuid::Uuid;

use crate::api::handlers::{
    admin, booking, contact, embed, event_type, health, integration, invite, member, webhook,
    workspace,
};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Workspace
        .route("/api/v1/workspaces/bootstrap", post(workspace::bootstrap_workspace))
        .route("/api/v1/workspaces/current", get(workspace::get_current_workspace))
        .route("/api/v1/workspaces/{workspace_id}", put(workspace::update_workspace))
        .route("/api/v1/workspaces/{workspace_id}/settings", get(workspace::get_settings).put(workspace::update_settings))

        // Members & invites
        .route("/api/v1/{workspace_id}/members", get(member::list_members))
        .route("/api/v1/{workspace_id}/members/{member_id}", delete(member::delete_member))
        .route("/api/v1/{workspace_id}/invites", post(invite::create_invite).get(invite::list_invites))
        .route("/api/v1/{workspace_id}/invites/{invite_id}", delete(invite::revoke_invite))
        .route("/api/v1/invites/accept", post(invite::accept_invite))

        // Contacts
        .route("/api/v1/{workspace_id}/contacts", get(contact::list_contacts).post(contact::create_contact))
        .route("/api/v1/{workspace_id}/contacts/{contact_id}", put(contact::update_contact).delete(contact::delete_contact))

        // Event types
        .route("/api/v1/{workspace_id}/event-types", post(event_type::create_event_type).get(event_type::list_event_types))
        .route("/api/v1/{workspace_id}/event-types/{slug}", get(event_type::get_event_type).put(event_type::update_event_type).delete(event_type::delete_event_type))

        // Bookings (admin side)
        .route("/api/v1/{workspace_id}/bookings", get(booking::list_bookings))
        .route("/api/v1/{workspace_id}/bookings/{booking_id}", get(booking::get_booking).delete(booking::delete_booking))
        .route("/api/v1/{workspace_id}/bookings/{booking_id}/cancel", post(booking::cancel_booking))
        .route("/api/v1/{workspace_id}/bookings/{booking_id}/reschedule", post(booking::reschedule_booking))

        // Public embed surface
        .route("/api/v1/embed/{slug}", get(embed::get_profile))
        .route("/api/v1/embed/{slug}/{event_slug}/slots", get(embed::get_slots))
        .route("/api/v1/embed/{slug}/{event_slug}/book", post(embed::create_booking))

        // Integrations
        .route("/api/v1/{workspace_id}/integrations", get(integration::list_integrations))
        .route("/api/v1/{workspace_id}/integrations/{provider}/connect", get(integration::connect_integration))
        .route("/api/v1/{workspace_id}/integrations/{provider}", delete(integration::disconnect_integration))
        .route("/api/v1/integrations/{provider}/callback", get(integration::oauth_callback))

        // WhatsApp webhook
        .route("/api/v1/webhooks/whatsapp", get(webhook::verify).post(webhook::receive))

        // Superadmin console
        .route("/api/v1/admin/workspaces", get(admin::list_workspaces))
        .route("/api/v1/admin/workspaces/{workspace_id}", get(admin::get_workspace).delete(admin::delete_workspace))
        .route("/api/v1/admin/stats", get(admin::stats))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                        workspace_id = tracing::field::Empty,
                        account_id = tracing::field::Empty,
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .with_state(state)
}

use crate::domain::models::event_type::WeekSchedule;
use chrono::NaiveDate;
use serde::Deserialize;

#[derive(Deserialize)]
pub struct UpdateWorkspaceRequest {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub logo_url: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateInviteRequest {
    pub email: String,
    pub role: Option<String>,
}

#[derive(Deserialize)]
pub struct AcceptInviteRequest {
    pub token: String,
}

#[derive(Deserialize)]
pub struct CreateContactRequest {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub note: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateContactRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub note: Option<String>,
}

#[derive(Deserialize)]
pub struct ContactSearchQuery {
    pub q: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateEventTypeRequest {
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    pub duration_min: i32,
    pub timezone: String,
    pub location_kind: Option<String>,
    pub capacity: Option<i32>,
    pub min_notice_min: Option<i32>,
    pub availability: WeekSchedule,
}

#[derive(Deserialize)]
pub struct UpdateEventTypeRequest {
    pub slug: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub duration_min: Option<i32>,
    pub timezone: Option<String>,
    pub location_kind: Option<String>,
    pub capacity: Option<i32>,
    pub min_notice_min: Option<i32>,
    pub availability: Option<WeekSchedule>,
    pub active: Option<bool>,
}

#[derive(Deserialize)]
pub struct SlotsQuery {
    pub date: NaiveDate,
}

#[derive(Deserialize)]
pub struct EmbedBookingRequest {
    pub date: NaiveDate,
    pub time: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub notes: Option<String>,
}

#[derive(Deserialize)]
pub struct RescheduleBookingRequest {
    pub date: NaiveDate,
    pub time: String,
}

#[derive(Deserialize)]
pub struct ListBookingsQuery {
    pub event_type_id: Option<String>,
}

#[derive(Deserialize)]
pub struct OAuthCallbackQuery {
    pub code: String,
    pub state: String,
}

#[derive(Deserialize)]
pub struct AdminListQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

// Field names follow Meta's webhook verification contract.
#[derive(Deserialize)]
pub struct WebhookVerifyQuery {
    #[serde(rename = "hub.mode")]
    pub mode: Option<String>,
    #[serde(rename = "hub.verify_token")]
    pub verify_token: Option<String>,
    #[serde(rename = "hub.challenge")]
    pub challenge: Option<String>,
}

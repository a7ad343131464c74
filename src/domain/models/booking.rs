use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Booking {
    pub id: String,
    pub workspace_id: String,
    pub event_type_id: String,
    pub contact_id: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: String, // CONFIRMED, CANCELLED
    pub notes: Option<String>,
    pub meeting_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

pub struct NewBookingParams {
    pub workspace_id: String,
    pub event_type_id: String,
    pub contact_id: Option<String>,
    pub start: DateTime<Utc>,
    pub duration_min: i32,
    pub notes: Option<String>,
}

impl Booking {
    pub fn new(params: NewBookingParams) -> Self {
        let end_time = params.start + chrono::Duration::minutes(params.duration_min as i64);

        Self {
            id: Uuid::new_v4().to_string(),
            workspace_id: params.workspace_id,
            event_type_id: params.event_type_id,
            contact_id: params.contact_id,
            start_time: params.start,
            end_time,
            status: "CONFIRMED".to_string(),
            notes: params.notes,
            meeting_url: None,
            created_at: Utc::now(),
        }
    }
}

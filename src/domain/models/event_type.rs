use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TimeWindow {
    pub start: String, // "HH:MM"
    pub end: String,   // "HH:MM"
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct WeekSchedule {
    pub monday: Option<Vec<TimeWindow>>,
    pub tuesday: Option<Vec<TimeWindow>>,
    pub wednesday: Option<Vec<TimeWindow>>,
    pub thursday: Option<Vec<TimeWindow>>,
    pub friday: Option<Vec<TimeWindow>>,
    pub saturday: Option<Vec<TimeWindow>>,
    pub sunday: Option<Vec<TimeWindow>>,
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct EventType {
    pub id: String,
    pub workspace_id: String,
    pub slug: String,
    pub title: String,
    pub description: String,
    pub duration_min: i32,
    pub timezone: String,
    pub location_kind: String, // IN_PERSON, GOOGLE_MEET, ZOOM
    pub capacity: i32,
    pub min_notice_min: i32,
    pub availability_json: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

pub struct NewEventTypeParams {
    pub workspace_id: String,
    pub slug: String,
    pub title: String,
    pub description: String,
    pub duration_min: i32,
    pub timezone: String,
    pub location_kind: String,
    pub capacity: i32,
    pub min_notice_min: i32,
    pub availability: WeekSchedule,
}

impl EventType {
    pub fn new(params: NewEventTypeParams) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            workspace_id: params.workspace_id,
            slug: params.slug,
            title: params.title,
            description: params.description,
            duration_min: params.duration_min,
            timezone: params.timezone,
            location_kind: params.location_kind,
            capacity: params.capacity,
            min_notice_min: params.min_notice_min,
            availability_json: serde_json::to_string(&params.availability).unwrap_or_else(|_| "{}".to_string()),
            active: true,
            created_at: Utc::now(),
        }
    }

    pub fn schedule(&self) -> WeekSchedule {
        serde_json::from_str(&self.availability_json).unwrap_or_default()
    }
}

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Deduplicated invitee record. `email` and `phone` are always stored in
/// normalized form (see `domain::services::contacts`).
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Contact {
    pub id: String,
    pub workspace_id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub note: Option<String>,
    pub last_seen_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Contact {
    pub fn new(workspace_id: String, name: String, email: Option<String>, phone: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            workspace_id,
            name,
            email,
            phone,
            note: None,
            last_seen_at: None,
            created_at: Utc::now(),
        }
    }
}

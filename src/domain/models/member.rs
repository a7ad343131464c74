use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Member {
    pub id: String,
    pub workspace_id: String,
    pub account_id: String,
    pub email: String,
    pub role: String, // OWNER, ADMIN, MEMBER
    pub created_at: DateTime<Utc>,
}

impl Member {
    pub fn new(workspace_id: String, account_id: String, email: String, role: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            workspace_id,
            account_id,
            email,
            role,
            created_at: Utc::now(),
        }
    }
}

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Duration, Utc};
use sqlx::FromRow;
use rand::{distributions::Alphanumeric, Rng};

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Invite {
    pub id: String,
    pub workspace_id: String,
    pub email: String,
    pub role: String,
    pub token: String,
    pub status: String, // PENDING, ACCEPTED, REVOKED
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Invite {
    pub fn new(workspace_id: String, email: String, role: String) -> Self {
        let token: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(32)
            .map(char::from)
            .collect();

        Self {
            id: Uuid::new_v4().to_string(),
            workspace_id,
            email,
            role,
            token,
            status: "PENDING".to_string(),
            expires_at: Utc::now() + Duration::days(7),
            created_at: Utc::now(),
        }
    }
}

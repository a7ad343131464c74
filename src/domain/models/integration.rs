use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Duration, Utc};
use sqlx::FromRow;

/// Stored OAuth credential set for a third-party provider, scoped per
/// workspace. Tokens are never serialized into API responses.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Integration {
    pub id: String,
    pub workspace_id: String,
    pub provider: String, // google, zoom, whatsapp
    #[serde(skip_serializing)]
    pub access_token: String,
    #[serde(skip_serializing)]
    pub refresh_token: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub metadata_json: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Integration {
    pub fn new(
        workspace_id: String,
        provider: String,
        access_token: String,
        refresh_token: Option<String>,
        expires_in: Option<i64>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            workspace_id,
            provider,
            access_token,
            refresh_token,
            expires_at: expires_in.map(|secs| now + Duration::seconds(secs)),
            metadata_json: "{}".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(at) => at < Utc::now() + Duration::seconds(60),
            None => false,
        }
    }
}

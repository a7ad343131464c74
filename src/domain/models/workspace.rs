use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Workspace {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub logo_url: Option<String>,
    pub owner_account_id: String,
    pub settings_json: String,
    pub created_at: DateTime<Utc>,
}

impl Workspace {
    pub fn new(name: String, slug: String, owner_account_id: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            slug,
            logo_url: None,
            owner_account_id,
            settings_json: default_settings().to_string(),
            created_at: Utc::now(),
        }
    }
}

pub fn default_settings() -> serde_json::Value {
    serde_json::json!({
        "branding": {
            "primary_color": "#1a73e8",
            "logo_url": null
        },
        "booking": {
            "confirmation_message": "Thanks! Your appointment is confirmed.",
            "require_phone": false
        },
        "notifications": {
            "whatsapp_enabled": false
        }
    })
}

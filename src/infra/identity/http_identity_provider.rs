use crate::domain::models::account::VerifiedAccount;
use crate::domain::ports::IdentityProvider;
use crate::error::AppError;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{error, warn};

/// Forwards bearer tokens to the managed identity provider's verify-user
/// endpoint. The provider owns all credentials; this service only maps its
/// response onto a `VerifiedAccount`.
pub struct HttpIdentityProvider {
    client: Client,
    verify_url: String,
    api_key: String,
}

impl HttpIdentityProvider {
    pub fn new(verify_url: String, api_key: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .unwrap_or_else(|_| Client::new()),
            verify_url,
            api_key,
        }
    }
}

#[derive(Deserialize)]
struct VerifyResponse {
    id: String,
    email: String,
    #[serde(default)]
    role: Option<String>,
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn verify(&self, bearer_token: &str) -> Result<VerifiedAccount, AppError> {
        let res = self.client.get(&self.verify_url)
            .header("Authorization", format!("Bearer {}", bearer_token))
            .header("X-Api-Key", &self.api_key)
            .send()
            .await
            .map_err(|e| {
                error!("Identity provider connection error: {}", e);
                AppError::InternalWithMsg(format!("Identity provider unreachable: {}", e))
            })?;

        let status = res.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(AppError::Unauthorized);
        }
        if !status.is_success() {
            let text = res.text().await.unwrap_or_default();
            warn!("Identity provider returned {}: {}", status, text);
            return Err(AppError::InternalWithMsg(format!("Identity provider error: {}", status)));
        }

        let body: VerifyResponse = res.json().await.map_err(|e| {
            error!("Failed to parse identity provider response: {:?}", e);
            AppError::Internal
        })?;

        Ok(VerifiedAccount {
            id: body.id,
            email: body.email,
            role: body.role.unwrap_or_else(|| "USER".to_string()),
        })
    }
}

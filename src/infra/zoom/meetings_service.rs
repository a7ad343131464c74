use crate::domain::ports::{Meeting, MeetingParams, MeetingProvider, OAuthTokens};
use crate::error::AppError;
use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{error, info};

const TOKEN_URL: &str = "https://zoom.us/oauth/token";
const MEETINGS_URL: &str = "https://api.zoom.us/v2/users/me/meetings";

pub struct ZoomMeetingsService {
    client: Client,
    client_id: String,
    client_secret: String,
    redirect_url: String,
}

impl ZoomMeetingsService {
    pub fn new(client_id: String, client_secret: String, redirect_url: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_else(|_| Client::new()),
            client_id,
            client_secret,
            redirect_url,
        }
    }

    // Zoom expects client credentials as a Basic auth header on the token endpoint.
    fn basic_auth(&self) -> String {
        let raw = format!("{}:{}", self.client_id, self.client_secret);
        format!("Basic {}", general_purpose::STANDARD.encode(raw))
    }

    async fn request_tokens(&self, form: &[(&str, &str)]) -> Result<OAuthTokens, AppError> {
        let res = self.client.post(TOKEN_URL)
            .header("Authorization", self.basic_auth())
            .form(form)
            .send()
            .await
            .map_err(|e| {
                error!("Zoom token endpoint connection error: {}", e);
                AppError::InternalWithMsg(format!("Zoom token exchange failed: {}", e))
            })?;

        let status = res.status();
        if !status.is_success() {
            let text = res.text().await.unwrap_or_default();
            error!("Zoom token exchange rejected {}: {}", status, text);
            return Err(AppError::Validation(format!("Zoom token exchange rejected: {}", status)));
        }

        let body: Value = res.json().await.map_err(|e| {
            error!("Failed to parse Zoom token response: {:?}", e);
            AppError::Internal
        })?;

        let access_token = body.get("access_token")
            .and_then(|v| v.as_str())
            .ok_or(AppError::InternalWithMsg("Zoom token response missing access_token".to_string()))?
            .to_string();

        Ok(OAuthTokens {
            access_token,
            refresh_token: body.get("refresh_token").and_then(|v| v.as_str()).map(String::from),
            expires_in: body.get("expires_in").and_then(|v| v.as_i64()),
        })
    }
}

#[async_trait]
impl MeetingProvider for ZoomMeetingsService {
    async fn exchange_code(&self, code: &str) -> Result<OAuthTokens, AppError> {
        self.request_tokens(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", &self.redirect_url),
        ]).await
    }

    async fn refresh_access_token(&self, refresh_token: &str) -> Result<OAuthTokens, AppError> {
        self.request_tokens(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ]).await
    }

    async fn create_meeting(&self, access_token: &str, params: &MeetingParams) -> Result<Meeting, AppError> {
        let payload = json!({
            "topic": params.topic,
            "type": 2, // scheduled meeting
            "start_time": params.start.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
            "duration": params.duration_min,
            "timezone": params.timezone,
        });

        let res = self.client.post(MEETINGS_URL)
            .bearer_auth(access_token)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                error!("Zoom meetings connection error: {}", e);
                AppError::InternalWithMsg(format!("Zoom meeting creation failed: {}", e))
            })?;

        let status = res.status();
        if !status.is_success() {
            let text = res.text().await.unwrap_or_default();
            error!("Zoom meeting creation rejected {}: {}", status, text);
            return Err(AppError::InternalWithMsg(format!("Zoom rejected meeting: {}", status)));
        }

        let body: Value = res.json().await.map_err(|e| {
            error!("Failed to parse Zoom meeting response: {:?}", e);
            AppError::Internal
        })?;

        let meeting_id = body.get("id")
            .map(|v| v.to_string())
            .ok_or(AppError::InternalWithMsg("Zoom meeting response missing id".to_string()))?;

        let join_url = body.get("join_url")
            .and_then(|v| v.as_str())
            .ok_or(AppError::InternalWithMsg("Zoom meeting response missing join_url".to_string()))?
            .to_string();

        info!("Created Zoom meeting {}", meeting_id);
        Ok(Meeting { meeting_id, join_url })
    }
}

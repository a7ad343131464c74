use crate::domain::ports::{CalendarEvent, CalendarEventParams, CalendarProvider, OAuthTokens};
use crate::error::AppError;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info, warn};
use uuid::Uuid;

const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const EVENTS_URL: &str = "https://www.googleapis.com/calendar/v3/calendars/primary/events";
const MAX_RETRIES: u32 = 3;
const INITIAL_BACKOFF_MS: u64 = 500;

pub struct GoogleCalendarService {
    client: Client,
    client_id: String,
    client_secret: String,
    redirect_url: String,
}

impl GoogleCalendarService {
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

    async fn request_tokens(&self, form: &[(&str, &str)]) -> Result<OAuthTokens, AppError> {
        let res = self.client.post(TOKEN_URL)
            .form(form)
            .send()
            .await
            .map_err(|e| {
                error!("Google token endpoint connection error: {}", e);
                AppError::InternalWithMsg(format!("Google token exchange failed: {}", e))
            })?;

        let status = res.status();
        if !status.is_success() {
            let text = res.text().await.unwrap_or_default();
            error!("Google token exchange rejected {}: {}", status, text);
            return Err(AppError::Validation(format!("Google token exchange rejected: {}", status)));
        }

        let body: Value = res.json().await.map_err(|e| {
            error!("Failed to parse Google token response: {:?}", e);
            AppError::Internal
        })?;

        let access_token = body.get("access_token")
            .and_then(|v| v.as_str())
            .ok_or(AppError::InternalWithMsg("Google token response missing access_token".to_string()))?
            .to_string();

        Ok(OAuthTokens {
            access_token,
            refresh_token: body.get("refresh_token").and_then(|v| v.as_str()).map(String::from),
            expires_in: body.get("expires_in").and_then(|v| v.as_i64()),
        })
    }

    async fn post_event_with_retry(&self, access_token: &str, payload: &Value) -> Result<Value, AppError> {
        let url = format!("{}?conferenceDataVersion=1", EVENTS_URL);
        let mut retries = 0;
        let mut backoff = INITIAL_BACKOFF_MS;

        loop {
            let res = self.client.post(&url)
                .bearer_auth(access_token)
                .json(payload)
                .send()
                .await;

            match res {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return response.json().await.map_err(|e| {
                            error!("Failed to parse Google event response: {:?}", e);
                            AppError::Internal
                        });
                    } else if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
                        if retries >= MAX_RETRIES {
                            let text = response.text().await.unwrap_or_default();
                            error!("Google Calendar failed after {} retries. Status: {}", retries, status);
                            return Err(AppError::InternalWithMsg(format!("Google Calendar error: {} - {}", status, text)));
                        }
                        warn!("Google Calendar transient error {}. Retrying in {}ms...", status, backoff);
                    } else {
                        let text = response.text().await.unwrap_or_default();
                        error!("Google Calendar terminal error {}: {}", status, text);
                        return Err(AppError::InternalWithMsg(format!("Google Calendar rejected event: {}", status)));
                    }
                }
                Err(e) => {
                    if retries >= MAX_RETRIES {
                        error!("Google Calendar network error after {} retries: {:?}", retries, e);
                        return Err(AppError::InternalWithMsg(format!("Google Calendar network error: {}", e)));
                    }
                    warn!("Google Calendar network error. Retrying in {}ms... {:?}", backoff, e);
                }
            }

            sleep(Duration::from_millis(backoff)).await;
            retries += 1;
            backoff *= 2;
        }
    }
}

#[async_trait]
impl CalendarProvider for GoogleCalendarService {
    async fn exchange_code(&self, code: &str) -> Result<OAuthTokens, AppError> {
        self.request_tokens(&[
            ("code", code),
            ("client_id", &self.client_id),
            ("client_secret", &self.client_secret),
            ("redirect_uri", &self.redirect_url),
            ("grant_type", "authorization_code"),
        ]).await
    }

    async fn refresh_access_token(&self, refresh_token: &str) -> Result<OAuthTokens, AppError> {
        self.request_tokens(&[
            ("refresh_token", refresh_token),
            ("client_id", &self.client_id),
            ("client_secret", &self.client_secret),
            ("grant_type", "refresh_token"),
        ]).await
    }

    async fn create_event(&self, access_token: &str, params: &CalendarEventParams) -> Result<CalendarEvent, AppError> {
        let mut payload = json!({
            "summary": params.title,
            "description": params.description,
            "start": {
                "dateTime": params.start.to_rfc3339(),
                "timeZone": params.timezone,
            },
            "end": {
                "dateTime": params.end.to_rfc3339(),
                "timeZone": params.timezone,
            },
        });

        if let Some(email) = &params.attendee_email {
            payload["attendees"] = json!([{ "email": email }]);
        }

        if params.with_meet_link {
            payload["conferenceData"] = json!({
                "createRequest": {
                    "requestId": Uuid::new_v4().to_string(),
                    "conferenceSolutionKey": { "type": "hangoutsMeet" }
                }
            });
        }

        let body = self.post_event_with_retry(access_token, &payload).await?;

        let event_id = body.get("id")
            .and_then(|v| v.as_str())
            .ok_or(AppError::InternalWithMsg("Google event response missing id".to_string()))?
            .to_string();

        let meet_url = body.get("hangoutLink").and_then(|v| v.as_str()).map(String::from);

        info!("Created Google Calendar event {}", event_id);
        Ok(CalendarEvent { event_id, meet_url })
    }
}

use crate::domain::ports::MessengerService;
use crate::error::AppError;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use std::time::Duration;
use tracing::error;

/// Sends outbound text messages through the WhatsApp Cloud API. The webhook
/// side of the provider contract lives in `api::handlers::webhook`.
pub struct WhatsAppCloudApiService {
    client: Client,
    api_url: String,
    phone_number_id: String,
    access_token: String,
}

impl WhatsAppCloudApiService {
    pub fn new(api_url: String, phone_number_id: String, access_token: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(15))
                .build()
                .unwrap_or_else(|_| Client::new()),
            api_url,
            phone_number_id,
            access_token,
        }
    }
}

#[async_trait]
impl MessengerService for WhatsAppCloudApiService {
    async fn send_text(&self, phone: &str, body: &str) -> Result<(), AppError> {
        let url = format!("{}/{}/messages", self.api_url, self.phone_number_id);

        let payload = json!({
            "messaging_product": "whatsapp",
            "to": phone,
            "type": "text",
            "text": { "body": body }
        });

        let res = self.client.post(&url)
            .bearer_auth(&self.access_token)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                let msg = format!("WhatsApp connection error: {}", e);
                error!("{}", msg);
                AppError::InternalWithMsg(msg)
            })?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            let msg = format!("WhatsApp send failed. Status: {}, Body: {}", status, text);
            error!("{}", msg);
            return Err(AppError::InternalWithMsg(msg));
        }

        Ok(())
    }
}

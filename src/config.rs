use std::env;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub frontend_url: String,
    pub identity_verify_url: String,
    pub identity_api_key: String,
    pub google_client_id: String,
    pub google_client_secret: String,
    pub google_redirect_url: String,
    pub zoom_client_id: String,
    pub zoom_client_secret: String,
    pub zoom_redirect_url: String,
    pub whatsapp_api_url: String,
    pub whatsapp_phone_number_id: String,
    pub whatsapp_access_token: String,
    pub whatsapp_verify_token: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            port: env::var("PORT").unwrap_or_else(|_| "3000".to_string()).parse().expect("PORT must be a number"),
            frontend_url: env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:5173".to_string()),
            identity_verify_url: env::var("IDENTITY_VERIFY_URL").expect("IDENTITY_VERIFY_URL must be set"),
            identity_api_key: env::var("IDENTITY_API_KEY").unwrap_or_default(),
            google_client_id: env::var("GOOGLE_CLIENT_ID").unwrap_or_default(),
            google_client_secret: env::var("GOOGLE_CLIENT_SECRET").unwrap_or_default(),
            google_redirect_url: env::var("GOOGLE_REDIRECT_URL").unwrap_or_default(),
            zoom_client_id: env::var("ZOOM_CLIENT_ID").unwrap_or_default(),
            zoom_client_secret: env::var("ZOOM_CLIENT_SECRET").unwrap_or_default(),
            zoom_redirect_url: env::var("ZOOM_REDIRECT_URL").unwrap_or_default(),
            whatsapp_api_url: env::var("WHATSAPP_API_URL").unwrap_or_else(|_| "https://graph.facebook.com/v19.0".to_string()),
            whatsapp_phone_number_id: env::var("WHATSAPP_PHONE_NUMBER_ID").unwrap_or_default(),
            whatsapp_access_token: env::var("WHATSAPP_ACCESS_TOKEN").unwrap_or_default(),
            whatsapp_verify_token: env::var("WHATSAPP_VERIFY_TOKEN").unwrap_or_else(|_| "change-me".to_string()),
        }
    }
}

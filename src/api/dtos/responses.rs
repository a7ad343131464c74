use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

#[derive(Serialize)]
pub struct IntegrationStatusResponse {
    pub provider: String,
    pub connected: bool,
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Serialize)]
pub struct ConnectResponse {
    pub authorize_url: String,
}

#[derive(Serialize)]
pub struct SlotsResponse {
    pub date: NaiveDate,
    pub timezone: String,
    pub slots: Vec<String>,
}

#[derive(Serialize)]
pub struct AdminStatsResponse {
    pub workspaces: i64,
    pub bookings: i64,
    pub contacts: i64,
}

use bookdesk_backend::{
    api::router::create_router,
    background::start_background_worker,
    config::Config,
    domain::models::account::VerifiedAccount,
    domain::ports::{
        CalendarEvent, CalendarEventParams, CalendarProvider, IdentityProvider, Meeting,
        MeetingParams, MeetingProvider, MessengerService, OAuthTokens,
    },
    domain::services::handoff::HandoffStore,
    error::AppError,
    infra::repositories::{
        sqlite_booking_repo::SqliteBookingRepo, sqlite_contact_repo::SqliteContactRepo,
        sqlite_event_type_repo::SqliteEventTypeRepo, sqlite_integration_repo::SqliteIntegrationRepo,
        sqlite_invite_repo::SqliteInviteRepo, sqlite_job_repo::SqliteJobRepo,
        sqlite_member_repo::SqliteMemberRepo, sqlite_workspace_repo::SqliteWorkspaceRepo,
    },
    state::AppState,
};
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request},
    Router,
};
use serde_json::Value;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;
use uuid::Uuid;

/// Token-to-account map standing in for the managed identity provider.
#[derive(Default)]
pub struct MockIdentityProvider {
    accounts: Mutex<HashMap<String, VerifiedAccount>>,
}

impl MockIdentityProvider {
    pub fn register(&self, token: &str, email: &str, role: &str) -> String {
        let account = VerifiedAccount {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            role: role.to_string(),
        };
        let id = account.id.clone();
        self.accounts.lock().unwrap().insert(token.to_string(), account);
        id
    }
}

#[async_trait]
impl IdentityProvider for MockIdentityProvider {
    async fn verify(&self, bearer_token: &str) -> Result<VerifiedAccount, AppError> {
        self.accounts
            .lock()
            .unwrap()
            .get(bearer_token)
            .cloned()
            .ok_or(AppError::Unauthorized)
    }
}

pub struct MockCalendarProvider;

#[async_trait]
impl CalendarProvider for MockCalendarProvider {
    async fn exchange_code(&self, _code: &str) -> Result<OAuthTokens, AppError> {
        Ok(OAuthTokens {
            access_token: "google-access".to_string(),
            refresh_token: Some("google-refresh".to_string()),
            expires_in: Some(3600),
        })
    }

    async fn refresh_access_token(&self, _refresh_token: &str) -> Result<OAuthTokens, AppError> {
        Ok(OAuthTokens {
            access_token: "google-access-refreshed".to_string(),
            refresh_token: None,
            expires_in: Some(3600),
        })
    }

    async fn create_event(&self, _access_token: &str, _params: &CalendarEventParams) -> Result<CalendarEvent, AppError> {
        Ok(CalendarEvent {
            event_id: "evt-1".to_string(),
            meet_url: Some("https://meet.example/abc-defg".to_string()),
        })
    }
}

pub struct MockMeetingProvider;

#[async_trait]
impl MeetingProvider for MockMeetingProvider {
    async fn exchange_code(&self, _code: &str) -> Result<OAuthTokens, AppError> {
        Ok(OAuthTokens {
            access_token: "zoom-access".to_string(),
            refresh_token: Some("zoom-refresh".to_string()),
            expires_in: Some(3600),
        })
    }

    async fn refresh_access_token(&self, _refresh_token: &str) -> Result<OAuthTokens, AppError> {
        Ok(OAuthTokens {
            access_token: "zoom-access-refreshed".to_string(),
            refresh_token: None,
            expires_in: Some(3600),
        })
    }

    async fn create_meeting(&self, _access_token: &str, _params: &MeetingParams) -> Result<Meeting, AppError> {
        Ok(Meeting {
            meeting_id: "987654".to_string(),
            join_url: "https://zoom.example/j/987654".to_string(),
        })
    }
}

#[derive(Default)]
pub struct MockMessengerService {
    pub sent: Mutex<Vec<(String, String)>>,
}

#[async_trait]
impl MessengerService for MockMessengerService {
    async fn send_text(&self, phone: &str, body: &str) -> Result<(), AppError> {
        self.sent.lock().unwrap().push((phone.to_string(), body.to_string()));
        Ok(())
    }
}

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
    pub identity: Arc<MockIdentityProvider>,
    pub messenger: Arc<MockMessengerService>,
}

impl TestApp {
    pub async fn new() -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            frontend_url: "http://localhost:5173".to_string(),
            identity_verify_url: "http://identity.test/verify".to_string(),
            identity_api_key: "test-key".to_string(),
            google_client_id: "google-client".to_string(),
            google_client_secret: "google-secret".to_string(),
            google_redirect_url: "http://localhost:3000/api/v1/integrations/google/callback".to_string(),
            zoom_client_id: "zoom-client".to_string(),
            zoom_client_secret: "zoom-secret".to_string(),
            zoom_redirect_url: "http://localhost:3000/api/v1/integrations/zoom/callback".to_string(),
            whatsapp_api_url: "http://whatsapp.test".to_string(),
            whatsapp_phone_number_id: "12345".to_string(),
            whatsapp_access_token: "wa-token".to_string(),
            whatsapp_verify_token: "verify-me".to_string(),
        };

        let identity = Arc::new(MockIdentityProvider::default());
        let messenger = Arc::new(MockMessengerService::default());

        let state = Arc::new(AppState {
            config: config.clone(),
            workspace_repo: Arc::new(SqliteWorkspaceRepo::new(pool.clone())),
            member_repo: Arc::new(SqliteMemberRepo::new(pool.clone())),
            invite_repo: Arc::new(SqliteInviteRepo::new(pool.clone())),
            contact_repo: Arc::new(SqliteContactRepo::new(pool.clone())),
            event_type_repo: Arc::new(SqliteEventTypeRepo::new(pool.clone())),
            booking_repo: Arc::new(SqliteBookingRepo::new(pool.clone())),
            integration_repo: Arc::new(SqliteIntegrationRepo::new(pool.clone())),
            job_repo: Arc::new(SqliteJobRepo::new(pool.clone())),
            identity: identity.clone(),
            calendar: Arc::new(MockCalendarProvider),
            meetings: Arc::new(MockMeetingProvider),
            messenger: messenger.clone(),
            handoff: Arc::new(HandoffStore::new()),
        });

        let worker_state = state.clone();
        tokio::spawn(async move {
            start_background_worker(worker_state).await;
        });

        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
            identity,
            messenger,
        }
    }

    /// Registers an account with the mock identity provider and bootstraps its
    /// workspace. Returns the workspace id.
    #[allow(dead_code)]
    pub async fn bootstrap_workspace(&self, token: &str, email: &str) -> String {
        self.identity.register(token, email, "USER");

        let response = self.router.clone().oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/workspaces/bootstrap")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap()
        ).await.unwrap();

        if !response.status().is_success() {
            panic!("Bootstrap failed in test helper: status {}", response.status());
        }

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        body["id"].as_str().expect("workspace id missing").to_string()
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
    }
}

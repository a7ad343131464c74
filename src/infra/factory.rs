use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::{postgres::{PgConnectOptions, PgPoolOptions}, sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions}};
use sqlx::{ConnectOptions, PgPool, SqlitePool};
use tracing::info;
use tracing::log::LevelFilter;

use crate::config::Config;
use crate::domain::services::handoff::HandoffStore;
use crate::infra::google::calendar_service::GoogleCalendarService;
use crate::infra::identity::http_identity_provider::HttpIdentityProvider;
use crate::infra::whatsapp::cloud_api_service::WhatsAppCloudApiService;
use crate::infra::zoom::meetings_service::ZoomMeetingsService;
use crate::infra::repositories::{
    postgres_booking_repo::PostgresBookingRepo, postgres_contact_repo::PostgresContactRepo,
    postgres_event_type_repo::PostgresEventTypeRepo, postgres_integration_repo::PostgresIntegrationRepo,
    postgres_invite_repo::PostgresInviteRepo, postgres_job_repo::PostgresJobRepo,
    postgres_member_repo::PostgresMemberRepo, postgres_workspace_repo::PostgresWorkspaceRepo,
    sqlite_booking_repo::SqliteBookingRepo, sqlite_contact_repo::SqliteContactRepo,
    sqlite_event_type_repo::SqliteEventTypeRepo, sqlite_integration_repo::SqliteIntegrationRepo,
    sqlite_invite_repo::SqliteInviteRepo, sqlite_job_repo::SqliteJobRepo,
    sqlite_member_repo::SqliteMemberRepo, sqlite_workspace_repo::SqliteWorkspaceRepo,
};
use crate::state::AppState;

pub async fn bootstrap_state(config: &Config) -> AppState {
    let database_url = &config.database_url;

    let identity = Arc::new(HttpIdentityProvider::new(
        config.identity_verify_url.clone(),
        config.identity_api_key.clone(),
    ));

    let calendar = Arc::new(GoogleCalendarService::new(
        config.google_client_id.clone(),
        config.google_client_secret.clone(),
        config.google_redirect_url.clone(),
    ));

    let meetings = Arc::new(ZoomMeetingsService::new(
        config.zoom_client_id.clone(),
        config.zoom_client_secret.clone(),
        config.zoom_redirect_url.clone(),
    ));

    let messenger = Arc::new(WhatsAppCloudApiService::new(
        config.whatsapp_api_url.clone(),
        config.whatsapp_phone_number_id.clone(),
        config.whatsapp_access_token.clone(),
    ));

    let handoff = Arc::new(HandoffStore::new());

    if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        info!("Initializing PostgreSQL connection...");

        let mut opts: PgConnectOptions = database_url.parse().expect("Invalid Postgres URL");
        opts = opts.log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(opts)
            .await
            .expect("Failed to connect to Postgres");

        run_postgres_migrations(&pool).await;

        AppState {
            config: config.clone(),
            workspace_repo: Arc::new(PostgresWorkspaceRepo::new(pool.clone())),
            member_repo: Arc::new(PostgresMemberRepo::new(pool.clone())),
            invite_repo: Arc::new(PostgresInviteRepo::new(pool.clone())),
            contact_repo: Arc::new(PostgresContactRepo::new(pool.clone())),
            event_type_repo: Arc::new(PostgresEventTypeRepo::new(pool.clone())),
            booking_repo: Arc::new(PostgresBookingRepo::new(pool.clone())),
            integration_repo: Arc::new(PostgresIntegrationRepo::new(pool.clone())),
            job_repo: Arc::new(PostgresJobRepo::new(pool.clone())),
            identity,
            calendar,
            meetings,
            messenger,
            handoff,
        }
    } else {
        info!("Initializing SQLite connection with WAL Mode...");

        let opts = SqliteConnectOptions::from_str(database_url)
            .expect("Invalid SQLite connection string")
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(5))
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await
            .expect("Failed to connect to SQLite");

        run_sqlite_migrations(&pool).await;

        AppState {
            config: config.clone(),
            workspace_repo: Arc::new(SqliteWorkspaceRepo::new(pool.clone())),
            member_repo: Arc::new(SqliteMemberRepo::new(pool.clone())),
            invite_repo: Arc::new(SqliteInviteRepo::new(pool.clone())),
            contact_repo: Arc::new(SqliteContactRepo::new(pool.clone())),
            event_type_repo: Arc::new(SqliteEventTypeRepo::new(pool.clone())),
            booking_repo: Arc::new(SqliteBookingRepo::new(pool.clone())),
            integration_repo: Arc::new(SqliteIntegrationRepo::new(pool.clone())),
            job_repo: Arc::new(SqliteJobRepo::new(pool.clone())),
            identity,
            calendar,
            meetings,
            messenger,
            handoff,
        }
    }
}

async fn run_postgres_migrations(pool: &PgPool) {
    sqlx::migrate!("./migrations/postgres")
        .run(pool)
        .await
        .expect("Failed to run Postgres migrations");
}

async fn run_sqlite_migrations(pool: &SqlitePool) {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .expect("Failed to run SQLite migrations");
}

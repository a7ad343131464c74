use crate::domain::models::{
    account::VerifiedAccount, booking::Booking, contact::Contact, event_type::EventType,
    integration::Integration, invite::Invite, job::Job, member::Member, workspace::Workspace,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
pub trait WorkspaceRepository: Send + Sync {
    async fn create(&self, workspace: &Workspace) -> Result<Workspace, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Workspace>, AppError>;
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Workspace>, AppError>;
    async fn update(&self, workspace: &Workspace) -> Result<Workspace, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Workspace>, AppError>;
    async fn count(&self) -> Result<i64, AppError>;
}

#[async_trait]
pub trait MemberRepository: Send + Sync {
    async fn create(&self, member: &Member) -> Result<Member, AppError>;
    async fn find(&self, workspace_id: &str, account_id: &str) -> Result<Option<Member>, AppError>;
    async fn find_by_id(&self, workspace_id: &str, id: &str) -> Result<Option<Member>, AppError>;
    async fn find_first_by_account(&self, account_id: &str) -> Result<Option<Member>, AppError>;
    async fn list_by_workspace(&self, workspace_id: &str) -> Result<Vec<Member>, AppError>;
    async fn count_owners(&self, workspace_id: &str) -> Result<i64, AppError>;
    async fn delete(&self, workspace_id: &str, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait InviteRepository: Send + Sync {
    async fn create(&self, invite: &Invite) -> Result<Invite, AppError>;
    async fn find_by_id(&self, workspace_id: &str, id: &str) -> Result<Option<Invite>, AppError>;
    async fn find_by_token(&self, token: &str) -> Result<Option<Invite>, AppError>;
    async fn list_by_workspace(&self, workspace_id: &str) -> Result<Vec<Invite>, AppError>;
    async fn update_status(&self, id: &str, status: &str) -> Result<(), AppError>;
    async fn delete(&self, workspace_id: &str, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait ContactRepository: Send + Sync {
    async fn create(&self, contact: &Contact) -> Result<Contact, AppError>;
    async fn find_by_id(&self, workspace_id: &str, id: &str) -> Result<Option<Contact>, AppError>;
    async fn find_by_email(&self, workspace_id: &str, email: &str) -> Result<Option<Contact>, AppError>;
    async fn find_by_phone(&self, workspace_id: &str, phone: &str) -> Result<Option<Contact>, AppError>;
    async fn search(&self, workspace_id: &str, query: Option<&str>) -> Result<Vec<Contact>, AppError>;
    async fn update(&self, contact: &Contact) -> Result<Contact, AppError>;
    async fn touch_last_seen_by_phone(&self, phone: &str, at: DateTime<Utc>) -> Result<u64, AppError>;
    async fn delete(&self, workspace_id: &str, id: &str) -> Result<(), AppError>;
    async fn count(&self) -> Result<i64, AppError>;
}

#[async_trait]
pub trait EventTypeRepository: Send + Sync {
    async fn create(&self, event_type: &EventType) -> Result<EventType, AppError>;
    async fn find_by_id(&self, workspace_id: &str, id: &str) -> Result<Option<EventType>, AppError>;
    async fn find_by_slug(&self, workspace_id: &str, slug: &str) -> Result<Option<EventType>, AppError>;
    async fn list(&self, workspace_id: &str) -> Result<Vec<EventType>, AppError>;
    async fn list_active(&self, workspace_id: &str) -> Result<Vec<EventType>, AppError>;
    async fn update(&self, event_type: &EventType) -> Result<EventType, AppError>;
    async fn delete(&self, workspace_id: &str, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn create(&self, booking: &Booking) -> Result<Booking, AppError>;
    async fn find_by_id(&self, workspace_id: &str, id: &str) -> Result<Option<Booking>, AppError>;
    async fn list_by_workspace(&self, workspace_id: &str, event_type_id: Option<&str>) -> Result<Vec<Booking>, AppError>;
    async fn list_confirmed_by_range(&self, event_type_id: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<Booking>, AppError>;
    async fn update(&self, booking: &Booking) -> Result<Booking, AppError>;
    async fn delete(&self, workspace_id: &str, id: &str) -> Result<(), AppError>;
    async fn count(&self) -> Result<i64, AppError>;
}

#[async_trait]
pub trait IntegrationRepository: Send + Sync {
    async fn upsert(&self, integration: &Integration) -> Result<Integration, AppError>;
    async fn find(&self, workspace_id: &str, provider: &str) -> Result<Option<Integration>, AppError>;
    async fn list_by_workspace(&self, workspace_id: &str) -> Result<Vec<Integration>, AppError>;
    async fn delete(&self, workspace_id: &str, provider: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait JobRepository: Send + Sync {
    async fn create(&self, job: &Job) -> Result<Job, AppError>;
    async fn find_pending(&self, limit: i32) -> Result<Vec<Job>, AppError>;
    async fn update_status(&self, id: &str, status: &str, error_message: Option<String>) -> Result<(), AppError>;
    async fn cancel_jobs_for_booking(&self, booking_id: &str) -> Result<(), AppError>;
}

/// Managed identity provider. The backend never sees credentials; it forwards
/// the bearer token to the provider's verify endpoint.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn verify(&self, bearer_token: &str) -> Result<VerifiedAccount, AppError>;
}

#[derive(Debug, Clone)]
pub struct OAuthTokens {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_in: Option<i64>,
}

pub struct CalendarEventParams {
    pub title: String,
    pub description: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub timezone: String,
    pub attendee_email: Option<String>,
    pub with_meet_link: bool,
}

#[derive(Debug, Clone)]
pub struct CalendarEvent {
    pub event_id: String,
    pub meet_url: Option<String>,
}

#[async_trait]
pub trait CalendarProvider: Send + Sync {
    async fn exchange_code(&self, code: &str) -> Result<OAuthTokens, AppError>;
    async fn refresh_access_token(&self, refresh_token: &str) -> Result<OAuthTokens, AppError>;
    async fn create_event(&self, access_token: &str, params: &CalendarEventParams) -> Result<CalendarEvent, AppError>;
}

pub struct MeetingParams {
    pub topic: String,
    pub start: DateTime<Utc>,
    pub duration_min: i32,
    pub timezone: String,
}

#[derive(Debug, Clone)]
pub struct Meeting {
    pub meeting_id: String,
    pub join_url: String,
}

#[async_trait]
pub trait MeetingProvider: Send + Sync {
    async fn exchange_code(&self, code: &str) -> Result<OAuthTokens, AppError>;
    async fn refresh_access_token(&self, refresh_token: &str) -> Result<OAuthTokens, AppError>;
    async fn create_meeting(&self, access_token: &str, params: &MeetingParams) -> Result<Meeting, AppError>;
}

#[async_trait]
pub trait MessengerService: Send + Sync {
    async fn send_text(&self, phone: &str, body: &str) -> Result<(), AppError>;
}

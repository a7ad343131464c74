use std::sync::Arc;
use crate::config::Config;
use crate::domain::ports::{
    BookingRepository, CalendarProvider, ContactRepository, EventTypeRepository,
    IdentityProvider, IntegrationRepository, InviteRepository, JobRepository,
    MeetingProvider, MemberRepository, MessengerService, WorkspaceRepository,
};
use crate::domain::services::handoff::HandoffStore;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub workspace_repo: Arc<dyn WorkspaceRepository>,
    pub member_repo: Arc<dyn MemberRepository>,
    pub invite_repo: Arc<dyn InviteRepository>,
    pub contact_repo: Arc<dyn ContactRepository>,
    pub event_type_repo: Arc<dyn EventTypeRepository>,
    pub booking_repo: Arc<dyn BookingRepository>,
    pub integration_repo: Arc<dyn IntegrationRepository>,
    pub job_repo: Arc<dyn JobRepository>,
    pub identity: Arc<dyn IdentityProvider>,
    pub calendar: Arc<dyn CalendarProvider>,
    pub meetings: Arc<dyn MeetingProvider>,
    pub messenger: Arc<dyn MessengerService>,
    pub handoff: Arc<HandoffStore>,
}

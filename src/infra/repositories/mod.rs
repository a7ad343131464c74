pub mod postgres_booking_repo;
pub mod postgres_contact_repo;
pub mod postgres_event_type_repo;
pub mod postgres_integration_repo;
pub mod postgres_invite_repo;
pub mod postgres_job_repo;
pub mod postgres_member_repo;
pub mod postgres_workspace_repo;
pub mod sqlite_booking_repo;
pub mod sqlite_contact_repo;
pub mod sqlite_event_type_repo;
pub mod sqlite_integration_repo;
pub mod sqlite_invite_repo;
pub mod sqlite_job_repo;
pub mod sqlite_member_repo;
pub mod sqlite_workspace_repo;

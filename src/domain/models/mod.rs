pub mod account;
pub mod booking;
pub mod contact;
pub mod event_type;
pub mod integration;
pub mod invite;
pub mod job;
pub mod member;
pub mod workspace;

pub mod admin;
pub mod booking;
pub mod contact;
pub mod embed;
pub mod event_type;
pub mod health;
pub mod integration;
pub mod invite;
pub mod member;
pub mod webhook;
pub mod workspace;

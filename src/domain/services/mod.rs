pub mod availability;
pub mod contacts;
pub mod handoff;
pub mod settings;

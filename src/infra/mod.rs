pub mod factory;
pub mod google;
pub mod identity;
pub mod repositories;
pub mod whatsapp;
pub mod zoom;

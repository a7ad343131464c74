pub mod meetings_service;

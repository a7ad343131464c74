pub mod cloud_api_service;

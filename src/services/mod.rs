pub mod auth_service;
pub mod user_service;
pub mod webhook_service;

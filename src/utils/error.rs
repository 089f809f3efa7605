use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

use crate::config::ConfigError;
use crate::utils::signature::SignatureError;

/// Failures talking to the user store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] mongodb::error::Error),
    #[error("failed to encode user document: {0}")]
    Encode(#[from] mongodb::bson::ser::Error),
}

/// Errors that abort startup before the server binds.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("failed to initialize user store: {0}")]
    Store(#[from] StoreError),
    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors surfaced by the accessor API. Only a generic message reaches the caller.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        crate::api::metrics::increment_error_count();

        let message = match self {
            AppError::Unauthorized(msg) | AppError::NotFound(msg) | AppError::InvalidRequest(msg) => {
                msg.clone()
            }
            AppError::Store(e) => {
                log::error!("❌ Store error: {}", e);
                "Internal server error".to_string()
            }
        };

        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "success": false,
            "error": message
        }))
    }
}

/// Webhook pipeline failures. Bodies are fixed plain-text messages; the detail is logged.
#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("missing required svix headers")]
    MissingHeaders,
    #[error("signature verification failed: {0}")]
    Verification(#[from] SignatureError),
    #[error("invalid webhook payload: {0}")]
    InvalidPayload(String),
    #[error("failed to create user: {0}")]
    Store(#[from] StoreError),
}

impl WebhookError {
    pub fn public_message(&self) -> &'static str {
        match self {
            WebhookError::MissingHeaders => "Missing required svix headers",
            WebhookError::Verification(_) => "Failed to verify webhook",
            WebhookError::InvalidPayload(_) => "Invalid webhook payload",
            WebhookError::Store(_) => "Failed to create user",
        }
    }
}

impl ResponseError for WebhookError {
    fn status_code(&self) -> StatusCode {
        match self {
            WebhookError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            WebhookError::Store(_) => log::error!("❌ Failed to create user from webhook: {}", self),
            _ => log::warn!("⚠️ Rejected webhook: {}", self),
        }
        crate::api::metrics::increment_webhook_rejected();
        crate::api::metrics::increment_error_count();

        HttpResponse::build(self.status_code())
            .content_type("text/plain; charset=utf-8")
            .body(self.public_message())
    }
}

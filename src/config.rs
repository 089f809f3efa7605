use std::env;
use thiserror::Error;

use crate::utils::signature::{SignatureError, WebhookVerifier, DEFAULT_TOLERANCE_SECS};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment variable {0} is not set")]
    Missing(&'static str),
    #[error("environment variable {name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    MongoDb,
    Memory,
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub jwt_issuer: Option<String>,
}

/// Process configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub store_backend: StoreBackend,
    pub database_url: Option<String>,
    pub webhook_secret: String,
    pub webhook_tolerance_secs: i64,
    pub auth: AuthConfig,
    pub cors_allowed_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let webhook_secret = var("CLERK_WEBHOOK_SECRET").ok_or(ConfigError::Missing("CLERK_WEBHOOK_SECRET"))?;
        let jwt_secret = var("AUTH_JWT_SECRET").ok_or(ConfigError::Missing("AUTH_JWT_SECRET"))?;

        let store_backend = match var("STORE_BACKEND").as_deref() {
            None | Some("mongodb") => StoreBackend::MongoDb,
            Some("memory") => StoreBackend::Memory,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name: "STORE_BACKEND",
                    reason: format!("unknown backend '{}', expected 'mongodb' or 'memory'", other),
                })
            }
        };

        let database_url = var("DATABASE_URL");
        if store_backend == StoreBackend::MongoDb && database_url.is_none() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }

        let port = match var("PORT") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                name: "PORT",
                reason: format!("'{}' is not a port number", raw),
            })?,
            None => 3002,
        };

        let webhook_tolerance_secs = match var("WEBHOOK_TOLERANCE_SECS") {
            Some(raw) => raw
                .parse::<i64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| ConfigError::Invalid {
                    name: "WEBHOOK_TOLERANCE_SECS",
                    reason: format!("'{}' is not a positive number of seconds", raw),
                })?,
            None => DEFAULT_TOLERANCE_SECS,
        };

        let cors_allowed_origins = var("CORS_ALLOWED_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|origin| !origin.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_else(|| vec!["http://localhost:3000".to_string()]);

        Ok(Self {
            host: var("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            store_backend,
            database_url,
            webhook_secret,
            webhook_tolerance_secs,
            auth: AuthConfig {
                jwt_secret,
                jwt_issuer: var("AUTH_JWT_ISSUER"),
            },
            cors_allowed_origins,
        })
    }

    /// Decodes the webhook secret; a malformed secret is a startup failure.
    pub fn webhook_verifier(&self) -> Result<WebhookVerifier, ConfigError> {
        WebhookVerifier::new(&self.webhook_secret, self.webhook_tolerance_secs).map_err(
            |e: SignatureError| ConfigError::Invalid {
                name: "CLERK_WEBHOOK_SECRET",
                reason: e.to_string(),
            },
        )
    }
}

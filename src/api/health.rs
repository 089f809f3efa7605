use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::database::UserStore;

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    /// Configured user store ("mongodb" or "memory")
    pub store: String,
    /// Stored user count; absent when the store did not answer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub users: Option<u64>,
    pub timestamp: i64,
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service and user store are healthy", body = HealthResponse),
        (status = 503, description = "User store unreachable", body = HealthResponse)
    )
)]
pub async fn health_check(store: web::Data<dyn UserStore>) -> HttpResponse {
    let users = match store.count().await {
        Ok(count) => Some(count),
        Err(e) => {
            log::error!("❌ Health check: {} store unreachable: {}", store.backend(), e);
            None
        }
    };

    let body = HealthResponse {
        status: if users.is_some() { "healthy" } else { "unhealthy" }.to_string(),
        service: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        store: store.backend().to_string(),
        users,
        timestamp: chrono::Utc::now().timestamp(),
    };

    if body.users.is_some() {
        HttpResponse::Ok().json(body)
    } else {
        HttpResponse::ServiceUnavailable().json(body)
    }
}

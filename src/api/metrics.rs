use actix_web::HttpResponse;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

static ERROR_COUNT: AtomicU64 = AtomicU64::new(0);
static WEBHOOK_COUNT: AtomicU64 = AtomicU64::new(0);
static WEBHOOK_REJECTED_COUNT: AtomicU64 = AtomicU64::new(0);
static USERS_CREATED_COUNT: AtomicU64 = AtomicU64::new(0);

pub fn increment_error_count() {
    ERROR_COUNT.fetch_add(1, Ordering::Relaxed);
}

pub fn increment_webhook_count() {
    WEBHOOK_COUNT.fetch_add(1, Ordering::Relaxed);
}

pub fn increment_webhook_rejected() {
    WEBHOOK_REJECTED_COUNT.fetch_add(1, Ordering::Relaxed);
}

pub fn increment_users_created() {
    USERS_CREATED_COUNT.fetch_add(1, Ordering::Relaxed);
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct MetricsResponse {
    pub http_errors_total: u64,
    pub webhook_deliveries_total: u64,
    pub webhook_rejected_total: u64,
    pub users_created_total: u64,
}

impl MetricsResponse {
    fn snapshot() -> Self {
        Self {
            http_errors_total: ERROR_COUNT.load(Ordering::Relaxed),
            webhook_deliveries_total: WEBHOOK_COUNT.load(Ordering::Relaxed),
            webhook_rejected_total: WEBHOOK_REJECTED_COUNT.load(Ordering::Relaxed),
            users_created_total: USERS_CREATED_COUNT.load(Ordering::Relaxed),
        }
    }

    fn to_prometheus(&self) -> String {
        format!(
            "# HELP http_errors_total Total number of HTTP error responses\n\
             # TYPE http_errors_total counter\n\
             http_errors_total {}\n\
             \n\
             # HELP webhook_deliveries_total Webhook deliveries received\n\
             # TYPE webhook_deliveries_total counter\n\
             webhook_deliveries_total {}\n\
             \n\
             # HELP webhook_rejected_total Webhook deliveries answered with an error\n\
             # TYPE webhook_rejected_total counter\n\
             webhook_rejected_total {}\n\
             \n\
             # HELP users_created_total User records created\n\
             # TYPE users_created_total counter\n\
             users_created_total {}\n",
            self.http_errors_total,
            self.webhook_deliveries_total,
            self.webhook_rejected_total,
            self.users_created_total
        )
    }
}

#[utoipa::path(
    get,
    path = "/metrics",
    tag = "Health",
    responses(
        (status = 200, description = "Prometheus counters", content_type = "text/plain")
    )
)]
pub async fn get_metrics() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(MetricsResponse::snapshot().to_prometheus())
}

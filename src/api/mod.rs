pub mod health;
pub mod metrics;
pub mod swagger;
pub mod users;
pub mod webhooks;

use actix_web::web;

use crate::middleware::AuthMiddleware;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        // Health check
        .route("/health", web::get().to(health::health_check))
        // Metrics
        .route("/metrics", web::get().to(metrics::get_metrics))
        // Identity provider webhooks (Svix-signed, no JWT)
        .route("/clerk-webhook", web::post().to(webhooks::clerk_webhook))
        // Users
        .service(
            web::scope("/api/v1/users")
                .service(
                    web::resource("")
                        .wrap(AuthMiddleware)
                        .route(web::get().to(users::list_users)),
                )
                .service(
                    web::resource("/sync")
                        .wrap(AuthMiddleware)
                        .route(web::post().to(users::sync_user)),
                )
                .route("/{clerk_id}", web::get().to(users::get_user))
                .route("/{clerk_id}/role", web::get().to(users::get_user_role)),
        );
}

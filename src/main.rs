mod api;
mod config;
mod database;
mod middleware;
mod models;
mod services;
mod utils;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::{Config, StoreBackend};
use crate::database::{InMemoryUserStore, MongoDB, MongoUserStore, UserStore};
use crate::utils::error::StartupError;

#[actix_web::main]
async fn main() -> Result<(), StartupError> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    log::info!("🚀 Starting user sync service...");

    // Missing or malformed configuration stops the process before binding.
    let config = Config::from_env().map_err(|e| {
        log::error!("❌ {}", e);
        e
    })?;
    let verifier = config.webhook_verifier()?;

    let store: Arc<dyn UserStore> = match config.store_backend {
        StoreBackend::MongoDb => {
            let database_url = config.database_url.as_deref().unwrap_or_default();
            let db = MongoDB::new(database_url).await.map_err(|e| {
                log::error!("❌ Failed to connect to MongoDB: {}", e);
                e
            })?;
            log::info!("✅ MongoDB connected successfully");
            Arc::new(MongoUserStore::new(&db))
        }
        StoreBackend::Memory => {
            log::warn!("⚠️  Using in-memory user store, records are lost on restart");
            Arc::new(InMemoryUserStore::new())
        }
    };

    let store_data: web::Data<dyn UserStore> = web::Data::from(store);
    let verifier_data = web::Data::new(verifier);
    let auth_data = web::Data::new(config.auth.clone());

    let host = config.host.clone();
    let port = config.port;
    let cors_origins = config.cors_allowed_origins.clone();

    log::info!("🌐 Server starting on {}:{}", host, port);
    log::info!("📚 Swagger UI available at: http://{}:{}/swagger-ui/", host, port);

    HttpServer::new(move || {
        let cors = cors_origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
            .allowed_methods(vec!["GET", "POST", "OPTIONS"])
            .allowed_headers(vec![
                actix_web::http::header::AUTHORIZATION,
                actix_web::http::header::CONTENT_TYPE,
                actix_web::http::header::ACCEPT,
            ])
            .supports_credentials()
            .max_age(3600);

        let openapi = api::swagger::ApiDoc::openapi();

        App::new()
            .app_data(store_data.clone())
            .app_data(verifier_data.clone())
            .app_data(auth_data.clone())
            .wrap(cors)
            .wrap(Logger::default())
            .service(SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", openapi))
            .configure(api::configure)
    })
    .bind((host.as_str(), port))?
    .run()
    .await?;

    Ok(())
}

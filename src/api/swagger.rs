use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Interview User Sync API",
        version = "1.0.0",
        description = "Synchronizes identity provider accounts into the users collection.\n\n**Webhooks:** `POST /clerk-webhook` is authenticated by its Svix signature headers.\n\n**Users:** listing and manual sync require a JWT bearer token; lookups are public."
    ),
    paths(
        // Webhooks
        crate::api::webhooks::clerk_webhook,

        // Users
        crate::api::users::list_users,
        crate::api::users::sync_user,
        crate::api::users::get_user,
        crate::api::users::get_user_role,

        // Health & Metrics
        crate::api::health::health_check,
        crate::api::metrics::get_metrics,
    ),
    components(
        schemas(
            crate::models::UserProfile,
            crate::models::NewUser,
            crate::models::Role,
            crate::models::RoleInfo,
            crate::api::users::UserListResponse,
            crate::api::users::UserResponse,
            crate::api::users::SyncUserResponse,
            crate::api::health::HealthResponse,
            crate::api::metrics::MetricsResponse,
        )
    ),
    tags(
        (name = "Webhooks", description = "Identity provider lifecycle webhooks."),
        (name = "Users", description = "User record accessors."),
        (name = "Health", description = "Health check and metrics."),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Identity provider session token"))
                        .build(),
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_webhook_and_user_routes() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/clerk-webhook"));
        assert!(doc.paths.paths.contains_key("/api/v1/users"));
        assert!(doc.paths.paths.contains_key("/api/v1/users/{clerk_id}/role"));
    }
}

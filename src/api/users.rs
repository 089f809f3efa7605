use actix_web::{web, HttpResponse};

use crate::{
    database::UserStore,
    models::{NewUser, RoleInfo, SyncOutcome, UserProfile},
    services::{auth_service::Claims, user_service},
    utils::error::AppError,
};

#[derive(serde::Serialize, utoipa::ToSchema)]
pub struct UserListResponse {
    pub success: bool,
    pub users: Vec<UserProfile>,
    pub count: usize,
}

#[derive(serde::Serialize, utoipa::ToSchema)]
pub struct UserResponse {
    pub success: bool,
    pub user: UserProfile,
}

#[derive(serde::Serialize, utoipa::ToSchema)]
pub struct SyncUserResponse {
    pub success: bool,
    pub created: bool,
}

/// GET /api/v1/users - Every user record (requires JWT)
#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "Users",
    responses(
        (status = 200, description = "All users", body = UserListResponse),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_users(
    caller: web::ReqData<Claims>,
    store: web::Data<dyn UserStore>,
) -> Result<HttpResponse, AppError> {
    log::info!("📋 GET /users - caller {}", caller.sub);

    let users = user_service::list_users(store.get_ref(), Some(&*caller)).await?;
    Ok(HttpResponse::Ok().json(UserListResponse {
        success: true,
        count: users.len(),
        users: users.into_iter().map(UserProfile::from).collect(),
    }))
}

/// POST /api/v1/users/sync - Create the user unless it already exists (requires JWT)
#[utoipa::path(
    post,
    path = "/api/v1/users/sync",
    tag = "Users",
    request_body = NewUser,
    responses(
        (status = 201, description = "User created", body = SyncUserResponse),
        (status = 200, description = "User already existed, left unchanged", body = SyncUserResponse),
        (status = 400, description = "Invalid request"),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = []))
)]
pub async fn sync_user(
    caller: web::ReqData<Claims>,
    store: web::Data<dyn UserStore>,
    request: web::Json<NewUser>,
) -> Result<HttpResponse, AppError> {
    log::info!("📝 POST /users/sync - {} (caller {})", request.clerk_id, caller.sub);

    match user_service::sync_user(store.get_ref(), request.into_inner()).await? {
        SyncOutcome::Created => Ok(HttpResponse::Created().json(SyncUserResponse {
            success: true,
            created: true,
        })),
        SyncOutcome::AlreadyExists => Ok(HttpResponse::Ok().json(SyncUserResponse {
            success: true,
            created: false,
        })),
    }
}

/// GET /api/v1/users/{clerk_id} - Lookup by identity provider id
#[utoipa::path(
    get,
    path = "/api/v1/users/{clerk_id}",
    tag = "Users",
    params(("clerk_id" = String, Path, description = "Identity provider user id")),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 404, description = "No user with this id")
    )
)]
pub async fn get_user(
    store: web::Data<dyn UserStore>,
    clerk_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    match user_service::get_user_by_clerk_id(store.get_ref(), &clerk_id).await? {
        Some(user) => Ok(HttpResponse::Ok().json(UserResponse {
            success: true,
            user: user.into(),
        })),
        None => Err(AppError::NotFound("User not found".to_string())),
    }
}

/// GET /api/v1/users/{clerk_id}/role - Role flags used by the frontend
#[utoipa::path(
    get,
    path = "/api/v1/users/{clerk_id}/role",
    tag = "Users",
    params(("clerk_id" = String, Path, description = "Identity provider user id")),
    responses(
        (status = 200, description = "Role flags; both false for unknown users", body = RoleInfo)
    )
)]
pub async fn get_user_role(
    store: web::Data<dyn UserStore>,
    clerk_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let info = user_service::get_user_role(store.get_ref(), &clerk_id).await?;
    Ok(HttpResponse::Ok().json(info))
}

#[cfg(test)]
mod tests {
    use crate::api::test_support::{bearer, test_auth};
    use crate::database::InMemoryUserStore;
    use crate::database::UserStore;
    use crate::models::NewUser;
    use actix_web::{http::StatusCode, test};
    use serde_json::{json, Value};
    use std::sync::Arc;

    async fn seeded_store() -> Arc<InMemoryUserStore> {
        let store = Arc::new(InMemoryUserStore::new());
        store
            .create_if_absent(NewUser {
                clerk_id: "u_1".into(),
                email: "a@x.com".into(),
                name: "Ada Lovelace".into(),
                image: Some("http://img/a.png".into()),
            })
            .await
            .unwrap();
        store
    }

    #[actix_web::test]
    async fn test_list_requires_token() {
        let app = test::init_service(crate::test_app!(seeded_store().await)).await;

        let req = test::TestRequest::get().uri("/api/v1/users").to_request();
        let err = test::try_call_service(&app, req).await.unwrap_err();
        assert_eq!(err.as_response_error().status_code(), StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::get()
            .uri("/api/v1/users")
            .insert_header(("Authorization", "Bearer not-a-jwt"))
            .to_request();
        let err = test::try_call_service(&app, req).await.unwrap_err();
        assert_eq!(err.as_response_error().status_code(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_list_with_token() {
        let app = test::init_service(crate::test_app!(seeded_store().await)).await;

        let req = test::TestRequest::get()
            .uri("/api/v1/users")
            .insert_header(bearer(&test_auth(), "u_admin"))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["count"], 1);
        assert_eq!(body["users"][0]["clerkId"], "u_1");
    }

    #[actix_web::test]
    async fn test_get_user_returns_stored_record() {
        let app = test::init_service(crate::test_app!(seeded_store().await)).await;

        let req = test::TestRequest::get().uri("/api/v1/users/u_1").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let user = &body["user"];
        assert_eq!(user["clerkId"], "u_1");
        assert_eq!(user["email"], "a@x.com");
        assert_eq!(user["name"], "Ada Lovelace");
        assert_eq!(user["image"], "http://img/a.png");
        assert_eq!(user["role"], "candidate");
        assert!(user["_id"].is_string());
        assert!(user["createdAt"].is_string());
    }

    #[actix_web::test]
    async fn test_get_unknown_user_is_404() {
        let app = test::init_service(crate::test_app!(seeded_store().await)).await;

        let req = test::TestRequest::get().uri("/api/v1/users/u_404").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_role_lookup() {
        let app = test::init_service(crate::test_app!(seeded_store().await)).await;

        let req = test::TestRequest::get().uri("/api/v1/users/u_1/role").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(
            body,
            json!({"role": "candidate", "isInterviewer": false, "isCandidate": true})
        );

        let req = test::TestRequest::get().uri("/api/v1/users/u_x/role").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(
            body,
            json!({"role": null, "isInterviewer": false, "isCandidate": false})
        );
    }

    #[actix_web::test]
    async fn test_sync_endpoint_is_idempotent() {
        let store = Arc::new(InMemoryUserStore::new());
        let app = test::init_service(crate::test_app!(store.clone())).await;
        let payload = json!({"clerkId": "u_7", "email": "g@x.com", "name": "Grace Hopper"});

        let req = test::TestRequest::post()
            .uri("/api/v1/users/sync")
            .insert_header(bearer(&test_auth(), "u_admin"))
            .set_json(&payload)
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

        let req = test::TestRequest::post()
            .uri("/api/v1/users/sync")
            .insert_header(bearer(&test_auth(), "u_admin"))
            .set_json(&payload)
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["created"], false);
        assert_eq!(store.len().await, 1);
    }
}

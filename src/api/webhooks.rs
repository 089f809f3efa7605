use actix_web::{web, HttpRequest, HttpResponse};

use crate::{
    database::UserStore,
    services::webhook_service::{self, WebhookOutcome},
    utils::{
        error::WebhookError,
        signature::{SvixHeaders, WebhookVerifier},
    },
};

pub const SUCCESS_MESSAGE: &str = "Webhook processed successfully";

fn svix_headers(req: &HttpRequest) -> Result<SvixHeaders, WebhookError> {
    let header = |name: &str| {
        req.headers()
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(String::from)
    };

    match (header("svix-id"), header("svix-signature"), header("svix-timestamp")) {
        (Some(id), Some(signature), Some(timestamp)) => Ok(SvixHeaders {
            id,
            signature,
            timestamp,
        }),
        _ => Err(WebhookError::MissingHeaders),
    }
}

/// POST /clerk-webhook - Clerk user lifecycle events, signed by Svix
#[utoipa::path(
    post,
    path = "/clerk-webhook",
    tag = "Webhooks",
    params(
        ("svix-id" = String, Header, description = "Message id"),
        ("svix-timestamp" = String, Header, description = "Unix seconds the message was signed at"),
        ("svix-signature" = String, Header, description = "Space-separated v1 signatures")
    ),
    request_body(content = String, description = "Clerk webhook envelope (JSON)", content_type = "application/json"),
    responses(
        (status = 200, description = "Webhook processed successfully"),
        (status = 400, description = "Missing headers, failed verification or invalid payload"),
        (status = 500, description = "Failed to create user")
    )
)]
pub async fn clerk_webhook(
    req: HttpRequest,
    body: web::Bytes,
    verifier: web::Data<WebhookVerifier>,
    store: web::Data<dyn UserStore>,
) -> Result<HttpResponse, WebhookError> {
    crate::api::metrics::increment_webhook_count();

    let headers = svix_headers(&req)?;
    log::info!("📨 POST /clerk-webhook - message {}", headers.id);

    match webhook_service::process_webhook(&verifier, store.get_ref(), &headers, &body).await? {
        WebhookOutcome::UserSynced(outcome) => {
            log::info!("✅ Webhook {} processed: {:?}", headers.id, outcome)
        }
        WebhookOutcome::Ignored(event_type) => {
            log::info!("✅ Webhook {} ignored ({})", headers.id, event_type)
        }
    }

    Ok(HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body(SUCCESS_MESSAGE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::test_verifier;
    use crate::database::memory::FailingUserStore;
    use crate::database::InMemoryUserStore;
    use crate::models::Role;
    use actix_web::{http::StatusCode, test};
    use std::sync::Arc;

    const ADA: &str = r#"{"object":"event","type":"user.created","data":{"id":"u_1","email_addresses":[{"email_address":"a@x.com"}],"first_name":"Ada","last_name":"Lovelace","image_url":"http://img/a.png"}}"#;

    fn signed_request(body: &str) -> test::TestRequest {
        let now = chrono::Utc::now().timestamp();
        let signature = test_verifier().sign("msg_2x7", now, body.as_bytes());
        test::TestRequest::post()
            .uri("/clerk-webhook")
            .insert_header(("svix-id", "msg_2x7"))
            .insert_header(("svix-timestamp", now.to_string()))
            .insert_header(("svix-signature", signature))
            .insert_header(("content-type", "application/json"))
            .set_payload(body.to_string())
    }

    #[actix_web::test]
    async fn test_user_created_stores_candidate() {
        let store = Arc::new(InMemoryUserStore::new());
        let app = test::init_service(crate::test_app!(store.clone())).await;

        let resp = test::call_service(&app, signed_request(ADA).to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(test::read_body(resp).await, SUCCESS_MESSAGE.as_bytes());

        let user = store.find_by_clerk_id("u_1").await.unwrap().unwrap();
        assert_eq!(user.clerk_id, "u_1");
        assert_eq!(user.email, "a@x.com");
        assert_eq!(user.name, "Ada Lovelace");
        assert_eq!(user.image.as_deref(), Some("http://img/a.png"));
        assert_eq!(user.role, Role::Candidate);
    }

    #[actix_web::test]
    async fn test_repeated_delivery_keeps_one_record() {
        let store = Arc::new(InMemoryUserStore::new());
        let app = test::init_service(crate::test_app!(store.clone())).await;

        for _ in 0..3 {
            let resp = test::call_service(&app, signed_request(ADA).to_request()).await;
            assert_eq!(resp.status(), StatusCode::OK);
        }
        assert_eq!(store.len().await, 1);
    }

    #[actix_web::test]
    async fn test_each_missing_header_is_rejected() {
        let store = Arc::new(InMemoryUserStore::new());
        let app = test::init_service(crate::test_app!(store.clone())).await;
        let now = chrono::Utc::now().timestamp();
        let signature = test_verifier().sign("msg_2x7", now, ADA.as_bytes());
        let all = [
            ("svix-id", "msg_2x7".to_string()),
            ("svix-timestamp", now.to_string()),
            ("svix-signature", signature),
        ];

        for skipped in 0..all.len() {
            let mut req = test::TestRequest::post().uri("/clerk-webhook");
            for (i, (name, value)) in all.iter().enumerate() {
                if i != skipped {
                    req = req.insert_header((*name, value.clone()));
                }
            }
            let resp = test::call_service(&app, req.set_payload(ADA).to_request()).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
            assert_eq!(test::read_body(resp).await, "Missing required svix headers".as_bytes());
        }
        assert_eq!(store.len().await, 0);
    }

    #[actix_web::test]
    async fn test_empty_header_counts_as_missing() {
        let store = Arc::new(InMemoryUserStore::new());
        let app = test::init_service(crate::test_app!(store.clone())).await;

        let req = signed_request(ADA).insert_header(("svix-id", "")).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_wrongly_signed_body_is_rejected() {
        let store = Arc::new(InMemoryUserStore::new());
        let app = test::init_service(crate::test_app!(store.clone())).await;

        // Signed for a different body.
        let req = signed_request(r#"{"type":"user.created","data":{}}"#)
            .set_payload(ADA)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(test::read_body(resp).await, "Failed to verify webhook".as_bytes());
        assert_eq!(store.len().await, 0);
    }

    #[actix_web::test]
    async fn test_stale_timestamp_is_rejected() {
        let store = Arc::new(InMemoryUserStore::new());
        let app = test::init_service(crate::test_app!(store.clone())).await;

        let stale = chrono::Utc::now().timestamp() - 3600;
        let signature = test_verifier().sign("msg_2x7", stale, ADA.as_bytes());
        let req = test::TestRequest::post()
            .uri("/clerk-webhook")
            .insert_header(("svix-id", "msg_2x7"))
            .insert_header(("svix-timestamp", stale.to_string()))
            .insert_header(("svix-signature", signature))
            .set_payload(ADA)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(store.len().await, 0);
    }

    #[actix_web::test]
    async fn test_out_of_range_timestamp_is_rejected() {
        let store = Arc::new(InMemoryUserStore::new());
        let app = test::init_service(crate::test_app!(store.clone())).await;

        for timestamp in [i64::MIN.to_string(), i64::MAX.to_string()] {
            let req = signed_request(ADA)
                .insert_header(("svix-timestamp", timestamp))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
            assert_eq!(test::read_body(resp).await, "Failed to verify webhook".as_bytes());
        }
        assert_eq!(store.len().await, 0);
    }

    #[actix_web::test]
    async fn test_other_event_types_succeed_without_side_effects() {
        let store = Arc::new(InMemoryUserStore::new());
        let app = test::init_service(crate::test_app!(store.clone())).await;

        for body in [
            r#"{"type":"user.updated","data":{"id":"u_1","first_name":"Changed"}}"#,
            r#"{"type":"session.created","data":{"id":"sess_1"}}"#,
        ] {
            let resp = test::call_service(&app, signed_request(body).to_request()).await;
            assert_eq!(resp.status(), StatusCode::OK);
        }
        assert_eq!(store.len().await, 0);
    }

    #[actix_web::test]
    async fn test_empty_email_list_is_rejected() {
        let store = Arc::new(InMemoryUserStore::new());
        let app = test::init_service(crate::test_app!(store.clone())).await;

        let body = r#"{"type":"user.created","data":{"id":"u_5","email_addresses":[],"first_name":"No","last_name":"Mail"}}"#;
        let resp = test::call_service(&app, signed_request(body).to_request()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(test::read_body(resp).await, "Invalid webhook payload".as_bytes());
        assert_eq!(store.len().await, 0);
    }

    #[actix_web::test]
    async fn test_store_failure_is_500() {
        let app = test::init_service(crate::test_app!(Arc::new(FailingUserStore))).await;

        let resp = test::call_service(&app, signed_request(ADA).to_request()).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(test::read_body(resp).await, "Failed to create user".as_bytes());
    }
}

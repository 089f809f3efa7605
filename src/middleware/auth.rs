use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    web, Error, HttpMessage,
};
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};

use crate::config::AuthConfig;
use crate::services::auth_service::{bearer_token, verify_token};
use crate::utils::error::AppError;

/// Rejects requests without a valid bearer token and stores the verified
/// `Claims` in the request extensions (read back with `web::ReqData<Claims>`).
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService { service }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let Some(auth) = req.app_data::<web::Data<AuthConfig>>().cloned() else {
            log::error!("❌ AuthConfig missing from app data");
            return Box::pin(async move {
                Err(actix_web::error::ErrorInternalServerError("Internal server error"))
            });
        };

        let token = req
            .headers()
            .get("Authorization")
            .and_then(|value| value.to_str().ok())
            .and_then(bearer_token)
            .map(str::to_string);

        let Some(token) = token else {
            return Box::pin(async move {
                Err(AppError::Unauthorized("Missing authorization token".to_string()).into())
            });
        };

        match verify_token(&auth, &token) {
            Ok(claims) => {
                req.extensions_mut().insert(claims);
                let fut = self.service.call(req);
                Box::pin(async move { fut.await })
            }
            Err(e) => {
                log::warn!("❌ {}", e);
                Box::pin(async move {
                    Err(AppError::Unauthorized("Invalid or expired token".to_string()).into())
                })
            }
        }
    }
}

/// JWT Authentication Middleware
///
/// Validates the bearer token from the Authorization header and attaches an
/// `AuthenticatedUser` to the request extensions. Requests without a valid
/// token are answered with 401 and never reach the handler.

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpMessage,
};
use futures::future::LocalBoxFuture;
use std::rc::Rc;
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::validate_access_token;
use crate::error::{AppError, AuthError};

/// Identity of the caller, established by `JwtMiddleware`.
///
/// Handlers read it with `web::ReqData<AuthenticatedUser>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
}

/// JWT middleware for protecting routes
pub struct JwtMiddleware {
    secret_key: Arc<str>,
}

impl JwtMiddleware {
    pub fn new(secret_key: &str) -> Self {
        Self {
            secret_key: Arc::from(secret_key),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtMiddlewareService<S>;
    type Future = std::future::Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        std::future::ready(Ok(JwtMiddlewareService {
            service: Rc::new(service),
            secret_key: self.secret_key.clone(),
        }))
    }
}

pub struct JwtMiddlewareService<S> {
    service: Rc<S>,
    secret_key: Arc<str>,
}

/// Pull the token out of `Authorization: Bearer <token>`
fn bearer_token(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

fn authenticate(req: &ServiceRequest, secret_key: &str) -> Result<AuthenticatedUser, AppError> {
    let token = bearer_token(req).ok_or(AuthError::MissingToken)?;
    let claims = validate_access_token(&token, secret_key)?;
    let user_id = claims.user_id()?;

    tracing::debug!(user_id = %user_id, "JWT validated successfully");
    Ok(AuthenticatedUser { user_id })
}

impl<S, B> Service<ServiceRequest> for JwtMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        match authenticate(&req, &self.secret_key) {
            Ok(user) => {
                req.extensions_mut().insert(user);
                let service = self.service.clone();
                Box::pin(async move { service.call(req).await })
            }
            Err(e) => {
                tracing::warn!(path = %req.path(), "Rejected unauthenticated request: {}", e);
                Box::pin(async move { Err(Error::from(e)) })
            }
        }
    }
}

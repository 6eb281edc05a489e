/// Authentication Routes

use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::auth::AuthService;
use crate::error::AppError;
use crate::routes::{bounded, RequestTimeout};
use crate::validators::{is_valid_email, is_valid_password};

/// User login request
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// POST /login
///
/// Authenticate with email and password. Returns `{token, refreshToken?}`.
///
/// # Errors
/// - 400: Validation error (email format, password length)
/// - 401: Invalid credentials (email not found or wrong password, same body)
/// - 500: Internal server error
/// - 503: Storage unavailable or request timed out
pub async fn login(
    form: web::Json<LoginRequest>,
    auth: web::Data<AuthService>,
    timeout: web::Data<RequestTimeout>,
) -> Result<HttpResponse, AppError> {
    let form = form.into_inner();
    let email = is_valid_email(&form.email)?;
    is_valid_password(&form.password)?;

    let tokens = bounded(&timeout, auth.login(&email, &form.password)).await?;

    Ok(HttpResponse::Ok().json(tokens))
}

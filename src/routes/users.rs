/// User Routes
///
/// Registration is public; everything else sits behind `JwtMiddleware`.

use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::error::AppError;
use crate::middleware::AuthenticatedUser;
use crate::routes::{bounded, RequestTimeout};
use crate::users::UserService;
use crate::validators::{is_valid_email, is_valid_name, is_valid_password, is_valid_user_id};

/// User registration request
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

/// POST /users
///
/// # Errors
/// - 400: Validation errors
/// - 409: Email already registered
pub async fn create_user(
    form: web::Json<CreateUserRequest>,
    users: web::Data<UserService>,
    timeout: web::Data<RequestTimeout>,
) -> Result<HttpResponse, AppError> {
    let form = form.into_inner();
    let first_name = is_valid_name("firstName", &form.first_name)?;
    let last_name = is_valid_name("lastName", &form.last_name)?;
    let email = is_valid_email(&form.email)?;
    is_valid_password(&form.password)?;

    let user = bounded(
        &timeout,
        users.register(first_name, last_name, &email, form.password),
    )
    .await?;

    Ok(HttpResponse::Created().json(serde_json::json!({ "user": user })))
}

/// GET /users/{id}
///
/// # Errors
/// - 400: id is not a UUID
/// - 404: no such user
pub async fn get_user(
    path: web::Path<String>,
    users: web::Data<UserService>,
    timeout: web::Data<RequestTimeout>,
) -> Result<HttpResponse, AppError> {
    let id = is_valid_user_id(&path)?;
    let user = bounded(&timeout, users.get(id)).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "user": user })))
}

/// GET /users
pub async fn list_users(
    users: web::Data<UserService>,
    timeout: web::Data<RequestTimeout>,
) -> Result<HttpResponse, AppError> {
    let users = bounded(&timeout, users.list()).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "users": users })))
}

/// GET /user
///
/// The user the bearer token was issued to.
pub async fn get_current_user(
    current: web::ReqData<AuthenticatedUser>,
    users: web::Data<UserService>,
    timeout: web::Data<RequestTimeout>,
) -> Result<HttpResponse, AppError> {
    let user = bounded(&timeout, users.me(&current)).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "user": user })))
}

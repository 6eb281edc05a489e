use actix_web::dev::Server;
use actix_web::{error::JsonPayloadError, guard, web, App, HttpServer};
use sqlx::PgPool;
use std::net::TcpListener;
use std::sync::Arc;
use std::time::Duration;

use crate::auth::{AuthService, CredentialHasher};
use crate::configuration::Settings;
use crate::domain::{RefreshTokenStore, UserStore};
use crate::error::{AppError, ValidationError};
use crate::infrastructure::{InMemoryRefreshTokenStore, InMemoryUserStore, PgRefreshTokenStore, PgUserStore};
use crate::middleware::{JwtMiddleware, LoggerMiddleware};
use crate::routes::{
    create_user, get_current_user, get_user, health_check, list_users, login, RequestTimeout,
};
use crate::users::UserService;

/// Everything the handlers need, built once at start-up and shared
/// read-only by all workers.
pub struct AppState {
    pub auth: AuthService,
    pub users: UserService,
    pub secret_key: String,
    pub request_timeout: Duration,
}

impl AppState {
    pub fn new(
        settings: &Settings,
        user_store: Arc<dyn UserStore>,
        refresh_token_store: Arc<dyn RefreshTokenStore>,
    ) -> Result<Self, AppError> {
        let hasher = CredentialHasher::new(settings.security.hash_cost)?;

        Ok(Self {
            auth: AuthService::new(
                user_store.clone(),
                refresh_token_store,
                hasher.clone(),
                &settings.security,
            ),
            users: UserService::new(user_store, hasher),
            secret_key: settings.security.secret_key.clone(),
            request_timeout: settings.application.request_timeout(),
        })
    }

    pub fn with_postgres(settings: &Settings, pool: PgPool) -> Result<Self, AppError> {
        Self::new(
            settings,
            Arc::new(PgUserStore::new(pool.clone())),
            Arc::new(PgRefreshTokenStore::new(pool)),
        )
    }

    pub fn in_memory(settings: &Settings) -> Result<Self, AppError> {
        Self::new(
            settings,
            Arc::new(InMemoryUserStore::default()),
            Arc::new(InMemoryRefreshTokenStore::default()),
        )
    }
}

/// Malformed or incomplete JSON bodies get the same error shape as every
/// other validation failure.
fn json_error_handler(err: JsonPayloadError, _req: &actix_web::HttpRequest) -> actix_web::Error {
    AppError::Validation(ValidationError::InvalidFormat(format!("request body ({})", err))).into()
}

pub fn run(listener: TcpListener, state: AppState) -> Result<Server, std::io::Error> {
    let auth = web::Data::new(state.auth);
    let users = web::Data::new(state.users);
    let timeout = web::Data::new(RequestTimeout(state.request_timeout));
    let secret_key = state.secret_key;

    let server = HttpServer::new(move || {
        App::new()
            .wrap(LoggerMiddleware)
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .app_data(auth.clone())
            .app_data(users.clone())
            .app_data(timeout.clone())
            // Public routes
            .route("/health_check", web::get().to(health_check))
            .route("/login", web::post().to(login))
            .service(
                web::resource("/users")
                    .guard(guard::Post())
                    .to(create_user),
            )
            // Protected routes. The middleware sits on each resource so
            // unknown paths still fall through to the default 404.
            .service(
                web::resource("/users")
                    .guard(guard::Get())
                    .wrap(JwtMiddleware::new(&secret_key))
                    .to(list_users),
            )
            .service(
                web::resource("/users/{id}")
                    .wrap(JwtMiddleware::new(&secret_key))
                    .route(web::get().to(get_user)),
            )
            .service(
                web::resource("/user")
                    .wrap(JwtMiddleware::new(&secret_key))
                    .route(web::get().to(get_current_user)),
            )
    })
    .keep_alive(Duration::from_secs(5))
    .client_request_timeout(Duration::from_secs(10))
    .shutdown_timeout(5)
    .listen(listener)?
    .run();

    Ok(server)
}

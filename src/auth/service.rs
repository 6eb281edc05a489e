/// Login orchestration
///
/// Fetch user → verify password → sign access token → (optionally) issue
/// and persist a refresh token. Nothing is retried and nothing partial is
/// returned: the refresh-token insert is the commit point of a login.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::auth::jwt::issue_access_token;
use crate::auth::password::CredentialHasher;
use crate::auth::refresh_token::RefreshTokenIssuer;
use crate::configuration::SecuritySettings;
use crate::domain::{normalize_email, RefreshTokenStore, UserStore};
use crate::error::{AppError, AuthError};

/// Progress of one login, reported in logs when a step fails
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginStage {
    Start,
    CredentialsFetched,
    PasswordChecked,
    AccessTokenIssued,
    RefreshTokenIssued,
}

impl fmt::Display for LoginStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LoginStage::Start => "start",
            LoginStage::CredentialsFetched => "credentials_fetched",
            LoginStage::PasswordChecked => "password_checked",
            LoginStage::AccessTokenIssued => "access_token_issued",
            LoginStage::RefreshTokenIssued => "refresh_token_issued",
        };
        f.write_str(name)
    }
}

/// Tokens handed back by a successful login
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginTokens {
    pub token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

/// Verifies credentials and issues tokens.
///
/// Refresh-token issuance is switched by
/// `SecuritySettings::refresh_tokens_enabled`.
pub struct AuthService {
    users: Arc<dyn UserStore>,
    hasher: CredentialHasher,
    refresh_tokens: Option<RefreshTokenIssuer>,
    secret_key: String,
    access_token_ttl_minutes: i64,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserStore>,
        refresh_token_store: Arc<dyn RefreshTokenStore>,
        hasher: CredentialHasher,
        settings: &SecuritySettings,
    ) -> Self {
        let refresh_tokens = settings.refresh_tokens_enabled.then(|| {
            RefreshTokenIssuer::new(refresh_token_store, settings.refresh_token_ttl_hours)
        });

        Self {
            users,
            hasher,
            refresh_tokens,
            secret_key: settings.secret_key.clone(),
            access_token_ttl_minutes: settings.access_token_ttl_minutes,
        }
    }

    /// Authenticate with email and password.
    ///
    /// # Errors
    /// - `AuthError::InvalidCredentials` for an unknown email or a wrong
    ///   password, indistinguishably
    /// - crypto and store errors unchanged
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginTokens, AppError> {
        let mut stage = LoginStage::Start;

        let result = self.run_login(email, password, &mut stage).await;
        if let Err(e) = &result {
            match e {
                AppError::Auth(_) => tracing::info!(stage = %stage, "Login rejected"),
                _ => tracing::error!(stage = %stage, error = %e, "Login failed"),
            }
        }
        result
    }

    async fn run_login(
        &self,
        email: &str,
        password: &str,
        stage: &mut LoginStage,
    ) -> Result<LoginTokens, AppError> {
        let email = normalize_email(email);

        let user = match self.users.get_by_email(&email).await {
            Ok(user) => user,
            Err(e) if e.is_not_found() => {
                self.hasher.verify_dummy_blocking(password.to_string()).await;
                return Err(AuthError::InvalidCredentials.into());
            }
            Err(e) => return Err(e),
        };
        *stage = LoginStage::CredentialsFetched;

        self.hasher
            .verify_blocking(password.to_string(), user.password_hash.clone())
            .await?;
        *stage = LoginStage::PasswordChecked;

        let token = issue_access_token(
            user.id,
            &user.email,
            &user.display_name(),
            self.access_token_ttl_minutes,
            &self.secret_key,
        )?;
        *stage = LoginStage::AccessTokenIssued;

        let refresh_token = match &self.refresh_tokens {
            Some(issuer) => {
                let record = issuer.issue_and_persist(user.id).await?;
                *stage = LoginStage::RefreshTokenIssued;
                Some(record.token)
            }
            None => None,
        };

        tracing::info!(user_id = %user.id, "User logged in successfully");
        Ok(LoginTokens {
            token,
            refresh_token,
        })
    }
}

/// User registration and lookup.

use std::sync::Arc;

use uuid::Uuid;

use crate::auth::CredentialHasher;
use crate::domain::{User, UserStore};
use crate::error::AppError;
use crate::middleware::AuthenticatedUser;

pub struct UserService {
    users: Arc<dyn UserStore>,
    hasher: CredentialHasher,
}

impl UserService {
    pub fn new(users: Arc<dyn UserStore>, hasher: CredentialHasher) -> Self {
        Self { users, hasher }
    }

    /// Hash the password and create the user.
    ///
    /// Inputs must already be validated. A taken email is reported by the
    /// store as `UniqueConstraintViolation`; there is no read-before-write.
    pub async fn register(
        &self,
        first_name: String,
        last_name: String,
        email: &str,
        password: String,
    ) -> Result<User, AppError> {
        let password_hash = self.hasher.hash_blocking(password).await?;
        let user = User::new(first_name, last_name, email, password_hash);

        self.users.create(&user).await?;

        tracing::info!(user_id = %user.id, "User registered successfully");
        Ok(user)
    }

    pub async fn get(&self, id: Uuid) -> Result<User, AppError> {
        self.users.get_by_id(id).await
    }

    pub async fn list(&self) -> Result<Vec<User>, AppError> {
        self.users.list().await
    }

    /// The user the current access token was issued to
    pub async fn me(&self, current: &AuthenticatedUser) -> Result<User, AppError> {
        self.users.get_by_id(current.user_id).await
    }
}

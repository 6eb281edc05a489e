use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{RefreshToken, User};
use crate::error::AppError;

/// Persistence for user records.
///
/// Reads report a miss as `DatabaseError::NotFound`, never as an I/O
/// failure. `create` must enforce email uniqueness atomically and report a
/// duplicate as `DatabaseError::UniqueConstraintViolation`.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create(&self, user: &User) -> Result<(), AppError>;
    async fn get_by_id(&self, id: Uuid) -> Result<User, AppError>;
    /// `email` must already be normalized.
    async fn get_by_email(&self, email: &str) -> Result<User, AppError>;
    async fn list(&self) -> Result<Vec<User>, AppError>;
}

/// Persistence for refresh-token records.
#[async_trait]
pub trait RefreshTokenStore: Send + Sync {
    async fn create(&self, refresh_token: &RefreshToken) -> Result<(), AppError>;
}

/// JWT Claims structure
///
/// Payload of an access token: who the user is and until when the token
/// is good.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, AuthError};

/// JWT Claims for access tokens
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID as UUID string)
    pub sub: String,
    /// User email
    pub email: String,
    /// "First Last"
    #[serde(rename = "fullName")]
    pub full_name: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
}

impl Claims {
    /// Claims expiring `ttl_minutes` after `now` (Unix seconds).
    pub fn new(user_id: Uuid, email: String, full_name: String, ttl_minutes: i64, now: i64) -> Self {
        Self {
            sub: user_id.to_string(),
            email,
            full_name,
            exp: now + ttl_minutes * 60,
            iat: now,
        }
    }

    /// Extract user ID from claims
    ///
    /// # Errors
    /// Returns `TokenInvalid` if the subject is not a UUID
    pub fn user_id(&self) -> Result<Uuid, AppError> {
        Uuid::parse_str(&self.sub).map_err(|_| AuthError::TokenInvalid.into())
    }

    /// A token is only good strictly before its expiry second.
    pub fn is_expired_at(&self, now: i64) -> bool {
        now >= self.exp
    }
}

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

/// Lifecycle record of an issued refresh token.
///
/// `token` is the plaintext handed to the client. Stores persist only its
/// SHA-256 digest (see `auth::token_digest`).
#[derive(Debug, Clone)]
pub struct RefreshToken {
    pub id: Uuid,
    pub token: String,
    pub user_id: Uuid,
    pub expires_at: DateTime<Utc>,
    pub is_used: bool,
    pub is_revoked: bool,
    pub created_at: DateTime<Utc>,
}

impl RefreshToken {
    /// A fresh, unused, unrevoked record expiring `ttl_hours` from now.
    pub fn new(user_id: Uuid, token: String, ttl_hours: i64) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            token,
            user_id,
            expires_at: now + Duration::hours(ttl_hours),
            is_used: false,
            is_revoked: false,
            created_at: now,
        }
    }

    /// Valid iff not expired, not used and not revoked.
    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at && !self.is_used && !self.is_revoked
    }
}

/// Refresh Token Management
///
/// Refresh tokens are:
/// - 32 bytes from the operating system's CSPRNG, lowercase hex encoded
/// - Persisted as a SHA-256 digest only; the plaintext goes to the client
/// - Multiple per user (one per login session)

use std::sync::Arc;

use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::domain::{RefreshToken, RefreshTokenStore};
use crate::error::{AppError, CryptoError};

const REFRESH_TOKEN_BYTES: usize = 32;

/// Generate a new cryptographically secure refresh token
///
/// # Errors
/// `CryptoError::Randomness` if the OS RNG fails. There is no fallback to a
/// weaker source.
pub fn generate_refresh_token() -> Result<String, AppError> {
    let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| CryptoError::Randomness(e.to_string()))?;
    Ok(hex::encode(bytes))
}

/// SHA-256 of a refresh token, hex encoded. This is what stores persist and
/// look up by.
pub fn token_digest(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

/// Generates refresh tokens and records them in the store
#[derive(Clone)]
pub struct RefreshTokenIssuer {
    store: Arc<dyn RefreshTokenStore>,
    ttl_hours: i64,
}

impl RefreshTokenIssuer {
    pub fn new(store: Arc<dyn RefreshTokenStore>, ttl_hours: i64) -> Self {
        Self { store, ttl_hours }
    }

    /// Generate a token for `user_id` and persist its record.
    ///
    /// # Errors
    /// `CryptoError::Randomness`, or the store's error unchanged
    pub async fn issue_and_persist(&self, user_id: Uuid) -> Result<RefreshToken, AppError> {
        let token = generate_refresh_token()?;
        let record = RefreshToken::new(user_id, token, self.ttl_hours);

        self.store.create(&record).await?;

        tracing::debug!(user_id = %user_id, refresh_token_id = %record.id, "Refresh token issued");
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    use crate::error::DatabaseError;
    use crate::infrastructure::InMemoryRefreshTokenStore;

    struct FailingStore;

    #[async_trait::async_trait]
    impl RefreshTokenStore for FailingStore {
        async fn create(&self, _: &RefreshToken) -> Result<(), AppError> {
            Err(DatabaseError::ConnectionPool("connection refused".to_string()).into())
        }
    }

    #[test]
    fn test_generate_refresh_token() {
        let token = generate_refresh_token().unwrap();

        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f')));
    }

    #[test]
    fn test_tokens_do_not_collide() {
        let tokens: HashSet<String> = (0..10_000)
            .map(|_| generate_refresh_token().unwrap())
            .collect();

        assert_eq!(tokens.len(), 10_000);
    }

    #[test]
    fn test_token_digest() {
        let token = generate_refresh_token().unwrap();
        let digest = token_digest(&token);

        assert_eq!(digest, token_digest(&token));
        assert_ne!(digest, token);
        assert_eq!(digest.len(), 64);
        assert_ne!(digest, token_digest(&generate_refresh_token().unwrap()));
    }

    #[tokio::test]
    async fn test_issue_and_persist() {
        let store = Arc::new(InMemoryRefreshTokenStore::default());
        let issuer = RefreshTokenIssuer::new(store.clone(), 24);
        let user_id = Uuid::new_v4();

        let record = issuer.issue_and_persist(user_id).await.unwrap();

        assert_eq!(record.user_id, user_id);
        assert!(!record.is_used);
        assert!(!record.is_revoked);
        assert_eq!(record.expires_at - record.created_at, chrono::Duration::hours(24));

        let stored = store.records_for_user(user_id);
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].id, record.id);
        assert_eq!(stored[0].token, token_digest(&record.token));
    }

    #[tokio::test]
    async fn test_store_failure_surfaces_unchanged() {
        let issuer = RefreshTokenIssuer::new(Arc::new(FailingStore), 24);
        let result = issuer.issue_and_persist(Uuid::new_v4()).await;

        assert!(matches!(
            result,
            Err(AppError::Database(DatabaseError::ConnectionPool(_)))
        ));
    }
}

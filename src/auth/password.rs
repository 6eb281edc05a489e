/// Password Hashing and Verification
///
/// bcrypt with a configurable cost. The salt is embedded in the hash string,
/// so nothing besides the hash is stored.

use bcrypt::{hash, verify};

use crate::error::{AppError, AuthError, CryptoError};

const DUMMY_PASSWORD: &str = "timing-equalizer-not-a-real-password";

/// Hashes and verifies passwords.
///
/// The sync methods are CPU-bound (tens of milliseconds at production
/// cost); request handlers go through the `*_blocking` variants.
#[derive(Clone)]
pub struct CredentialHasher {
    cost: u32,
    dummy_hash: String,
}

impl CredentialHasher {
    /// # Errors
    /// Returns `CryptoError::Hashing` if `cost` is outside bcrypt's range.
    pub fn new(cost: u32) -> Result<Self, AppError> {
        let dummy_hash = hash(DUMMY_PASSWORD, cost)
            .map_err(|e| CryptoError::Hashing(e.to_string()))?;
        Ok(Self { cost, dummy_hash })
    }

    /// Hash a password using bcrypt
    pub fn hash(&self, password: &str) -> Result<String, AppError> {
        hash(password, self.cost).map_err(|e| CryptoError::Hashing(e.to_string()).into())
    }

    /// Verify a password against its hash
    ///
    /// # Errors
    /// - `AuthError::InvalidCredentials` on mismatch
    /// - `CryptoError::Hashing` if the stored hash is malformed
    pub fn verify(&self, password: &str, password_hash: &str) -> Result<(), AppError> {
        let matches = verify(password, password_hash)
            .map_err(|e| CryptoError::Hashing(e.to_string()))?;
        if matches {
            Ok(())
        } else {
            Err(AuthError::InvalidCredentials.into())
        }
    }

    /// Burn the same CPU time as a real verification. Called when the user
    /// does not exist so response timing does not reveal it.
    pub fn verify_dummy(&self, password: &str) {
        let _ = verify(password, &self.dummy_hash);
    }

    pub async fn hash_blocking(&self, password: String) -> Result<String, AppError> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await?
    }

    pub async fn verify_blocking(
        &self,
        password: String,
        password_hash: String,
    ) -> Result<(), AppError> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.verify(&password, &password_hash))
            .await?
    }

    pub async fn verify_dummy_blocking(&self, password: String) {
        let hasher = self.clone();
        let _ = tokio::task::spawn_blocking(move || hasher.verify_dummy(&password)).await;
    }
}

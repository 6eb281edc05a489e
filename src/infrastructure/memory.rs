use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use uuid::Uuid;

use crate::auth::token_digest;
use crate::domain::{RefreshToken, RefreshTokenStore, User, UserStore};
use crate::error::{AppError, DatabaseError};

// Nothing between the uniqueness check and the inserts can panic, so a
// poisoned lock still guards consistent data.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[derive(Default)]
struct UserTable {
    by_id: HashMap<Uuid, User>,
    id_by_email: HashMap<String, Uuid>,
}

/// Process-local user store. Email uniqueness is checked and the insert
/// performed under one lock.
#[derive(Default)]
pub struct InMemoryUserStore {
    table: Mutex<UserTable>,
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn create(&self, user: &User) -> Result<(), AppError> {
        let mut table = lock(&self.table);

        if table.id_by_email.contains_key(&user.email) {
            return Err(DatabaseError::UniqueConstraintViolation("users_email_key".to_string()).into());
        }
        if table.by_id.contains_key(&user.id) {
            return Err(DatabaseError::UniqueConstraintViolation("users_pkey".to_string()).into());
        }

        table.id_by_email.insert(user.email.clone(), user.id);
        table.by_id.insert(user.id, user.clone());
        Ok(())
    }

    async fn get_by_id(&self, id: Uuid) -> Result<User, AppError> {
        lock(&self.table)
            .by_id
            .get(&id)
            .cloned()
            .ok_or_else(|| DatabaseError::NotFound("user".to_string()).into())
    }

    async fn get_by_email(&self, email: &str) -> Result<User, AppError> {
        let table = lock(&self.table);
        table
            .id_by_email
            .get(email)
            .and_then(|id| table.by_id.get(id))
            .cloned()
            .ok_or_else(|| DatabaseError::NotFound("user".to_string()).into())
    }

    async fn list(&self) -> Result<Vec<User>, AppError> {
        let mut users: Vec<User> = lock(&self.table).by_id.values().cloned().collect();
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(users)
    }
}

/// Process-local refresh-token store.
///
/// Like the Postgres store it keeps only the digest: the `token` field of
/// a stored record holds `token_digest(token)`, not the plaintext.
#[derive(Default)]
pub struct InMemoryRefreshTokenStore {
    records: Mutex<Vec<RefreshToken>>,
}

impl InMemoryRefreshTokenStore {
    /// Stored records of one user, in insertion order.
    pub fn records_for_user(&self, user_id: Uuid) -> Vec<RefreshToken> {
        lock(&self.records)
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl RefreshTokenStore for InMemoryRefreshTokenStore {
    async fn create(&self, refresh_token: &RefreshToken) -> Result<(), AppError> {
        let digest = token_digest(&refresh_token.token);
        let mut records = lock(&self.records);

        if records.iter().any(|r| r.token == digest || r.id == refresh_token.id) {
            return Err(DatabaseError::UniqueConstraintViolation(
                "refresh_tokens_token_hash_key".to_string(),
            )
            .into());
        }

        records.push(RefreshToken {
            token: digest,
            ..refresh_token.clone()
        });
        Ok(())
    }
}

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// A registered user.
///
/// `password_hash` is skipped on serialization, so a `User` can be returned
/// from handlers directly.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Build a new record with a fresh id. `email` is normalized here so no
    /// caller can bypass the case policy.
    pub fn new(first_name: String, last_name: String, email: &str, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            first_name,
            last_name,
            email: normalize_email(email),
            password_hash,
            created_at: Utc::now(),
        }
    }

    /// Name carried in the access token claims
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Emails are compared case-insensitively: trimmed and lower-cased before
/// storage and before every lookup.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_is_normalized() {
        let user = User::new("Ada".into(), "Lovelace".into(), "  Ada@Example.COM ", "hash".into());
        assert_eq!(user.email, "ada@example.com");
    }

    #[test]
    fn test_display_name() {
        let user = User::new("Ada".into(), "Lovelace".into(), "ada@example.com", "hash".into());
        assert_eq!(user.display_name(), "Ada Lovelace");
    }

    #[test]
    fn test_password_hash_never_serialized() {
        let user = User::new("Ada".into(), "Lovelace".into(), "ada@example.com", "$2b$secret".into());
        let json = serde_json::to_value(&user).unwrap();

        assert!(json.get("passwordHash").is_none());
        assert!(!json.to_string().contains("$2b$secret"));
        assert_eq!(json["firstName"], "Ada");
        assert_eq!(json["email"], "ada@example.com");
        assert_eq!(json["id"], user.id.to_string());
        assert!(json["createdAt"].is_string());
    }
}

/// JWT Token Generation and Validation
///
/// Access tokens are HS256-signed JWTs carrying `Claims`. Validation uses
/// zero leeway: a token is accepted only while `now < exp`.

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::auth::claims::Claims;
use crate::error::{AppError, AuthError, CryptoError};

/// Sign a new access token
///
/// # Arguments
/// * `user_id` - Subject of the token
/// * `email` - User's email address
/// * `full_name` - Display name carried in the claims
/// * `ttl_minutes` - Lifetime of the token
/// * `secret` - HMAC key shared with the validating middleware
///
/// # Errors
/// `CryptoError::Signing` if the secret is empty, the ttl is not positive,
/// or encoding fails
pub fn issue_access_token(
    user_id: Uuid,
    email: &str,
    full_name: &str,
    ttl_minutes: i64,
    secret: &str,
) -> Result<String, AppError> {
    if secret.is_empty() {
        return Err(CryptoError::Signing("secret key is empty".to_string()).into());
    }
    if ttl_minutes <= 0 {
        return Err(CryptoError::Signing("token lifetime must be positive".to_string()).into());
    }

    let now = chrono::Utc::now().timestamp();
    let claims = Claims::new(user_id, email.to_string(), full_name.to_string(), ttl_minutes, now);

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| CryptoError::Signing(e.to_string()).into())
}

/// Validate and extract claims from an access token
///
/// # Errors
/// - `AuthError::TokenExpired` once `now >= exp`
/// - `AuthError::TokenInvalid` for a bad signature, malformed token or
///   missing `sub`/`exp`
pub fn validate_access_token(token: &str, secret: &str) -> Result<Claims, AppError> {
    if secret.is_empty() {
        return Err(AuthError::TokenInvalid.into());
    }

    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    validation.set_required_spec_claims(&["exp", "sub"]);

    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| {
        tracing::debug!("JWT validation error: {}", e);
        match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::TokenInvalid,
        }
    })?;

    // jsonwebtoken still accepts the exact expiry second
    if claims.is_expired_at(chrono::Utc::now().timestamp()) {
        return Err(AuthError::TokenExpired.into());
    }

    Ok(claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine;

    const SECRET: &str = "test-secret-key-at-least-32-characters-long";

    fn decode_claims_segment(token: &str) -> serde_json::Value {
        let segment = token.split('.').nth(1).expect("missing claims segment");
        let bytes = URL_SAFE_NO_PAD.decode(segment).expect("claims segment is not base64url");
        serde_json::from_slice(&bytes).expect("claims segment is not JSON")
    }

    #[test]
    fn test_generate_and_validate_token() {
        let user_id = Uuid::new_v4();
        let token = issue_access_token(user_id, "a@b.com", "A B", 15, SECRET)
            .expect("Failed to generate token");
        let claims = validate_access_token(&token, SECRET).expect("Failed to validate token");

        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.email, "a@b.com");
        assert_eq!(claims.full_name, "A B");
    }

    #[test]
    fn test_token_has_three_segments_with_expected_claims() {
        let user_id = Uuid::new_v4();
        let issued_at = chrono::Utc::now().timestamp();
        let token = issue_access_token(user_id, "a@b.com", "A B", 15, SECRET).unwrap();

        assert_eq!(token.split('.').count(), 3);

        let claims = decode_claims_segment(&token);
        assert_eq!(claims["sub"], user_id.to_string());
        assert_eq!(claims["email"], "a@b.com");
        assert_eq!(claims["fullName"], "A B");

        let exp = claims["exp"].as_i64().expect("exp is not a number");
        assert!((exp - (issued_at + 15 * 60)).abs() <= 1);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = issue_access_token(Uuid::new_v4(), "a@b.com", "A B", 15, SECRET).unwrap();
        let result = validate_access_token(&token, "another-secret-key");

        assert!(matches!(result, Err(AppError::Auth(AuthError::TokenInvalid))));
    }

    #[test]
    fn test_expired_token_rejected() {
        let now = chrono::Utc::now().timestamp();
        let mut claims = Claims::new(Uuid::new_v4(), "a@b.com".into(), "A B".into(), 15, now);
        claims.exp = now - 10;

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        let result = validate_access_token(&token, SECRET);
        assert!(matches!(result, Err(AppError::Auth(AuthError::TokenExpired))));
    }

    #[test]
    fn test_token_expiring_this_second_rejected() {
        let now = chrono::Utc::now().timestamp();
        let mut claims = Claims::new(Uuid::new_v4(), "a@b.com".into(), "A B".into(), 15, now);
        claims.exp = now;

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert!(validate_access_token(&token, SECRET).is_err());
    }

    #[test]
    fn test_invalid_token() {
        assert!(validate_access_token("invalid.token.here", SECRET).is_err());
    }

    #[test]
    fn test_tampered_token() {
        let token = issue_access_token(Uuid::new_v4(), "a@b.com", "A B", 15, SECRET).unwrap();
        let tampered = format!("{}X", token);

        assert!(validate_access_token(&tampered, SECRET).is_err());
    }

    #[test]
    fn test_empty_secret_cannot_sign() {
        let result = issue_access_token(Uuid::new_v4(), "a@b.com", "A B", 15, "");
        assert!(matches!(result, Err(AppError::Crypto(CryptoError::Signing(_)))));
    }

    #[test]
    fn test_non_positive_ttl_cannot_sign() {
        let result = issue_access_token(Uuid::new_v4(), "a@b.com", "A B", 0, SECRET);
        assert!(matches!(result, Err(AppError::Crypto(CryptoError::Signing(_)))));
    }
}

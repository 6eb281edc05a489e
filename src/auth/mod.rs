/// Authentication module
///
/// Password hashing, access-token signing/validation, refresh-token
/// issuance and the login flow that ties them together.

mod claims;
mod jwt;
mod password;
mod refresh_token;
mod service;

pub use claims::Claims;
pub use jwt::issue_access_token;
pub use jwt::validate_access_token;
pub use password::CredentialHasher;
pub use refresh_token::generate_refresh_token;
pub use refresh_token::token_digest;
pub use refresh_token::RefreshTokenIssuer;
pub use service::{AuthService, LoginStage, LoginTokens};

/// Domain records and the storage ports the services depend on.

mod refresh_token;
mod store;
mod user;

pub use refresh_token::RefreshToken;
pub use store::{RefreshTokenStore, UserStore};
pub use user::{normalize_email, User};

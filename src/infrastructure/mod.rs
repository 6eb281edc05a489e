/// Store implementations: Postgres for deployments, in-memory for tests
/// and the `memory` storage backend.

mod memory;
mod postgres;

pub use memory::{InMemoryRefreshTokenStore, InMemoryUserStore};
pub use postgres::{PgRefreshTokenStore, PgUserStore};

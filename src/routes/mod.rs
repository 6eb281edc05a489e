mod auth;
mod health_check;
mod users;

use std::future::Future;
use std::time::Duration;

pub use auth::login;
pub use health_check::health_check;
pub use users::{create_user, get_current_user, get_user, list_users};

use crate::error::AppError;

/// Deadline for the service work of a single request
#[derive(Debug, Clone, Copy)]
pub struct RequestTimeout(pub Duration);

/// Run `work` under the request deadline. On expiry the future is dropped,
/// cancelling any in-flight store call, and a storage timeout is returned.
pub(crate) async fn bounded<T, F>(timeout: &RequestTimeout, work: F) -> Result<T, AppError>
where
    F: Future<Output = Result<T, AppError>>,
{
    tokio::time::timeout(timeout.0, work).await?
}

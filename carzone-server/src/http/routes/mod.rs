//! HTTP route handlers

pub mod cars;
pub mod engines;
pub mod health;
pub mod login;

use std::future::Future;
use std::time::Duration;

use crate::http::error::ApiError;
use crate::service::ServiceResult;

/// Run a service call within the request budget.
///
/// On elapse the call is dropped, which aborts any in-flight statement
/// and rolls back its transaction.
pub(crate) async fn bounded<T, F>(limit: Duration, call: F) -> Result<T, ApiError>
where
    F: Future<Output = ServiceResult<T>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result.map_err(ApiError::from),
        Err(_) => {
            tracing::warn!(?limit, "request budget exceeded");
            Err(ApiError::Timeout {
                seconds: limit.as_secs(),
            })
        }
    }
}

//! Timeout guard shared by every pipeline stage.

use std::future::Future;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{label} timed out after {duration_ms}ms")]
pub struct TimeoutError {
    pub label: String,
    pub duration_ms: u64,
}

/// Races `operation` against a `duration` deadline.
///
/// On expiry the operation is dropped and its eventual result is never observed.
pub async fn with_timeout<F, T>(
    operation: F,
    duration: Duration,
    label: &str,
) -> Result<T, TimeoutError>
where
    F: Future<Output = T>,
{
    tokio::time::timeout(duration, operation)
        .await
        .map_err(|_| TimeoutError {
            label: label.to_string(),
            duration_ms: duration.as_millis() as u64,
        })
}

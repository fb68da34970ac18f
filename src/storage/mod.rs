//! Storage mechanisms for persisting and retrieving platform records

pub mod memory;
pub mod traits;

// Re-export main components
pub use memory::MemoryStore;
pub use traits::{ContentStore, RoadmapStore, StoreProvider, UserStore};

use std::future::Future;
use std::time::Duration;

use crate::constants::STORE_RETRY_BACKOFF_MS;
use crate::error::{FinLearnError, Result};

/// Bound a store access with a deadline. A timed-out access fails closed
/// as `UpstreamUnavailable` and is never treated as authorized.
pub async fn guarded<T, F>(deadline: Duration, operation: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(deadline, operation).await {
        Ok(result) => result,
        Err(_) => Err(FinLearnError::UpstreamUnavailable(
            "entitlement store timed out".to_string(),
        )),
    }
}

/// Retry a transient store failure once after a short backoff.
/// Authentication and authorization failures are never retried.
pub async fn with_retry<T, F, Fut>(operation: F) -> Result<T>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    match operation().await {
        Err(FinLearnError::UpstreamUnavailable(reason)) => {
            log::warn!("Store access failed ({}), retrying once", reason);
            tokio::time::sleep(Duration::from_millis(STORE_RETRY_BACKOFF_MS)).await;
            operation().await
        }
        other => other,
    }
}

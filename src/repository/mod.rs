//! Database repository layer

pub mod memory_repo;
pub mod user_repo;

pub use memory_repo::MemoryUserStore;
pub use user_repo::{PgUserStore, UserStore};

use crate::error::AppError;
use std::{future::Future, time::Duration};

/// Bound a store call; expiry surfaces as `StoreUnavailable`
pub async fn with_timeout<T, F>(limit: Duration, call: F) -> Result<T, AppError>
where
    F: Future<Output = Result<T, AppError>>,
{
    tokio::time::timeout(limit, call).await.map_err(|elapsed| {
        tracing::error!(timeout_ms = limit.as_millis() as u64, "User store call timed out");
        AppError::from(elapsed)
    })?
}

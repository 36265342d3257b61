use crate::BackendResult;

use async_trait::async_trait;

/// Durable string store that survives process restarts.
#[async_trait]
pub trait KeyValueCache: Send + Sync {
    async fn get(&self, key: &str) -> BackendResult<Option<String>>;

    async fn set(&self, key: &str, value: &str) -> BackendResult<()>;

    /// Removing an absent key succeeds.
    async fn delete(&self, key: &str) -> BackendResult<()>;
}

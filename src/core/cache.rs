//! Key-value storage abstractions used for persisted application state.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// A named set of byte keys and values with optional expiry.
#[async_trait]
pub trait KeyValueCollection: Send + Sync {
    async fn get(&self, key: &[u8]) -> Option<Vec<u8>>;
    async fn put(&self, key: &[u8], value: &[u8], ttl: Option<Duration>);
    async fn remove(&self, key: &[u8]);
    async fn clear(&self);
}

/// Hands out collections by name.
pub trait Store: Send + Sync {
    /// Returns the collection called `name`. With `persist` the collection is
    /// backed by disk; `None` means it does not exist or could not be opened.
    fn get_collection(
        &self,
        name: &str,
        persist: bool,
        create_if_missing: bool,
    ) -> Option<Arc<dyn KeyValueCollection>>;
}

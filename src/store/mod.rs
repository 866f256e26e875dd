pub mod disk;
pub mod memory;

use crate::core::cache::{KeyValueCollection, Store};
use disk::DiskCollection;
use fjall::{Keyspace, PartitionCreateOptions};
use memory::MemoryCollection;
use std::{
    collections::HashMap,
    path::Path,
    sync::{Arc, RwLock},
};
use tracing::warn;

/// A thread-safe key-value store that can hold multiple collections.
pub struct KeyValueStore {
    collections: RwLock<HashMap<String, Arc<dyn KeyValueCollection>>>,
    keyspace: Option<Arc<Keyspace>>,
}

impl KeyValueStore {
    /// Opens the store under `data_path/cache`. If the keyspace cannot be
    /// opened only in-memory collections are available.
    pub fn open(data_path: &Path) -> Self {
        let cache_dir = data_path.join("cache");
        let keyspace = match fjall::Config::new(&cache_dir).open() {
            Ok(ks) => Some(Arc::new(ks)),
            Err(e) => {
                warn!(
                    "Could not open cache at {}: {}. Falling back to memory",
                    cache_dir.display(),
                    e
                );
                None
            }
        };

        Self {
            collections: RwLock::new(HashMap::new()),
            keyspace,
        }
    }

    /// Persistent collection if possible, memory otherwise.
    pub fn collection_or_memory(&self, name: &str) -> Arc<dyn KeyValueCollection> {
        self.get_collection(name, true, true)
            .or_else(|| self.get_collection(name, false, true))
            .unwrap_or_else(|| Arc::new(MemoryCollection::new()))
    }
}

impl Store for KeyValueStore {
    fn get_collection(
        &self,
        name: &str,
        persist: bool,
        create_if_missing: bool,
    ) -> Option<Arc<dyn KeyValueCollection>> {
        if let Some(existing) = self.collections.read().unwrap().get(name) {
            return Some(Arc::clone(existing));
        }
        if !create_if_missing {
            return None;
        }

        let new_collection: Arc<dyn KeyValueCollection> = if persist {
            let keyspace = self.keyspace.as_ref()?;
            let partition = keyspace
                .open_partition(name, PartitionCreateOptions::default())
                .ok()?;
            Arc::new(DiskCollection::new(Arc::clone(keyspace), partition))
        } else {
            Arc::new(MemoryCollection::new())
        };

        let mut collections = self.collections.write().unwrap();
        Some(Arc::clone(
            collections
                .entry(name.to_string())
                .or_insert(new_collection),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_persistent_collection_survives_reopen() {
        let dir = tempdir().unwrap();
        {
            let store = KeyValueStore::open(dir.path());
            let collection = store.get_collection("snapshots", true, true).unwrap();
            collection.put(b"latest", b"data", None).await;
        }

        let store = KeyValueStore::open(dir.path());
        let collection = store.get_collection("snapshots", true, true).unwrap();
        assert_eq!(collection.get(b"latest").await, Some(b"data".to_vec()));
    }

    #[tokio::test]
    async fn test_store_without_disk_uses_memory() {
        let store = KeyValueStore {
            collections: RwLock::new(HashMap::new()),
            keyspace: None,
        };
        assert!(store.get_collection("snapshots", true, true).is_none());
        assert!(store.get_collection("snapshots", false, false).is_none());

        let collection = store.collection_or_memory("snapshots");
        collection.put(b"k", b"v", None).await;

        let again = store.get_collection("snapshots", false, false).unwrap();
        assert_eq!(again.get(b"k").await, Some(b"v".to_vec()));
    }
}

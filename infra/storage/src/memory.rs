use crate::engine::Storage;
use crate::error::StorageError;
use crate::namespace::KeyPolicy;
use async_trait::async_trait;
use fxhash::FxHashMap;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::debug;

/// In-memory [`Storage`] used by tests and local runs.
///
/// Entries are kept under their physical keys, exactly as a networked engine would hold
/// them, so prefix handling is indistinguishable from a real backend. A single mutex
/// guards the map and is only held for the map operation itself.
///
/// Cloning is cheap and clones share the same table.
#[derive(Debug, Clone, Default)]
pub struct MockStorage {
    policy: KeyPolicy,
    entries: Arc<Mutex<FxHashMap<String, Vec<u8>>>>,
}

impl MockStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_policy(policy: KeyPolicy) -> Self {
        Self { policy, entries: Arc::default() }
    }

    /// Number of entries across every namespace, including foreign ones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Inserts a physical key verbatim, bypassing the policy. Simulates other tenants.
    pub fn insert_raw(&self, physical: impl Into<String>, value: impl Into<Vec<u8>>) {
        self.entries.lock().insert(physical.into(), value.into());
    }
}

#[async_trait]
impl Storage for MockStorage {
    fn backend(&self) -> &'static str {
        "memory"
    }

    fn policy(&self) -> &KeyPolicy {
        &self.policy
    }

    async fn store(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        KeyPolicy::check_key(key)?;
        let physical = self.policy.qualify(key);
        debug!(key = %physical, bytes = value.len(), "Storing value");
        self.entries.lock().insert(physical, value.to_vec());
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let physical = self.policy.qualify(key);
        Ok(self.entries.lock().get(&physical).cloned())
    }

    async fn contains(&self, key: &str) -> Result<bool, StorageError> {
        let physical = self.policy.qualify(key);
        Ok(self.entries.lock().contains_key(&physical))
    }

    async fn delete(&self, key: &str) -> Result<bool, StorageError> {
        let physical = self.policy.qualify(key);
        let removed = self.entries.lock().remove(&physical).is_some();
        debug!(key = %physical, removed, "Deleting value");
        Ok(removed)
    }

    async fn keys(&self) -> Result<Vec<String>, StorageError> {
        let entries = self.entries.lock();
        Ok(entries.keys().filter_map(|k| self.policy.unqualify(k)).map(str::to_owned).collect())
    }

    async fn clean(&self, prefix: &str) -> Result<(), StorageError> {
        let physical = self.policy.qualify(prefix);
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|k, _| !k.starts_with(&physical));
        debug!(prefix = %physical, removed = before - entries.len(), "Cleaned namespace");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn keys_hide_foreign_namespaces() {
        let storage = MockStorage::new();
        storage.insert_raw("consul_internal", b"x".to_vec());
        storage.store_string("k1", "v1").await.unwrap();

        assert_eq!(storage.len(), 2);
        assert_eq!(storage.keys().await.unwrap(), vec!["k1".to_owned()]);
    }

    #[tokio::test]
    async fn clean_leaves_foreign_namespaces() {
        let storage = MockStorage::new();
        storage.insert_raw("consul_internal", b"x".to_vec());
        storage.store_string("k1", "v1").await.unwrap();

        storage.clean("").await.unwrap();
        assert!(storage.keys().await.unwrap().is_empty());
        assert_eq!(storage.len(), 1);
    }

    #[tokio::test]
    async fn clones_share_state() {
        let storage = MockStorage::new();
        let clone = storage.clone();
        storage.store_string("k1", "v1").await.unwrap();
        assert!(clone.contains("k1").await.unwrap());
    }

    #[tokio::test]
    async fn empty_key_is_rejected() {
        let storage = MockStorage::new();
        let err = storage.store("", b"v").await.unwrap_err();
        assert!(matches!(err, StorageError::InvalidKey { .. }));
    }
}

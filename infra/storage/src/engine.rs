//! The storage contract every backing engine and test double implements.
//!
//! All keys crossing this trait are **caller keys**: implementations add the structural
//! prefix of their [`KeyPolicy`] before touching the engine and remove it again before
//! returning keys, so callers never see internal namespacing.

use crate::error::StorageError;
use crate::namespace::KeyPolicy;
use async_trait::async_trait;
use std::fmt::Debug;
use std::sync::Arc;

/// A thread-safe handle to any [`Storage`] implementation.
pub type SharedStorage = Arc<dyn Storage>;

/// Key-value storage with a found/not-found channel separate from failures.
///
/// `Ok(None)` / `Ok(false)` mean the key is absent. `Err(_)` always means the engine failed.
#[async_trait]
pub trait Storage: Send + Sync + Debug + 'static {
    /// Short engine label used in diagnostics (`"memory"`, `"consul"`).
    fn backend(&self) -> &'static str;

    /// The namespace policy this instance applies.
    fn policy(&self) -> &KeyPolicy;

    /// Writes or overwrites `key`.
    async fn store(&self, key: &str, value: &[u8]) -> Result<(), StorageError>;

    /// Stores the UTF-8 bytes of `value`.
    async fn store_string(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.store(key, value.as_bytes()).await
    }

    /// Reads `key`, `Ok(None)` when absent.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;

    /// Checks existence without transferring the value.
    async fn contains(&self, key: &str) -> Result<bool, StorageError>;

    /// Removes `key` and reports whether it existed. Deleting an absent key is not an error.
    async fn delete(&self, key: &str) -> Result<bool, StorageError>;

    /// Lists every caller key in this namespace. Never fails just because the store is empty.
    async fn keys(&self) -> Result<Vec<String>, StorageError>;

    /// Removes every caller key starting with `prefix`. An empty prefix clears the namespace.
    async fn clean(&self, prefix: &str) -> Result<(), StorageError>;
}

//! Prefixed key-value storage for environment metadata.
//!
//! Every backend stores keys under a structural prefix that marks them as ours inside a
//! shared engine, and hides that prefix from callers. The rules live in [`KeyPolicy`]
//! and are shared by all implementations.
//!
//! # Architectural Overview
//!
//! 1.  **[`Storage`]**: the async contract handlers program against.
//! 2.  **[`MockStorage`]**: lock-guarded in-memory map, used in tests and local runs.
//! 3.  **[`ConsulStorage`]**: adapter for the Consul KV HTTP API, built with [`ConsulBuilder`].
//!
//! # Examples
//!
//! ```rust
//! use envstore_storage::{MockStorage, Storage, StorageError};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), StorageError> {
//!     let storage = MockStorage::new();
//!
//!     storage.store_string("test_key", "test_value").await?;
//!     assert_eq!(storage.get("test_key").await?, Some(b"test_value".to_vec()));
//!
//!     // Callers never see the structural prefix.
//!     assert_eq!(storage.keys().await?, vec!["test_key".to_owned()]);
//!
//!     assert!(storage.delete("test_key").await?);
//!     assert!(!storage.delete("test_key").await?);
//!     Ok(())
//! }
//! ```

mod builder;
mod consul;
mod engine;
mod error;
mod memory;
mod namespace;

pub use builder::{ConsulBuilder, NoAddress, WithAddress};
pub use consul::ConsulStorage;
pub use engine::{SharedStorage, Storage};
pub use error::{StorageError, StorageErrorExt};
pub use memory::MockStorage;
pub use namespace::{EKARA_PREFIX, KeyPolicy, STORAGE_PREFIX};

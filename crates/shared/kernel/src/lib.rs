//! Kernel utilities shared by the server binary.
//! Keep this crate lightweight; it owns config loading, the route table and the request handlers.
//!
//! ## Serving the storage API
//! ```rust
//! use envstore_kernel::prelude::*;
//! use envstore_kernel::storage::MockStorage;
//! use std::sync::Arc;
//!
//! let state = ApiState::builder()
//!     .config(ApiConfig::default())
//!     .storage(Arc::new(MockStorage::new()))
//!     .build()
//!     .unwrap();
//!
//! let routes = storage_routes("/storage").unwrap();
//! assert!(routes.route("getValue").is_ok());
//!
//! let _app: axum::Router = router::build(&routes, state);
//! ```
//!
//! ## Config loading
//! ```rust,ignore
//! use envstore_kernel::config::load_config;
//! let cfg: serde_json::Value = load_config::<serde_json::Value>(Some("server")).unwrap();
//! ```
pub mod config;
pub mod prelude;
pub mod server;

pub use envstore_domain as domain;
pub use envstore_storage as storage;

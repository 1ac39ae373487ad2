use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A key with its value, as exchanged by the CRUD routes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreEntry {
    pub key: String,
    pub value: String,
}

impl StoreEntry {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self { key: key.into(), value: value.into() }
    }
}

/// Body of `GET /infos`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiInfo {
    pub name: String,
    pub version: String,
    pub backend: String,
    /// Environment field name to whether it is currently stored.
    pub environment: BTreeMap<String, bool>,
}

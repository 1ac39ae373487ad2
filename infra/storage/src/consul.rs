//! [`Storage`] adapter for the Consul KV HTTP API.
//!
//! | Operation  | Request                                   |
//! |------------|-------------------------------------------|
//! | `store`    | `PUT /v1/kv/<key>` with the raw value      |
//! | `get`      | `GET /v1/kv/<key>?raw`                    |
//! | `contains` | `GET /v1/kv/<key>?keys`, exact match      |
//! | `delete`   | `contains`, then `DELETE /v1/kv/<key>`    |
//! | `keys`     | `GET /v1/kv/<structural>?keys`            |
//! | `clean`    | `DELETE /v1/kv/<structural><prefix>?recurse` |
//!
//! Consul answers `404` for absent keys and empty listings; both map to "not found",
//! never to an error.

use crate::builder::ConsulBuilder;
use crate::engine::Storage;
use crate::error::{StorageError, StorageErrorExt};
use crate::namespace::KeyPolicy;
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use tracing::{debug, trace};

const TOKEN_HEADER: &str = "X-Consul-Token";

/// Consul-backed [`Storage`]. Cheap to clone; clones share the HTTP connection pool.
#[derive(Debug, Clone)]
pub struct ConsulStorage {
    client: Client,
    base: Url,
    token: Option<String>,
    policy: KeyPolicy,
}

impl ConsulStorage {
    #[must_use = "The adapter is not usable until you call .address(..).connect()"]
    pub fn builder() -> ConsulBuilder {
        ConsulBuilder::new()
    }

    pub(crate) const fn new(
        client: Client,
        base: Url,
        token: Option<String>,
        policy: KeyPolicy,
    ) -> Self {
        Self { client, base, token, policy }
    }

    /// Absolute URL of a physical key, with an optional bare query flag (`raw`, `keys`, ...).
    pub fn kv_url(&self, physical: &str, flag: Option<&str>) -> Result<Url, StorageError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| StorageError::InvalidConfiguration {
                message: self.base.to_string().into(),
                context: Some("Consul address cannot carry a path".into()),
            })?
            .pop_if_empty()
            .extend(["v1", "kv", physical]);
        url.set_query(flag);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        trace!(%method, %url, "Consul request");
        let request = self.client.request(method, url);
        match &self.token {
            Some(token) => request.header(TOKEN_HEADER, token),
            None => request,
        }
    }

    /// Physical keys starting with `physical_prefix`; empty when Consul reports none.
    async fn list(&self, physical_prefix: &str) -> Result<Vec<String>, StorageError> {
        let url = self.kv_url(physical_prefix, Some("keys"))?;
        let response =
            self.request(Method::GET, url).send().await.context("Listing Consul keys")?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }
        ensure_success(response, "Listing Consul keys")
            .await?
            .json::<Vec<String>>()
            .await
            .context("Decoding Consul key listing")
    }
}

async fn ensure_success(response: Response, operation: &'static str) -> Result<Response, StorageError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(StorageError::Backend {
        status: status.as_u16(),
        message: body.into(),
        context: Some(operation.into()),
    })
}

#[async_trait]
impl Storage for ConsulStorage {
    fn backend(&self) -> &'static str {
        "consul"
    }

    fn policy(&self) -> &KeyPolicy {
        &self.policy
    }

    async fn store(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        KeyPolicy::check_key(key)?;
        let physical = self.policy.qualify(key);
        let url = self.kv_url(&physical, None)?;
        let response = self
            .request(Method::PUT, url)
            .body(value.to_vec())
            .send()
            .await
            .context("Writing Consul key")?;
        ensure_success(response, "Writing Consul key").await?;
        debug!(key = %physical, bytes = value.len(), "Stored value in Consul");
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let physical = self.policy.qualify(key);
        let url = self.kv_url(&physical, Some("raw"))?;
        let response = self.request(Method::GET, url).send().await.context("Reading Consul key")?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let bytes = ensure_success(response, "Reading Consul key")
            .await?
            .bytes()
            .await
            .context("Reading Consul value body")?;
        Ok(Some(bytes.to_vec()))
    }

    async fn contains(&self, key: &str) -> Result<bool, StorageError> {
        let physical = self.policy.qualify(key);
        Ok(self.list(&physical).await?.iter().any(|k| *k == physical))
    }

    async fn delete(&self, key: &str) -> Result<bool, StorageError> {
        if !self.contains(key).await? {
            return Ok(false);
        }
        let physical = self.policy.qualify(key);
        let url = self.kv_url(&physical, None)?;
        let response =
            self.request(Method::DELETE, url).send().await.context("Deleting Consul key")?;
        ensure_success(response, "Deleting Consul key").await?;
        debug!(key = %physical, "Deleted value from Consul");
        Ok(true)
    }

    async fn keys(&self) -> Result<Vec<String>, StorageError> {
        let listed = self.list(self.policy.structural()).await?;
        Ok(listed.iter().filter_map(|k| self.policy.unqualify(k)).map(str::to_owned).collect())
    }

    async fn clean(&self, prefix: &str) -> Result<(), StorageError> {
        let physical = self.policy.qualify(prefix);
        let url = self.kv_url(&physical, Some("recurse"))?;
        let response =
            self.request(Method::DELETE, url).send().await.context("Cleaning Consul prefix")?;
        ensure_success(response, "Cleaning Consul prefix").await?;
        debug!(prefix = %physical, "Cleaned Consul prefix");
        Ok(())
    }
}

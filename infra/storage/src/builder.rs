use crate::consul::ConsulStorage;
use crate::error::{StorageError, StorageErrorExt};
use crate::namespace::KeyPolicy;
use private::Sealed;
use reqwest::Url;
use std::time::Duration;
use tracing::info;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
struct ConsulConfig {
    token: Option<String>,
    timeout: Duration,
    policy: KeyPolicy,
}

impl Default for ConsulConfig {
    fn default() -> Self {
        Self { token: None, timeout: DEFAULT_TIMEOUT, policy: KeyPolicy::default() }
    }
}

#[derive(Debug, Default)]
pub struct NoAddress;
#[derive(Debug)]
pub struct WithAddress(String);

mod private {
    pub(super) trait Sealed {}
}
impl Sealed for NoAddress {}
impl Sealed for WithAddress {}

/// Fluent builder for [`ConsulStorage`]. The agent address is mandatory.
#[allow(private_bounds)]
#[derive(Debug, Default)]
pub struct ConsulBuilder<S: Sealed = NoAddress> {
    state: S,
    config: ConsulConfig,
}

#[allow(private_bounds)]
impl<S: Sealed> ConsulBuilder<S> {
    /// ACL token sent as `X-Consul-Token`.
    #[must_use = "Sets the ACL token for the Consul agent"]
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.config.token = Some(token.into());
        self
    }

    /// Per-request timeout for every KV call.
    #[must_use = "Sets the request timeout for the Consul agent"]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    #[must_use = "Sets the key namespace policy"]
    pub fn policy(mut self, policy: KeyPolicy) -> Self {
        self.config.policy = policy;
        self
    }

    fn transition<N: Sealed>(self, state: N) -> ConsulBuilder<N> {
        ConsulBuilder { state, config: self.config }
    }
}

impl ConsulBuilder<NoAddress> {
    #[must_use = "Creates a new Consul builder with default configuration"]
    pub fn new() -> Self {
        Self::default()
    }

    /// Base URL of the Consul agent, e.g. `http://127.0.0.1:8500`.
    #[must_use = "Sets the address of the Consul agent"]
    pub fn address(self, address: impl Into<String>) -> ConsulBuilder<WithAddress> {
        self.transition(WithAddress(address.into()))
    }
}

impl ConsulBuilder<WithAddress> {
    /// Validates the address and builds the HTTP client.
    ///
    /// No request is sent; an unreachable agent surfaces on the first storage call.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidConfiguration`] if the address is not an absolute http(s) URL,
    /// and [`StorageError::Http`] if the HTTP client cannot be constructed.
    pub fn connect(self) -> Result<ConsulStorage, StorageError> {
        let raw = self.state.0;
        let base = Url::parse(&raw).map_err(|e| StorageError::InvalidConfiguration {
            message: format!("{raw}: {e}").into(),
            context: Some("Consul address is not a valid URL".into()),
        })?;
        if base.cannot_be_a_base() || !matches!(base.scheme(), "http" | "https") {
            return Err(StorageError::InvalidConfiguration {
                message: raw.into(),
                context: Some("Consul address must be an http(s) URL".into()),
            });
        }

        let client = reqwest::Client::builder()
            .timeout(self.config.timeout)
            .build()
            .context("Building Consul HTTP client")?;

        info!(address = %base, timeout = ?self.config.timeout, "Consul storage configured");
        Ok(ConsulStorage::new(client, base, self.config.token, self.config.policy))
    }
}

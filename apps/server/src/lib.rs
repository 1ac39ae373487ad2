//! # EnvStore Server
//!
//! HTTP API over a prefixed key-value store, built on `Axum` with an in-memory or Consul backend.
//!
//! ## Example
//! ```no_run
//! use envstore_server::Server;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     Server::builder()
//!         .port(4583)
//!         .build()?
//!         .run()
//!         .await
//! }
//! ```

mod router;

use anyhow::{Context, Result};
use axum::Router;
use axum_server::Handle;
use envstore_kernel::domain::config::{ApiConfig, StorageBackend};
use envstore_kernel::domain::constants::MANDATORY_ROUTES;
use envstore_kernel::prelude::{ApiState, Routes, SharedStorage, storage_routes};
use envstore_kernel::storage::{ConsulStorage, MockStorage};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing::{error, info};

const SHUTDOWN_GRACE: Duration = Duration::from_secs(30);

/// A fluent builder for configuring and initializing the [`Server`].
#[must_use = "builders do nothing unless you call .build()"]
#[derive(Debug, Default)]
pub struct ServerBuilder {
    cfg: ApiConfig,
    storage: Option<SharedStorage>,
}

impl ServerBuilder {
    /// Set up the server's configuration.
    pub fn config(mut self, cfg: ApiConfig) -> Self {
        self.cfg = cfg;
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.cfg.server.port = port;
        self
    }

    /// Serves `storage` instead of the backend named in the configuration.
    pub fn storage(mut self, storage: SharedStorage) -> Self {
        self.storage = Some(storage);
        self
    }

    fn init_storage(&self) -> Result<SharedStorage> {
        match self.cfg.storage.backend {
            StorageBackend::Memory => {
                info!("Using in-memory storage, data is lost on shutdown");
                Ok(Arc::new(MockStorage::new()))
            },
            StorageBackend::Consul => {
                let consul_cfg = &self.cfg.storage.consul;
                let mut builder = ConsulStorage::builder()
                    .timeout(Duration::from_secs(consul_cfg.timeout_secs))
                    .address(&consul_cfg.address);
                if let Some(token) = &consul_cfg.token {
                    builder = builder.token(token);
                }
                let consul = builder.connect().context("Failed to configure Consul storage")?;
                Ok(Arc::new(consul))
            },
        }
    }

    /// Consumes the builder and initializes the server.
    ///
    /// # Process
    /// 1. Selects the storage backend (unless one was injected)
    /// 2. Builds the route table and checks every mandatory route is present
    /// 3. Constructs application state
    ///
    /// # Errors
    /// Returns an error if:
    /// * The Consul address is not a valid http(s) URL
    /// * The route table is invalid or misses a mandatory route
    pub fn build(mut self) -> Result<Server> {
        let storage = match self.storage.take() {
            Some(storage) => storage,
            None => self.init_storage()?,
        };

        let routes = storage_routes(&self.cfg.routes.prefix).context("Invalid route table")?;
        routes.require(MANDATORY_ROUTES).context("Incomplete route table")?;

        info!(
            backend = storage.backend(),
            prefix = %self.cfg.routes.prefix,
            routes = routes.len(),
            "Initializing server"
        );

        let state = ApiState::builder()
            .config(self.cfg)
            .storage(storage)
            .build()
            .context("Failed to finalize API state")?;
        Ok(Server { state, routes })
    }
}

/// A fully initialized server instance ready to run.
#[must_use = "call .run().await to start the server"]
#[derive(Debug)]
pub struct Server {
    state: ApiState,
    routes: Routes,
}

impl Server {
    /// Returns a new [`ServerBuilder`] to configure the server.
    pub fn builder() -> ServerBuilder {
        ServerBuilder::default()
    }

    /// The complete HTTP application, without binding a socket.
    pub fn router(&self) -> Router {
        router::init(&self.routes, self.state.clone())
    }

    /// Starts the server and runs until the shutdown signal is received.
    ///
    /// # Errors
    /// Returns an error if the server fails to bind to the configured address.
    pub async fn run(self) -> Result<()> {
        let cfg = self.state.config.clone();
        let address = SocketAddr::new(cfg.server.address, cfg.server.port);
        let app = self.router();

        let handle = Handle::<SocketAddr>::new();
        let shutdown_handle = handle.clone();

        tokio::spawn(async move {
            if let Err(e) = shutdown_signal().await {
                error!("Error while waiting for shutdown signal: {e}");
                return;
            }
            info!("Shutdown signal received, starting graceful shutdown...");
            shutdown_handle.graceful_shutdown(Some(SHUTDOWN_GRACE));
        });

        info!("Starting HTTP server on http://{address}");

        axum_server::bind(address)
            .handle(handle)
            .serve(app.into_make_service())
            .await
            .context("HTTP server failed")?;

        info!("Server shutdown complete");
        Ok(())
    }

    /// Returns a reference to the application state.
    #[must_use]
    pub const fn state(&self) -> &ApiState {
        &self.state
    }

    #[must_use]
    pub const fn routes(&self) -> &Routes {
        &self.routes
    }
}

/// Listens for shutdown signals (Ctrl+C, SIGTERM).
async fn shutdown_signal() -> Result<()> {
    let ctrl_c = async { signal::ctrl_c().await.context("Failed to install Ctrl+C handler") };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .context("Failed to install SIGTERM handler")?
            .recv()
            .await;
        Ok::<_, anyhow::Error>(())
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<Result<()>>();

    tokio::select! {
        res = ctrl_c => res?,
        res = terminate => res?,
    }

    Ok(())
}

use anyhow::Context;
use envstore_kernel::config::{DEFAULT_PATH, config_file_exists, load_config_or_default};
use envstore_kernel::domain::config::ApiConfig;
use envstore_logger::Logger;
use envstore_server::Server;
use std::path::PathBuf;
use tracing::warn;

/// `envstore-server [CONFIG]`, where `CONFIG` defaults to `server.{toml,yaml,json}`.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let path = std::env::args_os().nth(1).map_or_else(|| PathBuf::from(DEFAULT_PATH), PathBuf::from);
    let cfg: ApiConfig =
        load_config_or_default(Some(&path)).context("Critical: Configuration is malformed")?;

    let mut logger = Logger::builder()
        .name(env!("CARGO_PKG_NAME"))
        .level_str(&cfg.log.level)?
        .json(cfg.log.json);
    if let Some(dir) = &cfg.log.dir {
        logger = logger.file(dir.clone());
    }
    let _log = logger.init()?;

    // The subscriber did not exist yet while the config was loaded.
    if !config_file_exists(&path) {
        warn!("Config file {} not found, running with defaults", path.display());
    }

    Server::builder().config(cfg).build()?.run().await
}

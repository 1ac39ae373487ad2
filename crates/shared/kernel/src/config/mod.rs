use config::{Config, Environment, File};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const ENV_PREFIX: &str = "ENVSTORE";
pub const DEFAULT_PATH: &str = "server";
const EXTENSIONS: [&str; 4] = ["toml", "yaml", "yml", "json"];

/// Custom error type for config loading.
#[envstore_derive::envstore_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// A reusable configuration loader that combines file-based settings with environment overrides.
///
/// Layers, lowest priority first:
/// 1. **Base File**: `path` (e.g. `server.toml`). The format follows the extension; without one,
///    `server.toml`, `server.yaml` and `server.json` are probed. Defaults to `"server"`.
/// 2. **Environment Overrides**: variables prefixed with `ENVSTORE__`. Nested keys use double
///    underscores, so `ENVSTORE__STORAGE__CONSUL__ADDRESS` maps to `storage.consul.address`.
///
/// # Errors
/// This function will return an error if:
/// * The specified (or default) configuration file cannot be found.
/// * The content of the file does not match the structure of type `T`.
///
/// # Example
/// ```rust
/// use envstore_kernel::config::load_config;
///
/// #[derive(Default, serde::Deserialize)]
/// struct AppConfig {
///     port: u16,
/// }
///
/// let cfg: AppConfig = load_config(Some("config/local")).unwrap_or_default();
/// ```
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let path = effective_path(path);
    info!("Loading config from {}", path.display());
    load(&path, true, env_source())
}

/// Like [`load_config`], but a missing file is not an error: `T` is built from its serde
/// defaults plus environment overrides. A file that exists but is malformed still fails.
pub fn load_config_or_default<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let path = effective_path(path);
    if config_file_exists(&path) {
        info!("Loading config from {}", path.display());
    } else {
        warn!("Config file {} not found, using defaults", path.display());
    }
    load(&path, false, env_source())
}

fn effective_path(path: Option<impl AsRef<Path>>) -> PathBuf {
    path.map_or_else(|| PathBuf::from(DEFAULT_PATH), |p| p.as_ref().to_path_buf())
}

fn env_source() -> Environment {
    Environment::with_prefix(ENV_PREFIX).separator("__")
}

/// Whether `path`, or `path` with a known config extension, is a file.
pub fn config_file_exists(path: &Path) -> bool {
    path.is_file() || EXTENSIONS.iter().any(|ext| path.with_extension(ext).is_file())
}

fn load<T>(path: &Path, required: bool, env: Environment) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    Config::builder()
        .add_source(File::from(path).required(required))
        .add_source(env)
        .build()
        .context("Failed to build config")?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")
}

#[cfg(test)]
mod tests {
    use super::*;
    use envstore_domain::config::{ApiConfig, StorageBackend};
    use std::collections::HashMap;

    fn env(vars: &[(&str, &str)]) -> Environment {
        let map: HashMap<String, String> =
            vars.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();
        env_source().source(Some(map))
    }

    #[test]
    fn environment_overrides_nested_keys() {
        let dir = tempfile::tempdir().unwrap();
        let cfg: ApiConfig = load(
            &dir.path().join("absent"),
            false,
            env(&[
                ("ENVSTORE__SERVER__PORT", "9100"),
                ("ENVSTORE__STORAGE__BACKEND", "consul"),
                ("ENVSTORE__STORAGE__CONSUL__TIMEOUT_SECS", "12"),
                ("ENVSTORE__STORAGE__CONSUL__TOKEN", "0042"),
                ("ENVSTORE__LOG__JSON", "true"),
            ]),
        )
        .unwrap();

        assert_eq!(cfg.server.port, 9100);
        assert_eq!(cfg.storage.backend, StorageBackend::Consul);
        assert_eq!(cfg.storage.consul.timeout_secs, 12);
        assert_eq!(cfg.storage.consul.token.as_deref(), Some("0042"));
        assert!(cfg.log.json);
        assert_eq!(cfg.routes.prefix, "/storage");
    }

    #[test]
    fn environment_wins_over_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("server.toml");
        std::fs::write(&path, "[server]\nport = 8000\n\n[routes]\nprefix = \"/kv\"\n").unwrap();

        let cfg: ApiConfig = load(&path, true, env(&[("ENVSTORE__SERVER__PORT", "8001")])).unwrap();
        assert_eq!(cfg.server.port, 8001);
        assert_eq!(cfg.routes.prefix, "/kv");
    }

    #[test]
    fn probes_known_extensions() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("server.yaml"), "log:\n  level: debug\n").unwrap();

        assert!(config_file_exists(&dir.path().join("server")));
        assert!(!config_file_exists(&dir.path().join("other")));
    }
}

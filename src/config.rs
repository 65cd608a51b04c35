//! Application-level configuration: a JSON file on disk, overridden by environment variables.

use std::{env, fmt, fs, io::ErrorKind, path::PathBuf, str::FromStr};

use serde::Deserialize;
use tracing::{info, warn};

use crate::dao::deals::DEFAULT_DEALS_API_URL;

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "GAMEHUB_CONFIG_PATH";
const DEFAULT_PORT: u16 = 8080;

/// Which document database the supervisor connects to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Process-local maps; data is lost on exit.
    #[default]
    Memory,
    Couch,
    Mongo,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(StoreBackend::Memory),
            "couch" | "couchdb" => Ok(StoreBackend::Couch),
            "mongo" | "mongodb" => Ok(StoreBackend::Mongo),
            other => Err(format!("unknown store backend `{other}`")),
        }
    }
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StoreBackend::Memory => "memory",
            StoreBackend::Couch => "couch",
            StoreBackend::Mongo => "mongo",
        })
    }
}

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    /// TCP port the HTTP server binds to.
    pub port: u16,
    /// Document store backend selected at startup.
    pub store_backend: StoreBackend,
    /// Base URL of the external deals API.
    pub deals_api_url: String,
    /// Token expected in `X-Admin-Token`; admin routes are closed when unset.
    pub admin_token: Option<String>,
}

impl AppConfig {
    /// Load the configuration file, fall back to defaults, then apply environment overrides.
    pub fn load() -> Self {
        let mut config = Self::from_file();
        config.apply_env();
        config
    }

    fn from_file() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    let app_config: Self = raw.into();
                    info!(
                        path = %path.display(),
                        backend = %app_config.store_backend,
                        "loaded configuration file"
                    );
                    app_config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    fn apply_env(&mut self) {
        if let Some(port) = non_empty_var("PORT") {
            match port.parse() {
                Ok(port) => self.port = port,
                Err(err) => warn!(%port, error = %err, "ignoring invalid PORT"),
            }
        }
        if let Some(backend) = non_empty_var("STORE_BACKEND") {
            match backend.parse() {
                Ok(backend) => self.store_backend = backend,
                Err(err) => warn!(error = %err, "ignoring invalid STORE_BACKEND"),
            }
        }
        if let Some(url) = non_empty_var("DEALS_API_URL") {
            self.deals_api_url = url;
        }
        if let Some(token) = non_empty_var("ADMIN_TOKEN") {
            self.admin_token = Some(token);
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            store_backend: StoreBackend::default(),
            deals_api_url: DEFAULT_DEALS_API_URL.to_owned(),
            admin_token: None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    port: Option<u16>,
    store_backend: Option<StoreBackend>,
    deals_api_url: Option<String>,
    admin_token: Option<String>,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        let defaults = AppConfig::default();
        Self {
            port: value.port.unwrap_or(defaults.port),
            store_backend: value.store_backend.unwrap_or(defaults.store_backend),
            deals_api_url: value.deals_api_url.unwrap_or(defaults.deals_api_url),
            admin_token: value.admin_token.filter(|token| !token.is_empty()),
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let raw: RawConfig = serde_json::from_str(r#"{ "storeBackend": "couch" }"#).unwrap();
        let config = AppConfig::from(raw);
        assert_eq!(config.store_backend, StoreBackend::Couch);
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.deals_api_url, DEFAULT_DEALS_API_URL);
        assert!(config.admin_token.is_none());
    }

    #[test]
    fn backend_names_are_lenient() {
        assert_eq!("MongoDB".parse::<StoreBackend>(), Ok(StoreBackend::Mongo));
        assert_eq!(" couchdb ".parse::<StoreBackend>(), Ok(StoreBackend::Couch));
        assert!("sqlite".parse::<StoreBackend>().is_err());
    }
}

//! Service configuration file
//!
//! JSON, every field optional:
//!
//! ```json
//! {
//!   "host": "0.0.0.0",
//!   "port": 8080,
//!   "cors_origins": [],
//!   "store": "document",
//!   "data_dir": "./data",
//!   "log_filter": "info"
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::args::ServeOverrides;
use super::errors::{CliError, CliResult};
use crate::http_server::HttpServerConfig;
use crate::store::StoreKind;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(flatten)]
    pub server: HttpServerConfig,

    /// Storage backend (default: document)
    #[serde(default)]
    pub store: StoreKind,

    /// Root of the document store (default: "./data")
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Tracing filter used when RUST_LOG is unset (default: "info")
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_data_dir() -> String {
    "./data".to_string()
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: HttpServerConfig::default(),
            store: StoreKind::default(),
            data_dir: default_data_dir(),
            log_filter: default_log_filter(),
        }
    }
}

impl Config {
    /// Loads and validates the configuration at `path`.
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Like [`Config::load`], but a missing file yields the defaults.
    pub fn load_or_default(path: &Path) -> CliResult<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> CliResult<()> {
        if self.server.port == 0 {
            return Err(CliError::config_error("port must be > 0"));
        }

        if self.store == StoreKind::Document && self.data_dir.trim().is_empty() {
            return Err(CliError::config_error(
                "data_dir is required for the document store",
            ));
        }

        Ok(())
    }

    pub fn apply_overrides(&mut self, overrides: ServeOverrides) {
        if let Some(host) = overrides.host {
            self.server.host = host;
        }
        if let Some(port) = overrides.port {
            self.server.port = port;
        }
        if let Some(store) = overrides.store {
            self.store = store;
        }
        if let Some(data_dir) = overrides.data_dir {
            self.data_dir = data_dir.to_string_lossy().into_owned();
        }
    }

    pub fn data_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir)
    }
}

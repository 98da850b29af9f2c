//! Server configuration.
//!
//! Values are resolved in three layers: built-in defaults, an optional TOML
//! file, then environment variables.
//!
//! ```toml
//! [server]
//! host = "127.0.0.1"
//! port = 8080
//! countdown_interval_ms = 1000
//!
//! [chain]
//! fixtures = "fixtures/courses.json"   # relative to this file
//! token_address = "0x…"                # used when rewardToken() is zero
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::models::WalletAddress;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "COURSE_GATE_CONFIG";
/// Environment variable naming a fixtures file for the local reader.
pub const FIXTURES_ENV: &str = "COURSE_GATE_FIXTURES";
/// Environment variable naming the fallback reward token address.
pub const TOKEN_ADDRESS_ENV: &str = "COURSE_GATE_TOKEN_ADDRESS";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Invalid value '{value}' for {key}")]
    InvalidValue { key: String, value: String },
}

/// Resolved server settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// JSON fixtures for the in-memory reader; `None` starts empty.
    pub fixtures: Option<PathBuf>,
    /// Reward token used when the contract reports the zero address.
    pub token_address: Option<String>,
    pub countdown_interval_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            fixtures: None,
            token_address: None,
            countdown_interval_ms: 1000,
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    server: ServerSection,
    #[serde(default)]
    chain: ChainSection,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct ServerSection {
    host: Option<String>,
    port: Option<u16>,
    countdown_interval_ms: Option<u64>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct ChainSection {
    fixtures: Option<PathBuf>,
    token_address: Option<String>,
}

impl ServerConfig {
    /// Load defaults, then the config file if one is found, then the environment.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let explicit = std::env::var(CONFIG_ENV).ok().map(PathBuf::from);
        match explicit.or_else(Self::find_default_file) {
            Some(path) => {
                log::info!("Reading configuration from {}", path.display());
                config = config.merge_file(&path)?;
            }
            None => log::debug!("No configuration file found, using defaults"),
        }
        config.apply_env(|key| std::env::var(key).ok())
    }

    /// Load defaults overlaid with one TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Self::default().merge_file(path.as_ref())
    }

    /// Searches for `course-gate.toml` in:
    /// 1. Current directory
    /// 2. `backend/` directory
    /// 3. Parent directory
    fn find_default_file() -> Option<PathBuf> {
        [
            "course-gate.toml",
            "backend/course-gate.toml",
            "../course-gate.toml",
        ]
        .into_iter()
        .map(PathBuf::from)
        .find(|p| p.exists())
    }

    fn merge_file(mut self, path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let file: ConfigFile = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        if let Some(host) = file.server.host {
            self.host = host;
        }
        if let Some(port) = file.server.port {
            self.port = port;
        }
        if let Some(interval) = file.server.countdown_interval_ms {
            self.countdown_interval_ms = interval;
        }
        if let Some(fixtures) = file.chain.fixtures {
            self.fixtures = Some(match path.parent() {
                Some(dir) if fixtures.is_relative() => dir.join(fixtures),
                _ => fixtures,
            });
        }
        if let Some(token) = file.chain.token_address {
            self.token_address = Some(token);
        }
        self.validate()
    }

    /// Apply `HOST`, `PORT`, `COURSE_GATE_FIXTURES` and
    /// `COURSE_GATE_TOKEN_ADDRESS` from `lookup`.
    pub fn apply_env<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("HOST").filter(|h| !h.trim().is_empty()) {
            self.host = host.trim().to_string();
        }
        if let Some(port) = lookup("PORT") {
            self.port = port.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: "PORT".to_string(),
                value: port.clone(),
            })?;
        }
        if let Some(fixtures) = lookup(FIXTURES_ENV).filter(|f| !f.trim().is_empty()) {
            self.fixtures = Some(PathBuf::from(fixtures.trim()));
        }
        if let Some(token) = lookup(TOKEN_ADDRESS_ENV).filter(|t| !t.trim().is_empty()) {
            self.token_address = Some(token.trim().to_string());
        }
        self.validate()
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if self.countdown_interval_ms == 0 {
            return Err(ConfigError::InvalidValue {
                key: "countdown_interval_ms".to_string(),
                value: "0".to_string(),
            });
        }
        if let Some(token) = &self.token_address {
            if WalletAddress::parse(token).is_err() {
                return Err(ConfigError::InvalidValue {
                    key: "token_address".to_string(),
                    value: token.clone(),
                });
            }
        }
        Ok(self)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn countdown_interval(&self) -> Duration {
        Duration::from_millis(self.countdown_interval_ms)
    }
}

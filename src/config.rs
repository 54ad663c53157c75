//! Configuration loading.
//!
//! Settings come from an optional `study-planner.toml`; every field has a
//! default so a missing file or a partial one is fine. `STUDY_PLANNER_*`
//! environment variables override the file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CONFIG_FILE_NAME: &str = "study-planner.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// User key the CLI works on.
    #[serde(default = "default_user")]
    pub user: String,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub http: HttpConfig,

    #[serde(default)]
    pub log: LogConfig,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            user: default_user(),
            storage: StorageConfig::default(),
            http: HttpConfig::default(),
            log: LogConfig::default(),
        }
    }
}

fn default_user() -> String {
    "default".to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Json,
    Sqlite,
    Memory,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_backend")]
    pub backend: StorageBackend,

    /// Directory for `json`, database file for `sqlite`.
    #[serde(default = "default_storage_path")]
    pub path: PathBuf,
}

fn default_backend() -> StorageBackend {
    StorageBackend::Json
}

fn default_storage_path() -> PathBuf {
    PathBuf::from(".study-planner")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            path: default_storage_path(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_addr")]
    pub addr: String,
}

fn default_addr() -> String {
    "127.0.0.1:3000".to_string()
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            addr: default_addr(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    #[serde(default = "default_filter")]
    pub filter: String,
}

fn default_filter() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
        }
    }
}

impl PlannerConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    /// Reads `path`, falling back to defaults when the file does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(raw) => Self::from_toml_str(&raw),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Overrides fields from `STUDY_PLANNER_*` variables. Unparseable
    /// values are ignored.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(user) = lookup("STUDY_PLANNER_USER").filter(|v| !v.trim().is_empty()) {
            self.user = user.trim().to_string();
        }
        if let Some(backend) = lookup("STUDY_PLANNER_STORAGE").and_then(|v| parse_backend(&v)) {
            self.storage.backend = backend;
        }
        if let Some(path) = lookup("STUDY_PLANNER_DATA_PATH").filter(|v| !v.trim().is_empty()) {
            self.storage.path = PathBuf::from(path.trim());
        }
        if let Some(addr) = lookup("STUDY_PLANNER_HTTP_ADDR").filter(|v| !v.trim().is_empty()) {
            self.http.addr = addr.trim().to_string();
        }
    }
}

fn parse_backend(raw: &str) -> Option<StorageBackend> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "json" => Some(StorageBackend::Json),
        "sqlite" => Some(StorageBackend::Sqlite),
        "memory" => Some(StorageBackend::Memory),
        _ => None,
    }
}

//! Configuration for the claim verification demo.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables (SCICLAIMS_API_CLAIMS, SCICLAIMS_RES_DIR, HOST, PORT)
//! 2. Config file (`--config`, then $SCICLAIMS_CONFIG, then ./config.yaml)
//! 3. Defaults for optional settings
//!
//! `api.claims` and `data.res_dir` have no defaults. A relative `res_dir` is
//! resolved against the directory holding the config file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::domain::EXAMPLES_FILE;

pub const ENV_CONFIG_PATH: &str = "SCICLAIMS_CONFIG";
pub const ENV_API_CLAIMS: &str = "SCICLAIMS_API_CLAIMS";
pub const ENV_RES_DIR: &str = "SCICLAIMS_RES_DIR";
const ENV_HOST: &str = "HOST";
const ENV_PORT: &str = "PORT";

const DEFAULT_CONFIG_PATH: &str = "config.yaml";
const FAVICON_FILE: &str = "favicon-1.png";

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub api: ApiSection,
    #[serde(default)]
    pub data: DataSection,
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub session: SessionSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiSection {
    /// Claim analysis endpoint URL
    pub claims: Option<String>,
    pub timeout_seconds: Option<u64>,
    /// Skip TLS certificate validation toward the endpoint
    pub accept_invalid_certs: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DataSection {
    /// Directory holding examples.json and image assets
    pub res_dir: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServerSection {
    pub host: Option<String>,
    pub port: Option<u16>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionSection {
    pub idle_minutes: Option<u64>,
}

/// Configuration errors; all of them are fatal at startup
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required configuration key: {0}")]
    Missing(&'static str),

    #[error("Failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

/// Settings for the claim analysis client
#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    pub claims: String,
    pub timeout_seconds: u64,
    pub accept_invalid_certs: bool,
}

impl ApiConfig {
    pub const DEFAULT_TIMEOUT_SECONDS: u64 = 60;

    /// Endpoint with default timeout and certificate validation on
    pub fn new(claims: impl Into<String>) -> Self {
        Self {
            claims: claims.into(),
            timeout_seconds: Self::DEFAULT_TIMEOUT_SECONDS,
            accept_invalid_certs: false,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

/// Resolved configuration with absolute paths
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub api: ApiConfig,
    /// Resource directory (examples.json, favicon)
    pub res_dir: PathBuf,
    pub host: String,
    pub port: u16,
    pub session_idle_minutes: u64,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
}

impl ResolvedConfig {
    pub const DEFAULT_HOST: &'static str = "127.0.0.1";
    pub const DEFAULT_PORT: u16 = 8501;
    pub const DEFAULT_IDLE_MINUTES: u64 = 60;

    pub fn examples_path(&self) -> PathBuf {
        self.res_dir.join(EXAMPLES_FILE)
    }

    pub fn favicon_path(&self) -> PathBuf {
        self.res_dir.join(FAVICON_FILE)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Find the config file: explicit path, then $SCICLAIMS_CONFIG, then ./config.yaml
fn find_config_file(
    explicit: Option<&Path>,
    env: &dyn Fn(&str) -> Option<String>,
) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    if let Some(path) = env(ENV_CONFIG_PATH) {
        return Some(PathBuf::from(path));
    }

    let default_path = PathBuf::from(DEFAULT_CONFIG_PATH);
    default_path.exists().then_some(default_path)
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    parse_config(&content, path)
}

fn parse_config(content: &str, path: &Path) -> Result<ConfigFile, ConfigError> {
    // An empty file parses as YAML null
    if content.trim().is_empty() {
        return Ok(ConfigFile::default());
    }

    serde_yaml::from_str(content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Resolve a path that may be relative to the config file's directory
fn resolve_path(base: &Path, path_str: &str) -> PathBuf {
    let path = PathBuf::from(path_str);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
            .canonicalize()
            .unwrap_or_else(|_| base.join(path_str))
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Merge a parsed config file with environment overrides
fn resolve(
    file: ConfigFile,
    config_file: Option<PathBuf>,
    env: &dyn Fn(&str) -> Option<String>,
) -> Result<ResolvedConfig, ConfigError> {
    let claims = non_empty(env(ENV_API_CLAIMS))
        .or_else(|| non_empty(file.api.claims))
        .ok_or(ConfigError::Missing("api.claims"))?;

    let base_dir = config_file
        .as_deref()
        .and_then(Path::parent)
        .unwrap_or(Path::new("."));

    let res_dir = match non_empty(env(ENV_RES_DIR)) {
        Some(dir) => PathBuf::from(dir),
        None => {
            let dir = non_empty(file.data.res_dir).ok_or(ConfigError::Missing("data.res_dir"))?;
            resolve_path(base_dir, &dir)
        }
    };

    let port = match env(ENV_PORT) {
        Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
            key: "PORT",
            value,
        })?,
        None => file.server.port.unwrap_or(ResolvedConfig::DEFAULT_PORT),
    };

    let host = non_empty(env(ENV_HOST))
        .or(file.server.host)
        .unwrap_or_else(|| ResolvedConfig::DEFAULT_HOST.to_string());

    Ok(ResolvedConfig {
        api: ApiConfig {
            claims,
            timeout_seconds: file
                .api
                .timeout_seconds
                .unwrap_or(ApiConfig::DEFAULT_TIMEOUT_SECONDS),
            accept_invalid_certs: file.api.accept_invalid_certs.unwrap_or(false),
        },
        res_dir,
        host,
        port,
        session_idle_minutes: file
            .session
            .idle_minutes
            .unwrap_or(ResolvedConfig::DEFAULT_IDLE_MINUTES),
        config_file,
    })
}

fn load_with_env(
    explicit: Option<&Path>,
    env: &dyn Fn(&str) -> Option<String>,
) -> Result<ResolvedConfig, ConfigError> {
    let config_file = find_config_file(explicit, env);

    let file = match config_file {
        Some(ref path) => load_config_file(path)?,
        None => ConfigFile::default(),
    };

    let resolved = resolve(file, config_file, env)?;

    tracing::debug!(
        config_file = ?resolved.config_file,
        endpoint = %resolved.api.claims,
        res_dir = %resolved.res_dir.display(),
        "Resolved configuration"
    );

    Ok(resolved)
}

/// Load configuration from all sources
pub fn load(explicit: Option<&Path>) -> Result<ResolvedConfig, ConfigError> {
    load_with_env(explicit, &|key| std::env::var(key).ok())
}

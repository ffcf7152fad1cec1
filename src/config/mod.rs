//! Configuration management for sentrifocus
//!
//! Layers, lowest precedence first: built-in defaults, the TOML config file,
//! environment variables (a `.env` file is loaded into the environment by the
//! binary before this runs). CLI flags are applied on top by `main`.
//!
//! The upstream API key is only ever read from the environment.

use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable holding the classifier API key
pub const DEFAULT_API_KEY_ENV: &str = "GROQ_API_KEY";

/// Configuration errors. All of these are fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} not found in environment or .env file")]
    MissingApiKey(String),

    #[error("Failed to read config file {}: {}", .path.display(), .source)]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {}: {}", .path.display(), .source)]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: String, value: String },
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub llm: LlmConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider name: "groq" or "openai_compat"
    pub provider: String,
    /// Chat completions endpoint override
    pub base_url: Option<String>,
    pub model: String,
    /// Completion cap for the classification reply
    pub max_tokens: usize,
    pub temperature: f32,
    /// HTTP client timeout for the upstream call; unset means no timeout
    pub timeout_secs: Option<u64>,
    /// Name of the environment variable holding the API key; empty means the
    /// `openai_compat` gateway is called without credentials
    pub api_key_env: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "groq".to_string(),
            base_url: None,
            model: crate::llm::GROQ_DEFAULT_MODEL.to_string(),
            max_tokens: 5,
            temperature: 0.0,
            timeout_secs: None,
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
        }
    }
}

impl LlmConfig {
    /// Read the API key from the environment, failing if it is unset or blank
    ///
    /// Returns `None` only for a non-Groq provider with an empty `api_key_env`.
    pub fn api_key(&self) -> Result<Option<String>, ConfigError> {
        self.api_key_from(|key| std::env::var(key).ok())
    }

    pub(crate) fn api_key_from(
        &self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Option<String>, ConfigError> {
        let var = self.api_key_env.trim();
        if var.is_empty() {
            if self.provider.eq_ignore_ascii_case("groq") {
                return Err(ConfigError::MissingApiKey(DEFAULT_API_KEY_ENV.to_string()));
            }
            return Ok(None);
        }
        match lookup(var) {
            Some(key) if !key.trim().is_empty() => Ok(Some(key.trim().to_string())),
            _ => Err(ConfigError::MissingApiKey(var.to_string())),
        }
    }
}

impl Config {
    /// Load configuration from `path`, or from the default location if `None`
    ///
    /// An explicit path must exist; a missing default file yields defaults.
    /// Environment overrides are applied afterwards.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::config_path() {
                Some(default_path) if default_path.exists() => Self::from_file(&default_path)?,
                _ => Config::default(),
            },
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Parse a TOML config file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Get the default configuration file path
    pub fn config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "sentrifocus")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Apply `SENTRIFOCUS_*` overrides using the given variable lookup
    pub fn apply_env(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(host) = lookup("SENTRIFOCUS_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("SENTRIFOCUS_PORT") {
            self.server.port = port.parse().map_err(|_| ConfigError::InvalidValue {
                key: "SENTRIFOCUS_PORT".to_string(),
                value: port.clone(),
            })?;
        }
        if let Some(provider) = lookup("SENTRIFOCUS_PROVIDER") {
            self.llm.provider = provider;
        }
        if let Some(model) = lookup("SENTRIFOCUS_MODEL") {
            self.llm.model = model;
        }
        if let Some(base_url) = lookup("SENTRIFOCUS_BASE_URL") {
            self.llm.base_url = Some(base_url);
        }
        Ok(())
    }

    /// Socket address the HTTP server binds to
    ///
    /// Accepts IPv4, bare or bracketed IPv6, and `localhost`.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let host = self.server.host.trim();
        let host = host
            .strip_prefix('[')
            .and_then(|h| h.strip_suffix(']'))
            .unwrap_or(host);

        let ip = if host.eq_ignore_ascii_case("localhost") {
            IpAddr::V4(Ipv4Addr::LOCALHOST)
        } else {
            host.parse::<IpAddr>().map_err(|_| ConfigError::InvalidValue {
                key: "server.host".to_string(),
                value: self.server.host.clone(),
            })?
        };

        Ok(SocketAddr::new(ip, self.server.port))
    }
}

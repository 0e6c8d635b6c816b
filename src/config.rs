use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Default location of the optional TOML config file
const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid PORT value {0:?}")]
    InvalidPort(String),
}

/// Application configuration, loaded once at startup
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub binding: BindingConfig,
    pub search: SearchConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BindingConfig {
    /// Environment variable holding the service binding JSON
    pub env_var: String,
    /// Binding to pick by name when several are bound
    pub service_name: Option<String>,
    /// Raw binding JSON, captured from `env_var` at load time
    #[serde(skip)]
    pub raw: Option<String>,
}

impl Default for BindingConfig {
    fn default() -> Self {
        Self {
            env_var: "VCAP_SERVICES".to_string(),
            service_name: None,
            raw: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub index: String,
    pub doc_type: String,
    pub max_retries: u32,
    pub request_timeout_secs: u64,
    /// Issue a plain GET against the database root before the index steps
    pub probe: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            index: "twitter".to_string(),
            doc_type: "tweet".to_string(),
            max_retries: 10,
            request_timeout_secs: 30,
            probe: true,
        }
    }
}

impl AppConfig {
    /// Load configuration from `APP_CONFIG` (or `config.toml`) and the process environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_sources(|key| std::env::var(key).ok())
    }

    /// Load configuration using `env` for every environment lookup
    pub fn from_sources<F>(env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let path = env("APP_CONFIG").unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

        let mut config = if Path::new(&path).exists() {
            let contents = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
                path: path.clone(),
                source,
            })?;
            Self::from_toml(&contents)?
        } else {
            Self::default()
        };

        config.apply_env(env)?;
        Ok(config)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    fn apply_env<F>(&mut self, env: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = env("PORT").filter(|p| !p.is_empty()) {
            self.server.port = port
                .parse()
                .map_err(|_| ConfigError::InvalidPort(port.clone()))?;
        }

        if let Some(name) = env("SEARCH_BINDING_NAME").filter(|n| !n.is_empty()) {
            self.binding.service_name = Some(name);
        }

        self.binding.raw = env(&self.binding.env_var);
        Ok(())
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

//! Server configuration

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;

/// Environment prefix, e.g. `TCO_SERVER_PORT=9090`
pub const ENV_PREFIX: &str = "TCO_SERVER";

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Port for the API, health and metrics endpoints
    #[serde(default = "default_port")]
    pub port: u16,

    /// Bind address
    #[serde(default = "default_host")]
    pub host: String,

    /// Optional pricing catalog override file (JSON/TOML/YAML)
    #[serde(default)]
    pub pricing_file: Option<PathBuf>,

    /// Service name attached to structured log events
    #[serde(default = "default_service_name")]
    pub service_name: String,
}

fn default_port() -> u16 {
    8080
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_service_name() -> String {
    "tco-server".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
            pricing_file: None,
            service_name: default_service_name(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from the environment
    pub fn load() -> Result<Self> {
        let config = config::Config::builder()
            .add_source(config::Environment::with_prefix(ENV_PREFIX))
            .build()
            .context("Failed to read server configuration")?;

        Self::from_config(config)
    }

    pub fn from_config(config: config::Config) -> Result<Self> {
        config
            .try_deserialize()
            .context("Invalid server configuration")
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

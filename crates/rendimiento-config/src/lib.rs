//! Configuration loading for Rendimiento.
//! Reads rendimiento.toml from the current directory or the path in the
//! RENDIMIENTO_CONFIG env var. Every key has a default, so running without a
//! file talks to the production gateway on 127.0.0.1:3001.

use rendimiento_common::{RendimientoError, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub const CONFIG_ENV: &str = "RENDIMIENTO_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "rendimiento.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub endpoint: EndpointConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// The remote prediction gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointConfig {
    #[serde(default = "default_endpoint_url")]
    pub url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_endpoint_url() -> String {
    "https://3roqr2e3c0.execute-api.us-east-1.amazonaws.com/default/sagemaker_prediction".to_string()
}
fn default_timeout_secs() -> u64 { 30 }

impl Default for EndpointConfig {
    fn default() -> Self {
        Self { url: default_endpoint_url(), timeout_secs: default_timeout_secs() }
    }
}

impl EndpointConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Literal IP address; hostnames are not resolved.
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
}

fn default_host()       -> String { "127.0.0.1".to_string() }
fn default_port()       -> u16 { 3001 }
fn default_static_dir() -> String { "static".to_string() }

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: default_host(), port: default_port(), static_dir: default_static_dir() }
    }
}

impl ServerConfig {
    pub fn addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| RendimientoError::Config(format!("invalid bind address {}:{}: {e}", self.host, self.port)))
    }
}

impl Config {
    /// Load from `$RENDIMIENTO_CONFIG`, else `rendimiento.toml`, else defaults.
    pub fn load() -> Result<Self> {
        Self::resolve(std::env::var(CONFIG_ENV).ok())
    }

    /// An explicitly named file must exist; the default file is optional.
    pub fn resolve(explicit: Option<String>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_path(&path),
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => Self::from_path(DEFAULT_CONFIG_PATH),
            None => {
                info!("No {} found, using built-in defaults", DEFAULT_CONFIG_PATH);
                let config = Self::default();
                config.validate()?;
                Ok(config)
            }
        }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(RendimientoError::Config(format!(
                "config file not found: {}", path.display()
            )));
        }
        let content = std::fs::read_to_string(path)
            .map_err(|e| RendimientoError::Config(format!("reading {}: {e}", path.display())))?;
        let config = Self::from_toml_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)
            .map_err(|e| RendimientoError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let url = url::Url::parse(&self.endpoint.url)
            .map_err(|e| RendimientoError::Config(format!("endpoint.url '{}': {e}", self.endpoint.url)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(RendimientoError::Config(format!(
                "endpoint.url must be http or https, got '{}'", url.scheme()
            )));
        }
        if self.endpoint.timeout_secs == 0 {
            return Err(RendimientoError::Config("endpoint.timeout_secs must be positive".into()));
        }
        if self.server.port == 0 {
            return Err(RendimientoError::Config("server.port must be positive".into()));
        }
        Ok(())
    }
}

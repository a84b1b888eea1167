use courier_api::types::AgentIdentity;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Clone, Debug, Deserialize)]
pub struct CourierConfig {
    pub data_dir: PathBuf,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub lookup: LookupSection,
    #[serde(default)]
    pub agents: Vec<AgentIdentity>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_namespace")]
    pub namespace: String,
    #[serde(default)]
    pub polling_interval_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            polling_interval_ms: 0,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct LookupSection {
    #[serde(default)]
    pub eth_rpc_url: Option<String>,
    #[serde(default = "default_neynar_base_url")]
    pub neynar_base_url: String,
    #[serde(default)]
    pub neynar_api_key: Option<String>,
    #[serde(default)]
    pub network_base_urls: Vec<String>,
}

impl Default for LookupSection {
    fn default() -> Self {
        Self {
            eth_rpc_url: None,
            neynar_base_url: default_neynar_base_url(),
            neynar_api_key: None,
            network_base_urls: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

fn default_namespace() -> String {
    "default".to_string()
}

fn default_listen() -> String {
    "127.0.0.1:8750".to_string()
}

fn default_neynar_base_url() -> String {
    courier_lookup::neynar::DEFAULT_NEYNAR_BASE_URL.to_string()
}

fn default_level() -> String {
    "info".to_string()
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io")]
    Io,
    #[error("parse")]
    Parse,
}

pub fn load_config(path: &Path) -> Result<CourierConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|_| ConfigError::Io)?;
    toml::from_str(&content).map_err(|_| ConfigError::Parse)
}

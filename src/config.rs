use crate::error::{ExporterError, Result};
use anyhow::Context;
use secrecy::SecretString;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub deluge: DelugeConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DelugeConfig {
    /// Base URL of the Deluge Web UI, e.g. `http://deluge:8112`
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub password: Option<SecretString>,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    #[serde(default = "default_verify_ssl")]
    pub verify_ssl: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_addr")]
    pub addr: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for DelugeConfig {
    fn default() -> Self {
        Self {
            url: None,
            password: None,
            timeout_seconds: default_timeout_seconds(),
            verify_ssl: default_verify_ssl(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: default_addr(),
            port: default_port(),
        }
    }
}

fn default_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8011
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_timeout_seconds() -> u64 {
    10
}

fn default_verify_ssl() -> bool {
    true
}

impl Config {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        // Load environment variables from .env if present
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::Environment::with_prefix("DELUGE_EXPORTER").separator("__"))
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Check the settings the exporter cannot start without.
    pub fn validate(&self) -> Result<()> {
        self.deluge.api_url()?;
        self.deluge.password()?;
        Ok(())
    }
}

impl DelugeConfig {
    /// JSON-RPC endpoint derived from the base URL (`<url>/json`)
    pub fn api_url(&self) -> Result<String> {
        let url = self
            .url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .ok_or_else(|| ExporterError::Config("DELUGE_URL is mandatory".to_string()))?;

        if url.ends_with('/') {
            Ok(format!("{}json", url))
        } else {
            Ok(format!("{}/json", url))
        }
    }

    pub fn password(&self) -> Result<&SecretString> {
        self.password
            .as_ref()
            .ok_or_else(|| ExporterError::Config("DELUGE_PASSWORD is mandatory".to_string()))
    }
}

/// Translate a `LOG_LEVEL` value into a `tracing` filter directive.
///
/// Accepts `tracing` names as well as the Python logging names older
/// deployments used (`WARNING`, `CRITICAL`).
pub fn log_directive(level: &str) -> String {
    match level.trim().to_ascii_lowercase().as_str() {
        "warning" => "warn".to_string(),
        "critical" | "fatal" => "error".to_string(),
        "" => default_log_level(),
        other => other.to_string(),
    }
}

//! Configuration loading and validation

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::network::NetworkRegistry;

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub transfer: TransferConfig,
}

/// Where the multi-sender backend lives and how long to wait for it
#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Timeout for import, balance and clear requests
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Timeout for the send request; the backend broadcasts one wallet at a time
    #[serde(default = "default_send_timeout_ms")]
    pub send_timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TransferConfig {
    /// Ask before sending (can still be skipped per run with --force)
    #[serde(default = "default_true")]
    pub require_confirmation: bool,
    /// Preset used when --network is not given
    #[serde(default)]
    pub default_network: Option<String>,
}

fn default_base_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_send_timeout_ms() -> u64 {
    600_000
}

fn default_true() -> bool {
    true
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
            send_timeout_ms: default_send_timeout_ms(),
        }
    }
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            require_confirmation: true,
            default_network: None,
        }
    }
}

impl Config {
    /// Load configuration from file and environment variables
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let settings = config::Config::builder()
            // Start with defaults
            .set_default("backend.base_url", default_base_url())?
            .set_default("backend.timeout_ms", default_timeout_ms() as i64)?
            .set_default("backend.send_timeout_ms", default_send_timeout_ms() as i64)?
            .set_default("transfer.require_confirmation", true)?
            // Load from file if exists
            .add_source(config::File::from(path).required(false))
            // Override with environment variables (prefix MULTISENDER__)
            .add_source(
                config::Environment::with_prefix("MULTISENDER")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to build configuration")?;

        let config: Config = settings
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        // Validate configuration
        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        let base_url = url::Url::parse(&self.backend.base_url)
            .with_context(|| format!("Invalid backend.base_url: {}", self.backend.base_url))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            anyhow::bail!(
                "backend.base_url must use http or https, got {}",
                base_url.scheme()
            );
        }

        if self.backend.timeout_ms == 0 {
            anyhow::bail!("backend.timeout_ms must be positive");
        }

        if self.backend.send_timeout_ms == 0 {
            anyhow::bail!("backend.send_timeout_ms must be positive");
        }

        if let Some(key) = &self.transfer.default_network {
            if NetworkRegistry::new().preset(key).is_none() {
                anyhow::bail!("transfer.default_network '{}' is not a known network", key);
            }
        }

        if !self.transfer.require_confirmation {
            tracing::warn!("Transfer confirmation is disabled - batches will be sent without asking");
        }

        Ok(())
    }

    /// Get masked configuration for display (hide secrets)
    pub fn masked_display(&self) -> String {
        format!(
            r#"Configuration:
  Backend:
    base_url: {}
    timeout: {}ms
    send_timeout: {}ms
  Transfer:
    require_confirmation: {}
    default_network: {}
"#,
            mask_url(&self.backend.base_url),
            self.backend.timeout_ms,
            self.backend.send_timeout_ms,
            self.transfer.require_confirmation,
            self.transfer.default_network.as_deref().unwrap_or("(not set)"),
        )
    }
}

/// Mask URL for display (hide credentials in query params)
fn mask_url(url: &str) -> String {
    if let Some(idx) = url.find('?') {
        format!("{}?***", &url[..idx])
    } else {
        url.to_string()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: BackendConfig::default(),
            transfer: TransferConfig::default(),
        }
    }
}

//! Predefined network catalog and custom network builder
//!
//! Pure lookup and validation; nothing here touches the network.

use tracing::debug;

use super::types::{CustomNetworkFields, NetworkConfig, NetworkSelection};
use crate::error::ConfigError;

/// Display name used when a custom network is not given one
pub const DEFAULT_CUSTOM_NAME: &str = "Custom Network";

/// A predefined network entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preset {
    pub key: &'static str,
    pub name: &'static str,
    pub rpc_url: &'static str,
    pub chain_id: u64,
    pub symbol: &'static str,
    pub explorer: &'static str,
}

impl Preset {
    pub fn to_config(&self) -> NetworkConfig {
        NetworkConfig {
            name: self.name.to_string(),
            rpc_url: self.rpc_url.to_string(),
            chain_id: self.chain_id,
            symbol: self.symbol.to_string(),
            explorer: Some(self.explorer.to_string()),
        }
    }
}

/// Fixed catalog, in selector order
pub static PRESETS: [Preset; 4] = [
    Preset {
        key: "ethereum",
        name: "Ethereum Mainnet",
        rpc_url: "https://eth.llamarpc.com",
        chain_id: 1,
        symbol: "ETH",
        explorer: "https://etherscan.io",
    },
    Preset {
        key: "sepolia",
        name: "Sepolia Testnet",
        rpc_url: "https://rpc.sepolia.org",
        chain_id: 11155111,
        symbol: "ETH",
        explorer: "https://sepolia.etherscan.io",
    },
    Preset {
        key: "holesky",
        name: "Holesky Testnet",
        rpc_url: "https://ethereum-holesky.publicnode.com",
        chain_id: 17000,
        symbol: "ETH",
        explorer: "https://holesky.etherscan.io",
    },
    Preset {
        key: "monad",
        name: "Monad Testnet",
        rpc_url: "https://testnet-rpc.monad.xyz",
        chain_id: 41454,
        symbol: "MON",
        explorer: "https://testnet-explorer.monad.xyz",
    },
];

/// Network registry: presets plus on-demand custom networks
#[derive(Debug, Clone, Copy, Default)]
pub struct NetworkRegistry;

impl NetworkRegistry {
    pub fn new() -> Self {
        Self
    }

    /// All predefined networks, in selector order
    pub fn presets(&self) -> &'static [Preset] {
        &PRESETS
    }

    /// Look up a preset by key (case-insensitive)
    pub fn preset(&self, key: &str) -> Option<&'static Preset> {
        let key = key.trim();
        PRESETS.iter().find(|p| p.key.eq_ignore_ascii_case(key))
    }

    /// Resolve a selection into a concrete network configuration.
    ///
    /// Presets never look at the custom fields. Custom networks are rebuilt
    /// on every call.
    pub fn resolve(&self, selection: &NetworkSelection) -> Result<NetworkConfig, ConfigError> {
        let key = selection.key.trim();
        if key.is_empty() {
            return Err(ConfigError::NoNetworkSelected);
        }

        if selection.is_custom() {
            let network = build_custom(&selection.custom)?;
            debug!(
                "Resolved custom network '{}' (chain {})",
                network.name, network.chain_id
            );
            return Ok(network);
        }

        self.preset(key)
            .map(Preset::to_config)
            .ok_or_else(|| ConfigError::UnknownNetwork(key.to_string()))
    }
}

/// Trimmed, non-blank value of an optional field
fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn build_custom(fields: &CustomNetworkFields) -> Result<NetworkConfig, ConfigError> {
    let rpc_url = non_blank(&fields.rpc_url).ok_or(ConfigError::MissingCustomField("rpc_url"))?;
    let chain_id = non_blank(&fields.chain_id).ok_or(ConfigError::MissingCustomField("chain_id"))?;
    let symbol = non_blank(&fields.symbol).ok_or(ConfigError::MissingCustomField("symbol"))?;

    let chain_id = match chain_id.parse::<u64>() {
        Ok(id) if id > 0 => id,
        _ => return Err(ConfigError::InvalidChainId(chain_id.to_string())),
    };

    validate_rpc_url(rpc_url)?;

    Ok(NetworkConfig {
        name: non_blank(&fields.name)
            .unwrap_or(DEFAULT_CUSTOM_NAME)
            .to_string(),
        rpc_url: rpc_url.to_string(),
        chain_id,
        symbol: symbol.to_string(),
        explorer: non_blank(&fields.explorer).map(str::to_string),
    })
}

fn validate_rpc_url(rpc_url: &str) -> Result<(), ConfigError> {
    let parsed =
        url::Url::parse(rpc_url).map_err(|_| ConfigError::InvalidRpcUrl(rpc_url.to_string()))?;
    match parsed.scheme() {
        "http" | "https" | "ws" | "wss" if parsed.has_host() => Ok(()),
        _ => Err(ConfigError::InvalidRpcUrl(rpc_url.to_string())),
    }
}

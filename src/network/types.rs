//! Network configuration types

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Placeholder for the transaction hash in an explorer template
pub const TX_PLACEHOLDER: &str = "{tx}";

/// A blockchain endpoint configuration, as sent to the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Human-readable network name
    pub name: String,
    /// JSON-RPC endpoint of the node
    pub rpc_url: String,
    /// EIP-155 chain id (always > 0)
    pub chain_id: u64,
    /// Native currency symbol
    pub symbol: String,
    /// Block explorer base URL or template (sent as "" when absent)
    #[serde(
        default,
        serialize_with = "serialize_explorer",
        deserialize_with = "deserialize_explorer"
    )]
    pub explorer: Option<String>,
}

impl NetworkConfig {
    /// Build the explorer link for a transaction hash.
    ///
    /// Templates containing `{tx}` get the hash substituted; plain base URLs
    /// get `/tx/<hash>` appended.
    pub fn tx_url(&self, tx_hash: &str) -> Option<String> {
        let explorer = self.explorer.as_deref()?;
        if explorer.contains(TX_PLACEHOLDER) {
            Some(explorer.replace(TX_PLACEHOLDER, tx_hash))
        } else {
            Some(format!("{}/tx/{}", explorer.trim_end_matches('/'), tx_hash))
        }
    }
}

fn serialize_explorer<S: Serializer>(value: &Option<String>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(value.as_deref().unwrap_or(""))
}

fn deserialize_explorer<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    let raw: Option<String> = Option::deserialize(d)?;
    Ok(raw.filter(|s| !s.trim().is_empty()))
}

/// Raw user input for a custom network; every field as typed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomNetworkFields {
    pub name: Option<String>,
    pub rpc_url: Option<String>,
    pub chain_id: Option<String>,
    pub symbol: Option<String>,
    pub explorer: Option<String>,
}

/// What the user picked in the network selector
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetworkSelection {
    /// Preset key, "custom", or empty when nothing is selected
    pub key: String,
    /// Only consulted when `key` is "custom"
    pub custom: CustomNetworkFields,
}

impl NetworkSelection {
    /// Select a predefined network by key
    pub fn preset(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            custom: CustomNetworkFields::default(),
        }
    }

    /// Select a custom network from user-supplied fields
    pub fn custom(fields: CustomNetworkFields) -> Self {
        Self {
            key: super::CUSTOM_KEY.to_string(),
            custom: fields,
        }
    }

    pub fn is_custom(&self) -> bool {
        self.key.trim().eq_ignore_ascii_case(super::CUSTOM_KEY)
    }
}

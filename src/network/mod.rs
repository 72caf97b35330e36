//! Network selection: predefined catalog and user-supplied custom networks

pub mod registry;
pub mod types;

pub use registry::{NetworkRegistry, Preset, PRESETS};
pub use types::{CustomNetworkFields, NetworkConfig, NetworkSelection};

/// Selector key for a user-supplied network
pub const CUSTOM_KEY: &str = "custom";

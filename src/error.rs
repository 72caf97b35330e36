//! Error types for the multi-sender workflow

use thiserror::Error;

use crate::gateway::Operation;

/// Result type alias using our custom Error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the multi-sender workflow
#[derive(Error, Debug)]
pub enum Error {
    // Workflow ordering errors
    #[error("Precondition failed: {0}")]
    Precondition(#[from] Precondition),

    // User input errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    // Network configuration errors
    #[error("Network configuration error: {0}")]
    Config(#[from] ConfigError),

    // Key file errors (client side, before any request is made)
    #[error("Import error: {0}")]
    Import(String),

    // Backend errors
    #[error("{operation} request could not complete: {message}")]
    Transport { operation: Operation, message: String },

    #[error("{operation} rejected by backend: {message}")]
    Backend { operation: Operation, message: String },

    #[error("Another request is already in flight: {in_flight}")]
    ConcurrentRequest { in_flight: Operation },

    // Application settings errors
    #[error("Settings error: {0}")]
    Settings(String),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    // I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

/// A workflow step was invoked before the step it depends on
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Precondition {
    #[error("wallets not imported")]
    WalletsNotImported,

    #[error("balances not loaded")]
    BalancesNotLoaded,
}

/// Malformed user input
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("no recipient address entered")]
    MissingRecipient,

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("no percentage selected")]
    NoPercentageSelected,

    #[error("unsupported percentage {0} (choose 25, 50, 75 or max)")]
    UnsupportedPercentage(String),
}

/// Missing or invalid network configuration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("no network selected")]
    NoNetworkSelected,

    #[error("unknown network '{0}'")]
    UnknownNetwork(String),

    #[error("custom network field '{0}' is required")]
    MissingCustomField(&'static str),

    #[error("chain id must be a positive integer, got '{0}'")]
    InvalidChainId(String),

    #[error("invalid RPC URL '{0}'")]
    InvalidRpcUrl(String),
}

impl Error {
    /// Single user-facing message for this error.
    ///
    /// Server-provided messages are passed through untouched; everything else
    /// gets a short sentence suitable for an alert line.
    pub fn user_message(&self) -> String {
        match self {
            Error::Precondition(Precondition::WalletsNotImported) => {
                "Please import wallets first.".to_string()
            }
            Error::Precondition(Precondition::BalancesNotLoaded) => {
                "Please load balances first.".to_string()
            }
            Error::Validation(ValidationError::MissingRecipient) => {
                "Please enter a recipient address.".to_string()
            }
            Error::Validation(ValidationError::InvalidAddress(_)) => {
                "Please enter a valid Ethereum address.".to_string()
            }
            Error::Validation(ValidationError::NoPercentageSelected) => {
                "Please select an amount percentage.".to_string()
            }
            Error::Validation(e @ ValidationError::UnsupportedPercentage(_)) => {
                format!("Please select a supported percentage: {}.", e)
            }
            Error::Config(ConfigError::NoNetworkSelected) => {
                "Please select a network first.".to_string()
            }
            Error::Config(ConfigError::MissingCustomField(_)) => {
                "Please fill in all required custom network fields.".to_string()
            }
            Error::Config(e) => format!("Invalid network configuration: {}.", e),
            Error::Import(msg) => msg.clone(),
            Error::Transport { operation, .. } => {
                format!("Network error occurred while {}.", operation.progressive())
            }
            Error::Backend { message, .. } => message.clone(),
            Error::ConcurrentRequest { in_flight } => {
                format!("Please wait: still {}.", in_flight.progressive())
            }
            Error::Settings(msg) => format!("Invalid settings: {}", msg),
            Error::Serialization(msg) | Error::Io(msg) => msg.clone(),
        }
    }

    /// Check if this error was raised before any request left the client
    pub fn is_client_side(&self) -> bool {
        matches!(
            self,
            Error::Precondition(_)
                | Error::Validation(_)
                | Error::Config(_)
                | Error::Import(_)
                | Error::ConcurrentRequest { .. }
        )
    }
}

// Conversion from serde_json errors
impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

// Conversion from I/O errors
impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e.to_string())
    }
}

//! Request gateway: the four backend round trips
//!
//! Key parsing, RPC access, signing and broadcasting all live behind the
//! backend. The gateway only ships requests and normalizes the answers into
//! `Result`s; it never retries.
//!
//! # Architecture
//!
//! ```text
//! TransferOrchestrator → RequestGateway (trait) → HttpGateway → backend
//! ```

pub mod http;
pub mod types;

#[cfg(test)]
pub(crate) mod fake;

use async_trait::async_trait;
use std::fmt;
use std::path::Path;

use crate::error::{Error, Result};
use crate::network::NetworkConfig;
use crate::transfer::{Address, Percentage};

pub use http::HttpGateway;
pub use types::{BalanceEntry, TransferResult, TransferStatus, Wallet};

/// Only plain-text key files are accepted
pub const KEY_FILE_EXTENSION: &str = "txt";

/// Backend operations, used to label errors and in-flight requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    ImportKeys,
    LoadBalances,
    SendTransactions,
    ClearSession,
}

impl Operation {
    /// Endpoint path relative to the backend base URL
    pub fn endpoint(&self) -> &'static str {
        match self {
            Operation::ImportKeys => "import_keys",
            Operation::LoadBalances => "get_balances",
            Operation::SendTransactions => "send_transactions",
            Operation::ClearSession => "clear_session",
        }
    }

    /// Generic message used when the backend fails without saying why
    pub fn fallback_message(&self) -> &'static str {
        match self {
            Operation::ImportKeys => "Failed to import private keys.",
            Operation::LoadBalances => "Failed to load balances.",
            Operation::SendTransactions => "Failed to send transactions.",
            Operation::ClearSession => "Error clearing session.",
        }
    }

    /// "importing keys", "loading balances", ...
    pub fn progressive(&self) -> &'static str {
        match self {
            Operation::ImportKeys => "importing keys",
            Operation::LoadBalances => "loading balances",
            Operation::SendTransactions => "sending transactions",
            Operation::ClearSession => "clearing the session",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.endpoint())
    }
}

/// A private key file selected for upload
#[derive(Clone)]
pub struct KeyFile {
    pub file_name: String,
    pub contents: Vec<u8>,
}

// Contents are key material; keep them out of Debug output
impl fmt::Debug for KeyFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyFile")
            .field("file_name", &self.file_name)
            .field("len", &self.contents.len())
            .finish()
    }
}

impl KeyFile {
    /// Read a key file from disk after checking its extension
    pub async fn read(path: &Path) -> Result<Self> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .filter(|n| !n.is_empty())
            .ok_or_else(|| Error::Import("Please select a file first.".to_string()))?
            .to_string();

        check_extension(&file_name)?;

        let contents = tokio::fs::read(path)
            .await
            .map_err(|e| Error::Import(format!("Cannot read {}: {}", path.display(), e)))?;

        Ok(Self {
            file_name,
            contents,
        })
    }
}

/// Reject anything that is not a `.txt` file
pub fn check_extension(file_name: &str) -> Result<()> {
    let accepted = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case(KEY_FILE_EXTENSION))
        .unwrap_or(false);

    if accepted {
        Ok(())
    } else {
        Err(Error::Import("Please select a .txt file.".to_string()))
    }
}

/// Wallets derived by the backend from an uploaded key file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedWallets {
    pub wallets: Vec<Wallet>,
    pub count: usize,
}

/// Typed access to the backend.
///
/// Each call is a single round trip. Server-side refusals come back as
/// `Error::Backend`, requests that never completed as `Error::Transport`.
#[async_trait]
pub trait RequestGateway: Send + Sync {
    /// Upload a key file; the backend keeps the keys, we get addresses
    async fn import_keys(&self, file: &KeyFile) -> Result<ImportedWallets>;

    /// Balances of the imported wallets on `network`, in wallet order
    async fn load_balances(&self, network: &NetworkConfig) -> Result<Vec<BalanceEntry>>;

    /// Send `percentage` of every wallet's balance to `recipient`
    async fn send_transactions(
        &self,
        network: &NetworkConfig,
        percentage: Percentage,
        recipient: &Address,
    ) -> Result<Vec<TransferResult>>;

    /// Drop the server-side session (imported keys)
    async fn clear_session(&self) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_check_extension() {
        assert!(check_extension("keys.txt").is_ok());
        assert!(check_extension("KEYS.TXT").is_ok());
        assert!(matches!(check_extension("keys.csv"), Err(Error::Import(_))));
        assert!(matches!(check_extension("keys"), Err(Error::Import(_))));
        assert!(matches!(check_extension("keys.txt.bak"), Err(Error::Import(_))));
    }

    #[tokio::test]
    async fn test_read_key_file() {
        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        writeln!(file, "0x{}", "11".repeat(32)).unwrap();

        let key_file = KeyFile::read(file.path()).await.unwrap();
        assert!(key_file.file_name.ends_with(".txt"));
        assert_eq!(key_file.contents.len(), 67);
        assert!(!format!("{:?}", key_file).contains("1111"));
    }

    #[tokio::test]
    async fn test_read_rejects_wrong_extension_before_reading() {
        let err = KeyFile::read(Path::new("/definitely/missing/keys.json"))
            .await
            .unwrap_err();
        assert_eq!(err.user_message(), "Please select a .txt file.");
    }

    #[test]
    fn test_operation_endpoints() {
        assert_eq!(Operation::LoadBalances.endpoint(), "get_balances");
        assert_eq!(Operation::ClearSession.to_string(), "clear_session");
    }
}

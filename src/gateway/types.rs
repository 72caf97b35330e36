//! Wallet, balance and transfer result types plus the backend envelope

use serde::{Deserialize, Serialize};

use super::Operation;
use crate::error::{Error, Result};
use crate::network::NetworkConfig;
use crate::transfer::{Address, Percentage};

/// An imported wallet; only the public address ever reaches the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wallet {
    pub address: String,
}

/// Balance of one wallet on the selected network
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceEntry {
    pub address: String,
    #[serde(default)]
    pub balance_formatted: String,
    /// When set, `balance_formatted` carries no meaningful amount
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Outcome of one wallet's transfer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferStatus {
    Success {
        tx_hash: String,
        explorer_url: Option<String>,
    },
    Failed {
        error: String,
    },
}

/// Result of one wallet's transfer, validated from the wire record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferResult {
    pub wallet: String,
    pub amount: String,
    pub status: TransferStatus,
}

impl TransferResult {
    pub fn is_success(&self) -> bool {
        matches!(self.status, TransferStatus::Success { .. })
    }

    pub fn tx_hash(&self) -> Option<&str> {
        match &self.status {
            TransferStatus::Success { tx_hash, .. } => Some(tx_hash),
            TransferStatus::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.status {
            TransferStatus::Failed { error } => Some(error),
            TransferStatus::Success { .. } => None,
        }
    }

    /// "success" or "failed", as the backend spells it
    pub fn status_label(&self) -> &'static str {
        if self.is_success() {
            "success"
        } else {
            "failed"
        }
    }
}

/// Amount as sent by the backend: usually a string, sometimes a bare number
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum WireAmount {
    Text(String),
    Number(serde_json::Number),
}

impl Default for WireAmount {
    fn default() -> Self {
        Self::Text("0".to_string())
    }
}

impl WireAmount {
    fn into_string(self) -> String {
        match self {
            WireAmount::Text(s) => s,
            WireAmount::Number(n) => n.to_string(),
        }
    }
}

/// Transfer result exactly as the backend sends it
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct WireTransferResult {
    wallet: String,
    status: String,
    #[serde(default)]
    amount: WireAmount,
    tx_hash: Option<String>,
    explorer_url: Option<String>,
    error: Option<String>,
}

impl TryFrom<WireTransferResult> for TransferResult {
    type Error = String;

    fn try_from(wire: WireTransferResult) -> std::result::Result<Self, Self::Error> {
        let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());

        let status = match wire.status.as_str() {
            "success" => TransferStatus::Success {
                tx_hash: non_empty(wire.tx_hash).ok_or_else(|| {
                    format!("successful transfer from {} has no tx hash", wire.wallet)
                })?,
                explorer_url: non_empty(wire.explorer_url),
            },
            "failed" => TransferStatus::Failed {
                error: non_empty(wire.error).ok_or_else(|| {
                    format!("failed transfer from {} has no error message", wire.wallet)
                })?,
            },
            other => {
                return Err(format!(
                    "unknown transfer status '{}' for {}",
                    other, wire.wallet
                ))
            }
        };

        Ok(TransferResult {
            wallet: wire.wallet,
            amount: wire.amount.into_string(),
            status,
        })
    }
}

/// Common `{success, error, ...payload}` response shape
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    #[serde(default)]
    success: bool,
    error: Option<String>,
    #[serde(flatten)]
    data: T,
}

impl<T> Envelope<T> {
    /// Split into payload or a backend error carrying the server message
    pub(crate) fn into_result(self, operation: Operation) -> Result<T> {
        if self.success {
            return Ok(self.data);
        }
        let message = self
            .error
            .filter(|e| !e.trim().is_empty())
            .unwrap_or_else(|| operation.fallback_message().to_string());
        Err(Error::Backend { operation, message })
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ImportPayload {
    #[serde(default)]
    pub wallets: Vec<Wallet>,
    pub count: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct BalancesPayload {
    #[serde(default)]
    pub balances: Vec<BalanceEntry>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SendPayload {
    #[serde(default)]
    pub results: Vec<WireTransferResult>,
}

#[derive(Debug, Serialize)]
pub(crate) struct BalancesRequest<'a> {
    pub network: &'a NetworkConfig,
}

#[derive(Debug, Serialize)]
pub(crate) struct SendRequest<'a> {
    pub network: &'a NetworkConfig,
    pub percentage: Percentage,
    pub recipient_address: &'a Address,
}

/// Validate every wire record; one bad record rejects the batch
pub(crate) fn convert_results(wire: Vec<WireTransferResult>) -> Result<Vec<TransferResult>> {
    wire.into_iter()
        .map(TransferResult::try_from)
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|message| Error::Backend {
            operation: Operation::SendTransactions,
            message: format!("Malformed transfer result: {}", message),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse<T: serde::de::DeserializeOwned>(json: &str) -> Envelope<T> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_import_envelope_success() {
        let envelope: Envelope<ImportPayload> = parse(
            r#"{"success":true,"wallets":[{"address":"0x01"},{"address":"0x02"}],"count":2}"#,
        );
        let payload = envelope.into_result(Operation::ImportKeys).unwrap();
        assert_eq!(payload.wallets.len(), 2);
        assert_eq!(payload.count, Some(2));
    }

    #[test]
    fn test_error_without_success_flag() {
        // Backend answers 4xx/5xx with only an error field
        let envelope: Envelope<ImportPayload> = parse(r#"{"error":"No file selected"}"#);
        match envelope.into_result(Operation::ImportKeys) {
            Err(Error::Backend { operation, message }) => {
                assert_eq!(operation, Operation::ImportKeys);
                assert_eq!(message, "No file selected");
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_failure_without_message_uses_fallback() {
        let envelope: Envelope<BalancesPayload> = parse(r#"{"success":false}"#);
        let err = envelope.into_result(Operation::LoadBalances).unwrap_err();
        assert_eq!(err.user_message(), "Failed to load balances.");
    }

    #[test]
    fn test_balance_entry_with_error() {
        let envelope: Envelope<BalancesPayload> = parse(
            r#"{"success":true,"balances":[
                {"address":"0x01","balance_formatted":"1.5"},
                {"address":"0x02","balance_formatted":"0","error":"rpc timeout"}
            ]}"#,
        );
        let balances = envelope.into_result(Operation::LoadBalances).unwrap().balances;
        assert_eq!(balances[0].error, None);
        assert_eq!(balances[1].error.as_deref(), Some("rpc timeout"));
    }

    #[test]
    fn test_send_results_are_typed() {
        let envelope: Envelope<SendPayload> = parse(
            r#"{"success":true,"results":[
                {"wallet":"0x01","status":"success","amount":"0.25","tx_hash":"0xaa","explorer_url":"https://x/tx/0xaa"},
                {"wallet":"0x02","status":"failed","amount":0,"error":"insufficient funds"}
            ]}"#,
        );
        let wire = envelope.into_result(Operation::SendTransactions).unwrap().results;
        let results = convert_results(wire).unwrap();

        assert_eq!(results[0].tx_hash(), Some("0xaa"));
        assert_eq!(results[0].amount, "0.25");
        assert_eq!(results[1].error(), Some("insufficient funds"));
        assert_eq!(results[1].amount, "0");
        assert_eq!(results[1].status_label(), "failed");
    }

    #[test]
    fn test_success_without_hash_rejects_batch() {
        let envelope: Envelope<SendPayload> = parse(
            r#"{"success":true,"results":[{"wallet":"0x01","status":"success","amount":"1"}]}"#,
        );
        let wire = envelope.into_result(Operation::SendTransactions).unwrap().results;
        assert!(matches!(
            convert_results(wire),
            Err(Error::Backend {
                operation: Operation::SendTransactions,
                ..
            })
        ));
    }

    #[test]
    fn test_send_request_shape() {
        let network = crate::network::PRESETS[1].to_config();
        let recipient = Address::parse("0x742d35Cc6634C0532925a3b844Bc454e4438f44e").unwrap();
        let request = SendRequest {
            network: &network,
            percentage: Percentage::Max,
            recipient_address: &recipient,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["percentage"], 100);
        assert_eq!(
            json["recipient_address"],
            "0x742d35Cc6634C0532925a3b844Bc454e4438f44e"
        );
        assert_eq!(json["network"]["chain_id"], 11155111);
    }
}

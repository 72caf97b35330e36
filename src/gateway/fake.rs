//! Scripted in-memory gateway for workflow tests

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

use super::{
    BalanceEntry, ImportedWallets, KeyFile, Operation, RequestGateway, TransferResult,
    TransferStatus, Wallet,
};
use crate::error::{Error, Result};
use crate::network::NetworkConfig;
use crate::transfer::{Address, Percentage};

/// A call observed by the fake gateway
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ImportKeys { file_name: String },
    LoadBalances { chain_id: u64 },
    SendTransactions { chain_id: u64, percentage: u8, recipient: String },
    ClearSession,
}

#[derive(Default)]
struct Script {
    wallets: Vec<Wallet>,
    balances: Option<Vec<BalanceEntry>>,
    results: Vec<TransferResult>,
    failing: Vec<Operation>,
}

/// Fake backend with canned answers and call recording
#[derive(Clone, Default)]
pub struct FakeGateway {
    script: Arc<Mutex<Script>>,
    calls: Arc<Mutex<Vec<Call>>>,
    gate: Option<Arc<Notify>>,
}

pub fn address(n: u8) -> String {
    format!("0x{:040x}", n)
}

pub fn success(wallet: &str, amount: &str, tx_hash: &str) -> TransferResult {
    TransferResult {
        wallet: wallet.to_string(),
        amount: amount.to_string(),
        status: TransferStatus::Success {
            tx_hash: tx_hash.to_string(),
            explorer_url: None,
        },
    }
}

pub fn failure(wallet: &str, error: &str) -> TransferResult {
    TransferResult {
        wallet: wallet.to_string(),
        amount: "0".to_string(),
        status: TransferStatus::Failed {
            error: error.to_string(),
        },
    }
}

impl FakeGateway {
    /// Backend that derives `n` wallets, each holding 1.0
    pub fn with_wallets(n: u8) -> Self {
        let gateway = Self::default();
        {
            let mut script = gateway.script.lock().unwrap();
            script.wallets = (1..=n).map(|i| Wallet { address: address(i) }).collect();
            script.results = (1..=n)
                .map(|i| success(&address(i), "1.0", &format!("0x{:064x}", i)))
                .collect();
        }
        gateway
    }

    /// Hold every request until `gate.notify_one()` is called
    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn fail(&self, operation: Operation) {
        self.script.lock().unwrap().failing.push(operation);
    }

    pub fn set_balances(&self, balances: Vec<BalanceEntry>) {
        self.script.lock().unwrap().balances = Some(balances);
    }

    pub fn set_results(&self, results: Vec<TransferResult>) {
        self.script.lock().unwrap().results = results;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    async fn enter(&self, call: Call, operation: Operation) -> Result<()> {
        self.calls.lock().unwrap().push(call);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        if self.script.lock().unwrap().failing.contains(&operation) {
            return Err(Error::Backend {
                operation,
                message: format!("{} refused", operation),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl RequestGateway for FakeGateway {
    async fn import_keys(&self, file: &KeyFile) -> Result<ImportedWallets> {
        let call = Call::ImportKeys {
            file_name: file.file_name.clone(),
        };
        self.enter(call, Operation::ImportKeys).await?;
        let wallets = self.script.lock().unwrap().wallets.clone();
        Ok(ImportedWallets {
            count: wallets.len(),
            wallets,
        })
    }

    async fn load_balances(&self, network: &NetworkConfig) -> Result<Vec<BalanceEntry>> {
        let call = Call::LoadBalances {
            chain_id: network.chain_id,
        };
        self.enter(call, Operation::LoadBalances).await?;
        let script = self.script.lock().unwrap();
        Ok(script.balances.clone().unwrap_or_else(|| {
            script
                .wallets
                .iter()
                .map(|w| BalanceEntry {
                    address: w.address.clone(),
                    balance_formatted: "1.0".to_string(),
                    error: None,
                })
                .collect()
        }))
    }

    async fn send_transactions(
        &self,
        network: &NetworkConfig,
        percentage: Percentage,
        recipient: &Address,
    ) -> Result<Vec<TransferResult>> {
        let call = Call::SendTransactions {
            chain_id: network.chain_id,
            percentage: percentage.value(),
            recipient: recipient.to_string(),
        };
        self.enter(call, Operation::SendTransactions).await?;
        Ok(self.script.lock().unwrap().results.clone())
    }

    async fn clear_session(&self) -> Result<()> {
        self.enter(Call::ClearSession, Operation::ClearSession).await
    }
}

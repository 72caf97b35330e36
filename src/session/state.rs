//! In-memory session state and the workflow stage derived from it

use serde::Serialize;
use std::fmt;

use crate::gateway::{BalanceEntry, TransferResult, Wallet};
use crate::network::{NetworkConfig, NetworkSelection};

/// Where the user is in the workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStage {
    Empty,
    WalletsImported,
    NetworkSelected,
    BalancesLoaded,
    TransactionsSent,
}

impl fmt::Display for WorkflowStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            WorkflowStage::Empty => "empty",
            WorkflowStage::WalletsImported => "wallets imported",
            WorkflowStage::NetworkSelected => "network selected",
            WorkflowStage::BalancesLoaded => "balances loaded",
            WorkflowStage::TransactionsSent => "transactions sent",
        };
        f.write_str(label)
    }
}

/// The selection as typed plus what it resolved to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedNetwork {
    pub selection: NetworkSelection,
    pub config: NetworkConfig,
}

/// Everything accumulated during one session.
///
/// Setters replace whole fields so a reader never sees a half-built list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    wallets: Vec<Wallet>,
    balances: Vec<BalanceEntry>,
    network: Option<SelectedNetwork>,
    results: Option<Vec<TransferResult>>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn wallets(&self) -> &[Wallet] {
        &self.wallets
    }

    pub fn balances(&self) -> &[BalanceEntry] {
        &self.balances
    }

    pub fn network(&self) -> Option<&SelectedNetwork> {
        self.network.as_ref()
    }

    pub fn network_config(&self) -> Option<&NetworkConfig> {
        self.network.as_ref().map(|n| &n.config)
    }

    /// Results of the last send, `None` if nothing was sent yet
    pub fn results(&self) -> Option<&[TransferResult]> {
        self.results.as_deref()
    }

    pub fn stage(&self) -> WorkflowStage {
        if self.wallets.is_empty() {
            WorkflowStage::Empty
        } else if self.results.is_some() {
            WorkflowStage::TransactionsSent
        } else if !self.balances.is_empty() {
            WorkflowStage::BalancesLoaded
        } else if self.network.is_some() {
            WorkflowStage::NetworkSelected
        } else {
            WorkflowStage::WalletsImported
        }
    }

    /// New wallet set; balances and results of the old set go with it
    pub fn set_wallets(&mut self, wallets: Vec<Wallet>) {
        self.wallets = wallets;
        self.balances = Vec::new();
        self.results = None;
    }

    /// Switching to a different network invalidates balances and results
    pub fn set_network(&mut self, network: SelectedNetwork) {
        let changed = self.network_config() != Some(&network.config);
        if changed {
            self.balances = Vec::new();
            self.results = None;
        }
        self.network = Some(network);
    }

    pub fn set_balances(&mut self, balances: Vec<BalanceEntry>) {
        self.balances = balances;
    }

    pub fn set_results(&mut self, results: Vec<TransferResult>) {
        self.results = Some(results);
    }

    /// Back to the state of a fresh session
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::PRESETS;

    fn wallets(n: usize) -> Vec<Wallet> {
        (0..n)
            .map(|i| Wallet {
                address: format!("0x{:040x}", i),
            })
            .collect()
    }

    fn balances(n: usize) -> Vec<BalanceEntry> {
        wallets(n)
            .into_iter()
            .map(|w| BalanceEntry {
                address: w.address,
                balance_formatted: "1.0".to_string(),
                error: None,
            })
            .collect()
    }

    fn selected(index: usize) -> SelectedNetwork {
        SelectedNetwork {
            selection: NetworkSelection::preset(PRESETS[index].key),
            config: PRESETS[index].to_config(),
        }
    }

    #[test]
    fn test_stage_progression() {
        let mut state = SessionState::new();
        assert_eq!(state.stage(), WorkflowStage::Empty);

        state.set_wallets(wallets(3));
        assert_eq!(state.stage(), WorkflowStage::WalletsImported);

        state.set_network(selected(1));
        assert_eq!(state.stage(), WorkflowStage::NetworkSelected);

        state.set_balances(balances(3));
        assert_eq!(state.stage(), WorkflowStage::BalancesLoaded);

        state.set_results(Vec::new());
        assert_eq!(state.stage(), WorkflowStage::TransactionsSent);
    }

    #[test]
    fn test_reimport_drops_stale_data() {
        let mut state = SessionState::new();
        state.set_wallets(wallets(2));
        state.set_network(selected(0));
        state.set_balances(balances(2));
        state.set_results(Vec::new());

        state.set_wallets(wallets(5));
        assert_eq!(state.wallets().len(), 5);
        assert!(state.balances().is_empty());
        assert!(state.results().is_none());
        assert_eq!(state.stage(), WorkflowStage::NetworkSelected);
    }

    #[test]
    fn test_same_network_keeps_balances() {
        let mut state = SessionState::new();
        state.set_wallets(wallets(2));
        state.set_network(selected(1));
        state.set_balances(balances(2));

        state.set_network(selected(1));
        assert_eq!(state.balances().len(), 2);

        state.set_network(selected(2));
        assert!(state.balances().is_empty());
    }

    #[test]
    fn test_clear_returns_to_initial_state() {
        let mut state = SessionState::new();
        state.set_wallets(wallets(2));
        state.set_network(selected(1));
        state.set_balances(balances(2));
        state.set_results(Vec::new());

        state.clear();
        assert_eq!(state, SessionState::default());
        assert!(state.network().is_none());
    }
}

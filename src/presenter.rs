//! View models for the workflow
//!
//! Pure mappings from session data to what a front-end shows. No I/O, no
//! state changes; the terminal front-end prints these through `Display`.

use serde::Serialize;
use std::fmt;

use crate::gateway::{BalanceEntry, TransferResult, TransferStatus, Wallet};
use crate::network::NetworkConfig;
use crate::session::SessionState;
use crate::transfer::{Address, Percentage};

/// Characters of the tx hash shown before the ellipsis
pub const TX_HASH_PREVIEW_LEN: usize = 16;

/// Text of the confirmation asked before sending
pub fn confirmation_prompt(
    percentage: Percentage,
    recipient: &Address,
    wallet_count: usize,
    network_name: &str,
) -> String {
    format!(
        "Are you sure you want to send {} of each wallet's balance to {}?\n\n\
         This will affect {} wallets on {}.",
        percentage, recipient, wallet_count, network_name
    )
}

/// Which sections of the workflow are visible
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SectionVisibility {
    pub wallets_list: bool,
    pub network_section: bool,
    pub custom_network_fields: bool,
    pub transfer_section: bool,
    pub results_section: bool,
}

impl SectionVisibility {
    pub fn for_session(state: &SessionState) -> Self {
        let has_wallets = !state.wallets().is_empty();
        Self {
            wallets_list: has_wallets,
            network_section: has_wallets,
            custom_network_fields: state
                .network()
                .map(|n| n.selection.is_custom())
                .unwrap_or(false),
            transfer_section: !state.balances().is_empty(),
            results_section: state.results().is_some(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WalletRow {
    /// 1-based position
    pub index: usize,
    pub address: String,
}

pub fn wallet_rows(wallets: &[Wallet]) -> Vec<WalletRow> {
    wallets
        .iter()
        .enumerate()
        .map(|(i, w)| WalletRow {
            index: i + 1,
            address: w.address.clone(),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BalanceRow {
    pub index: usize,
    pub address: String,
    /// Amount with the network symbol, e.g. "1.5 ETH"
    pub amount: String,
    pub error: Option<String>,
}

pub fn balance_rows(balances: &[BalanceEntry], symbol: &str) -> Vec<BalanceRow> {
    balances
        .iter()
        .enumerate()
        .map(|(i, b)| BalanceRow {
            index: i + 1,
            address: b.address.clone(),
            amount: format!("{} {}", b.balance_formatted, symbol),
            error: b.error.clone(),
        })
        .collect()
}

/// Counts over a result batch; `success + failed == total` always
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ResultSummary {
    pub success_count: usize,
    pub failed_count: usize,
    pub total: usize,
}

pub fn summarize(results: &[TransferResult]) -> ResultSummary {
    let success_count = results.iter().filter(|r| r.is_success()).count();
    ResultSummary {
        success_count,
        failed_count: results.len() - success_count,
        total: results.len(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultRow {
    pub index: usize,
    pub wallet: String,
    pub status: &'static str,
    pub amount: String,
    /// First characters of the hash followed by "..."
    pub tx_hash_short: Option<String>,
    pub explorer_url: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultsView {
    pub summary: ResultSummary,
    pub rows: Vec<ResultRow>,
}

/// Build the results view. Explorer links come from the backend when given,
/// otherwise from the network's explorer template.
pub fn results_view(results: &[TransferResult], network: Option<&NetworkConfig>) -> ResultsView {
    let symbol = network.map(|n| n.symbol.as_str()).unwrap_or_default();

    let rows = results
        .iter()
        .enumerate()
        .map(|(i, r)| {
            let explorer_url = match &r.status {
                TransferStatus::Success {
                    tx_hash,
                    explorer_url,
                } => explorer_url
                    .clone()
                    .or_else(|| network.and_then(|n| n.tx_url(tx_hash))),
                TransferStatus::Failed { .. } => None,
            };

            ResultRow {
                index: i + 1,
                wallet: r.wallet.clone(),
                status: r.status_label(),
                amount: format!("{} {}", r.amount, symbol).trim_end().to_string(),
                tx_hash_short: r.tx_hash().map(shorten_hash),
                explorer_url,
                error: r.error().map(str::to_string),
            }
        })
        .collect();

    ResultsView {
        summary: summarize(results),
        rows,
    }
}

fn shorten_hash(hash: &str) -> String {
    let preview: String = hash.chars().take(TX_HASH_PREVIEW_LEN).collect();
    format!("{}...", preview)
}

/// Everything the front-end needs to redraw after a step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionView {
    pub sections: SectionVisibility,
    pub wallets: Vec<WalletRow>,
    pub balances: Vec<BalanceRow>,
    pub results: Option<ResultsView>,
}

pub fn session_view(state: &SessionState) -> SessionView {
    let network = state.network_config();
    let symbol = network.map(|n| n.symbol.as_str()).unwrap_or_default();

    SessionView {
        sections: SectionVisibility::for_session(state),
        wallets: wallet_rows(state.wallets()),
        balances: balance_rows(state.balances(), symbol),
        results: state.results().map(|r| results_view(r, network)),
    }
}

impl fmt::Display for WalletRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:<3} {}", self.index, self.address)
    }
}

impl fmt::Display for BalanceRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:<3} {}  {}", self.index, self.address, self.amount)?;
        if let Some(error) = &self.error {
            write!(f, "  (error: {})", error)?;
        }
        Ok(())
    }
}

impl fmt::Display for ResultSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Total: {} transactions | Success: {} | Failed: {}",
            self.total, self.success_count, self.failed_count
        )
    }
}

impl fmt::Display for ResultRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{:<3} {}  {:<7}  {}",
            self.index, self.wallet, self.status, self.amount
        )?;
        match (&self.tx_hash_short, &self.explorer_url) {
            (Some(_), Some(url)) => write!(f, "  {}", url)?,
            (Some(hash), None) => write!(f, "  {}", hash)?,
            (None, _) => write!(f, "  No TX Hash")?,
        }
        if let Some(error) = &self.error {
            write!(f, "\n     error: {}", error)?;
        }
        Ok(())
    }
}

impl fmt::Display for ResultsView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== TRANSACTION SUMMARY ===")?;
        writeln!(f, "{}", self.summary)?;
        for row in &self.rows {
            writeln!(f, "{}", row)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::fake::{address, failure, success};
    use crate::network::{NetworkSelection, PRESETS};
    use crate::session::SelectedNetwork;

    fn sepolia() -> NetworkConfig {
        PRESETS[1].to_config()
    }

    #[test]
    fn test_summary_counts() {
        let results = vec![
            success(&address(1), "0.5", "0xaa"),
            failure(&address(2), "insufficient funds"),
        ];
        let summary = summarize(&results);
        assert_eq!(
            summary,
            ResultSummary {
                success_count: 1,
                failed_count: 1,
                total: 2
            }
        );
        assert_eq!(summary.success_count + summary.failed_count, summary.total);
        assert_eq!(summarize(&[]), ResultSummary::default());
    }

    #[test]
    fn test_result_rows() {
        let hash = format!("0x{}", "ab".repeat(32));
        let results = vec![
            success(&address(1), "0.5", &hash),
            failure(&address(2), "insufficient funds"),
        ];
        let view = results_view(&results, Some(&sepolia()));

        let ok = &view.rows[0];
        assert_eq!(ok.index, 1);
        assert_eq!(ok.status, "success");
        assert_eq!(ok.amount, "0.5 ETH");
        assert_eq!(ok.tx_hash_short.as_deref(), Some("0xababababababab..."));
        assert_eq!(
            ok.explorer_url,
            Some(format!("https://sepolia.etherscan.io/tx/{}", hash))
        );

        let failed = &view.rows[1];
        assert_eq!(failed.status, "failed");
        assert_eq!(failed.tx_hash_short, None);
        assert_eq!(failed.error.as_deref(), Some("insufficient funds"));
        assert!(failed.to_string().contains("No TX Hash"));
    }

    #[test]
    fn test_backend_explorer_url_wins() {
        let mut result = success(&address(1), "1", "0xaa");
        if let TransferStatus::Success { explorer_url, .. } = &mut result.status {
            *explorer_url = Some("https://backend.example/tx/0xaa".to_string());
        }
        let view = results_view(&[result], Some(&sepolia()));
        assert_eq!(
            view.rows[0].explorer_url.as_deref(),
            Some("https://backend.example/tx/0xaa")
        );
    }

    #[test]
    fn test_balance_rows_are_symbol_qualified() {
        let balances = vec![
            BalanceEntry {
                address: address(1),
                balance_formatted: "2.5".to_string(),
                error: None,
            },
            BalanceEntry {
                address: address(2),
                balance_formatted: "0".to_string(),
                error: Some("rpc timeout".to_string()),
            },
        ];
        let rows = balance_rows(&balances, "MON");
        assert_eq!(rows[0].amount, "2.5 MON");
        assert_eq!(rows[1].index, 2);
        assert!(rows[1].to_string().contains("error: rpc timeout"));
    }

    #[test]
    fn test_confirmation_prompt() {
        let recipient = Address::parse("0x742d35Cc6634C0532925a3b844Bc454e4438f44e").unwrap();
        let prompt = confirmation_prompt(Percentage::Half, &recipient, 4, "Holesky Testnet");
        assert_eq!(
            prompt,
            "Are you sure you want to send 50% of each wallet's balance to \
             0x742d35Cc6634C0532925a3b844Bc454e4438f44e?\n\n\
             This will affect 4 wallets on Holesky Testnet."
        );
    }

    #[test]
    fn test_sections_follow_session() {
        let mut state = SessionState::new();
        assert_eq!(SectionVisibility::for_session(&state), SectionVisibility::default());

        state.set_wallets(vec![Wallet { address: address(1) }]);
        state.set_network(SelectedNetwork {
            selection: NetworkSelection::preset("sepolia"),
            config: sepolia(),
        });
        state.set_balances(vec![BalanceEntry {
            address: address(1),
            balance_formatted: "1".to_string(),
            error: None,
        }]);
        state.set_results(vec![success(&address(1), "1", "0xaa")]);

        let view = session_view(&state);
        assert!(view.sections.wallets_list);
        assert!(view.sections.transfer_section);
        assert!(view.sections.results_section);
        assert!(!view.sections.custom_network_fields);
        assert_eq!(view.balances[0].amount, "1 ETH");
        assert_eq!(view.results.unwrap().summary.total, 1);

        state.clear();
        assert_eq!(SectionVisibility::for_session(&state), SectionVisibility::default());
    }
}

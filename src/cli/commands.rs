//! CLI command implementations

use anyhow::Result;
use clap::Args;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::Error;
use crate::gateway::HttpGateway;
use crate::network::{CustomNetworkFields, NetworkRegistry, NetworkSelection, CUSTOM_KEY};
use crate::presenter;
use crate::transfer::{
    AutoConfirm, Confirmer, Percentage, SendOutcome, TerminalConfirmer, TransferOrchestrator,
    TransferRequest,
};

/// Network selection flags shared by workflow commands
#[derive(Args, Debug, Clone, Default)]
pub struct NetworkArgs {
    /// Network key (ethereum, sepolia, holesky, monad) or "custom"
    #[arg(short, long)]
    pub network: Option<String>,

    /// Custom network RPC URL
    #[arg(long)]
    pub rpc_url: Option<String>,

    /// Custom network chain id
    #[arg(long)]
    pub chain_id: Option<String>,

    /// Custom network currency symbol
    #[arg(long)]
    pub symbol: Option<String>,

    /// Custom network explorer URL (may contain {tx})
    #[arg(long)]
    pub explorer: Option<String>,

    /// Custom network display name
    #[arg(long)]
    pub network_name: Option<String>,
}

impl NetworkArgs {
    /// Turn flags into a selection, falling back to the configured default.
    ///
    /// Giving --rpc-url without --network implies a custom network.
    pub fn selection(&self, default_network: Option<&str>) -> NetworkSelection {
        let key = match (&self.network, &self.rpc_url) {
            (Some(key), _) => key.clone(),
            (None, Some(_)) => CUSTOM_KEY.to_string(),
            (None, None) => default_network.unwrap_or_default().to_string(),
        };

        NetworkSelection {
            key,
            custom: CustomNetworkFields {
                name: self.network_name.clone(),
                rpc_url: self.rpc_url.clone(),
                chain_id: self.chain_id.clone(),
                symbol: self.symbol.clone(),
                explorer: self.explorer.clone(),
            },
        }
    }
}

/// Map a workflow error to the one line the user sees
fn user_error(e: Error) -> anyhow::Error {
    anyhow::anyhow!(e.user_message())
}

fn orchestrator(config: &Config, force: bool) -> Result<TransferOrchestrator> {
    let gateway = HttpGateway::new(&config.backend).map_err(user_error)?;

    let confirmer: Arc<dyn Confirmer> = if force || !config.transfer.require_confirmation {
        Arc::new(AutoConfirm)
    } else {
        Arc::new(TerminalConfirmer)
    };

    Ok(TransferOrchestrator::new(Arc::new(gateway), confirmer))
}

/// List predefined networks
pub fn list_networks() -> Result<()> {
    println!("\n=== NETWORKS ===\n");
    for preset in NetworkRegistry::new().presets() {
        println!(
            "{:<10} {:<18} chain {:<10} {:<4} {}",
            preset.key, preset.name, preset.chain_id, preset.symbol, preset.rpc_url
        );
    }
    println!("\nUse --network custom --rpc-url <URL> --chain-id <ID> --symbol <SYM> for anything else.");
    Ok(())
}

/// Show current configuration
pub fn show_config(config: &Config) -> Result<()> {
    println!("{}", config.masked_display());
    Ok(())
}

/// Import keys, select the network and load balances, printing each step
async fn prepare(
    orchestrator: &TransferOrchestrator,
    keys: &Path,
    selection: NetworkSelection,
) -> Result<()> {
    let imported = orchestrator
        .import_keys(Some(keys))
        .await
        .map_err(user_error)?;
    println!("\nSuccessfully imported {} wallets!", imported.count);
    for row in presenter::wallet_rows(&imported.wallets) {
        println!("  {}", row);
    }

    let network = orchestrator
        .select_network(selection)
        .await
        .map_err(user_error)?;
    println!("\nNetwork: {} (chain {})", network.name, network.chain_id);

    let balances = orchestrator.load_balances().await.map_err(user_error)?;
    println!("\n=== BALANCES ===\n");
    for row in presenter::balance_rows(&balances, &network.symbol) {
        println!("  {}", row);
    }

    Ok(())
}

/// Best-effort server cleanup at the end of every workflow
async fn finish(orchestrator: &TransferOrchestrator) {
    match orchestrator.clear_session().await {
        Ok(report) if report.server_notified() => info!("Session cleared"),
        Ok(report) => {
            if let Some(e) = report.server_error {
                warn!("Backend may still hold imported keys: {}", e.user_message());
            }
        }
        Err(e) => warn!("Session not cleared: {}", e.user_message()),
    }
}

/// Show balances of every wallet in a key file
pub async fn balances(config: &Config, keys: &Path, network: &NetworkArgs) -> Result<()> {
    let orchestrator = orchestrator(config, false)?;
    let selection = network.selection(config.transfer.default_network.as_deref());

    let result = prepare(&orchestrator, keys, selection).await;
    finish(&orchestrator).await;
    result
}

/// Send a share of every wallet's balance to one recipient
pub async fn send(
    config: &Config,
    keys: &Path,
    network: &NetworkArgs,
    recipient: &str,
    percentage: Option<&str>,
    force: bool,
) -> Result<()> {
    let percentage = percentage
        .map(str::parse::<Percentage>)
        .transpose()
        .map_err(|e| user_error(e.into()))?;

    let orchestrator = orchestrator(config, force)?;
    let selection = network.selection(config.transfer.default_network.as_deref());

    let result = async {
        prepare(&orchestrator, keys, selection).await?;

        let request = TransferRequest {
            recipient: recipient.to_string(),
            percentage: percentage.map(|p| u32::from(p.value())),
        };

        println!();
        match orchestrator
            .send_transactions(&request)
            .await
            .map_err(user_error)?
        {
            SendOutcome::Cancelled => {
                println!("Transfer cancelled. Nothing was sent.");
            }
            SendOutcome::Sent(results) => {
                let snapshot = orchestrator.snapshot().await;
                let view = presenter::results_view(&results, snapshot.network_config());
                println!("Transactions completed! Check results below.\n");
                print!("{}", view);
            }
        }
        Ok::<(), anyhow::Error>(())
    }
    .await;

    finish(&orchestrator).await;
    result
}

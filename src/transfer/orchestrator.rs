//! Workflow orchestration: import → network → balances → send
//!
//! Each public method is one user action. Preconditions are checked against
//! the session state, never against UI state, and failures are logged at the
//! step boundary before being handed back as typed errors.

use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::address::Address;
use super::confirm::Confirmer;
use super::percentage::Percentage;
use crate::error::{ConfigError, Error, Precondition, Result};
use crate::gateway::{BalanceEntry, ImportedWallets, KeyFile, Operation, RequestGateway, TransferResult};
use crate::network::{NetworkConfig, NetworkRegistry, NetworkSelection};
use crate::presenter;
use crate::session::{SelectedNetwork, SessionState, WorkflowStage};

/// What the user entered on the transfer form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferRequest {
    /// Recipient address as typed
    pub recipient: String,
    /// Chosen percentage option, `None` if nothing was picked
    pub percentage: Option<u32>,
}

/// How a send action ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// Backend processed the batch; per-wallet results inside
    Sent(Vec<TransferResult>),
    /// User declined the confirmation; nothing happened
    Cancelled,
}

/// Local state is always reset; the server may not have been told
#[derive(Debug)]
pub struct ClearReport {
    pub server_error: Option<Error>,
}

impl ClearReport {
    pub fn server_notified(&self) -> bool {
        self.server_error.is_none()
    }
}

/// Marks a backend-bound step as running; released on drop
struct InFlight<'a> {
    slot: &'a Mutex<Option<Operation>>,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

/// Drives the multi-send workflow over an owned session
pub struct TransferOrchestrator {
    gateway: Arc<dyn RequestGateway>,
    confirmer: Arc<dyn Confirmer>,
    registry: NetworkRegistry,
    session: RwLock<SessionState>,
    in_flight: Mutex<Option<Operation>>,
}

impl TransferOrchestrator {
    /// Create an orchestrator with an empty session
    pub fn new(gateway: Arc<dyn RequestGateway>, confirmer: Arc<dyn Confirmer>) -> Self {
        Self {
            gateway,
            confirmer,
            registry: NetworkRegistry::new(),
            session: RwLock::new(SessionState::new()),
            in_flight: Mutex::new(None),
        }
    }

    /// Copy of the current session
    pub async fn snapshot(&self) -> SessionState {
        self.session.read().await.clone()
    }

    pub async fn stage(&self) -> WorkflowStage {
        self.session.read().await.stage()
    }

    /// Operation currently waiting on the backend, if any
    pub fn busy(&self) -> Option<Operation> {
        *self.in_flight.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn begin(&self, operation: Operation) -> Result<InFlight<'_>> {
        let mut slot = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(in_flight) = *slot {
            return Err(Error::ConcurrentRequest { in_flight });
        }
        *slot = Some(operation);
        Ok(InFlight {
            slot: &self.in_flight,
        })
    }

    /// Upload a key file and replace the wallet list
    pub async fn import_keys(&self, path: Option<&Path>) -> Result<ImportedWallets> {
        let result = self.run_import(path).await;
        log_failure("import keys", result)
    }

    async fn run_import(&self, path: Option<&Path>) -> Result<ImportedWallets> {
        let _in_flight = self.begin(Operation::ImportKeys)?;

        let path = path.ok_or_else(|| Error::Import("Please select a file first.".to_string()))?;
        let file = KeyFile::read(path).await?;

        let imported = self.gateway.import_keys(&file).await?;
        if imported.wallets.is_empty() {
            warn!("Backend imported no wallets from {}", file.file_name);
        }

        self.session
            .write()
            .await
            .set_wallets(imported.wallets.clone());

        info!("Successfully imported {} wallets", imported.count);
        Ok(imported)
    }

    /// Resolve and store the network to work on
    pub async fn select_network(&self, selection: NetworkSelection) -> Result<NetworkConfig> {
        let result = self.run_select_network(selection).await;
        log_failure("select network", result)
    }

    async fn run_select_network(&self, selection: NetworkSelection) -> Result<NetworkConfig> {
        if let Some(in_flight) = self.busy() {
            return Err(Error::ConcurrentRequest { in_flight });
        }

        let mut session = self.session.write().await;
        if session.wallets().is_empty() {
            return Err(Precondition::WalletsNotImported.into());
        }

        let config = self.registry.resolve(&selection)?;
        session.set_network(SelectedNetwork {
            selection,
            config: config.clone(),
        });

        info!("Selected network {} (chain {})", config.name, config.chain_id);
        Ok(config)
    }

    /// Fetch balances for every imported wallet on the selected network
    pub async fn load_balances(&self) -> Result<Vec<BalanceEntry>> {
        let result = self.run_load_balances().await;
        log_failure("load balances", result)
    }

    async fn run_load_balances(&self) -> Result<Vec<BalanceEntry>> {
        let _in_flight = self.begin(Operation::LoadBalances)?;

        let snapshot = self.snapshot().await;
        if snapshot.wallets().is_empty() {
            return Err(Precondition::WalletsNotImported.into());
        }
        let network = snapshot
            .network_config()
            .ok_or(ConfigError::NoNetworkSelected)?;

        let balances = self.gateway.load_balances(network).await?;
        if balances.len() != snapshot.wallets().len() {
            return Err(Error::Backend {
                operation: Operation::LoadBalances,
                message: format!(
                    "Expected {} balances, backend returned {}",
                    snapshot.wallets().len(),
                    balances.len()
                ),
            });
        }

        let failed = balances.iter().filter(|b| b.error.is_some()).count();
        if failed > 0 {
            warn!("{} of {} balance lookups failed", failed, balances.len());
        }

        self.session.write().await.set_balances(balances.clone());

        info!("Balances loaded for {} wallets on {}", balances.len(), network.name);
        Ok(balances)
    }

    /// Validate the transfer form, confirm, then send from every wallet
    pub async fn send_transactions(&self, request: &TransferRequest) -> Result<SendOutcome> {
        let result = self.run_send(request).await;
        log_failure("send transactions", result)
    }

    async fn run_send(&self, request: &TransferRequest) -> Result<SendOutcome> {
        let _in_flight = self.begin(Operation::SendTransactions)?;

        let snapshot = self.snapshot().await;
        if snapshot.wallets().is_empty() {
            return Err(Precondition::WalletsNotImported.into());
        }
        if snapshot.balances().is_empty() {
            return Err(Precondition::BalancesNotLoaded.into());
        }

        let recipient = Address::parse(&request.recipient)?;
        let percentage = Percentage::from_selection(request.percentage)?;

        let selection = snapshot
            .network()
            .map(|n| n.selection.clone())
            .ok_or(ConfigError::NoNetworkSelected)?;
        let network = self.registry.resolve(&selection)?;

        let prompt = presenter::confirmation_prompt(
            percentage,
            &recipient,
            snapshot.wallets().len(),
            &network.name,
        );
        if !self.ask(prompt).await {
            info!("Transfer cancelled by user");
            return Ok(SendOutcome::Cancelled);
        }

        let results = self
            .gateway
            .send_transactions(&network, percentage, &recipient)
            .await?;

        self.session.write().await.set_results(results.clone());

        let succeeded = results.iter().filter(|r| r.is_success()).count();
        info!(
            "Transactions completed: {} succeeded, {} failed",
            succeeded,
            results.len() - succeeded
        );
        Ok(SendOutcome::Sent(results))
    }

    /// Run the (blocking) confirmation off the async executor
    async fn ask(&self, prompt: String) -> bool {
        let confirmer = Arc::clone(&self.confirmer);
        match tokio::task::spawn_blocking(move || confirmer.confirm(&prompt)).await {
            Ok(answer) => answer,
            Err(e) => {
                warn!("Confirmation prompt aborted: {}", e);
                false
            }
        }
    }

    /// Tell the backend to forget the keys, then reset local state regardless
    pub async fn clear_session(&self) -> Result<ClearReport> {
        let result = self.run_clear().await;
        log_failure("clear session", result)
    }

    async fn run_clear(&self) -> Result<ClearReport> {
        let _in_flight = self.begin(Operation::ClearSession)?;

        let server_error = self.gateway.clear_session().await.err();
        if let Some(e) = &server_error {
            warn!("Backend session not cleared: {}", e);
        }

        self.session.write().await.clear();
        debug!("Local session reset");

        Ok(ClearReport { server_error })
    }
}

fn log_failure<T>(step: &str, result: Result<T>) -> Result<T> {
    if let Err(e) = &result {
        warn!("Failed to {}: {}", step, e);
    }
    result
}

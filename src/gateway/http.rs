//! HTTP implementation of the request gateway
//!
//! The backend keeps imported keys in its session cookie, so one client with
//! a cookie store has to carry every step of a workflow.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use super::types::{
    convert_results, BalancesPayload, BalancesRequest, Envelope, ImportPayload, SendPayload,
    SendRequest,
};
use super::{BalanceEntry, ImportedWallets, KeyFile, Operation, RequestGateway, TransferResult};
use crate::config::BackendConfig;
use crate::error::{Error, Result};
use crate::network::NetworkConfig;
use crate::transfer::{Address, Percentage};

/// Gateway talking to the multi-sender backend over HTTP
pub struct HttpGateway {
    client: Client,
    base_url: Url,
    send_timeout: Duration,
}

impl HttpGateway {
    /// Create a gateway from backend settings
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let client = Client::builder()
            .cookie_store(true)
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| Error::Settings(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url(&config.base_url)?,
            send_timeout: Duration::from_millis(config.send_timeout_ms),
        })
    }

    fn endpoint(&self, operation: Operation) -> Result<Url> {
        self.base_url
            .join(operation.endpoint())
            .map_err(|e| Error::Settings(format!("Invalid endpoint URL: {}", e)))
    }

    /// Send a request and decode the JSON envelope, whatever the status code
    async fn call<T: DeserializeOwned>(
        &self,
        operation: Operation,
        request: RequestBuilder,
    ) -> Result<T> {
        let transport = |e: reqwest::Error| Error::Transport {
            operation,
            message: e.to_string(),
        };

        let response = request.send().await.map_err(transport)?;
        let status = response.status();
        let body = response.text().await.map_err(transport)?;

        debug!("{} answered HTTP {} ({} bytes)", operation, status, body.len());

        let envelope: Envelope<T> = serde_json::from_str(&body).map_err(|e| Error::Transport {
            operation,
            message: format!("Unexpected response (HTTP {}): {}", status, e),
        })?;

        envelope.into_result(operation)
    }
}

/// Parse the base URL, making sure endpoint joins append rather than replace
fn base_url(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw.trim())
        .map_err(|e| Error::Settings(format!("Invalid backend URL '{}': {}", raw, e)))?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

#[async_trait]
impl RequestGateway for HttpGateway {
    async fn import_keys(&self, file: &KeyFile) -> Result<ImportedWallets> {
        let operation = Operation::ImportKeys;

        let part = Part::bytes(file.contents.clone())
            .file_name(file.file_name.clone())
            .mime_str("text/plain")
            .map_err(|e| Error::Import(format!("Cannot attach key file: {}", e)))?;
        let form = Form::new().part("file", part);

        info!("Uploading key file {}", file.file_name);

        let request = self.client.post(self.endpoint(operation)?).multipart(form);
        let payload: ImportPayload = self.call(operation, request).await?;

        let count = payload.wallets.len();
        if let Some(reported) = payload.count {
            if reported != count {
                warn!(
                    "Backend reported {} wallets but returned {} addresses",
                    reported, count
                );
            }
        }

        Ok(ImportedWallets {
            wallets: payload.wallets,
            count,
        })
    }

    async fn load_balances(&self, network: &NetworkConfig) -> Result<Vec<BalanceEntry>> {
        let operation = Operation::LoadBalances;

        debug!(
            "Requesting balances on {} (chain {})",
            network.name, network.chain_id
        );

        let request = self
            .client
            .post(self.endpoint(operation)?)
            .json(&BalancesRequest { network });
        let payload: BalancesPayload = self.call(operation, request).await?;

        Ok(payload.balances)
    }

    async fn send_transactions(
        &self,
        network: &NetworkConfig,
        percentage: Percentage,
        recipient: &Address,
    ) -> Result<Vec<TransferResult>> {
        let operation = Operation::SendTransactions;

        info!(
            "Dispatching transfers: {} to {} on {}",
            percentage, recipient, network.name
        );

        let request = self
            .client
            .post(self.endpoint(operation)?)
            .timeout(self.send_timeout)
            .json(&SendRequest {
                network,
                percentage,
                recipient_address: recipient,
            });
        let payload: SendPayload = self.call(operation, request).await?;

        convert_results(payload.results)
    }

    async fn clear_session(&self) -> Result<()> {
        let operation = Operation::ClearSession;

        let response = self
            .client
            .post(self.endpoint(operation)?)
            .send()
            .await
            .map_err(|e| Error::Transport {
                operation,
                message: e.to_string(),
            })?;

        let status = response.status();
        if status.is_success() {
            debug!("Backend session cleared");
            Ok(())
        } else {
            Err(Error::Backend {
                operation,
                message: format!("{} (HTTP {})", operation.fallback_message(), status),
            })
        }
    }
}

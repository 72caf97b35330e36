//! EVM Multi-Sender Library
//!
//! Client workflow for sweeping many EVM wallets into one recipient through
//! the multi-sender backend: import keys, pick a network, load balances,
//! send, report.

pub mod cli;
pub mod config;
pub mod error;
pub mod gateway;
pub mod network;
pub mod presenter;
pub mod session;
pub mod transfer;

// Re-export commonly used types
pub use config::Config;
pub use error::{Error, Result};
pub use gateway::{HttpGateway, RequestGateway};
pub use network::{NetworkConfig, NetworkRegistry, NetworkSelection};
pub use session::{SessionState, WorkflowStage};
pub use transfer::{Percentage, TransferOrchestrator, TransferRequest};

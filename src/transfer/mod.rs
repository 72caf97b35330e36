//! Transfer workflow
//!
//! Input validation (recipient address, percentage), user confirmation and
//! the orchestrator that sequences the backend calls.

pub mod address;
pub mod confirm;
pub mod orchestrator;
pub mod percentage;

pub use address::{is_valid_address, Address};
pub use confirm::{AutoConfirm, Confirmer, TerminalConfirmer};
pub use orchestrator::{ClearReport, SendOutcome, TransferOrchestrator, TransferRequest};
pub use percentage::Percentage;

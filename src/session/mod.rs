//! Session state for one multi-send workflow

pub mod state;

pub use state::{SelectedNetwork, SessionState, WorkflowStage};

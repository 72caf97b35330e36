//! User confirmation before irreversible actions

use dialoguer::Confirm;
use tracing::warn;

/// Ask the user a yes/no question
pub trait Confirmer: Send + Sync {
    fn confirm(&self, prompt: &str) -> bool;
}

/// Interactive terminal prompt, defaulting to "no"
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalConfirmer;

impl Confirmer for TerminalConfirmer {
    fn confirm(&self, prompt: &str) -> bool {
        match Confirm::new().with_prompt(prompt).default(false).interact() {
            Ok(answer) => answer,
            Err(e) => {
                // No terminal (piped stdin, CI): never assume consent
                warn!("Confirmation prompt unavailable: {}", e);
                false
            }
        }
    }
}

/// Approves everything (`--force`)
#[derive(Debug, Default, Clone, Copy)]
pub struct AutoConfirm;

impl Confirmer for AutoConfirm {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

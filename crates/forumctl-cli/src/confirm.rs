//! Confirmation gate for destructive changes

use dialoguer::Confirm;
use log::{debug, warn};

/// Operator answer to a confirmation request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmationDecision {
    Confirmed,
    Declined,
}

impl From<bool> for ConfirmationDecision {
    fn from(confirmed: bool) -> Self {
        if confirmed {
            ConfirmationDecision::Confirmed
        } else {
            ConfirmationDecision::Declined
        }
    }
}

/// Source of interactive yes/no answers
pub trait Prompter: Send + Sync {
    fn ask(&self, prompt: &str) -> ConfirmationDecision;
}

/// Prompter that asks on the terminal, defaulting to "no"
#[derive(Debug, Default)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn ask(&self, prompt: &str) -> ConfirmationDecision {
        match Confirm::new().with_prompt(prompt).default(false).interact() {
            Ok(answer) => answer.into(),
            Err(e) => {
                // no terminal to ask on
                warn!("Could not show confirmation prompt: {}", e);
                ConfirmationDecision::Declined
            }
        }
    }
}

/// Decide whether a destructive change may proceed.
///
/// A pre-supplied decision is used as is; otherwise the prompter blocks until
/// the operator answers.
pub fn confirm(
    prompt: &str,
    pre_supplied: Option<ConfirmationDecision>,
    prompter: &dyn Prompter,
) -> ConfirmationDecision {
    if let Some(decision) = pre_supplied {
        debug!("using pre-supplied confirmation {:?} for '{}'", decision, prompt);
        return decision;
    }

    prompter.ask(prompt)
}

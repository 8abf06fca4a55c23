//! Command handlers
//!
//! Every handler follows the same sequence: validate (resolve the user, check
//! the topic/forum exists), optionally gate on confirmation, make a single
//! store call, and hand an `Outcome` back to the reporter.

use forumctl_core::config::Permissions;
use forumctl_core::{FormatMode, ForumError, ForumResult, ForumStore, TopicRecord};
use log::info;
use std::sync::Arc;

use crate::confirm::{confirm, ConfirmationDecision, Prompter};
use crate::outcome::Outcome;
use crate::output::{shows_full_records, TopicRow, UserIdRow};

pub mod engagement;
pub mod favorite;
pub mod moderator;
pub mod user;

/// Output controls for CLI commands
#[derive(Debug, Clone, Copy)]
pub struct OutputOptions {
    pub quiet: bool,
    pub verbose: bool,
}

impl OutputOptions {
    pub fn should_print(&self) -> bool {
        !self.quiet
    }

    pub fn should_print_verbose(&self) -> bool {
        self.verbose && !self.quiet
    }
}

/// Execution controls shared by mutating commands
#[derive(Debug, Clone, Copy)]
pub struct OperationOptions {
    pub dry_run: bool,
    /// Confirmation supplied ahead of time (`--yes` or configuration)
    pub pre_confirmed: Option<ConfirmationDecision>,
    pub output: OutputOptions,
}

impl OperationOptions {
    pub fn new(dry_run: bool, quiet: bool, verbose: bool) -> Self {
        Self {
            dry_run,
            pre_confirmed: None,
            output: OutputOptions { quiet, verbose },
        }
    }

    pub fn with_pre_confirmed(mut self, decision: Option<ConfirmationDecision>) -> Self {
        self.pre_confirmed = decision;
        self
    }

    /// Combine command-line flags with configured permissions
    pub fn from_flags(
        yes: bool,
        dry_run: bool,
        quiet: bool,
        verbose: bool,
        permissions: &Permissions,
    ) -> Self {
        let pre_confirmed = if yes || !permissions.require_confirmation {
            Some(ConfirmationDecision::Confirmed)
        } else {
            None
        };

        Self::new(dry_run || permissions.dry_run_mode, quiet, verbose)
            .with_pre_confirmed(pre_confirmed)
    }
}

/// Everything a handler needs for one invocation
pub struct CommandContext {
    pub store: Arc<dyn ForumStore>,
    pub opts: OperationOptions,
    pub prompter: Arc<dyn Prompter>,
}

impl CommandContext {
    pub fn new(
        store: Arc<dyn ForumStore>,
        opts: OperationOptions,
        prompter: Arc<dyn Prompter>,
    ) -> Self {
        Self {
            store,
            opts,
            prompter,
        }
    }

    pub fn store(&self) -> &dyn ForumStore {
        self.store.as_ref()
    }
}

pub(crate) fn log_verbose(opts: &OperationOptions, message: &str) {
    if opts.output.should_print_verbose() {
        eprintln!("{}", message);
    }
}

/// Outcome for a dry run of a validated mutation
pub(crate) fn dry_run(action: String) -> Outcome {
    Outcome::Success(format!("DRY-RUN: would {}", action))
}

/// Run the confirmation gate for a destructive change
pub(crate) fn gate(ctx: &CommandContext, prompt: &str) -> ConfirmationDecision {
    let decision = confirm(prompt, ctx.opts.pre_confirmed, ctx.prompter.as_ref());
    if decision == ConfirmationDecision::Declined {
        info!("declined: {}", prompt);
    }
    decision
}

/// Map a store's accept/reject answer to an outcome
pub(crate) fn accepted(ok: bool, success: &str, failure: &str) -> ForumResult<Outcome> {
    if ok {
        Ok(Outcome::Success(success.to_string()))
    } else {
        Err(ForumError::StoreMutationFailed(failure.to_string()))
    }
}

/// Wrap topic records as rows, attaching permalinks when the mode shows them
pub(crate) fn topic_rows(
    store: &dyn ForumStore,
    topics: Vec<TopicRecord>,
    mode: FormatMode,
) -> ForumResult<Vec<TopicRow>> {
    let with_links = shows_full_records(mode);
    topics
        .into_iter()
        .map(|topic| {
            let permalink = if with_links {
                store.topic_url(topic.id)?
            } else {
                None
            };
            Ok(TopicRow::new(topic, permalink))
        })
        .collect()
}

pub(crate) fn user_id_rows(ids: Vec<u64>) -> Vec<UserIdRow> {
    ids.into_iter().map(|id| UserIdRow { id }).collect()
}

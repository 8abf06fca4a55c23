//! Single exit point for every command

use crate::ops::OutputOptions;
use forumctl_core::ForumResult;
use std::io::Write;

/// How a command finished. Errors are the failure branch of `ForumResult<Outcome>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Change applied (or previewed); the message is for the operator
    Success(String),
    /// Listing output, already shaped by the formatter
    Rendered(String),
    /// Operator declined a confirmation; nothing was changed
    Declined,
}

/// Emit the outcome of a command and return the process exit code
pub fn report<O: Write, E: Write>(
    result: ForumResult<Outcome>,
    output: &OutputOptions,
    out: &mut O,
    err: &mut E,
) -> i32 {
    // Write failures (closed pipe) cannot be reported anywhere useful.
    match result {
        Ok(Outcome::Success(message)) => {
            if output.should_print() {
                let _ = writeln!(out, "✅ {}", message);
            }
            0
        }
        Ok(Outcome::Rendered(payload)) => {
            if !payload.is_empty() {
                let _ = writeln!(out, "{}", payload);
            }
            0
        }
        Ok(Outcome::Declined) => 0,
        Err(e) => {
            let _ = writeln!(err, "❌ Error: {}", e);
            1
        }
    }
}

use forumctl_core::{resolve, ForumError, ForumResult, ForumRole};

use super::{accepted, dry_run, log_verbose, CommandContext};
use crate::outcome::Outcome;

/// Handle `user spam`
pub async fn handle_user_spam(ctx: &CommandContext, user: &str) -> ForumResult<Outcome> {
    let store = ctx.store();
    let user = resolve::resolve_user(store, user)?;

    if ctx.opts.dry_run {
        return Ok(dry_run(format!(
            "mark topics and replies of {} ({}) as spam",
            user.display_name, user.id
        )));
    }

    let marked = store.mark_spam(user.id)?;
    accepted(
        marked,
        "User topics and replies marked as spam.",
        "Could not mark topics and replies as spam.",
    )
}

/// Handle `user ham`
pub async fn handle_user_ham(ctx: &CommandContext, user: &str) -> ForumResult<Outcome> {
    let store = ctx.store();
    let user = resolve::resolve_user(store, user)?;

    if ctx.opts.dry_run {
        return Ok(dry_run(format!(
            "mark topics and replies of {} ({}) as ham",
            user.display_name, user.id
        )));
    }

    let marked = store.mark_ham(user.id)?;
    accepted(
        marked,
        "User topics and replies marked as ham.",
        "Could not mark topics and replies as ham.",
    )
}

/// Handle `user set-role`. Unknown roles fall back to participant.
pub async fn handle_user_set_role(
    ctx: &CommandContext,
    user: &str,
    role: &str,
) -> ForumResult<Outcome> {
    let store = ctx.store();
    let user = resolve::resolve_user(store, user)?;

    let parsed = ForumRole::parse_or_default(role);
    if !parsed.as_str().eq_ignore_ascii_case(role.trim()) {
        log_verbose(
            &ctx.opts,
            &format!("Unknown role '{}', using '{}'", role, parsed),
        );
    }

    if ctx.opts.dry_run {
        return Ok(dry_run(format!(
            "set the role of {} ({}) to {}",
            user.display_name, user.id, parsed
        )));
    }

    match store.set_role(user.id, parsed)? {
        Some(applied) => Ok(Outcome::Success(format!(
            "New role for user set: {}",
            applied
        ))),
        None => Err(ForumError::StoreMutationFailed(
            "Could not set new role for user.".to_string(),
        )),
    }
}

/// Handle `user permalink`
pub async fn handle_user_permalink(ctx: &CommandContext, user: &str) -> ForumResult<Outcome> {
    let store = ctx.store();
    let user = resolve::resolve_user(store, user)?;

    match store.profile_url(user.id)? {
        Some(url) => Ok(Outcome::Success(format!("User profile page: {}", url))),
        None => Err(ForumError::StoreMutationFailed(
            "Could not find user profile page.".to_string(),
        )),
    }
}

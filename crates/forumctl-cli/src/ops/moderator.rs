use forumctl_core::{guard, resolve, FormatMode, FormatSpec, ForumResult};

use super::{accepted, dry_run, gate, log_verbose, user_id_rows, CommandContext};
use crate::confirm::ConfirmationDecision;
use crate::outcome::Outcome;
use crate::output::{render, shows_full_records, UserRow};

/// Formats accepted by `moderator list`
pub const LIST_FORMATS: FormatSpec = FormatSpec::new(
    &[
        FormatMode::Table,
        FormatMode::Ids,
        FormatMode::Json,
        FormatMode::Count,
        FormatMode::Yaml,
    ],
    FormatMode::Table,
);

/// Handle `moderator add`
pub async fn handle_moderator_add(
    ctx: &CommandContext,
    forum_id: u64,
    user: &str,
) -> ForumResult<Outcome> {
    let store = ctx.store();
    let user = resolve::resolve_user(store, user)?;
    guard::assert_forum(store, forum_id)?;

    if ctx.opts.dry_run {
        return Ok(dry_run(format!(
            "add {} ({}) as a moderator of forum {}",
            user.display_name, user.id, forum_id
        )));
    }

    log_verbose(
        &ctx.opts,
        &format!("Adding user {} as moderator of forum {}", user.id, forum_id),
    );
    let added = store.add_moderator(forum_id, user.id)?;
    accepted(
        added,
        "Member added as a moderator.",
        "Could not add the moderator.",
    )
}

/// Handle `moderator remove`
pub async fn handle_moderator_remove(
    ctx: &CommandContext,
    forum_id: u64,
    user: &str,
) -> ForumResult<Outcome> {
    let store = ctx.store();
    let user = resolve::resolve_user(store, user)?;
    guard::assert_forum(store, forum_id)?;

    if ctx.opts.dry_run {
        return Ok(dry_run(format!(
            "remove {} ({}) as a moderator of forum {}",
            user.display_name, user.id, forum_id
        )));
    }

    let prompt = format!(
        "Remove {} as a moderator of forum {}?",
        user.display_name, forum_id
    );
    if gate(ctx, &prompt) == ConfirmationDecision::Declined {
        return Ok(Outcome::Declined);
    }

    let removed = store.remove_moderator(forum_id, user.id)?;
    accepted(
        removed,
        "Member removed as a moderator.",
        "Could not remove the moderator.",
    )
}

/// Handle `moderator list`
pub async fn handle_moderator_list(
    ctx: &CommandContext,
    forum_id: u64,
    format: Option<FormatMode>,
) -> ForumResult<Outcome> {
    let mode = LIST_FORMATS.select(format)?;
    let store = ctx.store();
    guard::assert_forum(store, forum_id)?;

    let rendered = if shows_full_records(mode) {
        let rows: Vec<UserRow> = store
            .moderators_of(forum_id)?
            .into_iter()
            .map(UserRow::from)
            .collect();
        render(&rows, mode, &LIST_FORMATS)?
    } else {
        let rows = user_id_rows(store.moderator_ids_of(forum_id)?);
        render(&rows, mode, &LIST_FORMATS)?
    };

    Ok(Outcome::Rendered(rendered))
}

use forumctl_core::{
    guard, resolve, FormatMode, FormatSpec, ForumError, ForumResult, TopicQuery,
};

use super::{accepted, dry_run, gate, log_verbose, topic_rows, user_id_rows, CommandContext};
use crate::confirm::ConfirmationDecision;
use crate::outcome::Outcome;
use crate::output::render;

/// Formats accepted by `engagement list-topics`
pub const LIST_TOPICS_FORMATS: FormatSpec = FormatSpec::new(
    &[
        FormatMode::Table,
        FormatMode::Ids,
        FormatMode::Count,
        FormatMode::Json,
        FormatMode::Yaml,
    ],
    FormatMode::Table,
);

/// Formats accepted by `engagement list-users`
pub const LIST_USERS_FORMATS: FormatSpec = FormatSpec::new(
    &[FormatMode::Ids, FormatMode::Count, FormatMode::Json],
    FormatMode::Ids,
);

/// Handle `engagement add`
pub async fn handle_engagement_add(
    ctx: &CommandContext,
    user: &str,
    topic_id: u64,
) -> ForumResult<Outcome> {
    let store = ctx.store();
    let user = resolve::resolve_user(store, user)?;
    guard::assert_topic(store, topic_id)?;

    if ctx.opts.dry_run {
        return Ok(dry_run(format!(
            "add topic {} to the engagements of {} ({})",
            topic_id, user.display_name, user.id
        )));
    }

    log_verbose(
        &ctx.opts,
        &format!("Adding topic {} to engagements of user {}", topic_id, user.id),
    );
    let added = store.add_engagement(user.id, topic_id)?;
    accepted(
        added,
        "Engagement successfully added.",
        "Could not add the engagement.",
    )
}

/// Handle `engagement remove`
pub async fn handle_engagement_remove(
    ctx: &CommandContext,
    user: &str,
    topic_id: u64,
) -> ForumResult<Outcome> {
    let store = ctx.store();
    let user = resolve::resolve_user(store, user)?;
    guard::assert_topic(store, topic_id)?;

    if ctx.opts.dry_run {
        return Ok(dry_run(format!(
            "remove topic {} from the engagements of {} ({})",
            topic_id, user.display_name, user.id
        )));
    }

    let prompt = format!(
        "Remove topic {} from the engagements of {}?",
        topic_id, user.display_name
    );
    if gate(ctx, &prompt) == ConfirmationDecision::Declined {
        return Ok(Outcome::Declined);
    }

    let removed = store.remove_engagement(user.id, topic_id)?;
    accepted(
        removed,
        "Engagement successfully removed.",
        "Could not remove engagement.",
    )
}

/// Handle `engagement list-users`. A topic with no engaged users is reported as an error.
pub async fn handle_engagement_list_users(
    ctx: &CommandContext,
    topic_id: u64,
    format: Option<FormatMode>,
) -> ForumResult<Outcome> {
    let mode = LIST_USERS_FORMATS.select(format)?;
    let store = ctx.store();
    guard::assert_topic(store, topic_id)?;

    let ids = store.engagements_of_topic(topic_id)?;
    if ids.is_empty() {
        return Err(ForumError::EmptyResult(
            "Could not find any users.".to_string(),
        ));
    }

    let rows = user_id_rows(ids);
    Ok(Outcome::Rendered(render(&rows, mode, &LIST_USERS_FORMATS)?))
}

/// Handle `engagement list-topics`
pub async fn handle_engagement_list_topics(
    ctx: &CommandContext,
    user: &str,
    format: Option<FormatMode>,
    limit: Option<usize>,
) -> ForumResult<Outcome> {
    let mode = LIST_TOPICS_FORMATS.select(format)?;
    let store = ctx.store();
    let user = resolve::resolve_user(store, user)?;

    let query = TopicQuery::default().with_limit(limit);
    let topics = store.engagements_of_user(user.id, &query)?;
    let rows = topic_rows(store, topics, mode)?;

    Ok(Outcome::Rendered(render(&rows, mode, &LIST_TOPICS_FORMATS)?))
}

/// Handle `engagement recalculate`
pub async fn handle_engagement_recalculate(
    ctx: &CommandContext,
    topic_id: u64,
) -> ForumResult<Outcome> {
    let store = ctx.store();
    guard::assert_topic(store, topic_id)?;

    if ctx.opts.dry_run {
        return Ok(dry_run(format!(
            "recalculate the engagements of topic {}",
            topic_id
        )));
    }

    log_verbose(
        &ctx.opts,
        &format!("Recalculating engagements of topic {}", topic_id),
    );
    let recalculated = store.recalculate_engagements(topic_id)?;
    accepted(
        recalculated,
        "Engagements successfully recalculated.",
        "Could not recalculate engagements.",
    )
}

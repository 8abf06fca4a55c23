//! forumctl-core - Core forum relationship library for forumctl
//!
//! This library provides the core abstractions shared by every forumctl command:
//! the ForumStore collaborator trait, the domain records it hands back, the
//! identifier resolver and existence guard, and the output format declarations.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub mod config;

#[cfg(test)]
mod tests;

/// Kind of entity an ID can refer to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Topic,
    Forum,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Topic => "topic",
            EntityKind::Forum => "forum",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Core errors for forum commands
#[derive(Error, Debug)]
pub enum ForumError {
    #[error("No user found by that username or ID: {0}\n→ Suggestion: Pass either the user's login or their numeric ID")]
    UserNotFound(String),

    #[error("No {kind} found by that ID: {id}")]
    EntityNotFound { kind: EntityKind, id: u64 },

    #[error("Invalid format '{mode}' for this command\n→ Suggestion: Use one of: {supported}")]
    InvalidFormatMode { mode: FormatMode, supported: String },

    #[error("{0}")]
    StoreMutationFailed(String),

    #[error("{0}")]
    EmptyResult(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("IO error: {0}\n→ Suggestion: Check the store path and its permissions")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),
}

/// Result type for forum operations
pub type ForumResult<T> = Result<T, ForumError>;

/// A user record as held by the backing store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: u64,
    pub login: String,
    pub display_name: String,
}

impl UserRecord {
    pub fn new(id: u64, login: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id,
            login: login.into(),
            display_name: display_name.into(),
        }
    }
}

/// A user resolved from an operator-supplied identifier.
///
/// Lives for a single command invocation and is never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedUser {
    pub id: u64,
    pub display_name: String,
}

impl From<UserRecord> for ResolvedUser {
    fn from(user: UserRecord) -> Self {
        Self {
            id: user.id,
            display_name: user.display_name,
        }
    }
}

/// A topic record as held by the backing store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicRecord {
    pub id: u64,
    pub title: String,
    pub author_id: u64,
    pub status: String,
}

/// Query arguments for per-user topic listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TopicQuery {
    /// Maximum number of topics to return, applied after the store's ordering
    pub limit: Option<usize>,
}

impl TopicQuery {
    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }
}

/// Forum-wide roles a user can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ForumRole {
    Keymaster,
    Moderator,
    Participant,
    Spectator,
    Blocked,
}

impl ForumRole {
    pub const ALL: [ForumRole; 5] = [
        ForumRole::Keymaster,
        ForumRole::Moderator,
        ForumRole::Participant,
        ForumRole::Spectator,
        ForumRole::Blocked,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ForumRole::Keymaster => "keymaster",
            ForumRole::Moderator => "moderator",
            ForumRole::Participant => "participant",
            ForumRole::Spectator => "spectator",
            ForumRole::Blocked => "blocked",
        }
    }

    /// Parse a role name, falling back to `Participant` for anything unknown
    pub fn parse_or_default(raw: &str) -> Self {
        let wanted = raw.trim();
        Self::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(wanted))
            .unwrap_or(ForumRole::Participant)
    }
}

impl fmt::Display for ForumRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output shapes a listing command can render
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatMode {
    Table,
    Ids,
    Count,
    Json,
    Yaml,
}

impl FormatMode {
    pub fn as_str(self) -> &'static str {
        match self {
            FormatMode::Table => "table",
            FormatMode::Ids => "ids",
            FormatMode::Count => "count",
            FormatMode::Json => "json",
            FormatMode::Yaml => "yaml",
        }
    }
}

impl fmt::Display for FormatMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormatMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "table" => Ok(FormatMode::Table),
            "ids" => Ok(FormatMode::Ids),
            "count" => Ok(FormatMode::Count),
            "json" => Ok(FormatMode::Json),
            "yaml" => Ok(FormatMode::Yaml),
            other => Err(format!(
                "unknown format '{}' (expected table, ids, count, json or yaml)",
                other
            )),
        }
    }
}

/// Formats a command accepts, plus the one it uses when none is given
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatSpec {
    pub supported: &'static [FormatMode],
    pub default: FormatMode,
}

impl FormatSpec {
    pub const fn new(supported: &'static [FormatMode], default: FormatMode) -> Self {
        Self { supported, default }
    }

    pub fn supports(&self, mode: FormatMode) -> bool {
        self.supported.contains(&mode)
    }

    /// Pick the active mode for one invocation. Never substitutes a different mode.
    pub fn select(&self, requested: Option<FormatMode>) -> ForumResult<FormatMode> {
        let mode = requested.unwrap_or(self.default);
        if self.supports(mode) {
            Ok(mode)
        } else {
            Err(ForumError::InvalidFormatMode {
                mode,
                supported: self.describe(),
            })
        }
    }

    /// Comma separated list of the supported modes
    pub fn describe(&self) -> String {
        self.supported
            .iter()
            .map(|mode| mode.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Backing forum store consumed by every command.
///
/// Mutations report whether the store accepted the change; the store alone
/// decides what counts as a duplicate or a no-op.
pub trait ForumStore: Send + Sync {
    /// Look up a user by numeric ID
    fn lookup_user_by_id(&self, id: u64) -> ForumResult<Option<UserRecord>>;

    /// Look up a user by login name
    fn lookup_user_by_login(&self, login: &str) -> ForumResult<Option<UserRecord>>;

    fn topic_exists(&self, topic_id: u64) -> ForumResult<bool>;

    fn forum_exists(&self, forum_id: u64) -> ForumResult<bool>;

    fn add_favorite(&self, user_id: u64, topic_id: u64) -> ForumResult<bool>;

    fn remove_favorite(&self, user_id: u64, topic_id: u64) -> ForumResult<bool>;

    /// IDs of the users who favorited a topic
    fn favoriters_of(&self, topic_id: u64) -> ForumResult<Vec<u64>>;

    /// Topics a user favorited
    fn favorites_of(&self, user_id: u64, query: &TopicQuery) -> ForumResult<Vec<TopicRecord>>;

    fn add_engagement(&self, user_id: u64, topic_id: u64) -> ForumResult<bool>;

    fn remove_engagement(&self, user_id: u64, topic_id: u64) -> ForumResult<bool>;

    /// IDs of the users engaged in a topic
    fn engagements_of_topic(&self, topic_id: u64) -> ForumResult<Vec<u64>>;

    /// Topics a user is engaged in
    fn engagements_of_user(
        &self,
        user_id: u64,
        query: &TopicQuery,
    ) -> ForumResult<Vec<TopicRecord>>;

    /// Rebuild the engagement set of a topic from its posts
    fn recalculate_engagements(&self, topic_id: u64) -> ForumResult<bool>;

    fn add_moderator(&self, forum_id: u64, user_id: u64) -> ForumResult<bool>;

    fn remove_moderator(&self, forum_id: u64, user_id: u64) -> ForumResult<bool>;

    fn moderators_of(&self, forum_id: u64) -> ForumResult<Vec<UserRecord>>;

    fn moderator_ids_of(&self, forum_id: u64) -> ForumResult<Vec<u64>>;

    /// Mark all of a user's topics and replies as spam
    fn mark_spam(&self, user_id: u64) -> ForumResult<bool>;

    /// Mark all of a user's topics and replies as ham
    fn mark_ham(&self, user_id: u64) -> ForumResult<bool>;

    /// Set a user's forum role, returning the role name the store applied
    fn set_role(&self, user_id: u64, role: ForumRole) -> ForumResult<Option<String>>;

    /// URL of a user's profile page
    fn profile_url(&self, user_id: u64) -> ForumResult<Option<String>>;

    /// URL of a topic, attached to topic listings as `permalink`.
    /// Default implementation has no permalinks.
    fn topic_url(&self, _topic_id: u64) -> ForumResult<Option<String>> {
        Ok(None)
    }
}

/// Resolution of loosely specified user identifiers
pub mod resolve {
    use super::*;
    use log::debug;

    /// Parse a raw identifier as a positive decimal ID
    pub fn numeric_id(raw: &str) -> Option<u64> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        trimmed.parse::<u64>().ok().filter(|id| *id > 0)
    }

    /// Resolve a login or numeric ID into a user.
    ///
    /// Numeric identifiers are tried as IDs first and then as logins, so a
    /// user whose login is all digits can still be found.
    pub fn resolve_user(store: &dyn ForumStore, raw: &str) -> ForumResult<ResolvedUser> {
        if let Some(id) = numeric_id(raw) {
            if let Some(user) = store.lookup_user_by_id(id)? {
                debug!("resolved '{}' as user ID {}", raw, user.id);
                return Ok(user.into());
            }
            debug!("no user with ID {}, trying '{}' as a login", id, raw);
        }

        match store.lookup_user_by_login(raw.trim())? {
            Some(user) => {
                debug!("resolved '{}' as login of user {}", raw, user.id);
                Ok(user.into())
            }
            None => Err(ForumError::UserNotFound(raw.to_string())),
        }
    }
}

/// Existence checks run before any read or mutation of a topic or forum
pub mod guard {
    use super::*;
    use log::debug;

    pub fn assert_exists(store: &dyn ForumStore, kind: EntityKind, id: u64) -> ForumResult<()> {
        let exists = match kind {
            EntityKind::Topic => store.topic_exists(id)?,
            EntityKind::Forum => store.forum_exists(id)?,
        };

        if exists {
            debug!("{} {} exists", kind, id);
            Ok(())
        } else {
            Err(ForumError::EntityNotFound { kind, id })
        }
    }

    pub fn assert_topic(store: &dyn ForumStore, topic_id: u64) -> ForumResult<()> {
        assert_exists(store, EntityKind::Topic, topic_id)
    }

    pub fn assert_forum(store: &dyn ForumStore, forum_id: u64) -> ForumResult<()> {
        assert_exists(store, EntityKind::Forum, forum_id)
    }
}

/// Store implementation that rejects every call
#[derive(Debug)]
pub struct DummyForumStore;

impl DummyForumStore {
    fn unsupported<T>(what: &str) -> ForumResult<T> {
        Err(ForumError::UnsupportedOperation(format!(
            "{} not implemented by this store",
            what
        )))
    }
}

impl ForumStore for DummyForumStore {
    fn lookup_user_by_id(&self, _id: u64) -> ForumResult<Option<UserRecord>> {
        Self::unsupported("User lookup")
    }

    fn lookup_user_by_login(&self, _login: &str) -> ForumResult<Option<UserRecord>> {
        Self::unsupported("User lookup")
    }

    fn topic_exists(&self, _topic_id: u64) -> ForumResult<bool> {
        Self::unsupported("Topic check")
    }

    fn forum_exists(&self, _forum_id: u64) -> ForumResult<bool> {
        Self::unsupported("Forum check")
    }

    fn add_favorite(&self, _user_id: u64, _topic_id: u64) -> ForumResult<bool> {
        Self::unsupported("Adding favorites")
    }

    fn remove_favorite(&self, _user_id: u64, _topic_id: u64) -> ForumResult<bool> {
        Self::unsupported("Removing favorites")
    }

    fn favoriters_of(&self, _topic_id: u64) -> ForumResult<Vec<u64>> {
        Self::unsupported("Listing favoriters")
    }

    fn favorites_of(&self, _user_id: u64, _query: &TopicQuery) -> ForumResult<Vec<TopicRecord>> {
        Self::unsupported("Listing favorites")
    }

    fn add_engagement(&self, _user_id: u64, _topic_id: u64) -> ForumResult<bool> {
        Self::unsupported("Adding engagements")
    }

    fn remove_engagement(&self, _user_id: u64, _topic_id: u64) -> ForumResult<bool> {
        Self::unsupported("Removing engagements")
    }

    fn engagements_of_topic(&self, _topic_id: u64) -> ForumResult<Vec<u64>> {
        Self::unsupported("Listing engaged users")
    }

    fn engagements_of_user(
        &self,
        _user_id: u64,
        _query: &TopicQuery,
    ) -> ForumResult<Vec<TopicRecord>> {
        Self::unsupported("Listing engagements")
    }

    fn recalculate_engagements(&self, _topic_id: u64) -> ForumResult<bool> {
        Self::unsupported("Recalculating engagements")
    }

    fn add_moderator(&self, _forum_id: u64, _user_id: u64) -> ForumResult<bool> {
        Self::unsupported("Adding moderators")
    }

    fn remove_moderator(&self, _forum_id: u64, _user_id: u64) -> ForumResult<bool> {
        Self::unsupported("Removing moderators")
    }

    fn moderators_of(&self, _forum_id: u64) -> ForumResult<Vec<UserRecord>> {
        Self::unsupported("Listing moderators")
    }

    fn moderator_ids_of(&self, _forum_id: u64) -> ForumResult<Vec<u64>> {
        Self::unsupported("Listing moderators")
    }

    fn mark_spam(&self, _user_id: u64) -> ForumResult<bool> {
        Self::unsupported("Marking spam")
    }

    fn mark_ham(&self, _user_id: u64) -> ForumResult<bool> {
        Self::unsupported("Marking ham")
    }

    fn set_role(&self, _user_id: u64, _role: ForumRole) -> ForumResult<Option<String>> {
        Self::unsupported("Setting roles")
    }

    fn profile_url(&self, _user_id: u64) -> ForumResult<Option<String>> {
        Self::unsupported("Profile URLs")
    }
}

//! Rendering of listing results
//!
//! A listing is a slice of rows of one type. Each row type declares its field
//! set up front, so table headers and JSON/YAML keys never depend on which
//! records happen to be in the result.

use comfy_table::{presets, Table};
use forumctl_core::{FormatMode, FormatSpec, ForumError, ForumResult, TopicRecord, UserRecord};
use serde::Serialize;

/// A renderable record with a stable, declared field set
pub trait Row: Serialize {
    /// Column names, in display order
    const FIELDS: &'static [&'static str];

    fn id(&self) -> u64;

    /// Cell values, one per entry in `FIELDS`
    fn cells(&self) -> Vec<String>;
}

/// A user known only by ID
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserIdRow {
    pub id: u64,
}

impl Row for UserIdRow {
    const FIELDS: &'static [&'static str] = &["id"];

    fn id(&self) -> u64 {
        self.id
    }

    fn cells(&self) -> Vec<String> {
        vec![self.id.to_string()]
    }
}

/// A user with login and display name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserRow {
    pub id: u64,
    pub login: String,
    pub display_name: String,
}

impl From<UserRecord> for UserRow {
    fn from(user: UserRecord) -> Self {
        Self {
            id: user.id,
            login: user.login,
            display_name: user.display_name,
        }
    }
}

impl Row for UserRow {
    const FIELDS: &'static [&'static str] = &["id", "login", "display_name"];

    fn id(&self) -> u64 {
        self.id
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.login.clone(),
            self.display_name.clone(),
        ]
    }
}

/// A topic with its computed permalink
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopicRow {
    pub id: u64,
    pub title: String,
    pub author_id: u64,
    pub status: String,
    pub permalink: String,
}

impl TopicRow {
    pub fn new(topic: TopicRecord, permalink: Option<String>) -> Self {
        Self {
            id: topic.id,
            title: topic.title,
            author_id: topic.author_id,
            status: topic.status,
            permalink: permalink.unwrap_or_default(),
        }
    }
}

impl Row for TopicRow {
    const FIELDS: &'static [&'static str] = &["id", "title", "author_id", "status", "permalink"];

    fn id(&self) -> u64 {
        self.id
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.title.clone(),
            self.author_id.to_string(),
            self.status.clone(),
            self.permalink.clone(),
        ]
    }
}

/// Whether a mode shows full records (and so needs computed fields attached)
pub fn shows_full_records(mode: FormatMode) -> bool {
    matches!(mode, FormatMode::Table | FormatMode::Json | FormatMode::Yaml)
}

/// Render rows in the given mode. Rows are never reordered.
///
/// Fails with `InvalidFormatMode` when `mode` is not one of the command's
/// supported modes.
pub fn render<R: Row>(rows: &[R], mode: FormatMode, spec: &FormatSpec) -> ForumResult<String> {
    if !spec.supports(mode) {
        return Err(ForumError::InvalidFormatMode {
            mode,
            supported: spec.describe(),
        });
    }

    match mode {
        FormatMode::Ids => Ok(rows
            .iter()
            .map(|row| row.id().to_string())
            .collect::<Vec<_>>()
            .join(" ")),
        FormatMode::Count => Ok(rows.len().to_string()),
        FormatMode::Table => Ok(render_table(rows)),
        FormatMode::Json => serde_json::to_string_pretty(rows).map_err(|e| {
            ForumError::Serialization(format!("Failed to serialize results to JSON: {}", e))
        }),
        FormatMode::Yaml => serde_yaml::to_string(rows)
            .map(|yaml| yaml.trim_end().to_string())
            .map_err(|e| {
                ForumError::Serialization(format!("Failed to serialize results to YAML: {}", e))
            }),
    }
}

fn render_table<R: Row>(rows: &[R]) -> String {
    if rows.is_empty() {
        return String::new();
    }

    let mut table = Table::new();
    table.load_preset(presets::ASCII_FULL);
    table.set_header(R::FIELDS.to_vec());
    for row in rows {
        table.add_row(row.cells());
    }
    table.to_string()
}

use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use forumctl_core::FormatMode;

/// Forum relationship management CLI
#[derive(Parser)]
#[command(name = "forumctl")]
#[command(
    about = "Manage forum favorites, engagements, moderators and user roles",
    long_about = None
)]
#[command(version = "1.0.0-dev")]
pub struct Cli {
    /// Pre-confirm destructive changes
    #[arg(
        global = true,
        short = 'y',
        long,
        help = "Answer yes to confirmation prompts"
    )]
    pub yes: bool,

    /// Validate inputs without changing the store
    #[arg(
        global = true,
        long,
        help = "Print intended changes without mutating the store"
    )]
    pub dry_run: bool,

    /// Reduce output to errors and listings only
    #[arg(
        global = true,
        long,
        help = "Silence success messages",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,

    /// Show additional status output
    #[arg(
        global = true,
        long,
        help = "Show verbose status messages",
        conflicts_with = "quiet"
    )]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage topic favorites
    #[command(alias = "favorites")]
    Favorite {
        #[command(subcommand)]
        command: FavoriteCommands,
    },

    /// Manage topic engagements
    #[command(alias = "engagements")]
    Engagement {
        #[command(subcommand)]
        command: EngagementCommands,
    },

    /// Manage forum moderators
    #[command(alias = "moderators")]
    Moderator {
        #[command(subcommand)]
        command: ModeratorCommands,
    },

    /// Manage forum users
    #[command(alias = "users")]
    User {
        #[command(subcommand)]
        command: UserCommands,
    },

    /// Generate shell completions
    Completions {
        /// Target shell (bash, zsh, fish, powershell, elvish)
        #[arg(value_enum, help = "Shell to generate completions for")]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum FavoriteCommands {
    /// Add a topic to a user's favorites
    #[command(alias = "create")]
    Add {
        #[arg(long, value_name = "USER", help = "User login or numeric ID")]
        user_id: String,

        #[arg(long, help = "Topic ID")]
        topic_id: u64,
    },

    /// Remove a topic from a user's favorites
    #[command(alias = "delete")]
    Remove {
        #[arg(long, value_name = "USER", help = "User login or numeric ID")]
        user_id: String,

        #[arg(long, help = "Topic ID")]
        topic_id: u64,
    },

    /// List users who favorited a topic
    #[command(alias = "list_users")]
    ListUsers {
        /// Topic ID
        topic_id: u64,

        #[arg(long, help = "Output format (ids, count, json)")]
        format: Option<FormatMode>,
    },

    /// List topics a user favorited
    #[command(alias = "list_topics")]
    ListTopics {
        /// User login or numeric ID
        #[arg(value_name = "USER")]
        user: String,

        #[arg(long, help = "Output format (table, ids, count)")]
        format: Option<FormatMode>,

        #[arg(long, help = "Return at most this many topics")]
        limit: Option<usize>,
    },
}

#[derive(Subcommand)]
pub enum EngagementCommands {
    /// Add a topic to a user's engagements
    #[command(alias = "create")]
    Add {
        #[arg(long, value_name = "USER", help = "User login or numeric ID")]
        user_id: String,

        #[arg(long, help = "Topic ID")]
        topic_id: u64,
    },

    /// Remove a topic from a user's engagements
    #[command(alias = "delete")]
    Remove {
        #[arg(long, value_name = "USER", help = "User login or numeric ID")]
        user_id: String,

        #[arg(long, help = "Topic ID")]
        topic_id: u64,
    },

    /// List users engaged in a topic
    #[command(alias = "list_users")]
    ListUsers {
        /// Topic ID
        topic_id: u64,

        #[arg(long, help = "Output format (ids, count, json)")]
        format: Option<FormatMode>,
    },

    /// List topics a user is engaged in
    #[command(alias = "list_topics")]
    ListTopics {
        /// User login or numeric ID
        #[arg(value_name = "USER")]
        user: String,

        #[arg(long, help = "Output format (table, ids, count, json, yaml)")]
        format: Option<FormatMode>,

        #[arg(long, help = "Return at most this many topics")]
        limit: Option<usize>,
    },

    /// Recalculate the users engaged in a topic
    Recalculate {
        /// Topic ID
        topic_id: u64,
    },
}

#[derive(Subcommand)]
pub enum ModeratorCommands {
    /// Add a moderator to a forum
    #[command(alias = "create")]
    Add {
        #[arg(long, help = "Forum ID")]
        forum_id: u64,

        #[arg(long, value_name = "USER", help = "User login or numeric ID")]
        user_id: String,
    },

    /// Remove a moderator from a forum
    #[command(alias = "delete")]
    Remove {
        #[arg(long, help = "Forum ID")]
        forum_id: u64,

        #[arg(long, value_name = "USER", help = "User login or numeric ID")]
        user_id: String,
    },

    /// List the moderators of a forum
    List {
        #[arg(long, help = "Forum ID")]
        forum_id: u64,

        #[arg(long, help = "Output format (table, ids, json, count, yaml)")]
        format: Option<FormatMode>,
    },
}

#[derive(Subcommand)]
pub enum UserCommands {
    /// Mark a user's topics and replies as spam
    #[command(alias = "unham")]
    Spam {
        /// User login or numeric ID
        #[arg(value_name = "USER")]
        user: String,
    },

    /// Mark a user's topics and replies as ham
    #[command(alias = "unspam")]
    Ham {
        /// User login or numeric ID
        #[arg(value_name = "USER")]
        user: String,
    },

    /// Set a user's forum role
    #[command(alias = "set_role")]
    SetRole {
        #[arg(long, value_name = "USER", help = "User login or numeric ID")]
        user_id: String,

        #[arg(
            long,
            default_value = "participant",
            help = "Role to set (keymaster, moderator, participant, spectator, blocked)"
        )]
        role: String,
    },

    /// Print the URL of a user's profile page
    #[command(alias = "url")]
    Permalink {
        /// User login or numeric ID
        #[arg(value_name = "USER")]
        user: String,
    },

    /// Manage forum moderators (same as the top-level `moderator` command)
    Moderator {
        #[command(subcommand)]
        command: ModeratorCommands,
    },
}

/// Map clap error kinds to exit codes (0 for help/version, 1 for other errors)
pub fn exit_code_for_clap_error(kind: ErrorKind) -> i32 {
    match kind {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
        _ => 1,
    }
}

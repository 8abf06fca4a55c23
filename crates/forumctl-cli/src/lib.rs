//! CLI interface for forumctl
//!
//! Parses operator input, builds a command context around the configured
//! store, dispatches to the matching handler and reports the outcome.

use clap::{CommandFactory, Parser};
use clap_complete::{generate, Shell};
use forumctl_core::config::ForumctlConfig;
use forumctl_core::{ForumError, ForumResult, ForumStore};
use forumctl_store_json::JsonForumStore;
use log::debug;
use std::io::Write;
use std::sync::Arc;

mod args;
mod confirm;
mod ops;
mod outcome;
mod output;

pub use args::{
    exit_code_for_clap_error, Cli, Commands, EngagementCommands, FavoriteCommands,
    ModeratorCommands, UserCommands,
};
pub use confirm::{confirm, ConfirmationDecision, Prompter, TerminalPrompter};
pub use ops::engagement::{
    handle_engagement_add, handle_engagement_list_topics, handle_engagement_list_users,
    handle_engagement_recalculate, handle_engagement_remove,
};
pub use ops::favorite::{
    handle_favorite_add, handle_favorite_list_topics, handle_favorite_list_users,
    handle_favorite_remove,
};
pub use ops::moderator::{handle_moderator_add, handle_moderator_list, handle_moderator_remove};
pub use ops::user::{
    handle_user_ham, handle_user_permalink, handle_user_set_role, handle_user_spam,
};
pub use ops::{CommandContext, OperationOptions, OutputOptions};
pub use outcome::{report, Outcome};
pub use output::{render, Row, TopicRow, UserIdRow, UserRow};

/// Open the store named by configuration
pub fn create_store(config: &ForumctlConfig) -> ForumResult<Arc<dyn ForumStore>> {
    debug!("opening store at {}", config.store.path.display());
    let store = JsonForumStore::open(&config.store.path, config.store.site_url.clone())?;
    Ok(Arc::new(store))
}

/// Generate shell completion script for the given shell
pub fn write_completions<W: Write>(shell: Shell, mut writer: W) -> ForumResult<()> {
    let mut command = Cli::command();
    let bin_name = command.get_name().to_string();

    generate(shell, &mut command, bin_name.as_str(), &mut writer);

    Ok(())
}

/// Route a parsed command to its handler
pub async fn dispatch(ctx: &CommandContext, command: Commands) -> ForumResult<Outcome> {
    match command {
        Commands::Favorite { command } => match command {
            FavoriteCommands::Add { user_id, topic_id } => {
                handle_favorite_add(ctx, &user_id, topic_id).await
            }
            FavoriteCommands::Remove { user_id, topic_id } => {
                handle_favorite_remove(ctx, &user_id, topic_id).await
            }
            FavoriteCommands::ListUsers { topic_id, format } => {
                handle_favorite_list_users(ctx, topic_id, format).await
            }
            FavoriteCommands::ListTopics {
                user,
                format,
                limit,
            } => handle_favorite_list_topics(ctx, &user, format, limit).await,
        },
        Commands::Engagement { command } => match command {
            EngagementCommands::Add { user_id, topic_id } => {
                handle_engagement_add(ctx, &user_id, topic_id).await
            }
            EngagementCommands::Remove { user_id, topic_id } => {
                handle_engagement_remove(ctx, &user_id, topic_id).await
            }
            EngagementCommands::ListUsers { topic_id, format } => {
                handle_engagement_list_users(ctx, topic_id, format).await
            }
            EngagementCommands::ListTopics {
                user,
                format,
                limit,
            } => handle_engagement_list_topics(ctx, &user, format, limit).await,
            EngagementCommands::Recalculate { topic_id } => {
                handle_engagement_recalculate(ctx, topic_id).await
            }
        },
        Commands::Moderator { command } => dispatch_moderator(ctx, command).await,
        Commands::User { command } => match command {
            UserCommands::Spam { user } => handle_user_spam(ctx, &user).await,
            UserCommands::Ham { user } => handle_user_ham(ctx, &user).await,
            UserCommands::SetRole { user_id, role } => {
                handle_user_set_role(ctx, &user_id, &role).await
            }
            UserCommands::Permalink { user } => handle_user_permalink(ctx, &user).await,
            UserCommands::Moderator { command } => dispatch_moderator(ctx, command).await,
        },
        Commands::Completions { shell } => {
            let mut buffer = Vec::new();
            write_completions(shell, &mut buffer)?;
            let script = String::from_utf8(buffer)
                .map_err(|e| ForumError::Serialization(e.to_string()))?;
            Ok(Outcome::Rendered(script))
        }
    }
}

async fn dispatch_moderator(
    ctx: &CommandContext,
    command: ModeratorCommands,
) -> ForumResult<Outcome> {
    match command {
        ModeratorCommands::Add { forum_id, user_id } => {
            handle_moderator_add(ctx, forum_id, &user_id).await
        }
        ModeratorCommands::Remove { forum_id, user_id } => {
            handle_moderator_remove(ctx, forum_id, &user_id).await
        }
        ModeratorCommands::List { forum_id, format } => {
            handle_moderator_list(ctx, forum_id, format).await
        }
    }
}

/// Main CLI handler
pub async fn run_cli(cli: Cli, config: &ForumctlConfig) -> ForumResult<Outcome> {
    let opts = OperationOptions::from_flags(
        cli.yes,
        cli.dry_run,
        cli.quiet,
        cli.verbose,
        &config.permissions,
    );

    if matches!(cli.command, Commands::Completions { .. }) {
        // completions never touch the store
        let ctx = CommandContext::new(
            Arc::new(forumctl_core::DummyForumStore),
            opts,
            Arc::new(TerminalPrompter),
        );
        return dispatch(&ctx, cli.command).await;
    }

    let store = create_store(config)?;
    let ctx = CommandContext::new(store, opts, Arc::new(TerminalPrompter));
    dispatch(&ctx, cli.command).await
}

fn init_logging(config: &ForumctlConfig, verbose: bool) {
    let level = if verbose {
        "info"
    } else {
        config.logging.level.as_str()
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

/// CLI entry point
#[tokio::main]
pub async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let code = exit_code_for_clap_error(err.kind());
            let _ = err.print();
            std::process::exit(code);
        }
    };

    let config = match ForumctlConfig::from_env().and_then(|config| {
        config.validate()?;
        Ok(config)
    }) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Error: {:#}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config, cli.verbose);

    let output = OutputOptions {
        quiet: cli.quiet,
        verbose: cli.verbose,
    };
    let result = run_cli(cli, &config).await;

    let stdout = std::io::stdout();
    let stderr = std::io::stderr();
    let code = report(result, &output, &mut stdout.lock(), &mut stderr.lock());
    std::process::exit(code);
}

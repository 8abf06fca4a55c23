//! Configuration management for forumctl
//!
//! Settings come from environment variables. Each section can also be built
//! with `minimal()` for tests and embedders that do not want the environment.

use anyhow::Result;
use std::env;
use std::path::PathBuf;

/// Global configuration for forumctl commands
#[derive(Debug, Clone)]
pub struct ForumctlConfig {
    /// Where the backing store lives
    pub store: StoreSettings,
    /// Confirmation and dry-run behavior
    pub permissions: Permissions,
    /// Logging settings
    pub logging: Logging,
}

/// Backing store settings
#[derive(Debug, Clone)]
pub struct StoreSettings {
    /// Path of the store snapshot (FORUMCTL_STORE)
    pub path: PathBuf,
    /// Base URL used to build permalinks (FORUMCTL_SITE_URL)
    pub site_url: String,
}

/// Confirmation and safety settings
#[derive(Debug, Clone)]
pub struct Permissions {
    /// Require confirmation before destructive changes
    pub require_confirmation: bool,
    /// Validate only, never mutate
    pub dry_run_mode: bool,
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct Logging {
    /// Log level (trace, debug, info, warn, error, off)
    pub level: String,
}

const LOG_LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];

impl Default for ForumctlConfig {
    fn default() -> Self {
        Self::from_env().unwrap_or_else(|_| Self::minimal())
    }
}

impl ForumctlConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let store = StoreSettings::from_env()?;
        let permissions = Permissions::from_env()?;
        let logging = Logging::from_env()?;

        Ok(Self {
            store,
            permissions,
            logging,
        })
    }

    /// Create minimal default configuration
    pub fn minimal() -> Self {
        Self {
            store: StoreSettings::minimal(),
            permissions: Permissions::minimal(),
            logging: Logging::minimal(),
        }
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<()> {
        if self.store.site_url.trim().is_empty() {
            anyhow::bail!("Site URL must not be empty");
        }

        if self.store.path.as_os_str().is_empty() {
            anyhow::bail!("Store path must not be empty");
        }

        let level = self.logging.level.to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            anyhow::bail!("Unknown log level: {}", self.logging.level);
        }

        Ok(())
    }
}

impl StoreSettings {
    pub fn from_env() -> Result<Self> {
        let path = env::var("FORUMCTL_STORE")
            .ok()
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_store_path);

        let site_url = env::var("FORUMCTL_SITE_URL")
            .ok()
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(default_site_url);

        Ok(Self { path, site_url })
    }

    pub fn minimal() -> Self {
        Self {
            path: default_store_path(),
            site_url: default_site_url(),
        }
    }
}

impl Permissions {
    pub fn from_env() -> Result<Self> {
        let require_confirmation = env::var("FORUMCTL_REQUIRE_CONFIRMATION")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(true);

        let dry_run_mode = env::var("FORUMCTL_DRY_RUN")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(false);

        Ok(Self {
            require_confirmation,
            dry_run_mode,
        })
    }

    pub fn minimal() -> Self {
        Self {
            require_confirmation: true,
            dry_run_mode: false,
        }
    }
}

impl Logging {
    pub fn from_env() -> Result<Self> {
        let level = env::var("FORUMCTL_LOG_LEVEL")
            .ok()
            .unwrap_or_else(|| "warn".to_string());

        Ok(Self { level })
    }

    pub fn minimal() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

/// Default store location under the platform data directory
fn default_store_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(env::temp_dir)
        .join("forumctl")
        .join("store.json")
}

fn default_site_url() -> String {
    "http://localhost".to_string()
}

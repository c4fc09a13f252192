// Startup configuration read from the environment (after `.env` is loaded).

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::path::PathBuf;

const DEFAULT_DATA_DIR: &str = "data";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub discord_token: String,
    /// Directory holding `config.json` and `global_config.json`
    pub data_dir: PathBuf,
    /// Discord user ids allowed to run moderation and status commands
    pub admin_ids: HashSet<u64>,
    pub command_prefix: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let discord_token = lookup("DISCORD_TOKEN")
            .filter(|t| !t.trim().is_empty())
            .context("Missing DISCORD_TOKEN environment variable! Create a .env file with your bot token.")?;

        let data_dir = lookup("BOT_DATA_DIR")
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DATA_DIR.to_string())
            .into();

        let admin_ids = match lookup("BOT_ADMIN_IDS") {
            Some(raw) => parse_admin_ids(&raw).context("Invalid BOT_ADMIN_IDS")?,
            None => HashSet::new(),
        };
        if admin_ids.is_empty() {
            tracing::warn!("BOT_ADMIN_IDS is empty; nobody can run admin commands");
        }

        let command_prefix = lookup("BOT_COMMAND_PREFIX")
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty());

        Ok(Self {
            discord_token,
            data_dir,
            admin_ids,
            command_prefix,
        })
    }
}

/// Parse a comma-separated list of user ids. Blank entries are skipped.
pub fn parse_admin_ids(raw: &str) -> Result<HashSet<u64>> {
    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(|id| {
            id.parse::<u64>()
                .with_context(|| format!("'{}' is not a valid user id", id))
        })
        .collect()
}

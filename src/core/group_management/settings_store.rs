use super::group_management_models::{GlobalSettings, GroupSettings};
use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// What happened when a settings file was read at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// No file on disk; the in-memory state was left alone
    Missing,
    /// File parsed; carries the number of records loaded
    Loaded(usize),
    /// File unreadable or malformed; state was reset to empty/defaults
    Reset,
}

/// Owner of the per-group and global settings.
///
/// Loads never fail: a broken file degrades to empty/default state and is
/// logged. `get_group_settings` and `update_group_settings` persist the whole
/// group collection and only log when that write fails, so the in-memory copy
/// can run ahead of the file.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn load_group_settings(&self) -> LoadOutcome;

    async fn load_global_settings(&self) -> LoadOutcome;

    async fn save_group_settings(&self) -> Result<(), StoreError>;

    async fn save_global_settings(&self) -> Result<(), StoreError>;

    /// Get a group's settings, creating and persisting defaults for unseen ids.
    async fn get_group_settings(&self, group_id: &str) -> GroupSettings;

    /// Replace a group's settings and persist. Last write wins.
    async fn update_group_settings(&self, group_id: &str, settings: GroupSettings);

    async fn global_settings(&self) -> GlobalSettings;
}

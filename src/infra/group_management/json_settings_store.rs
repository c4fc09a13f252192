use crate::core::group_management::{
    GlobalSettings, GroupSettings, LoadOutcome, SettingsStore, StoreError,
};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

pub const GROUP_SETTINGS_FILE: &str = "config.json";
pub const GLOBAL_SETTINGS_FILE: &str = "global_config.json";

/// JSON-backed settings store. Two files in the data directory:
/// `config.json` = { group_id: GroupSettings }, `global_config.json` = GlobalSettings.
///
/// Each file is rewritten in full while its lock is held, so writers never
/// interleave.
pub struct JsonSettingsStore {
    group_path: PathBuf,
    global_path: PathBuf,
    groups: RwLock<BTreeMap<String, GroupSettings>>,
    global: RwLock<GlobalSettings>,
}

impl JsonSettingsStore {
    /// Store rooted at `data_dir`, created if missing. Starts empty; call the
    /// `load_*` methods before use.
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        let data_dir = data_dir.as_ref();
        if let Err(e) = std::fs::create_dir_all(data_dir) {
            tracing::error!("Failed to create data directory {}: {}", data_dir.display(), e);
        }

        Self::with_paths(
            data_dir.join(GROUP_SETTINGS_FILE),
            data_dir.join(GLOBAL_SETTINGS_FILE),
        )
    }

    pub fn with_paths(group_path: impl Into<PathBuf>, global_path: impl Into<PathBuf>) -> Self {
        Self {
            group_path: group_path.into(),
            global_path: global_path.into(),
            groups: RwLock::new(BTreeMap::new()),
            global: RwLock::new(GlobalSettings::default()),
        }
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, StoreError> {
    if !path.exists() {
        return Ok(None);
    }
    let text = std::fs::read_to_string(path)?;
    Ok(Some(serde_json::from_str(&text)?))
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    let text = serde_json::to_string_pretty(value)?;
    std::fs::write(path, text)?;
    Ok(())
}

fn persist_groups(path: &Path, groups: &BTreeMap<String, GroupSettings>) {
    match write_json(path, groups) {
        Ok(()) => tracing::info!(count = groups.len(), "Saved group settings"),
        Err(e) => tracing::error!("Failed to save group settings: {}", e),
    }
}

#[async_trait]
impl SettingsStore for JsonSettingsStore {
    async fn load_group_settings(&self) -> LoadOutcome {
        let mut groups = self.groups.write().await;
        match read_json::<BTreeMap<String, GroupSettings>>(&self.group_path) {
            Ok(Some(loaded)) => {
                *groups = loaded;
                tracing::info!(count = groups.len(), "Loaded group settings");
                LoadOutcome::Loaded(groups.len())
            }
            Ok(None) => LoadOutcome::Missing,
            Err(e) => {
                tracing::error!(
                    "Failed to load group settings from {}: {}",
                    self.group_path.display(),
                    e
                );
                groups.clear();
                LoadOutcome::Reset
            }
        }
    }

    async fn load_global_settings(&self) -> LoadOutcome {
        let mut global = self.global.write().await;
        match read_json::<GlobalSettings>(&self.global_path) {
            Ok(Some(loaded)) => {
                *global = loaded;
                tracing::info!("Loaded global settings");
                LoadOutcome::Loaded(1)
            }
            Ok(None) => LoadOutcome::Missing,
            Err(e) => {
                tracing::error!(
                    "Failed to load global settings from {}: {}",
                    self.global_path.display(),
                    e
                );
                *global = GlobalSettings::default();
                LoadOutcome::Reset
            }
        }
    }

    async fn save_group_settings(&self) -> Result<(), StoreError> {
        let groups = self.groups.write().await;
        write_json(&self.group_path, &*groups).map_err(|e| {
            tracing::error!("Failed to save group settings: {}", e);
            e
        })?;
        tracing::info!(count = groups.len(), "Saved group settings");
        Ok(())
    }

    async fn save_global_settings(&self) -> Result<(), StoreError> {
        let global = self.global.write().await;
        write_json(&self.global_path, &*global).map_err(|e| {
            tracing::error!("Failed to save global settings: {}", e);
            e
        })?;
        tracing::info!("Saved global settings");
        Ok(())
    }

    async fn get_group_settings(&self, group_id: &str) -> GroupSettings {
        {
            let groups = self.groups.read().await;
            if let Some(settings) = groups.get(group_id) {
                return settings.clone();
            }
        }

        let mut groups = self.groups.write().await;
        // Another task may have created it between the two locks.
        if let Some(settings) = groups.get(group_id) {
            return settings.clone();
        }
        groups.insert(group_id.to_string(), GroupSettings::default());
        persist_groups(&self.group_path, &groups);
        GroupSettings::default()
    }

    async fn update_group_settings(&self, group_id: &str, settings: GroupSettings) {
        let mut groups = self.groups.write().await;
        groups.insert(group_id.to_string(), settings);
        persist_groups(&self.group_path, &groups);
    }

    async fn global_settings(&self) -> GlobalSettings {
        self.global.read().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn reopen(dir: &Path) -> JsonSettingsStore {
        let store = JsonSettingsStore::new(dir);
        store.load_group_settings().await;
        store.load_global_settings().await;
        store
    }

    #[tokio::test]
    async fn test_unseen_group_is_created_and_persisted() {
        let dir = tempdir().unwrap();
        let store = JsonSettingsStore::new(dir.path());
        assert_eq!(store.load_group_settings().await, LoadOutcome::Missing);

        let settings = store.get_group_settings("1001").await;
        assert_eq!(settings, GroupSettings::default());
        assert!(dir.path().join(GROUP_SETTINGS_FILE).exists());

        let store2 = reopen(dir.path()).await;
        assert_eq!(store2.groups.read().await.len(), 1);
        assert_eq!(
            store2.get_group_settings("1001").await,
            GroupSettings::default()
        );
    }

    #[tokio::test]
    async fn test_group_roundtrip_keeps_order_and_flags() {
        let dir = tempdir().unwrap();
        let store = JsonSettingsStore::new(dir.path());
        let settings = GroupSettings {
            enabled: true,
            punish_words: vec!["zeta".into(), "alpha".into(), "傻逼".into()],
        };
        store.update_group_settings("1001", settings.clone()).await;
        store.get_group_settings("2002").await;

        let store2 = reopen(dir.path()).await;
        assert_eq!(
            store2.load_group_settings().await,
            LoadOutcome::Loaded(2)
        );
        assert_eq!(*store2.groups.read().await, *store.groups.read().await);
        assert_eq!(store2.get_group_settings("1001").await, settings);
    }

    #[tokio::test]
    async fn test_global_roundtrip() {
        let dir = tempdir().unwrap();
        let store = JsonSettingsStore::new(dir.path());
        {
            let mut global = store.global.write().await;
            global.group_management_enabled = false;
            global.default_welcome_message = "hi".into();
        }
        store.save_global_settings().await.unwrap();

        let store2 = reopen(dir.path()).await;
        assert_eq!(store2.global_settings().await, store.global_settings().await);
    }

    #[tokio::test]
    async fn test_file_is_pretty_utf8_with_expected_keys() {
        let dir = tempdir().unwrap();
        let store = JsonSettingsStore::new(dir.path());
        store
            .update_group_settings(
                "1001",
                GroupSettings {
                    enabled: true,
                    punish_words: vec!["傻逼".into()],
                },
            )
            .await;
        store.save_global_settings().await.unwrap();

        let groups = std::fs::read_to_string(dir.path().join(GROUP_SETTINGS_FILE)).unwrap();
        assert!(groups.contains("\n  \"1001\": {"));
        assert!(groups.contains("\"punish_words\""));
        assert!(groups.contains("傻逼"));

        let global = std::fs::read_to_string(dir.path().join(GLOBAL_SETTINGS_FILE)).unwrap();
        assert!(global.contains("\"system_status_enabled\": true"));
        assert!(global.contains("\"group_management_enabled\": true"));
        assert!(global.contains("欢迎加入本群！"));
    }

    #[tokio::test]
    async fn test_corrupt_group_file_resets_to_empty() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join(GROUP_SETTINGS_FILE), "{ not json").unwrap();

        let store = JsonSettingsStore::new(dir.path());
        store
            .groups
            .write()
            .await
            .insert("stale".into(), GroupSettings::default());

        assert_eq!(store.load_group_settings().await, LoadOutcome::Reset);
        assert!(store.groups.read().await.is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_global_file_resets_to_defaults() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join(GLOBAL_SETTINGS_FILE), "{ \"system_status_enabled\": ").unwrap();

        let store = JsonSettingsStore::new(dir.path());
        store.global.write().await.group_management_enabled = false;

        assert_eq!(store.load_global_settings().await, LoadOutcome::Reset);
        assert_eq!(store.global_settings().await, GlobalSettings::default());
    }

    #[tokio::test]
    async fn test_partial_entries_fill_defaults() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join(GROUP_SETTINGS_FILE),
            r#"{"1001": {"enabled": true}, "2002": {"punish_words": ["x"], "muted": true}}"#,
        )
        .unwrap();

        let store = reopen(dir.path()).await;
        assert!(store.get_group_settings("1001").await.enabled);
        assert!(store.get_group_settings("1001").await.punish_words.is_empty());
        let g2 = store.get_group_settings("2002").await;
        assert!(!g2.enabled);
        assert_eq!(g2.punish_words, vec!["x".to_string()]);
    }

    #[tokio::test]
    async fn test_failed_save_keeps_memory_state() {
        let dir = tempdir().unwrap();
        // A directory where the file should be makes every write fail.
        let blocked = dir.path().join("blocked");
        std::fs::create_dir(&blocked).unwrap();
        let store = JsonSettingsStore::with_paths(&blocked, dir.path().join(GLOBAL_SETTINGS_FILE));

        store
            .update_group_settings(
                "1001",
                GroupSettings {
                    enabled: true,
                    punish_words: vec![],
                },
            )
            .await;

        assert!(store.get_group_settings("1001").await.enabled);
        assert!(matches!(
            store.save_group_settings().await,
            Err(StoreError::Io(_))
        ));
    }
}

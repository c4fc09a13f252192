// In-memory settings store shared by the core tests.

use super::group_management_models::{Conversation, GlobalSettings, GroupSettings, InboundMessage};
use super::settings_store::{LoadOutcome, SettingsStore, StoreError};
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

pub struct MockSettingsStore {
    groups: DashMap<String, GroupSettings>,
    global: RwLock<GlobalSettings>,
    // Every call that would rewrite the group file
    group_writes: AtomicUsize,
    updates: AtomicUsize,
    global_saves: AtomicUsize,
}

impl MockSettingsStore {
    pub fn new() -> Self {
        Self {
            groups: DashMap::new(),
            global: RwLock::new(GlobalSettings::default()),
            group_writes: AtomicUsize::new(0),
            updates: AtomicUsize::new(0),
            global_saves: AtomicUsize::new(0),
        }
    }

    pub fn group(&self, group_id: &str) -> Option<GroupSettings> {
        self.groups.get(group_id).map(|g| g.clone())
    }

    pub fn insert_group(&self, group_id: &str, settings: GroupSettings) {
        self.groups.insert(group_id.to_string(), settings);
    }

    pub fn set_group_management_enabled(&self, enabled: bool) {
        self.global.write().unwrap().group_management_enabled = enabled;
    }

    pub fn set_system_status_enabled(&self, enabled: bool) {
        self.global.write().unwrap().system_status_enabled = enabled;
    }

    pub fn update_count(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }

    pub fn group_write_count(&self) -> usize {
        self.group_writes.load(Ordering::SeqCst)
    }

    pub fn global_save_count(&self) -> usize {
        self.global_saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SettingsStore for MockSettingsStore {
    async fn load_group_settings(&self) -> LoadOutcome {
        LoadOutcome::Missing
    }

    async fn load_global_settings(&self) -> LoadOutcome {
        LoadOutcome::Missing
    }

    async fn save_group_settings(&self) -> Result<(), StoreError> {
        self.group_writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn save_global_settings(&self) -> Result<(), StoreError> {
        self.global_saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn get_group_settings(&self, group_id: &str) -> GroupSettings {
        if let Some(existing) = self.groups.get(group_id) {
            return existing.clone();
        }
        self.groups
            .insert(group_id.to_string(), GroupSettings::default());
        self.group_writes.fetch_add(1, Ordering::SeqCst);
        GroupSettings::default()
    }

    async fn update_group_settings(&self, group_id: &str, settings: GroupSettings) {
        self.groups.insert(group_id.to_string(), settings);
        self.updates.fetch_add(1, Ordering::SeqCst);
        self.group_writes.fetch_add(1, Ordering::SeqCst);
    }

    async fn global_settings(&self) -> GlobalSettings {
        self.global.read().unwrap().clone()
    }
}

/// An administrator's message in `group_id`.
pub fn admin_in_group(group_id: &str, content: &str) -> InboundMessage {
    InboundMessage {
        sender_id: "42".to_string(),
        sender_name: "admin".to_string(),
        is_admin: true,
        conversation: Conversation::Group {
            group_id: group_id.to_string(),
        },
        content: content.to_string(),
    }
}

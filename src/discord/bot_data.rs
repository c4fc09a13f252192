use crate::core::guard_plugin::GuardPlugin;
use crate::infra::group_management::JsonSettingsStore;
use crate::infra::system_status::SysinfoProbe;
use std::collections::HashSet;
use std::sync::Arc;

pub type Error = Box<dyn std::error::Error + Send + Sync>;

/// Shared state handed to every event handler.
pub struct Data {
    pub guard: Arc<GuardPlugin<JsonSettingsStore, SysinfoProbe>>,
    /// Users treated as administrators by the moderation commands
    pub admin_ids: Arc<HashSet<u64>>,
}

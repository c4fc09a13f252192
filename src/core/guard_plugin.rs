// The plugin object: owns the settings store and the feature services, routes
// each inbound message, and drives startup/shutdown persistence.
//
// Nothing in here knows about Discord. The Discord layer hands over an
// `InboundMessage` and posts whatever replies come back, in order.

use crate::core::command_router::{CommandKind, CommandRouter};
use crate::core::group_management::{InboundMessage, ModerationEngine, SettingsStore};
use crate::core::system_status::{SystemProbe, SystemStatusService};
use std::sync::Arc;

pub struct GuardPlugin<S: SettingsStore, P: SystemProbe> {
    store: Arc<S>,
    moderation: ModerationEngine<S>,
    system_status: SystemStatusService<S, P>,
    router: CommandRouter,
}

impl<S: SettingsStore, P: SystemProbe> GuardPlugin<S, P> {
    pub fn new(store: Arc<S>, probe: P, router: CommandRouter) -> Self {
        Self {
            moderation: ModerationEngine::new(Arc::clone(&store)),
            system_status: SystemStatusService::new(Arc::clone(&store), probe),
            store,
            router,
        }
    }

    /// Load both settings files. Must run before the first message.
    pub async fn initialize(&self) {
        let groups = self.store.load_group_settings().await;
        let global = self.store.load_global_settings().await;
        tracing::info!(?groups, ?global, "Group guard initialized");
    }

    /// Final save of both settings files.
    pub async fn terminate(&self) {
        if let Err(e) = self.store.save_group_settings().await {
            tracing::error!("Failed to save group settings on shutdown: {}", e);
        }
        if let Err(e) = self.store.save_global_settings().await {
            tracing::error!("Failed to save global settings on shutdown: {}", e);
        }
        tracing::info!("Group guard stopped, settings saved");
    }

    /// Produce the replies for one inbound message.
    ///
    /// A recognised command yields its reply first; the punish-word scan runs
    /// on every message, commands included, and may add a warning.
    pub async fn handle_message(&self, message: &InboundMessage) -> Vec<String> {
        let mut replies = Vec::new();

        if let Some(command) = self.router.parse(&message.content) {
            tracing::debug!(command = ?command.kind, sender = %message.sender_id, "Command received");
            replies.push(self.run_command(command.kind, command.argument, message).await);
        }

        if let Some(hit) = self.moderation.on_message(message).await {
            replies.push(hit.warning());
        }

        replies
    }

    async fn run_command(
        &self,
        kind: CommandKind,
        argument: Option<&str>,
        message: &InboundMessage,
    ) -> String {
        match kind {
            CommandKind::ModerationHelp => self.moderation.help().await,
            CommandKind::EnableModeration => self.moderation.enable(message).await,
            CommandKind::DisableModeration => self.moderation.disable(message).await,
            CommandKind::AddPunishWord => self.moderation.add_punish_word(message, argument).await,
            CommandKind::RemovePunishWord => {
                self.moderation.remove_punish_word(message, argument).await
            }
            CommandKind::ListPunishWords => self.moderation.list_punish_words(message).await,
            CommandKind::ModerationStatus => self.moderation.status(message).await,
            CommandKind::SystemStatus => self.system_status.handle(message).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::group_management::mock_store::{admin_in_group, MockSettingsStore};
    use crate::core::group_management::Conversation;
    use crate::core::system_status::{ProbeError, SystemSnapshot};
    use async_trait::async_trait;

    struct NoProbe;

    #[async_trait]
    impl SystemProbe for NoProbe {
        async fn snapshot(&self) -> Result<SystemSnapshot, ProbeError> {
            Err(ProbeError::Unavailable("test".into()))
        }
    }

    fn plugin() -> (Arc<MockSettingsStore>, GuardPlugin<MockSettingsStore, NoProbe>) {
        let store = Arc::new(MockSettingsStore::new());
        let plugin = GuardPlugin::new(Arc::clone(&store), NoProbe, CommandRouter::new(None));
        (store, plugin)
    }

    fn member(group_id: &str, content: &str) -> InboundMessage {
        InboundMessage {
            sender_name: "bob".into(),
            is_admin: false,
            ..admin_in_group(group_id, content)
        }
    }

    #[tokio::test]
    async fn test_full_moderation_scenario() {
        let (_store, plugin) = plugin();

        assert_eq!(
            plugin
                .handle_message(&admin_in_group("1001", "添加处罚词 傻逼"))
                .await,
            vec!["✅ 已添加处罚词：「傻逼」".to_string()]
        );
        assert_eq!(
            plugin.handle_message(&admin_in_group("1001", "开启群管")).await,
            vec!["✅ 群管功能已开启".to_string()]
        );

        let warning = "⚠️ 检测到敏感词「傻逼」，请注意言行规范！".to_string();
        for _ in 0..2 {
            assert_eq!(
                plugin.handle_message(&member("1001", "你这个傻逼")).await,
                vec![warning.clone()]
            );
        }

        // Other groups are unaffected.
        assert!(plugin
            .handle_message(&member("2002", "你这个傻逼"))
            .await
            .is_empty());
    }

    #[tokio::test]
    async fn test_plain_message_in_unconfigured_group_is_silent() {
        let (_store, plugin) = plugin();
        assert!(plugin.handle_message(&member("1001", "hello")).await.is_empty());
    }

    #[tokio::test]
    async fn test_command_text_is_also_scanned() {
        let (_store, plugin) = plugin();
        plugin
            .handle_message(&admin_in_group("1001", "添加处罚词 spam"))
            .await;
        plugin.handle_message(&admin_in_group("1001", "开启群管")).await;

        // Removing the word mentions it; the scan runs after the command, so
        // the word is already gone by then.
        let replies = plugin
            .handle_message(&admin_in_group("1001", "删除处罚词 spam"))
            .await;
        assert_eq!(replies, vec!["✅ 已删除处罚词：「spam」".to_string()]);

        plugin
            .handle_message(&admin_in_group("1001", "添加处罚词 spam"))
            .await;
        let replies = plugin
            .handle_message(&admin_in_group("1001", "查看处罚词 spam"))
            .await;
        assert_eq!(replies.len(), 2);
        assert!(replies[1].contains("spam"));
    }

    #[tokio::test]
    async fn test_system_status_routes_to_status_service() {
        let (_store, plugin) = plugin();
        let msg = InboundMessage {
            conversation: Conversation::Private,
            ..admin_in_group("0", "系统状态")
        };
        assert_eq!(
            plugin.handle_message(&msg).await,
            vec!["❌ 获取系统状态失败，请稍后再试".to_string()]
        );
    }

    #[tokio::test]
    async fn test_terminate_saves_both_files() {
        let (store, plugin) = plugin();
        plugin.initialize().await;
        plugin.terminate().await;

        assert_eq!(store.group_write_count(), 1);
        assert_eq!(store.global_save_count(), 1);
    }
}

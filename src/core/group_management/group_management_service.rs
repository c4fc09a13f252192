// Group management service - moderation commands and the punish-word scanner.
//
// This service handles:
// - The shared permission policy for moderation commands
// - Enabling/disabling moderation per group
// - Maintaining each group's punish-word list
// - Scanning group messages for punish words
//
// Every method returns the reply text; the Discord layer decides how to post it.

use super::group_management_models::{InboundMessage, PunishWordHit};
use super::settings_store::SettingsStore;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;

const HELP_TEXT: &str = "📋 群管功能指令：\n\
    1. 开启群管 - 启用当前群的群管功能\n\
    2. 关闭群管 - 禁用当前群的群管功能\n\
    3. 添加处罚词 [词语] - 添加需要处罚的关键词\n\
    4. 删除处罚词 [词语] - 移除处罚关键词\n\
    5. 查看处罚词 - 显示当前所有处罚关键词\n\
    6. 群管状态 - 查看当前群管功能状态\n\
    \n⚠️ 注意：所有群管指令仅管理员可使用";

// ============================================================================
// ERRORS
// ============================================================================

/// Why a moderation command was refused. The message is the user-facing reply.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PermissionDenied {
    #[error("❌ 群管功能已被全局禁用")]
    GloballyDisabled,

    #[error("❌ 你没有权限执行此操作，需要管理员权限")]
    NotAdmin,

    #[error("❌ 请在群聊中使用此指令")]
    GroupOnly,
}

// ============================================================================
// CORE SERVICE
// ============================================================================

pub struct ModerationEngine<S: SettingsStore> {
    store: Arc<S>,
    // Held across each read-modify-persist so concurrent commands apply in order.
    mutation_lock: Mutex<()>,
}

impl<S: SettingsStore> ModerationEngine<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            mutation_lock: Mutex::new(()),
        }
    }

    /// Shared precondition for every moderation command except help.
    ///
    /// Checks run in order and stop at the first failure: global switch,
    /// admin, then group context. Only the global record is read.
    pub async fn check_permissions(
        &self,
        message: &InboundMessage,
        require_group: bool,
    ) -> Result<(), PermissionDenied> {
        if !self.store.global_settings().await.group_management_enabled {
            return Err(PermissionDenied::GloballyDisabled);
        }

        if !message.is_admin {
            return Err(PermissionDenied::NotAdmin);
        }

        if require_group && !message.is_group_chat() {
            return Err(PermissionDenied::GroupOnly);
        }

        Ok(())
    }

    /// Both the global switch and the group's own flag must be on.
    pub async fn is_moderation_enabled(&self, group_id: &str) -> bool {
        if !self.store.global_settings().await.group_management_enabled {
            return false;
        }
        self.store.get_group_settings(group_id).await.enabled
    }

    /// Resolve the group a command operates on, or the refusal to send back.
    async fn authorize_group<'a>(&self, message: &'a InboundMessage) -> Result<&'a str, String> {
        self.check_permissions(message, true)
            .await
            .map_err(|denied| denied.to_string())?;
        message
            .group_id()
            .ok_or_else(|| PermissionDenied::GroupOnly.to_string())
    }

    pub async fn help(&self) -> String {
        if !self.store.global_settings().await.group_management_enabled {
            return PermissionDenied::GloballyDisabled.to_string();
        }
        HELP_TEXT.to_string()
    }

    pub async fn enable(&self, message: &InboundMessage) -> String {
        self.set_enabled(message, true).await
    }

    pub async fn disable(&self, message: &InboundMessage) -> String {
        self.set_enabled(message, false).await
    }

    async fn set_enabled(&self, message: &InboundMessage, enabled: bool) -> String {
        let group_id = match self.authorize_group(message).await {
            Ok(id) => id,
            Err(reply) => return reply,
        };

        let _guard = self.mutation_lock.lock().await;
        let mut settings = self.store.get_group_settings(group_id).await;

        if settings.enabled == enabled {
            return if enabled {
                "✅ 群管功能已经是开启状态".to_string()
            } else {
                "❌ 群管功能已经是关闭状态".to_string()
            };
        }

        settings.enabled = enabled;
        self.store.update_group_settings(group_id, settings).await;
        tracing::info!(group_id, enabled, sender = %message.sender_id, "Group management toggled");

        if enabled {
            "✅ 群管功能已开启".to_string()
        } else {
            "❌ 群管功能已关闭".to_string()
        }
    }

    /// Add a punish word. `argument` is the command's remaining input.
    pub async fn add_punish_word(&self, message: &InboundMessage, argument: Option<&str>) -> String {
        let group_id = match self.authorize_group(message).await {
            Ok(id) => id,
            Err(reply) => return reply,
        };

        let word = match argument {
            Some(arg) => arg.trim(),
            None => return "❌ 请指定要添加的处罚词，格式：添加处罚词 [词语]".to_string(),
        };
        if word.is_empty() {
            return "❌ 处罚词不能为空".to_string();
        }

        let _guard = self.mutation_lock.lock().await;
        let mut settings = self.store.get_group_settings(group_id).await;

        if !settings.add_word(word) {
            return format!("❌ 处罚词「{}」已存在", word);
        }

        self.store.update_group_settings(group_id, settings).await;
        tracing::info!(group_id, word, "Punish word added");
        format!("✅ 已添加处罚词：「{}」", word)
    }

    /// Remove a punish word by exact match.
    pub async fn remove_punish_word(
        &self,
        message: &InboundMessage,
        argument: Option<&str>,
    ) -> String {
        let group_id = match self.authorize_group(message).await {
            Ok(id) => id,
            Err(reply) => return reply,
        };

        let word = match argument.map(str::trim) {
            Some(word) if !word.is_empty() => word,
            _ => return "❌ 请指定要删除的处罚词，格式：删除处罚词 [词语]".to_string(),
        };

        let _guard = self.mutation_lock.lock().await;
        let mut settings = self.store.get_group_settings(group_id).await;

        if !settings.remove_word(word) {
            return format!("❌ 处罚词「{}」不存在", word);
        }

        self.store.update_group_settings(group_id, settings).await;
        tracing::info!(group_id, word, "Punish word removed");
        format!("✅ 已删除处罚词：「{}」", word)
    }

    pub async fn list_punish_words(&self, message: &InboundMessage) -> String {
        let group_id = match self.authorize_group(message).await {
            Ok(id) => id,
            Err(reply) => return reply,
        };

        let settings = self.store.get_group_settings(group_id).await;
        if settings.punish_words.is_empty() {
            return "📋 当前没有设置处罚词".to_string();
        }

        let lines: Vec<String> = settings
            .punish_words
            .iter()
            .map(|word| format!("- {}", word))
            .collect();
        format!("📋 当前处罚词列表：\n{}", lines.join("\n"))
    }

    pub async fn status(&self, message: &InboundMessage) -> String {
        let group_id = match self.authorize_group(message).await {
            Ok(id) => id,
            Err(reply) => return reply,
        };

        let settings = self.store.get_group_settings(group_id).await;
        let state = if settings.enabled { "开启" } else { "关闭" };

        format!(
            "📊 群管功能状态：\n\
             • 功能状态：{}\n\
             • 处罚词数量：{}个\n\
             • 群号：{}",
            state,
            settings.punish_words.len(),
            group_id
        )
    }

    /// Passive scan run for every inbound message.
    ///
    /// Returns the first punish word found, or `None` when the message is not
    /// from a group, moderation is off, or nothing matched.
    pub async fn on_message(&self, message: &InboundMessage) -> Option<PunishWordHit> {
        let group_id = message.group_id()?;

        if !self.is_moderation_enabled(group_id).await {
            return None;
        }

        let settings = self.store.get_group_settings(group_id).await;
        if settings.punish_words.is_empty() {
            return None;
        }

        let word = settings.find_punish_word(&message.content)?;
        tracing::info!(
            group_id,
            word,
            sender = %message.sender_name,
            "Punish word detected"
        );

        Some(PunishWordHit {
            word: word.to_string(),
        })
    }
}

// ============================================================================
// TESTS
// ============================================================================

// Group management domain models.
//
// These are pure domain types with no Discord dependencies. The field names
// double as the on-disk JSON keys, so renaming one is a file format change.

use serde::{Deserialize, Serialize};

/// Greeting stored in the global record. Nothing reads it yet.
pub const DEFAULT_WELCOME_MESSAGE: &str = "欢迎加入本群！";

/// Moderation settings for a single group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupSettings {
    /// Whether moderation is active for this group
    pub enabled: bool,
    /// Substrings that trigger a warning, in insertion order
    pub punish_words: Vec<String>,
}

impl GroupSettings {
    /// Exact, case-sensitive membership test used for add/remove.
    pub fn contains_word(&self, word: &str) -> bool {
        self.punish_words.iter().any(|w| w == word)
    }

    /// Append `word` unless an identical entry already exists.
    ///
    /// Returns `true` if the list changed.
    pub fn add_word(&mut self, word: &str) -> bool {
        if self.contains_word(word) {
            return false;
        }
        self.punish_words.push(word.to_string());
        true
    }

    /// Remove the exact entry `word`. Returns `true` if the list changed.
    pub fn remove_word(&mut self, word: &str) -> bool {
        match self.punish_words.iter().position(|w| w == word) {
            Some(index) => {
                self.punish_words.remove(index);
                true
            }
            None => false,
        }
    }

    /// Find the first configured word contained in `content`, ignoring case.
    ///
    /// Words are tried in insertion order and the scan stops at the first hit.
    pub fn find_punish_word(&self, content: &str) -> Option<&str> {
        let content = content.to_lowercase();
        self.punish_words
            .iter()
            .find(|word| content.contains(&word.to_lowercase()))
            .map(String::as_str)
    }
}

/// Process-wide switches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalSettings {
    pub system_status_enabled: bool,
    /// Master switch for every moderation command and the message scanner
    pub group_management_enabled: bool,
    pub default_welcome_message: String,
}

impl Default for GlobalSettings {
    fn default() -> Self {
        Self {
            system_status_enabled: true,
            group_management_enabled: true,
            default_welcome_message: DEFAULT_WELCOME_MESSAGE.to_string(),
        }
    }
}

/// Where a message was sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Conversation {
    Private,
    Group { group_id: String },
}

/// A platform-neutral view of an incoming chat message.
///
/// The Discord layer fills this in from a `serenity::Message`; the core only
/// ever sees primitives.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    pub sender_id: String,
    pub sender_name: String,
    /// Resolved by the host from its administrator list
    pub is_admin: bool,
    pub conversation: Conversation,
    pub content: String,
}

impl InboundMessage {
    pub fn group_id(&self) -> Option<&str> {
        match &self.conversation {
            Conversation::Group { group_id } => Some(group_id.as_str()),
            Conversation::Private => None,
        }
    }

    pub fn is_group_chat(&self) -> bool {
        matches!(self.conversation, Conversation::Group { .. })
    }

    pub fn is_private_chat(&self) -> bool {
        matches!(self.conversation, Conversation::Private)
    }
}

/// A punish word found in a group message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PunishWordHit {
    pub word: String,
}

impl PunishWordHit {
    /// The warning posted back into the group.
    pub fn warning(&self) -> String {
        format!("⚠️ 检测到敏感词「{}」，请注意言行规范！", self.word)
    }
}

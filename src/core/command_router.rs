// Text command routing.
//
// Commands are plain keywords at the start of a message; whatever follows the
// keyword is the argument. The keyword table is built once at startup and
// dispatch is a single map lookup.

use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    ModerationHelp,
    EnableModeration,
    DisableModeration,
    AddPunishWord,
    RemovePunishWord,
    ListPunishWords,
    ModerationStatus,
    SystemStatus,
}

impl CommandKind {
    pub const ALL: [CommandKind; 8] = [
        CommandKind::ModerationHelp,
        CommandKind::EnableModeration,
        CommandKind::DisableModeration,
        CommandKind::AddPunishWord,
        CommandKind::RemovePunishWord,
        CommandKind::ListPunishWords,
        CommandKind::ModerationStatus,
        CommandKind::SystemStatus,
    ];

    pub fn keyword(self) -> &'static str {
        match self {
            CommandKind::ModerationHelp => "群管帮助",
            CommandKind::EnableModeration => "开启群管",
            CommandKind::DisableModeration => "关闭群管",
            CommandKind::AddPunishWord => "添加处罚词",
            CommandKind::RemovePunishWord => "删除处罚词",
            CommandKind::ListPunishWords => "查看处罚词",
            CommandKind::ModerationStatus => "群管状态",
            CommandKind::SystemStatus => "系统状态",
        }
    }
}

/// A recognised command and the rest of the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedCommand<'a> {
    pub kind: CommandKind,
    /// Trimmed remainder after the keyword, `None` when nothing follows
    pub argument: Option<&'a str>,
}

pub struct CommandRouter {
    prefix: Option<String>,
    table: HashMap<&'static str, CommandKind>,
}

impl CommandRouter {
    /// Build the keyword table. With a `prefix` (e.g. `/`), only messages that
    /// start with it are treated as commands.
    pub fn new(prefix: Option<String>) -> Self {
        let table = CommandKind::ALL
            .iter()
            .map(|kind| (kind.keyword(), *kind))
            .collect();

        Self {
            prefix: prefix.filter(|p| !p.is_empty()),
            table,
        }
    }

    pub fn parse<'a>(&self, content: &'a str) -> Option<ParsedCommand<'a>> {
        let mut text = content.trim();
        if let Some(prefix) = &self.prefix {
            text = text.strip_prefix(prefix.as_str())?;
        }

        let (keyword, rest) = match text.split_once(char::is_whitespace) {
            Some((keyword, rest)) => (keyword, rest.trim()),
            None => (text, ""),
        };

        let kind = *self.table.get(keyword)?;
        let argument = if rest.is_empty() { None } else { Some(rest) };

        Some(ParsedCommand { kind, argument })
    }
}

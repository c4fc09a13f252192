// Discord message glue - turns a serenity message into an `InboundMessage`,
// lets the core decide the replies, and posts them to the same channel.

use crate::core::group_management::{Conversation, InboundMessage};
use crate::discord::{Data, Error};
use poise::serenity_prelude as serenity;
use std::collections::HashSet;

/// Discord rejects message content longer than this many characters.
pub const DISCORD_MESSAGE_LIMIT: usize = 2000;

/// Route one Discord message through the group guard.
pub async fn handle_message(
    ctx: &serenity::Context,
    msg: &serenity::Message,
    data: &Data,
) -> Result<(), Error> {
    // Ignore bot messages (including our own warnings)
    if msg.author.bot {
        return Ok(());
    }

    let inbound = to_inbound(
        msg.author.id.get(),
        &msg.author.name,
        msg.guild_id.map(|id| id.get()),
        &msg.content,
        &data.admin_ids,
    );

    for reply in data.guard.handle_message(&inbound).await {
        // Punish words are admin-supplied text, so replies never ping anyone.
        for chunk in split_reply(&reply) {
            let message = serenity::CreateMessage::new()
                .content(chunk)
                .allowed_mentions(serenity::CreateAllowedMentions::new());
            if let Err(e) = msg.channel_id.send_message(&ctx.http, message).await {
                tracing::warn!(channel_id = msg.channel_id.get(), "Failed to send reply: {}", e);
            }
        }
    }

    Ok(())
}

/// Guild messages are group conversations keyed by guild id; DMs are private.
pub fn to_inbound(
    author_id: u64,
    author_name: &str,
    guild_id: Option<u64>,
    content: &str,
    admin_ids: &HashSet<u64>,
) -> InboundMessage {
    let conversation = match guild_id {
        Some(id) => Conversation::Group {
            group_id: id.to_string(),
        },
        None => Conversation::Private,
    };

    InboundMessage {
        sender_id: author_id.to_string(),
        sender_name: author_name.to_string(),
        is_admin: admin_ids.contains(&author_id),
        conversation,
        content: content.to_string(),
    }
}

/// Split a reply into pieces Discord will accept (2000 character limit).
pub fn split_reply(reply: &str) -> Vec<String> {
    reply
        .chars()
        .collect::<Vec<char>>()
        .chunks(DISCORD_MESSAGE_LIMIT)
        .map(|chunk| chunk.iter().collect())
        .collect()
}

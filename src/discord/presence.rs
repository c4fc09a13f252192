// Bot presence - points users at the help command once the bot is ready.

use crate::core::command_router::CommandKind;
use poise::serenity_prelude as serenity;

/// Show the help keyword as the bot's activity so people know where to start.
pub fn on_ready(ctx: &serenity::Context, prefix: Option<&str>) {
    let help = format!(
        "{}{}",
        prefix.unwrap_or_default(),
        CommandKind::ModerationHelp.keyword()
    );
    let activity = serenity::ActivityData::playing(help);
    ctx.set_presence(Some(activity), serenity::OnlineStatus::Online);
}

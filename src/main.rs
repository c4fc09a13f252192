// This is the entry point of the group guard bot.
//
// **Architecture Overview:**
// - `core/` = Business logic (platform-agnostic)
// - `infra/` = Implementations of core traits (JSON files, host metrics)
// - `discord/` = Discord-specific adapters (events, presence)
//
// This file's job is to:
// 1. Load configuration
// 2. Initialize services (dependency injection)
// 3. Set up the Discord framework
// 4. Save settings on shutdown

// These attrs point each module declaration at a more descriptive root file
// so we don't end up with half a dozen mod.rs files that all look the same.
#[path = "core/core_layer.rs"]
mod core;
#[path = "discord/discord_layer.rs"]
mod discord;
#[path = "infra/infra_layer.rs"]
mod infra;

mod app_config;

use crate::app_config::AppConfig;
use crate::core::command_router::CommandRouter;
use crate::core::guard_plugin::GuardPlugin;
use crate::discord::{message_events, presence, Data, Error};
use crate::infra::group_management::JsonSettingsStore;
use crate::infra::system_status::SysinfoProbe;
use anyhow::Context as _;
use poise::serenity_prelude as serenity;
use std::sync::Arc;
use tokio::signal;
use tracing_subscriber::EnvFilter;

/// Event handler for non-command Discord events.
async fn event_handler(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<(), Error> {
    if let serenity::FullEvent::Message { new_message } = event {
        message_events::handle_message(ctx, new_message, data).await?;
    }
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!(signal = "Ctrl+C", "Received signal, shutting down"),
        () = terminate => tracing::info!(signal = "Terminate", "Received signal, shutting down"),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging so we can see what's happening
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    // Load environment variables from .env file (if it exists)
    dotenv::dotenv().ok();

    let config = AppConfig::from_env()?;

    // ========================================================================
    // DEPENDENCY INJECTION
    // ========================================================================
    // Settings are loaded here, before the gateway delivers the first message.

    let store = Arc::new(JsonSettingsStore::new(&config.data_dir));
    let router = CommandRouter::new(config.command_prefix.clone());
    let guard = Arc::new(GuardPlugin::new(store, SysinfoProbe::new(), router));
    guard.initialize().await;

    let data = Data {
        guard: Arc::clone(&guard),
        admin_ids: Arc::new(config.admin_ids.clone()),
    };

    // ========================================================================
    // DISCORD FRAMEWORK SETUP
    // ========================================================================

    let intents = serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::DIRECT_MESSAGES
        | serenity::GatewayIntents::MESSAGE_CONTENT // Required to read message content
        | serenity::GatewayIntents::GUILDS;

    let prefix = config.command_prefix.clone();
    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            // Commands are plain-text keywords routed by the core, not slash commands
            commands: vec![],
            event_handler: |ctx, event, framework, data| {
                Box::pin(event_handler(ctx, event, framework, data))
            },
            ..Default::default()
        })
        .setup(move |ctx, ready, _framework| {
            Box::pin(async move {
                tracing::info!(user = %ready.user.name, "Bot is ready");
                presence::on_ready(ctx, prefix.as_deref());
                Ok(data)
            })
        })
        .build();

    let mut client = serenity::ClientBuilder::new(&config.discord_token, intents)
        .framework(framework)
        .await
        .context("Error creating client")?;

    // Save both settings files before the shard connections are closed.
    let shard_manager = client.shard_manager.clone();
    let shutdown_guard = Arc::clone(&guard);
    tokio::spawn(async move {
        shutdown_signal().await;
        shutdown_guard.terminate().await;
        shard_manager.shutdown_all().await;
    });

    client.start().await.context("Error running bot")?;

    Ok(())
}

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;

mod domain;
mod application;
mod infrastructure;

use application::errors::BotError;
use application::messaging::EventDispatcher;
use application::services::{CommandService, JokeService, PresenceWatcher};
use domain::traits::Session;
use infrastructure::adapters::DiscordAdapter;
use infrastructure::config::Config;

/// Configuration comes from the environment (and an optional `.env` file):
/// DISCORD_TOKEN, DISCORD_STARTUP_CHANNEL_ID, BOT_PREFIX.
#[derive(Parser)]
#[command(name = "lotek-bot")]
#[command(version, about = "Discord bot that tells jokes and heckles friends coming online", long_about = None)]
struct Cli {}

fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let _cli = Cli::parse();

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("Failed to start async runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match rt.block_on(run_bot()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run_bot() -> Result<(), BotError> {
    let config = Config::load_env()?;
    tracing::info!("Starting lotek-bot with prefix '{}'", config.prefix);

    let adapter = Arc::new(DiscordAdapter::new(&config).await?);
    let session: Arc<dyn Session> = adapter.clone();

    let watcher = Arc::new(PresenceWatcher::with_defaults(&config.startup_channel_id, session.clone())?);
    let jokes = Arc::new(JokeService::new());
    let commands = Arc::new(CommandService::with_defaults(
        &config.prefix,
        jokes,
        watcher.clone(),
        session.clone(),
    )?);
    adapter
        .install(Arc::new(EventDispatcher::new(watcher, commands, session.clone())))
        .await;

    session.connect().await?;
    tracing::info!("Bot is now running");

    let outcome = tokio::select! {
        _ = shutdown_signal() => {
            tracing::info!("Shutdown signal received, stopping Discord client...");
            Ok(())
        }
        stopped = adapter.closed() => match stopped {
            Ok(()) => Err(BotError::GatewayStopped("connection closed".to_string())),
            Err(e) => Err(BotError::GatewayStopped(e.to_string())),
        },
    };

    if let Err(e) = session.disconnect().await {
        tracing::warn!("Error stopping bot: {}", e);
    }
    tracing::info!("Discord bot stopped");
    outcome
}

/// Ctrl+C, or SIGTERM on unix
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = sigterm.recv() => {}
                }
            }
            Err(e) => {
                tracing::warn!("Cannot listen for SIGTERM: {}", e);
                tokio::signal::ctrl_c().await.ok();
            }
        }
    }
    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await.ok();
    }
}

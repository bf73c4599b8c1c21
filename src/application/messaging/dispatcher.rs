//! Event dispatcher - Routes gateway events to services

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use crate::application::services::{CommandService, PresenceWatcher};
use crate::domain::entities::{BotIdentity, InteractionRef, PresenceEvent};
use crate::domain::traits::Session;

/// Posted to the notification channel once connected
pub const STARTUP_MESSAGE: &str = "🚀 Bot is now online and ready to annoy Tom!";

/// Upper bound on how long the presence snapshot waits for the ready sequence
const READY_TIMEOUT: Duration = Duration::from_secs(10);

/// Routes gateway events to the presence watcher and command service
pub struct EventDispatcher {
    watcher: Arc<PresenceWatcher>,
    commands: Arc<CommandService>,
    session: Arc<dyn Session>,
    started: watch::Sender<bool>,
    ready_timeout: Duration,
}

impl EventDispatcher {
    pub fn new(watcher: Arc<PresenceWatcher>, commands: Arc<CommandService>, session: Arc<dyn Session>) -> Self {
        Self {
            watcher,
            commands,
            session,
            started: watch::Sender::new(false),
            ready_timeout: READY_TIMEOUT,
        }
    }

    #[cfg(test)]
    pub fn with_ready_timeout(mut self, timeout: Duration) -> Self {
        self.ready_timeout = timeout;
        self
    }

    /// Ready sequence: register slash commands, then announce ourselves
    ///
    /// Neither step is fatal.
    pub async fn on_ready(&self, identity: &BotIdentity) {
        tracing::info!("Logged in as {} ({})", identity.name, identity.id);

        match self.commands.register_remote_commands().await {
            Ok(()) => tracing::info!("Successfully registered slash commands"),
            Err(e) => tracing::warn!("Error registering slash commands: {}", e),
        }

        if let Err(e) = self.session.send_message(self.watcher.channel_id(), STARTUP_MESSAGE).await {
            tracing::warn!("Error sending startup message: {}", e);
        }

        self.started.send_replace(true);
    }

    /// Evaluate presences already known when the gateway finished loading guilds
    pub async fn on_presence_snapshot(&self, presences: Vec<PresenceEvent>) {
        let mut started = self.started.subscribe();
        let ready = tokio::time::timeout(self.ready_timeout, started.wait_for(|s| *s))
            .await
            .map(|r| r.is_ok())
            .unwrap_or(false);
        if !ready {
            tracing::warn!("Ready sequence not finished, checking presences anyway");
        }

        let active: Vec<PresenceEvent> = presences.into_iter().filter(|p| p.status.is_active()).collect();
        tracing::info!("Checking {} active presence(s)", active.len());
        for presence in &active {
            if let Err(e) = self.watcher.on_presence_update(presence).await {
                tracing::warn!("Error handling initial presence: {}", e);
            }
        }
    }

    pub async fn on_presence(&self, event: &PresenceEvent) {
        tracing::debug!(
            "Presence update received - User: {:?}, Status: {}",
            event.username,
            event.status.as_str()
        );
        if let Err(e) = self.watcher.on_presence_update(event).await {
            tracing::warn!("Error handling presence update: {}", e);
        }
    }

    pub async fn on_message(&self, text: &str, channel_id: &str) {
        tracing::debug!("[{}] {}", channel_id, text.chars().take(50).collect::<String>());
        if let Err(e) = self.commands.handle_text(text, channel_id).await {
            tracing::warn!("Error handling command: {}", e);
        }
    }

    pub async fn on_interaction(&self, interaction: &InteractionRef) {
        tracing::info!("Received slash command /{} from {}", interaction.command, interaction.user);
        self.commands.handle_interaction(interaction).await;
    }
}

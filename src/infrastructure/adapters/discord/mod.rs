//! Discord adapter

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serenity::builder::{Builder, CreateCommand, CreateInteractionResponse, CreateInteractionResponseMessage};
use serenity::client::{Client, Context, EventHandler};
use serenity::gateway::ShardManager;
use serenity::http::Http;
use serenity::model::application::{Command as ApplicationCommand, Interaction};
use serenity::model::channel::Message;
use serenity::model::gateway::{GatewayIntents, Presence, Ready};
use serenity::model::id::{ChannelId, GuildId, InteractionId};
use serenity::model::user::OnlineStatus;
use serenity::prelude::{TypeMap, TypeMapKey};
use tokio::sync::{watch, Mutex, RwLock};

use crate::application::errors::SessionError;
use crate::application::messaging::EventDispatcher;
use crate::domain::entities::{BotIdentity, InteractionRef, PresenceEvent, PresenceStatus};
use crate::domain::traits::Session;
use crate::infrastructure::config::Config;

/// How long `disconnect` waits for the gateway task to finish
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(10);

/// Outcome of the gateway task, `None` while it runs
type GatewayState = Option<Result<(), String>>;

/// Discord session backed by a serenity client
pub struct DiscordAdapter {
    http: Arc<Http>,
    shard_manager: Arc<ShardManager>,
    data: Arc<RwLock<TypeMap>>,
    client: Mutex<Option<Client>>,
    gateway: Arc<watch::Sender<GatewayState>>,
}

impl DiscordAdapter {
    pub async fn new(config: &Config) -> Result<Self, SessionError> {
        let client = Client::builder(&config.token, intents())
            .event_handler(Handler)
            .await
            .map_err(|e| SessionError::Connect(format!("Failed to create Discord client: {}", e)))?;

        Ok(Self {
            http: client.http.clone(),
            shard_manager: client.shard_manager.clone(),
            data: client.data.clone(),
            client: Mutex::new(Some(client)),
            gateway: Arc::new(watch::Sender::new(None)),
        })
    }

    /// Route gateway events to `dispatcher`; call before `connect`
    pub async fn install(&self, dispatcher: Arc<EventDispatcher>) {
        self.data.write().await.insert::<DispatcherKey>(dispatcher);
    }

    /// Resolves once the gateway task has ended
    pub async fn closed(&self) -> Result<(), SessionError> {
        let mut state = self.gateway.subscribe();
        let outcome = match state.wait_for(Option::is_some).await {
            Ok(done) => done.clone().unwrap_or(Ok(())),
            Err(_) => Ok(()),
        };
        outcome.map_err(SessionError::Connect)
    }
}

#[async_trait]
impl Session for DiscordAdapter {
    async fn connect(&self) -> Result<(), SessionError> {
        let me = self
            .http
            .get_current_user()
            .await
            .map_err(|e| SessionError::Connect(e.to_string()))?;

        let mut client = self
            .client
            .lock()
            .await
            .take()
            .ok_or_else(|| SessionError::Connect("already connected".to_string()))?;

        tracing::info!("Authenticated as {}, opening gateway", me.name);
        let gateway = self.gateway.clone();
        tokio::spawn(async move {
            let result = client.start().await.map_err(|e| e.to_string());
            gateway.send_replace(Some(result));
        });
        Ok(())
    }

    async fn disconnect(&self) -> Result<(), SessionError> {
        self.shard_manager.shutdown_all().await;
        if self.client.lock().await.is_some() {
            // Never connected
            return Ok(());
        }

        match tokio::time::timeout(SHUTDOWN_TIMEOUT, self.closed()).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(SessionError::Disconnect(e.to_string())),
            Err(_) => Err(SessionError::Disconnect("gateway did not stop in time".to_string())),
        }
    }

    async fn send_message(&self, channel_id: &str, text: &str) -> Result<String, SessionError> {
        let message = parse_channel(channel_id)?
            .say(&self.http, text)
            .await
            .map_err(|e| SessionError::Send(e.to_string()))?;
        Ok(message.id.to_string())
    }

    async fn respond_to_interaction(&self, interaction: &InteractionRef, text: &str) -> Result<(), SessionError> {
        let message = CreateInteractionResponseMessage::new().content(text);
        self.respond(interaction, message).await
    }

    async fn respond_with_error(&self, interaction: &InteractionRef, text: &str) -> Result<(), SessionError> {
        let message = CreateInteractionResponseMessage::new().content(text).ephemeral(true);
        self.respond(interaction, message).await
    }

    async fn register_command(&self, name: &str, description: &str) -> Result<(), SessionError> {
        ApplicationCommand::create_global_command(&self.http, CreateCommand::new(name).description(description))
            .await
            .map(|_| ())
            .map_err(|e| SessionError::Register {
                command: name.to_string(),
                reason: e.to_string(),
            })
    }
}

impl DiscordAdapter {
    async fn respond(
        &self,
        interaction: &InteractionRef,
        message: CreateInteractionResponseMessage,
    ) -> Result<(), SessionError> {
        if interaction.id == 0 {
            return Err(SessionError::Send("interaction id is zero".to_string()));
        }
        CreateInteractionResponse::Message(message)
            .execute(&self.http, (InteractionId::new(interaction.id), interaction.token.as_str()))
            .await
            .map_err(|e| SessionError::Send(e.to_string()))
    }
}

fn intents() -> GatewayIntents {
    GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT
        | GatewayIntents::GUILD_MEMBERS
        | GatewayIntents::GUILD_PRESENCES
}

fn parse_channel(channel_id: &str) -> Result<ChannelId, SessionError> {
    match channel_id.parse::<u64>() {
        Ok(id) if id != 0 => Ok(ChannelId::new(id)),
        _ => Err(SessionError::InvalidChannel(channel_id.to_string())),
    }
}

fn presence_status(status: OnlineStatus) -> PresenceStatus {
    match status {
        OnlineStatus::Online => PresenceStatus::Online,
        OnlineStatus::Idle => PresenceStatus::Idle,
        OnlineStatus::Offline => PresenceStatus::Offline,
        OnlineStatus::DoNotDisturb => PresenceStatus::DoNotDisturb,
        OnlineStatus::Invisible => PresenceStatus::Invisible,
        _ => PresenceStatus::Unknown,
    }
}

/// Presence updates often carry only the user id; fall back to the cache
fn presence_event(ctx: &Context, presence: &Presence) -> PresenceEvent {
    let username = presence
        .user
        .name
        .clone()
        .or_else(|| ctx.cache.user(presence.user.id).map(|u| u.name.clone()));

    PresenceEvent {
        username,
        status: presence_status(presence.status),
    }
}

fn presence_snapshot(ctx: &Context, guilds: &[GuildId]) -> Vec<PresenceEvent> {
    guilds
        .iter()
        .filter_map(|id| ctx.cache.guild(*id))
        .flat_map(|guild| {
            guild
                .presences
                .values()
                .map(|p| presence_event(ctx, p))
                .collect::<Vec<_>>()
        })
        .collect()
}

/// TypeMapKey for storing the dispatcher in serenity's data map
struct DispatcherKey;
impl TypeMapKey for DispatcherKey {
    type Value = Arc<EventDispatcher>;
}

async fn dispatcher(ctx: &Context) -> Option<Arc<EventDispatcher>> {
    let data = ctx.data.read().await;
    let dispatcher = data.get::<DispatcherKey>().cloned();
    if dispatcher.is_none() {
        tracing::error!("EventDispatcher not found in context data");
    }
    dispatcher
}

struct Handler;

#[serenity::async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        let Some(dispatcher) = dispatcher(&ctx).await else {
            return;
        };
        let identity = BotIdentity {
            id: ready.user.id.get(),
            name: ready.user.name.clone(),
        };
        dispatcher.on_ready(&identity).await;
    }

    async fn cache_ready(&self, ctx: Context, guilds: Vec<GuildId>) {
        let Some(dispatcher) = dispatcher(&ctx).await else {
            return;
        };
        tracing::debug!("Cache ready with {} guild(s)", guilds.len());
        let snapshot = presence_snapshot(&ctx, &guilds);
        dispatcher.on_presence_snapshot(snapshot).await;
    }

    async fn presence_update(&self, ctx: Context, new_data: Presence) {
        let Some(dispatcher) = dispatcher(&ctx).await else {
            return;
        };
        let event = presence_event(&ctx, &new_data);
        dispatcher.on_presence(&event).await;
    }

    async fn message(&self, ctx: Context, msg: Message) {
        if msg.author.id == ctx.cache.current_user().id {
            return;
        }
        let Some(dispatcher) = dispatcher(&ctx).await else {
            return;
        };
        dispatcher.on_message(&msg.content, &msg.channel_id.to_string()).await;
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        let Interaction::Command(command) = interaction else {
            return;
        };
        let Some(dispatcher) = dispatcher(&ctx).await else {
            return;
        };
        let interaction = InteractionRef::new(command.id.get(), command.token.clone(), command.data.name.clone())
            .with_user(command.user.name.clone());
        dispatcher.on_interaction(&interaction).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_channel() {
        assert_eq!(parse_channel("1234").unwrap(), ChannelId::new(1234));
        for bad in ["", "0", "abc", "-1"] {
            assert_eq!(parse_channel(bad), Err(SessionError::InvalidChannel(bad.to_string())));
        }
    }

    #[test]
    fn test_presence_status_mapping() {
        assert_eq!(presence_status(OnlineStatus::Online), PresenceStatus::Online);
        assert_eq!(presence_status(OnlineStatus::Idle), PresenceStatus::Idle);
        assert_eq!(presence_status(OnlineStatus::DoNotDisturb), PresenceStatus::DoNotDisturb);
        assert_eq!(presence_status(OnlineStatus::Invisible), PresenceStatus::Invisible);
        assert_eq!(presence_status(OnlineStatus::Offline), PresenceStatus::Offline);
    }

    async fn adapter() -> DiscordAdapter {
        let config = Config::from_lookup(|key: &str| match key {
            "DISCORD_TOKEN" => Some("not-a-real-token".to_string()),
            "DISCORD_STARTUP_CHANNEL_ID" => Some("1234".to_string()),
            _ => None,
        })
        .unwrap();
        DiscordAdapter::new(&config).await.unwrap()
    }

    #[tokio::test]
    async fn test_disconnect_without_connect() {
        let adapter = adapter().await;
        assert_eq!(adapter.disconnect().await, Ok(()));
        assert_eq!(adapter.disconnect().await, Ok(()));
    }

    #[tokio::test]
    async fn test_failed_connect_keeps_client() {
        let adapter = adapter().await;

        let first = adapter.connect().await.unwrap_err();
        assert!(matches!(first, SessionError::Connect(_)));
        assert_eq!(adapter.disconnect().await, Ok(()));

        // The client was not consumed, so a retry reaches the API again
        let retry = adapter.connect().await.unwrap_err();
        assert_ne!(retry, SessionError::Connect("already connected".to_string()));
        assert_eq!(adapter.disconnect().await, Ok(()));
    }

    #[test]
    fn test_intents_include_presences() {
        let intents = intents();
        assert!(intents.contains(GatewayIntents::GUILD_PRESENCES));
        assert!(intents.contains(GatewayIntents::MESSAGE_CONTENT));
    }
}

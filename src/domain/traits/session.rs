use async_trait::async_trait;

use crate::application::errors::SessionError;
use crate::domain::entities::InteractionRef;

/// Session trait - abstraction over the chat-platform gateway
#[async_trait]
pub trait Session: Send + Sync {
    /// Open the persistent connection; call once before sending
    async fn connect(&self) -> Result<(), SessionError>;

    /// Close the connection; safe to call when never connected
    async fn disconnect(&self) -> Result<(), SessionError>;

    /// Send a message to a channel, returns the new message id
    async fn send_message(&self, channel_id: &str, text: &str) -> Result<String, SessionError>;

    /// Answer a slash command invocation
    async fn respond_to_interaction(&self, interaction: &InteractionRef, text: &str) -> Result<(), SessionError>;

    /// Answer a slash command invocation with an error, visible to the invoker only
    async fn respond_with_error(&self, interaction: &InteractionRef, text: &str) -> Result<(), SessionError> {
        self.respond_to_interaction(interaction, text).await
    }

    /// Create or update a global application command
    async fn register_command(&self, name: &str, description: &str) -> Result<(), SessionError>;
}

//! In-memory session that records outbound calls

use std::sync::Mutex;

use async_trait::async_trait;

use crate::application::errors::SessionError;
use crate::domain::entities::InteractionRef;
use crate::domain::traits::Session;

/// A reply to a slash command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub command: String,
    pub text: String,
    pub ephemeral: bool,
}

#[derive(Default)]
pub struct RecordingSession {
    sent: Mutex<Vec<(String, String)>>,
    replies: Mutex<Vec<Reply>>,
    registered: Mutex<Vec<String>>,
    fail_sends: bool,
    fail_register: Vec<String>,
}

impl RecordingSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_sends(mut self) -> Self {
        self.fail_sends = true;
        self
    }

    pub fn failing_register(mut self, command: &str) -> Self {
        self.fail_register.push(command.to_string());
        self
    }

    /// (channel id, text) pairs
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn replies(&self) -> Vec<Reply> {
        self.replies.lock().unwrap().clone()
    }

    pub fn registered(&self) -> Vec<String> {
        self.registered.lock().unwrap().clone()
    }

    fn reply(&self, interaction: &InteractionRef, text: &str, ephemeral: bool) -> Result<(), SessionError> {
        if self.fail_sends {
            return Err(SessionError::Send("offline".to_string()));
        }
        self.replies.lock().unwrap().push(Reply {
            command: interaction.command.clone(),
            text: text.to_string(),
            ephemeral,
        });
        Ok(())
    }
}

#[async_trait]
impl Session for RecordingSession {
    async fn connect(&self) -> Result<(), SessionError> {
        Ok(())
    }

    async fn disconnect(&self) -> Result<(), SessionError> {
        Ok(())
    }

    async fn send_message(&self, channel_id: &str, text: &str) -> Result<String, SessionError> {
        if self.fail_sends {
            return Err(SessionError::Send("offline".to_string()));
        }
        let mut sent = self.sent.lock().unwrap();
        sent.push((channel_id.to_string(), text.to_string()));
        Ok(sent.len().to_string())
    }

    async fn respond_to_interaction(&self, interaction: &InteractionRef, text: &str) -> Result<(), SessionError> {
        self.reply(interaction, text, false)
    }

    async fn respond_with_error(&self, interaction: &InteractionRef, text: &str) -> Result<(), SessionError> {
        self.reply(interaction, text, true)
    }

    async fn register_command(&self, name: &str, _description: &str) -> Result<(), SessionError> {
        if self.fail_register.iter().any(|c| c == name) {
            return Err(SessionError::Register {
                command: name.to_string(),
                reason: "rejected".to_string(),
            });
        }
        self.registered.lock().unwrap().push(name.to_string());
        Ok(())
    }
}

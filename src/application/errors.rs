//! Application layer errors

use thiserror::Error;

/// Top-level errors that stop the bot
#[derive(Error, Debug)]
pub enum BotError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Monitor error: {0}")]
    Monitor(#[from] MonitorError),

    #[error("Command error: {0}")]
    Command(#[from] CommandError),

    #[error("Gateway stopped: {0}")]
    GatewayStopped(String),
}

/// Gateway and outbound call errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Connect failed: {0}")]
    Connect(String),

    #[error("Disconnect failed: {0}")]
    Disconnect(String),

    #[error("Send failed: {0}")]
    Send(String),

    #[error("Failed to register /{command}: {reason}")]
    Register { command: String, reason: String },

    #[error("Invalid channel id: {0}")]
    InvalidChannel(String),
}

/// Slash command registration failures, one entry per command
#[derive(Error, Debug)]
#[error("Failed to register command(s): {}", failed_names(.failures))]
pub struct RegisterError {
    pub failures: Vec<SessionError>,
}

fn failed_names(failures: &[SessionError]) -> String {
    failures
        .iter()
        .map(|f| match f {
            SessionError::Register { command, .. } => command.as_str(),
            _ => "?",
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Command execution errors
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("Duplicate command name: {0}")]
    DuplicateName(String),

    #[error(transparent)]
    Jokes(#[from] JokeError),

    #[error("Reply failed: {0}")]
    Reply(#[from] SessionError),
}

/// Text command dispatch errors
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("Unknown command: {name}")]
    UnknownCommand { name: String },

    #[error(transparent)]
    Command(#[from] CommandError),
}

/// Presence notification errors
#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("Presence update has no user information")]
    MissingUserInfo,

    #[error("Failed to send notification: {0}")]
    Send(#[from] SessionError),
}

/// Monitored user table errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum MonitorError {
    #[error("Alias '{alias}' already belongs to {owner}")]
    DuplicateAlias { alias: String, owner: String },

    #[error("Template for {0} must contain exactly one %s")]
    InvalidTemplate(String),
}

/// Joke catalog errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum JokeError {
    #[error("Joke catalog is empty")]
    EmptyCatalog,
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

//! Configuration management

use std::fmt;

use crate::application::errors::ConfigError;

pub const TOKEN_VAR: &str = "DISCORD_TOKEN";
pub const CHANNEL_VAR: &str = "DISCORD_STARTUP_CHANNEL_ID";
pub const PREFIX_VAR: &str = "BOT_PREFIX";

const DEFAULT_PREFIX: &str = "!";

/// Bot configuration, read once at startup
#[derive(Clone)]
pub struct Config {
    pub token: String,
    /// Channel that receives the startup message and presence notifications
    pub startup_channel_id: String,
    pub prefix: String,
}

impl Config {
    /// Load `.env` (if present), then read the process environment
    pub fn load_env() -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(path) => tracing::debug!("Loaded environment from {}", path.display()),
            Err(e) if e.not_found() => {}
            Err(e) => return Err(ConfigError::Parse(format!("Failed to load .env file: {}", e))),
        }

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; empty values count as missing
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| ConfigError::MissingField(format!("{} environment variable is required", key)))
        };

        let token = required(TOKEN_VAR)?;
        let startup_channel_id = required(CHANNEL_VAR)?.trim().to_string();
        match startup_channel_id.parse::<u64>() {
            Ok(id) if id != 0 => {}
            _ => {
                return Err(ConfigError::InvalidValue(format!(
                    "{} must be a numeric channel id, got '{}'",
                    CHANNEL_VAR, startup_channel_id
                )))
            }
        }

        let prefix = lookup(PREFIX_VAR)
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_PREFIX.to_string());

        Ok(Self {
            token,
            startup_channel_id,
            prefix,
        })
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("token", &"<redacted>")
            .field("startup_channel_id", &self.startup_channel_id)
            .field("prefix", &self.prefix)
            .finish()
    }
}

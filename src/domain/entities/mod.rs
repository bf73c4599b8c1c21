//! Domain entities - Core business objects with no external dependencies

pub mod monitored_user;
pub mod presence;
pub mod command;
pub mod interaction;

pub use monitored_user::MonitoredUser;
pub use presence::{PresenceEvent, PresenceStatus};
pub use command::{Command, CommandRegistry};
pub use interaction::{BotIdentity, InteractionRef};

//! Application services - Business logic orchestration

pub mod command_service;
pub mod joke_service;
pub mod presence_service;

pub use command_service::CommandService;
pub use joke_service::JokeService;
pub use presence_service::PresenceWatcher;

//! Domain layer - Core business logic with no external dependencies
//! 
//! This layer contains:
//! - Entities: Core business objects (MonitoredUser, PresenceEvent, Command)
//! - Traits: Abstractions for infrastructure (Session, Bot)

pub mod entities;
pub mod traits;

//! Application layer - Use cases and business logic
//! 
//! This layer contains:
//! - Services: Presence watching, commands, jokes
//! - Errors: Domain-specific errors
//! - Messaging: Command parsing and gateway event dispatching

pub mod errors;
pub mod services;
pub mod messaging;

#[cfg(test)]
pub mod testing;

//! Domain traits - Abstractions for infrastructure implementations

pub mod bot;
pub mod session;

pub use bot::Bot;
pub use session::Session;

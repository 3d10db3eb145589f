//! The bot's control loop: pulls events off the transport, routes commands
//! and interactions, and records finished workflows.

pub mod dispatcher;
pub mod interactions;

#[cfg(test)]
pub(crate) mod testing;

pub use dispatcher::{ConnectionState, EventDispatcher};
pub use interactions::InteractionHandler;

//! Slack transport for the bot: a Socket Mode connection that delivers
//! inbound events and accepts acknowledgments, plus the Web API calls used
//! to open it and to post messages.

pub mod reconnect;
pub mod slack;
pub mod slack_api;
pub mod slack_events;

pub use reconnect::ReconnectPolicy;
pub use slack::{SocketModeClient, SocketModeConfig};
pub use slack_api::SlackWebClient;
pub use slack_events::{SocketMessage, parse_socket_message};

pub mod blocks;
pub mod error;
pub mod event;
pub mod message;
pub mod traits;
pub mod types;

pub use blocks::{blocks_payload, section_block, simple_payload};
pub use error::BotError;
pub use event::{
    BlockAction, InboundEvent, InteractionCallback, InteractionType, RequestHandle,
    SelectedOption, SlackChannel, SlackUser, SlashCommand,
};
pub use message::AckPayload;
pub use traits::Transport;
pub use types::{CompletionRecord, Template, WorkflowDefinition};

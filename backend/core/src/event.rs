use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Opaque handle for an inbound event that must be acknowledged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestHandle(String);

impl RequestHandle {
    pub fn new(envelope_id: impl Into<String>) -> Self {
        Self(envelope_id.into())
    }

    pub fn envelope_id(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RequestHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Everything the transport can deliver to the dispatcher.
#[derive(Debug, Clone)]
pub enum InboundEvent {
    /// The transport is opening a connection.
    Connecting,
    /// A connection attempt failed; the transport retries on its own.
    ConnectionError { reason: String },
    /// The connection is up and events will follow.
    Connected,
    /// A non-interactive Events API callback.
    EventsApi { request: RequestHandle, payload: Value },
    /// A slash command invocation.
    SlashCommand { request: RequestHandle, command: SlashCommand },
    /// A button press, menu selection, or other interaction.
    Interactive { request: RequestHandle, callback: InteractionCallback },
    /// An envelope type this bot does not understand.
    Unknown { kind: String, request: Option<RequestHandle> },
}

impl InboundEvent {
    /// Short label used in logs.
    pub fn kind(&self) -> &str {
        match self {
            InboundEvent::Connecting => "connecting",
            InboundEvent::ConnectionError { .. } => "connection_error",
            InboundEvent::Connected => "connected",
            InboundEvent::EventsApi { .. } => "events_api",
            InboundEvent::SlashCommand { .. } => "slash_commands",
            InboundEvent::Interactive { .. } => "interactive",
            InboundEvent::Unknown { kind, .. } => kind,
        }
    }

    /// The acknowledgment handle, if this event expects one.
    pub fn request(&self) -> Option<&RequestHandle> {
        match self {
            InboundEvent::EventsApi { request, .. }
            | InboundEvent::SlashCommand { request, .. }
            | InboundEvent::Interactive { request, .. } => Some(request),
            InboundEvent::Unknown { request, .. } => request.as_ref(),
            _ => None,
        }
    }
}

/// Slash command payload as Slack sends it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlashCommand {
    /// The command name including the leading slash, e.g. `/workflow`.
    pub command: String,
    /// Free text typed after the command.
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub channel_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionType {
    BlockActions,
    ViewSubmission,
    ViewClosed,
    Shortcut,
    MessageAction,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlackUser {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub username: String,
}

impl SlackUser {
    pub fn named(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Default::default() }
    }

    /// `name` when Slack sent one, otherwise `username`.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() { &self.username } else { &self.name }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlackChannel {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedOption {
    #[serde(default)]
    pub value: String,
}

/// One user action inside a `block_actions` interaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockAction {
    pub action_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_id: Option<String>,
    #[serde(default)]
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_option: Option<SelectedOption>,
}

impl BlockAction {
    pub fn new(action_id: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            action_id: action_id.into(),
            value: value.into(),
            ..Default::default()
        }
    }

    /// Button value, or the chosen option's value for select menus.
    pub fn selected_value(&self) -> &str {
        if self.value.is_empty() {
            if let Some(option) = &self.selected_option {
                return &option.value;
            }
        }
        &self.value
    }
}

/// Interaction payload as Slack sends it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionCallback {
    #[serde(rename = "type")]
    pub kind: InteractionType,
    #[serde(default)]
    pub user: SlackUser,
    #[serde(default)]
    pub channel: SlackChannel,
    #[serde(default)]
    pub actions: Vec<BlockAction>,
}

impl InteractionCallback {
    pub fn block_actions(user: &str, channel: &str, actions: Vec<BlockAction>) -> Self {
        Self {
            kind: InteractionType::BlockActions,
            user: SlackUser::named(user),
            channel: SlackChannel { id: channel.to_string(), name: String::new() },
            actions,
        }
    }

    /// The action that counts for this interaction. Slack may batch several;
    /// only the first is honoured.
    pub fn primary_action(&self) -> Option<&BlockAction> {
        self.actions.first()
    }
}

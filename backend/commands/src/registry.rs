/// Slash command registry.
use crate::types::CommandDef;

/// Key of the command that renders the completion ledger.
pub const LIST_COMPLETIONS: &str = "summary";
/// Key of the command that replays a configured workflow.
pub const INVOKE_WORKFLOW: &str = "workflow";

/// Build the built-in command list.
pub fn builtin_commands() -> Vec<CommandDef> {
    vec![
        CommandDef {
            key: LIST_COMPLETIONS.into(),
            description: "List every finished workflow and what was selected.".into(),
            text_aliases: vec!["/summary".into()],
            arg_hint: None,
        },
        CommandDef {
            key: INVOKE_WORKFLOW.into(),
            description: "Show the first message of a workflow.".into(),
            text_aliases: vec!["/workflow".into()],
            arg_hint: Some("<workflow name>".into()),
        },
    ]
}

#[derive(Debug, Clone)]
pub struct CommandRegistry {
    commands: Vec<CommandDef>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self { commands: builtin_commands() }
    }

    pub fn all(&self) -> &[CommandDef] {
        &self.commands
    }

    pub fn find_by_key(&self, key: &str) -> Option<&CommandDef> {
        self.commands.iter().find(|c| c.key == key)
    }

    /// Match a slash name such as `/summary`. Case-insensitive.
    pub fn find_by_alias(&self, alias: &str) -> Option<&CommandDef> {
        self.commands
            .iter()
            .find(|c| c.text_aliases.iter().any(|a| a.eq_ignore_ascii_case(alias)))
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

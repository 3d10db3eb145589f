/// Slash command detection: match inbound slash commands against the registry.
use nocode_core::SlashCommand;

use crate::registry::CommandRegistry;
use crate::types::CommandInvocation;

/// Resolve a delivered slash command. Returns `None` for names the registry
/// does not know, which the caller drops without acknowledging.
pub fn detect_command(command: &SlashCommand, registry: &CommandRegistry) -> Option<CommandInvocation> {
    let alias = command.command.trim();
    if !alias.starts_with('/') {
        return None;
    }

    let def = registry.find_by_alias(alias)?;

    Some(CommandInvocation {
        key: def.key.clone(),
        raw_alias: alias.to_string(),
        raw_args: command.text.trim().to_string(),
    })
}

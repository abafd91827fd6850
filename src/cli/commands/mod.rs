use std::collections::HashMap;

pub mod bill;
pub mod history;
pub mod system;

use crate::cli::shell_context::{CommandError, CommandResult, ShellContext};
use crate::domain::SnapshotId;

pub(crate) fn all_definitions() -> Vec<CommandDefinition> {
    let mut commands = Vec::new();
    commands.extend(bill::definitions());
    commands.extend(history::definitions());
    commands.extend(system::definitions());
    commands
}

pub type CommandHandler = fn(&mut ShellContext, &[&str]) -> CommandResult;

#[derive(Clone)]
pub struct CommandDefinition {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub description: &'static str,
    pub usage: &'static str,
    pub handler: CommandHandler,
}

impl CommandDefinition {
    pub const fn new(
        name: &'static str,
        description: &'static str,
        usage: &'static str,
        handler: CommandHandler,
    ) -> Self {
        Self {
            name,
            aliases: &[],
            description,
            usage,
            handler,
        }
    }

    pub const fn with_aliases(mut self, aliases: &'static [&'static str]) -> Self {
        self.aliases = aliases;
        self
    }
}

/// Command lookup by name or alias, listed in registration order.
pub struct CommandRegistry {
    commands: HashMap<&'static str, CommandDefinition>,
    aliases: HashMap<&'static str, &'static str>,
    order: Vec<&'static str>,
}

impl CommandRegistry {
    pub fn new(definitions: Vec<CommandDefinition>) -> Self {
        let mut registry = Self {
            commands: HashMap::new(),
            aliases: HashMap::new(),
            order: Vec::new(),
        };
        for definition in definitions {
            registry.register(definition);
        }
        registry
    }

    pub fn register(&mut self, definition: CommandDefinition) {
        let name = definition.name;
        for alias in definition.aliases {
            self.aliases.insert(*alias, name);
        }
        if self.commands.insert(name, definition).is_none() {
            self.order.push(name);
        }
    }

    pub fn get(&self, name: &str) -> Option<&CommandDefinition> {
        let canonical = self.aliases.get(name).copied().unwrap_or(name);
        self.commands.get(canonical)
    }

    pub fn list(&self) -> Vec<&CommandDefinition> {
        self.order
            .iter()
            .filter_map(|name| self.commands.get(name))
            .collect()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.order.iter().copied()
    }

    pub fn handler(&self, name: &str) -> Option<CommandHandler> {
        self.get(name).map(|definition| definition.handler)
    }
}

pub(crate) fn usage_error(usage: &str) -> CommandError {
    CommandError::InvalidArguments(format!("Usage: {usage}"))
}

/// Accepts on/off style words; `None` when the word is not recognised.
pub(crate) fn parse_toggle(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "on" | "yes" | "true" | "1" => Some(true),
        "off" | "no" | "false" | "0" => Some(false),
        _ => None,
    }
}

/// Resolves a 1-based history position or a literal snapshot id.
pub(crate) fn resolve_entry(context: &ShellContext, token: &str) -> Option<SnapshotId> {
    let entries = context.session.history().entries();
    if let Ok(position) = token.parse::<usize>() {
        if let Some(entry) = position.checked_sub(1).and_then(|index| entries.get(index)) {
            return Some(entry.id.clone());
        }
    }
    entries
        .iter()
        .find(|entry| entry.id.as_str() == token)
        .map(|entry| entry.id.clone())
}

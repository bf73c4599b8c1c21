use std::collections::BTreeMap;
use std::sync::Arc;

use crate::application::errors::CommandError;

/// Context handed to a command handler
pub struct Invocation<'a> {
    pub commands: &'a CommandRegistry,
}

/// Command handler function type, returns the reply text
pub type CommandHandler = Arc<dyn Fn(&Invocation<'_>) -> Result<String, CommandError> + Send + Sync>;

/// Represents a bot command
#[derive(Clone)]
pub struct Command {
    pub name: String,
    pub description: String,
    pub aliases: Vec<String>,
    pub handler: CommandHandler,
}

impl Command {
    pub fn new<F>(name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&Invocation<'_>) -> Result<String, CommandError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            description: String::new(),
            aliases: Vec::new(),
            handler: Arc::new(handler),
        }
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    pub fn with_aliases(mut self, aliases: &[&str]) -> Self {
        self.aliases = aliases.iter().map(|a| a.to_string()).collect();
        self
    }

    pub fn has_alias(&self, input: &str) -> bool {
        self.aliases.iter().any(|a| a == input)
    }

    pub fn run(&self, commands: &CommandRegistry) -> Result<String, CommandError> {
        (self.handler)(&Invocation { commands })
    }
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .finish_non_exhaustive()
    }
}

/// Command registry, keyed by command name
#[derive(Default)]
pub struct CommandRegistry {
    commands: BTreeMap<String, Command>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Names are unique; alias collisions between commands are logged but allowed
    pub fn register(&mut self, command: Command) -> Result<(), CommandError> {
        if self.commands.contains_key(&command.name) {
            return Err(CommandError::DuplicateName(command.name));
        }
        for alias in &command.aliases {
            if let Some(other) = self.find(alias) {
                tracing::warn!("Alias '{}' of /{} shadowed by /{}", alias, command.name, other.name);
            }
        }
        self.commands.insert(command.name.clone(), command);
        Ok(())
    }

    /// Exact name lookup
    pub fn get(&self, name: &str) -> Option<&Command> {
        self.commands.get(name)
    }

    /// Name first, then aliases
    pub fn find(&self, input: &str) -> Option<&Command> {
        self.get(input)
            .or_else(|| self.commands.values().find(|c| c.has_alias(input)))
    }

    pub fn all(&self) -> impl Iterator<Item = &Command> {
        self.commands.values()
    }
}

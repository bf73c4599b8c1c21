use std::sync::Arc;

use crate::application::errors::{CommandError, DispatchError, RegisterError};
use crate::application::messaging::CommandParser;
use crate::application::services::JokeService;
use crate::domain::entities::{Command, CommandRegistry, InteractionRef};
use crate::domain::traits::{Bot, Session};

/// Service for managing and executing commands
pub struct CommandService {
    registry: CommandRegistry,
    parser: CommandParser,
    session: Arc<dyn Session>,
}

impl CommandService {
    pub fn new(prefix: impl Into<String>, session: Arc<dyn Session>) -> Self {
        Self {
            registry: CommandRegistry::new(),
            parser: CommandParser::new(prefix),
            session,
        }
    }

    /// Service with the joke, help and aliases commands
    pub fn with_defaults(
        prefix: impl Into<String>,
        jokes: Arc<JokeService>,
        bot: Arc<dyn Bot>,
        session: Arc<dyn Session>,
    ) -> Result<Self, CommandError> {
        let mut service = Self::new(prefix, session);
        service.register(joke_command(jokes))?;
        service.register(help_command())?;
        service.register(aliases_command(bot))?;
        Ok(service)
    }

    pub fn register(&mut self, command: Command) -> Result<(), CommandError> {
        self.registry.register(command)
    }

    /// Create or update every command as a global slash command
    ///
    /// Registration is best-effort: a failing command is logged and the rest
    /// are still attempted.
    pub async fn register_remote_commands(&self) -> Result<(), RegisterError> {
        let mut failures = Vec::new();
        for cmd in self.registry.all() {
            match self.session.register_command(&cmd.name, &cmd.description).await {
                Ok(()) => tracing::debug!("Registered /{}", cmd.name),
                Err(e) => {
                    tracing::warn!("{}", e);
                    failures.push(e);
                }
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(RegisterError { failures })
        }
    }

    /// Run a prefixed text command and post the reply to `channel_id`
    pub async fn handle_text(&self, text: &str, channel_id: &str) -> Result<(), DispatchError> {
        let Some(parsed) = self.parser.parse(text) else {
            return Ok(());
        };

        let cmd = self
            .registry
            .find(&parsed.name)
            .ok_or_else(|| DispatchError::UnknownCommand { name: parsed.name.clone() })?;

        tracing::debug!("Text command /{} with args: {:?}", cmd.name, parsed.args);
        let reply = cmd.run(&self.registry)?;
        self.session
            .send_message(channel_id, &reply)
            .await
            .map_err(CommandError::from)?;
        Ok(())
    }

    /// Run a slash command; only exact names resolve, aliases do not
    pub async fn handle_interaction(&self, interaction: &InteractionRef) {
        let Some(cmd) = self.registry.get(&interaction.command) else {
            tracing::debug!("Ignoring unknown slash command /{}", interaction.command);
            return;
        };

        let result = match cmd.run(&self.registry) {
            Ok(reply) => self
                .session
                .respond_to_interaction(interaction, &reply)
                .await
                .map_err(CommandError::from),
            Err(e) => Err(e),
        };

        if let Err(e) = result {
            tracing::warn!("Slash command /{} failed: {}", cmd.name, e);
            let text = format!("Error executing command: {}", e);
            if let Err(e) = self.session.respond_with_error(interaction, &text).await {
                tracing::error!("Failed to report /{} error: {}", cmd.name, e);
            }
        }
    }

    #[cfg(test)]
    pub fn get_help(&self) -> String {
        help_text(&self.registry)
    }
}

fn help_text(commands: &CommandRegistry) -> String {
    let mut help = "Available commands:\n".to_string();
    for cmd in commands.all() {
        let aliases = if cmd.aliases.is_empty() {
            String::new()
        } else {
            format!(" (aliases: {})", cmd.aliases.join(", "))
        };
        help.push_str(&format!("- /{}{}: {}\n", cmd.name, aliases, cmd.description));
    }
    help
}

fn joke_command(jokes: Arc<JokeService>) -> Command {
    Command::new("joke", move |_| Ok(jokes.random_joke()?))
        .with_aliases(&["jokes"])
        .with_description("Tells a random nerdy joke")
}

fn help_command() -> Command {
    Command::new("help", |inv| Ok(help_text(inv.commands)))
        .with_description("Shows available commands and their descriptions")
}

fn aliases_command(bot: Arc<dyn Bot>) -> Command {
    Command::new("aliases", move |_| {
        let mut msg = "Monitored users and their aliases:\n".to_string();
        for (name, aliases) in bot.user_aliases() {
            msg.push_str(&format!("- {}: {}\n", name, aliases.join(", ")));
        }
        Ok(msg)
    })
    .with_aliases(&["users", "monitored"])
    .with_description("Shows all monitored users and their aliases")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::errors::{JokeError, SessionError};
    use crate::application::services::PresenceWatcher;
    use crate::application::testing::{RecordingSession, Reply};

    const JOKE: &str = "There are 10 kinds of people.";

    fn service_with(session: Arc<RecordingSession>, jokes: JokeService) -> CommandService {
        let watcher = Arc::new(PresenceWatcher::with_defaults("42", session.clone()).unwrap());
        CommandService::with_defaults("!", Arc::new(jokes), watcher, session).unwrap()
    }

    fn service() -> (Arc<RecordingSession>, CommandService) {
        let session = Arc::new(RecordingSession::new());
        let service = service_with(session.clone(), JokeService::with_jokes([JOKE]));
        (session, service)
    }

    fn slash(command: &str) -> InteractionRef {
        InteractionRef::new(1, "token", command).with_user("tester")
    }

    #[tokio::test]
    async fn test_joke_and_alias() {
        let (session, service) = service();
        service.handle_text("!joke", "7").await.unwrap();
        service.handle_text("!jokes extra args", "7").await.unwrap();

        assert_eq!(
            session.sent(),
            vec![("7".to_string(), JOKE.to_string()), ("7".to_string(), JOKE.to_string())]
        );
    }

    #[tokio::test]
    async fn test_aliases_command_and_aliases() {
        let (session, service) = service();
        for text in ["!aliases", "!users", "!monitored"] {
            service.handle_text(text, "7").await.unwrap();
        }

        let expected = "Monitored users and their aliases:\n- Kristof: kristof, krzko, tommy, tommyboy\n";
        let sent = session.sent();
        assert_eq!(sent.len(), 3);
        assert!(sent.iter().all(|(_, text)| text == expected));
    }

    #[tokio::test]
    async fn test_help_lists_all_commands() {
        let (session, service) = service();
        service.handle_text("!help", "7").await.unwrap();

        let expected = "Available commands:\n\
            - /aliases (aliases: users, monitored): Shows all monitored users and their aliases\n\
            - /help: Shows available commands and their descriptions\n\
            - /joke (aliases: jokes): Tells a random nerdy joke\n";
        assert_eq!(session.sent()[0].1, expected);
        assert_eq!(service.get_help(), expected);
    }

    #[tokio::test]
    async fn test_text_without_prefix_is_ignored() {
        let (session, service) = service();
        service.handle_text("joke", "7").await.unwrap();
        service.handle_text("hello !joke", "7").await.unwrap();
        assert!(session.sent().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_text_command() {
        let (session, service) = service();
        let err = service.handle_text("!dance now", "7").await.unwrap_err();
        assert!(matches!(err, DispatchError::UnknownCommand { name } if name == "dance"));
        assert!(session.sent().is_empty());
    }

    #[tokio::test]
    async fn test_text_send_failure() {
        let session = Arc::new(RecordingSession::new().failing_sends());
        let service = service_with(session, JokeService::new());

        let err = service.handle_text("!joke", "7").await.unwrap_err();
        assert!(matches!(err, DispatchError::Command(CommandError::Reply(SessionError::Send(_)))));
    }

    #[tokio::test]
    async fn test_slash_exact_names_only() {
        let (session, service) = service();
        service.handle_interaction(&slash("joke")).await;
        service.handle_interaction(&slash("jokes")).await;
        service.handle_interaction(&slash("users")).await;
        service.handle_interaction(&slash("nope")).await;

        assert_eq!(
            session.replies(),
            vec![Reply { command: "joke".to_string(), text: JOKE.to_string(), ephemeral: false }]
        );
        assert!(session.sent().is_empty());
    }

    #[tokio::test]
    async fn test_slash_help_and_aliases() {
        let (session, service) = service();
        service.handle_interaction(&slash("help")).await;
        service.handle_interaction(&slash("aliases")).await;

        let replies = session.replies();
        assert_eq!(replies.len(), 2);
        assert_eq!(replies[0].text, service.get_help());
        assert!(replies[1].text.starts_with("Monitored users and their aliases:\n"));
    }

    #[tokio::test]
    async fn test_slash_failure_replies_with_error() {
        let session = Arc::new(RecordingSession::new());
        let service = service_with(session.clone(), JokeService::with_jokes(Vec::<String>::new()));

        service.handle_interaction(&slash("joke")).await;

        assert_eq!(
            session.replies(),
            vec![Reply {
                command: "joke".to_string(),
                text: format!("Error executing command: {}", JokeError::EmptyCatalog),
                ephemeral: true,
            }]
        );
    }

    #[tokio::test]
    async fn test_register_remote_commands() {
        let (session, service) = service();
        service.register_remote_commands().await.unwrap();
        assert_eq!(session.registered(), vec!["aliases", "help", "joke"]);
    }

    #[tokio::test]
    async fn test_register_is_best_effort() {
        let session = Arc::new(RecordingSession::new().failing_register("help"));
        let service = service_with(session.clone(), JokeService::new());

        let err = service.register_remote_commands().await.unwrap_err();
        assert_eq!(err.failures.len(), 1);
        assert_eq!(session.registered(), vec!["aliases", "joke"]);
    }
}

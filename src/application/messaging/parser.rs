//! Command parser - Turns prefixed text into a command name and arguments

/// A prefixed text command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    pub name: String,
    pub args: Vec<String>,
}

/// Parses `<prefix><name> [args...]` messages
#[derive(Debug, Clone)]
pub struct CommandParser {
    command_prefix: String,
}

impl CommandParser {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            command_prefix: prefix.into(),
        }
    }

    /// `None` for anything that is not a command
    pub fn parse(&self, text: &str) -> Option<ParsedCommand> {
        if !text.starts_with(&self.command_prefix) {
            return None;
        }

        let mut parts = text.split_whitespace();
        let first = parts.next()?;
        let name = first.strip_prefix(&self.command_prefix).unwrap_or(first);

        Some(ParsedCommand {
            name: name.to_string(),
            args: parts.map(str::to_string).collect(),
        })
    }
}

impl Default for CommandParser {
    fn default() -> Self {
        Self::new("!")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_command_with_args() {
        let parsed = CommandParser::default().parse("!joke  please now").unwrap();
        assert_eq!(parsed.name, "joke");
        assert_eq!(parsed.args, vec!["please", "now"]);
    }

    #[test]
    fn test_no_prefix() {
        let parser = CommandParser::default();
        assert!(parser.parse("joke").is_none());
        assert!(parser.parse(" !joke").is_none());
        assert!(parser.parse("").is_none());
    }

    #[test]
    fn test_prefix_only() {
        let parsed = CommandParser::default().parse("!").unwrap();
        assert_eq!(parsed.name, "");
        assert!(parsed.args.is_empty());
    }

    #[test]
    fn test_whitespace_prefix_with_no_tokens() {
        assert!(CommandParser::new(" ").parse("   ").is_none());
    }

    #[test]
    fn test_multi_char_prefix() {
        let parsed = CommandParser::new("lb!").parse("lb!help").unwrap();
        assert_eq!(parsed.name, "help");
    }
}

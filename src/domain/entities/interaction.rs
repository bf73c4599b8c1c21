/// Everything needed to answer a slash command invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractionRef {
    pub id: u64,
    pub token: String,
    pub command: String,
    pub user: String,
}

impl InteractionRef {
    pub fn new(id: u64, token: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            id,
            token: token.into(),
            command: command.into(),
            user: String::new(),
        }
    }

    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = user.into();
        self
    }
}

/// The logged-in bot account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotIdentity {
    pub id: u64,
    pub name: String,
}

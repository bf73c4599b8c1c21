use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::application::errors::{MonitorError, NotifyError};
use crate::domain::entities::{MonitoredUser, PresenceEvent};
use crate::domain::traits::{Bot, Session};

/// Watches presence updates and announces monitored users coming online
pub struct PresenceWatcher {
    users: RwLock<BTreeMap<String, MonitoredUser>>,
    channel_id: String,
    session: Arc<dyn Session>,
}

impl PresenceWatcher {
    pub fn new(channel_id: impl Into<String>, session: Arc<dyn Session>) -> Self {
        Self {
            users: RwLock::new(BTreeMap::new()),
            channel_id: channel_id.into(),
            session,
        }
    }

    /// Watcher seeded with the built-in monitored users
    pub fn with_defaults(channel_id: impl Into<String>, session: Arc<dyn Session>) -> Result<Self, MonitorError> {
        let watcher = Self::new(channel_id, session);
        watcher.add_user("Kristof", &["Kristof", "krzko", "Tommy", "TommyBoy"], "Shuddup %s!")?;

        tracing::info!("Monitoring users: {:?}", watcher.user_aliases());
        tracing::info!("Notifications go to channel {}", watcher.channel_id);
        Ok(watcher)
    }

    /// Insert or replace a monitored user
    ///
    /// An alias may belong to one user only, so a presence event matches at
    /// most one entry.
    pub fn add_user(&self, name: &str, aliases: &[&str], message_template: &str) -> Result<(), MonitorError> {
        let user = MonitoredUser::new(name, aliases, message_template);
        if !user.has_valid_template() {
            return Err(MonitorError::InvalidTemplate(user.name));
        }

        let mut users = self.users.write().unwrap_or_else(PoisonError::into_inner);
        for other in users.values().filter(|u| u.name != user.name) {
            if let Some(alias) = user.aliases.iter().find(|a| other.matches(a)) {
                return Err(MonitorError::DuplicateAlias {
                    alias: alias.clone(),
                    owner: other.name.clone(),
                });
            }
        }

        users.insert(user.name.clone(), user);
        Ok(())
    }

    /// Send the user's notification if they just became active
    pub async fn on_presence_update(&self, event: &PresenceEvent) -> Result<(), NotifyError> {
        let username = event.username.as_deref().ok_or(NotifyError::MissingUserInfo)?;

        tracing::debug!("Processing presence update for {} ({})", username, event.status.as_str());

        let message = {
            let lowered = username.to_lowercase();
            let users = self.users.read().unwrap_or_else(PoisonError::into_inner);
            let Some(user) = users.values().find(|u| u.matches(&lowered)) else {
                return Ok(());
            };
            if !event.status.is_active() {
                tracing::debug!("{} matched {} but is {}", username, user.name, event.status.as_str());
                return Ok(());
            }
            user.render(username)
        };

        tracing::info!("{} is active, notifying channel {}: {}", username, self.channel_id, message);
        self.session.send_message(&self.channel_id, &message).await?;
        Ok(())
    }

    pub fn channel_id(&self) -> &str {
        &self.channel_id
    }
}

impl Bot for PresenceWatcher {
    fn user_aliases(&self) -> BTreeMap<String, Vec<String>> {
        self.users
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .map(|u| (u.name.clone(), u.aliases.clone()))
            .collect()
    }
}

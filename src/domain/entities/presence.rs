/// Presence status reported by the gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenceStatus {
    Online,
    Idle,
    Offline,
    DoNotDisturb,
    Invisible,
    Unknown,
}

impl PresenceStatus {
    pub fn as_str(&self) -> &str {
        match self {
            PresenceStatus::Online => "online",
            PresenceStatus::Idle => "idle",
            PresenceStatus::Offline => "offline",
            PresenceStatus::DoNotDisturb => "dnd",
            PresenceStatus::Invisible => "invisible",
            PresenceStatus::Unknown => "unknown",
        }
    }

    /// Online or idle ("green" or "away")
    pub fn is_active(&self) -> bool {
        matches!(self, PresenceStatus::Online | PresenceStatus::Idle)
    }
}

/// A user's presence change, as delivered by the gateway
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresenceEvent {
    pub username: Option<String>,
    pub status: PresenceStatus,
}

#[cfg(test)]
impl PresenceEvent {
    pub fn new(username: impl Into<String>, status: PresenceStatus) -> Self {
        Self {
            username: Some(username.into()),
            status,
        }
    }

    pub fn anonymous(status: PresenceStatus) -> Self {
        Self { username: None, status }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_statuses() {
        assert!(PresenceStatus::Online.is_active());
        assert!(PresenceStatus::Idle.is_active());
        for status in [
            PresenceStatus::Offline,
            PresenceStatus::DoNotDisturb,
            PresenceStatus::Invisible,
            PresenceStatus::Unknown,
        ] {
            assert!(!status.is_active(), "{} should not be active", status.as_str());
        }
    }
}

//! Inbound push notifications.

use serde::{Deserialize, Serialize};

/// Provider classification of a push notification.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceState {
    /// Subscription handshake.
    Sync,
    Exists,
    NotExists,
    Other(String),
}

impl ResourceState {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "sync" => Self::Sync,
            "exists" => Self::Exists,
            "not_exists" => Self::NotExists,
            other => Self::Other(other.to_string()),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Sync => "sync",
            Self::Exists => "exists",
            Self::NotExists => "not_exists",
            Self::Other(raw) => raw,
        }
    }
}

impl std::fmt::Display for ResourceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Header values of one push notification, as received.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookNotification {
    pub channel_token: Option<String>,
    pub channel_id: Option<String>,
    pub resource_id: Option<String>,
    pub resource_state: Option<String>,
    pub resource_uri: Option<String>,
}

impl WebhookNotification {
    #[must_use]
    pub fn state(&self) -> ResourceState {
        ResourceState::parse(self.resource_state.as_deref().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_states() {
        assert_eq!(ResourceState::parse("sync"), ResourceState::Sync);
        assert_eq!(ResourceState::parse("EXISTS"), ResourceState::Exists);
        assert_eq!(ResourceState::parse("not_exists"), ResourceState::NotExists);
        assert_eq!(ResourceState::parse("moved"), ResourceState::Other("moved".into()));
    }

    #[test]
    fn missing_header_is_unknown_state() {
        let notification = WebhookNotification::default();
        assert_eq!(notification.state(), ResourceState::Other(String::new()));
    }
}

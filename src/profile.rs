//! Bot identity and start-up configuration.

use crate::error::BotError;

/// Identity, credentials, and join target for one bot instance.
///
/// Immutable during a run, except that the target channel is recorded by the
/// join step if it was not set up front. Cloning produces an independent
/// profile value; no connection state is ever shared between copies.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BotProfile {
    /// Bot account nickname.
    pub nick: String,
    /// OAuth token used as the connection password.
    pub token: String,
    /// Target channel, without the leading `#`. Required before start.
    pub channel: Option<String>,
    /// Message posted to the channel right after joining. Empty disables it.
    pub start_message: String,
}

impl BotProfile {
    /// Start message used when none is configured.
    pub const DEFAULT_START_MESSAGE: &'static str = "bot started.";

    /// Create a profile with no channel and the default start message.
    pub fn new(nick: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            nick: nick.into(),
            token: token.into(),
            channel: None,
            start_message: Self::DEFAULT_START_MESSAGE.to_string(),
        }
    }

    /// Set the target channel. A leading `#` is stripped.
    pub fn with_channel(mut self, channel: impl Into<String>) -> Self {
        let channel = channel.into();
        self.channel = Some(channel.trim_start_matches('#').to_string());
        self
    }

    /// Set the start-up message. An empty string disables it.
    pub fn with_start_message(mut self, message: impl Into<String>) -> Self {
        self.start_message = message.into();
        self
    }

    /// Check that nick, token, and channel are all non-empty, naming the
    /// first missing field.
    pub fn eligible(&self) -> Result<(), BotError> {
        if self.nick.is_empty() {
            return Err(BotError::Profile("nick"));
        }
        if self.token.is_empty() {
            return Err(BotError::Profile("token"));
        }
        match &self.channel {
            Some(channel) if !channel.is_empty() => Ok(()),
            _ => Err(BotError::Profile("channel")),
        }
    }

    /// Whether the profile can start a connection.
    pub fn is_eligible(&self) -> bool {
        self.eligible().is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complete_profile_is_eligible() {
        let profile = BotProfile::new("bot1", "oauth:xyz").with_channel("streamerA");
        assert!(profile.is_eligible());
    }

    #[test]
    fn test_missing_fields_are_named() {
        let no_channel = BotProfile::new("bot1", "oauth:xyz");
        assert!(matches!(no_channel.eligible(), Err(BotError::Profile("channel"))));

        let no_nick = BotProfile::new("", "oauth:xyz").with_channel("chan");
        assert!(matches!(no_nick.eligible(), Err(BotError::Profile("nick"))));

        let no_token = BotProfile::new("bot1", "").with_channel("chan");
        assert!(matches!(no_token.eligible(), Err(BotError::Profile("token"))));
    }

    #[test]
    fn test_empty_channel_is_ineligible() {
        let profile = BotProfile::new("bot1", "oauth:xyz").with_channel("");
        assert!(!profile.is_eligible());
    }

    #[test]
    fn test_channel_hash_is_stripped() {
        let profile = BotProfile::new("bot1", "oauth:xyz").with_channel("#streamerA");
        assert_eq!(profile.channel.as_deref(), Some("streamerA"));
    }

    #[test]
    fn test_default_start_message() {
        let profile = BotProfile::new("bot1", "oauth:xyz");
        assert_eq!(profile.start_message, "bot started.");
    }

    #[test]
    fn test_clone_is_independent() {
        let original = BotProfile::new("bot1", "oauth:xyz").with_channel("a");
        let mut copy = original.clone();
        copy.channel = Some("b".to_string());
        assert_eq!(original.channel.as_deref(), Some("a"));
    }
}

//! Configuration loading and validation.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use crate::bot::{DEFAULT_HOST, DEFAULT_PORT};
use crate::profile::BotProfile;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    /// The config file is not valid TOML or misses required keys.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    /// A required value is present but empty.
    #[error("invalid config: {0} must not be empty")]
    Empty(&'static str),
}

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Bot identity and join target.
    pub bot: BotConfig,
    /// Chat service endpoint. Defaults to the well-known service.
    #[serde(default)]
    pub server: ServerConfig,
}

/// Bot identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    /// Bot account nickname.
    pub nick: String,
    /// OAuth token used as the connection password.
    pub token: String,
    /// Target channel, with or without the leading `#`.
    pub channel: String,
    /// Message posted right after joining; empty disables it.
    #[serde(default = "default_start_message")]
    pub start_message: String,
}

/// Chat service endpoint configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Service hostname.
    #[serde(default = "default_host")]
    pub host: String,
    /// Service port.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_start_message() -> String {
    BotProfile::DEFAULT_START_MESSAGE.to_string()
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the required identity fields are non-empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bot.nick.is_empty() {
            return Err(ConfigError::Empty("bot.nick"));
        }
        if self.bot.token.is_empty() {
            return Err(ConfigError::Empty("bot.token"));
        }
        if self.bot.channel.is_empty() {
            return Err(ConfigError::Empty("bot.channel"));
        }
        if self.server.host.is_empty() {
            return Err(ConfigError::Empty("server.host"));
        }
        Ok(())
    }

    /// Build the bot profile described by this configuration.
    pub fn profile(&self) -> BotProfile {
        BotProfile::new(&self.bot.nick, &self.bot.token)
            .with_channel(&self.bot.channel)
            .with_start_message(&self.bot.start_message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            [bot]
            nick = "bot1"
            token = "oauth:xyz"
            channel = "streamerA"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.host, DEFAULT_HOST);
        assert_eq!(config.server.port, DEFAULT_PORT);
        assert_eq!(config.bot.start_message, "bot started.");
        config.validate().unwrap();
    }

    #[test]
    fn test_full_config() {
        let config: Config = toml::from_str(
            r##"
            [bot]
            nick = "bot1"
            token = "oauth:xyz"
            channel = "#streamerA"
            start_message = "hi"

            [server]
            host = "127.0.0.1"
            port = 16667
            "##,
        )
        .unwrap();

        assert_eq!(config.server.port, 16667);
        let profile = config.profile();
        assert_eq!(profile.channel.as_deref(), Some("streamerA"));
        assert_eq!(profile.start_message, "hi");
    }

    #[test]
    fn test_empty_token_rejected() {
        let config: Config = toml::from_str(
            r#"
            [bot]
            nick = "bot1"
            token = ""
            channel = "streamerA"
            "#,
        )
        .unwrap();

        assert!(matches!(
            config.validate(),
            Err(ConfigError::Empty("bot.token"))
        ));
    }

    #[test]
    fn test_missing_bot_table_fails_to_parse() {
        let result: Result<Config, _> = toml::from_str("[server]\nhost = \"h\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[bot]\nnick = \"bot1\"\ntoken = \"oauth:xyz\"\nchannel = \"streamerA\""
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.bot.nick, "bot1");
    }

    #[test]
    fn test_load_missing_file() {
        let result = Config::load("/nonexistent/tmibot.toml");
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}

//! Unified error handling for tmibot.

use thiserror::Error;
use tmi_proto::ProtocolError;

/// Errors surfaced by the bot's public operations.
#[derive(Debug, Error)]
pub enum BotError {
    /// The profile is missing a field required to start.
    #[error("profile not eligible to start: {0} is empty")]
    Profile(&'static str),

    /// `start` was called on a bot that already ran (or is running).
    /// Closed is terminal; construct a fresh bot to reconnect.
    #[error("bot already started")]
    AlreadyStarted,

    /// A write was attempted with no live connection.
    #[error("not connected")]
    NotConnected,

    /// The transport failed.
    #[error("connection error: {0}")]
    Connection(#[from] ProtocolError),
}

//! Outbound command construction and serialization.

use std::fmt;

/// An outbound protocol command.
///
/// Channel names are stored without the leading `#`; serialization adds it.
/// `Display` produces the wire form without the trailing CRLF, which the
/// line codec appends.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClientCommand {
    /// `PASS <secret>` - authentication token, sent before `NICK`.
    Pass(String),
    /// `NICK <nick>` - the bot identity.
    Nick(String),
    /// `JOIN #<channel>`
    Join(String),
    /// `PRIVMSG #<channel> :<text>`
    Privmsg {
        /// Target channel, without the leading `#`.
        channel: String,
        /// Message text.
        text: String,
    },
    /// `PONG <token>` - keep-alive reply echoing the `PING` token verbatim.
    Pong(String),
}

impl fmt::Display for ClientCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientCommand::Pass(secret) => write!(f, "PASS {secret}"),
            ClientCommand::Nick(nick) => write!(f, "NICK {nick}"),
            ClientCommand::Join(channel) => write!(f, "JOIN #{channel}"),
            ClientCommand::Privmsg { channel, text } => {
                write!(f, "PRIVMSG #{channel} :{text}")
            }
            ClientCommand::Pong(token) => write!(f, "PONG {token}"),
        }
    }
}

impl ClientCommand {
    /// Command name for logging, without parameters.
    ///
    /// `PASS` parameters are secrets; log this instead of the full line.
    pub fn name(&self) -> &'static str {
        match self {
            ClientCommand::Pass(_) => "PASS",
            ClientCommand::Nick(_) => "NICK",
            ClientCommand::Join(_) => "JOIN",
            ClientCommand::Privmsg { .. } => "PRIVMSG",
            ClientCommand::Pong(_) => "PONG",
        }
    }
}

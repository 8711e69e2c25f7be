//! Inbound line parsing.
//!
//! [`ServerEvent::parse`] is a total function: every line maps to an event,
//! and anything the bot does not act on becomes [`ServerEvent::Ignored`].
//! The read loop must never die because the service sent an unexpected or
//! truncated line.

/// One chat message received on the joined channel.
///
/// A snapshot owned by the receiver; it carries no reference back to the
/// connection that produced it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatMessage {
    /// Nickname of the user who sent the message.
    pub sender: String,
    /// Channel the message was posted to, without the leading `#`.
    pub channel: String,
    /// The message text.
    pub text: String,
}

/// A parsed inbound line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ServerEvent {
    /// Keep-alive request; the token must be echoed back in a `PONG`.
    Ping(String),
    /// A chat message on a channel.
    Chat(ChatMessage),
    /// Anything else: numerics, notices, malformed lines. Not actionable,
    /// not an error.
    Ignored,
}

impl ServerEvent {
    /// Parse one raw line (delimiter already stripped) into an event.
    ///
    /// Recognized forms, most specific first:
    ///
    /// - `PING <token>` - any line beginning with the literal `PING`
    /// - `:<sender>!<rest> PRIVMSG #<channel> :<text>`
    ///
    /// A PRIVMSG-shaped line missing the `!` in its prefix or the second `:`
    /// degrades to [`ServerEvent::Ignored`] rather than failing.
    pub fn parse(line: &str) -> Self {
        if line.starts_with("PING") {
            return match line.split(' ').nth(1) {
                Some(token) if !token.is_empty() => Self::Ping(token.to_string()),
                _ => Self::Ignored,
            };
        }

        let mut tokens = line.split(' ');
        let (prefix, command, target) = match (tokens.next(), tokens.next(), tokens.next()) {
            (Some(prefix), Some(command), Some(target)) => (prefix, command, target),
            _ => return Self::Ignored,
        };

        if command != "PRIVMSG" {
            return Self::Ignored;
        }

        // Sender sits between the leading ':' and the first '!' of the prefix.
        let sender = match prefix.strip_prefix(':').and_then(|p| p.split_once('!')) {
            Some((nick, _)) if !nick.is_empty() => nick,
            _ => return Self::Ignored,
        };

        // The text follows the second ':' of the whole line; the first one
        // belongs to the sender prefix.
        let text = match line[1..].find(':') {
            Some(idx) => &line[idx + 2..],
            None => return Self::Ignored,
        };

        Self::Chat(ChatMessage {
            sender: sender.to_string(),
            channel: target.trim_start_matches('#').to_string(),
            text: text.to_string(),
        })
    }
}

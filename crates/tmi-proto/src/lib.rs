//! # tmi-proto
//!
//! A Rust library for the Twitch Messaging Interface, the IRC dialect spoken
//! by `irc.chat.twitch.tv`. It covers the small command surface a chat bot
//! needs: PASS/NICK authentication, JOIN, PRIVMSG, and the PING/PONG
//! keep-alive, over CRLF-framed lines.
//!
//! ## Features
//!
//! - Total (never-failing) parsing of inbound lines into [`ServerEvent`]s
//! - Outbound command construction and wire serialization via [`ClientCommand`]
//! - A CRLF line codec with the 512-byte IRC line limit
//! - Tokio-based framed transport with independently owned read/write halves

#![deny(clippy::all)]
#![warn(missing_docs)]

//! ## Quick Start
//!
//! ### Serializing commands
//!
//! ```rust
//! use tmi_proto::ClientCommand;
//!
//! let join = ClientCommand::Join("streamerA".to_string());
//! assert_eq!(join.to_string(), "JOIN #streamerA");
//!
//! let msg = ClientCommand::Privmsg {
//!     channel: "streamerA".to_string(),
//!     text: "hi".to_string(),
//! };
//! assert_eq!(msg.to_string(), "PRIVMSG #streamerA :hi");
//! ```
//!
//! ### Parsing inbound lines
//!
//! ```rust
//! use tmi_proto::ServerEvent;
//!
//! match ServerEvent::parse(":alice!alice@host PRIVMSG #mychan :hello there") {
//!     ServerEvent::Chat(msg) => {
//!         assert_eq!(msg.sender, "alice");
//!         assert_eq!(msg.channel, "mychan");
//!         assert_eq!(msg.text, "hello there");
//!     }
//!     other => panic!("expected chat event, got {other:?}"),
//! }
//! ```

pub mod command;
pub mod error;
pub mod event;
#[cfg(feature = "tokio")]
pub mod line;
#[cfg(feature = "tokio")]
pub mod transport;

pub use self::command::ClientCommand;
pub use self::error::ProtocolError;
pub use self::event::{ChatMessage, ServerEvent};
#[cfg(feature = "tokio")]
pub use self::line::{LineCodec, MAX_LINE_LEN};
#[cfg(feature = "tokio")]
pub use self::transport::{Transport, TransportReader, TransportWriter};

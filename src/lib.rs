//! tmibot - a single-channel chat bot client for the Twitch Messaging
//! Interface.
//!
//! Connects one bot identity to the chat service, authenticates with
//! PASS/NICK, joins one channel, answers keep-alive pings, and fans received
//! chat messages out to registered observers. Outbound sends from any task
//! wait on a one-shot readiness gate so nothing hits the wire before the
//! handshake is written.
//!
//! ```no_run
//! use tmibot::{Bot, BotProfile};
//!
//! # async fn run() -> Result<(), tmibot::BotError> {
//! let profile = BotProfile::new("bot1", "oauth:xyz").with_channel("streamerA");
//! let bot = Bot::new(profile);
//! bot.subscribe(|msg| println!("<{}> {}", msg.sender, msg.text));
//! bot.start()?;
//! bot.send("hello chat").await?;
//! # Ok(())
//! # }
//! ```

pub mod bot;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod gate;
pub mod profile;

pub use self::bot::{Bot, ConnectionState, DEFAULT_HOST, DEFAULT_PORT};
pub use self::config::{Config, ConfigError};
pub use self::dispatch::{Dispatcher, ObserverId};
pub use self::error::BotError;
pub use self::profile::BotProfile;

pub use tmi_proto::{ChatMessage, ClientCommand, ServerEvent};

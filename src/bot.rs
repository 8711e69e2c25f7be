//! Connection lifecycle: handshake, join sequence, read loop, send path.
//!
//! Each [`Bot`] runs its protocol I/O on one dedicated tokio task:
//!
//! ```text
//! Connecting -> Authenticating -> AwaitingJoin -> Joined -> Closed
//!      |              |                                       ^
//!      |              +-- PASS/NICK written, gate opens       |
//!      +-- transport error at any point ---------------------+
//! ```
//!
//! The read loop owns the reading half of the transport. All writes - the
//! handshake, the join sequence, pong replies, and `send` calls from
//! arbitrary tasks - serialize through one async mutex around the writing
//! half, so separate lines never interleave on the wire.

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tokio::sync::{watch, Mutex as AsyncMutex};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, trace, warn};

use tmi_proto::{
    ChatMessage, ClientCommand, ServerEvent, Transport, TransportReader, TransportWriter,
};

use crate::dispatch::{Dispatcher, ObserverId};
use crate::error::BotError;
use crate::gate::ReadyGate;
use crate::profile::BotProfile;

/// Well-known chat service host.
pub const DEFAULT_HOST: &str = "irc.chat.twitch.tv";
/// Well-known chat service port.
pub const DEFAULT_PORT: u16 = 6667;

/// Current state of the connection lifecycle.
///
/// `NotStarted` is initial and `Closed` is terminal: there is no reconnect,
/// a fresh [`Bot`] is a fresh connection attempt.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConnectionState {
    /// Initial state, `start` not yet called.
    #[default]
    NotStarted,
    /// Opening the socket.
    Connecting,
    /// Socket open, writing credentials.
    Authenticating,
    /// Handshake written, join sequence in progress.
    AwaitingJoin,
    /// JOIN and start message written; the read loop is running.
    Joined,
    /// Socket closed or fatal error. Terminal.
    Closed,
}

struct Shared {
    profile: RwLock<BotProfile>,
    state: watch::Sender<ConnectionState>,
    last_error: Mutex<Option<BotError>>,
    gate: ReadyGate,
    dispatcher: Dispatcher,
    writer: AsyncMutex<Option<TransportWriter>>,
    shutdown: CancellationToken,
}

impl Shared {
    fn set_state(&self, state: ConnectionState) {
        self.state.send_replace(state);
    }

    fn state(&self) -> ConnectionState {
        *self.state.borrow()
    }

    /// Take and shut down the writer so later sends fail fast instead of
    /// writing into a dead stream.
    async fn close_writer(&self) {
        if let Some(mut writer) = self.writer.lock().await.take() {
            if let Err(e) = writer.shutdown().await {
                debug!(error = %e, "writer shutdown failed");
            }
        }
    }
}

/// A single-channel chat bot connection.
pub struct Bot {
    shared: Arc<Shared>,
    host: String,
    port: u16,
}

impl Bot {
    /// Create a bot targeting the well-known service endpoint.
    pub fn new(profile: BotProfile) -> Self {
        Self::with_address(profile, DEFAULT_HOST, DEFAULT_PORT)
    }

    /// Create a bot targeting a specific host and port.
    pub fn with_address(profile: BotProfile, host: impl Into<String>, port: u16) -> Self {
        let (state, _) = watch::channel(ConnectionState::NotStarted);
        Self {
            shared: Arc::new(Shared {
                profile: RwLock::new(profile),
                state,
                last_error: Mutex::new(None),
                gate: ReadyGate::new(),
                dispatcher: Dispatcher::new(),
                writer: AsyncMutex::new(None),
                shutdown: CancellationToken::new(),
            }),
            host: host.into(),
            port,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ConnectionState {
        self.shared.state()
    }

    /// Whether a connection attempt is in flight or established.
    pub fn is_running(&self) -> bool {
        !matches!(
            self.state(),
            ConnectionState::NotStarted | ConnectionState::Closed
        )
    }

    /// A copy of the profile, including a channel recorded at join time.
    pub fn profile(&self) -> BotProfile {
        self.shared.profile.read().clone()
    }

    /// Register a chat observer. Observers run synchronously on the read
    /// loop task, in registration order.
    pub fn subscribe(
        &self,
        observer: impl Fn(&ChatMessage) + Send + Sync + 'static,
    ) -> ObserverId {
        self.shared.dispatcher.subscribe(observer)
    }

    /// Remove a previously registered observer.
    pub fn unsubscribe(&self, id: ObserverId) -> bool {
        self.shared.dispatcher.unsubscribe(id)
    }

    /// Start the connection lifecycle on a dedicated background task.
    ///
    /// Returns without blocking once the task is spawned. An ineligible
    /// profile (empty nick, token, or channel) is rejected here, before any
    /// socket operation. Transport failures after this point are logged,
    /// close the connection, and are reported by
    /// [`Bot::wait_until_closed`].
    pub fn start(&self) -> Result<(), BotError> {
        self.shared.profile.read().eligible()?;

        // Single start per instance; Closed is terminal.
        let mut started = false;
        self.shared.state.send_if_modified(|state| {
            if *state == ConnectionState::NotStarted {
                *state = ConnectionState::Connecting;
                started = true;
                true
            } else {
                false
            }
        });
        if !started {
            return Err(BotError::AlreadyStarted);
        }

        let shared = Arc::clone(&self.shared);
        let host = self.host.clone();
        let port = self.port;
        tokio::spawn(async move {
            let result = run_session(&shared, &host, port).await;
            if let Err(e) = result {
                error!(error = %e, "connection ended with error");
                *shared.last_error.lock() = Some(e);
            } else {
                info!("connection closed");
            }
            // Tear the writer down before Closed becomes observable, so a
            // send racing the shutdown fails instead of writing into a dead
            // stream. Opening the gate last releases any parked sender; with
            // the writer gone they fail with NotConnected instead of hanging.
            shared.close_writer().await;
            shared.set_state(ConnectionState::Closed);
            shared.gate.open();
        });

        Ok(())
    }

    /// Stop the bot: transition to `Closed` and tear the transport down.
    ///
    /// Idempotent and safe to call from any task; the read loop observes the
    /// shutdown and exits cleanly.
    pub fn stop(&self) {
        self.shared.set_state(ConnectionState::Closed);
        self.shared.shutdown.cancel();
        // A bot stopped before it ever connected has no session task to
        // release gate waiters; open it here so pending sends fail fast.
        self.shared.gate.open();
    }

    /// Wait until the lifecycle reaches `Closed`, reporting the error that
    /// ended the run, if any.
    pub async fn wait_until_closed(&self) -> Result<(), BotError> {
        let mut rx = self.shared.state.subscribe();
        let _ = rx.wait_for(|state| *state == ConnectionState::Closed).await;
        match self.shared.last_error.lock().take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Send a chat message to the configured target channel.
    ///
    /// With no channel configured anywhere, the call is a no-op. Suspends
    /// until the handshake has been written; no message ever precedes
    /// PASS/NICK on the wire, no matter how early this is called.
    pub async fn send(&self, text: &str) -> Result<(), BotError> {
        let channel = self.shared.profile.read().channel.clone();
        match channel {
            Some(channel) => self.send_to(&channel, text).await,
            None => {
                debug!("send with no target channel; dropping message");
                Ok(())
            }
        }
    }

    /// Send a chat message to an explicit channel.
    pub async fn send_to(&self, channel: &str, text: &str) -> Result<(), BotError> {
        self.shared.gate.wait().await;
        write_command(
            &self.shared,
            ClientCommand::Privmsg {
                channel: channel.trim_start_matches('#').to_string(),
                text: text.to_string(),
            },
        )
        .await
    }
}

/// Write one command through the shared writer lock.
async fn write_command(shared: &Shared, command: ClientCommand) -> Result<(), BotError> {
    let mut guard = shared.writer.lock().await;
    let writer = guard.as_mut().ok_or(BotError::NotConnected)?;
    debug!(command = command.name(), "writing");
    writer.write_command(&command).await?;
    Ok(())
}

/// Connect, authenticate, join, then run the read loop to completion.
#[instrument(skip_all, fields(host = %host, port = port), name = "session")]
async fn run_session(shared: &Arc<Shared>, host: &str, port: u16) -> Result<(), BotError> {
    info!("connecting");
    let transport = Transport::connect(host, port).await?;
    let (mut reader, mut writer) = transport.into_split();

    // Handshake. The service sends no acknowledgment for PASS/NICK without
    // capability negotiation, so readiness is declared as soon as the
    // credentials are written.
    shared.set_state(ConnectionState::Authenticating);
    let (token, nick) = {
        let profile = shared.profile.read();
        (profile.token.clone(), profile.nick.clone())
    };
    writer.write_command(&ClientCommand::Pass(token)).await?;
    writer.write_command(&ClientCommand::Nick(nick.clone())).await?;
    info!(nick = %nick, "credentials sent");

    *shared.writer.lock().await = Some(writer);
    shared.gate.open();
    shared.set_state(ConnectionState::AwaitingJoin);

    // Join sequence. The start message goes through the ordinary gated send
    // path so it serializes with any early external sends.
    let (channel, start_message) = {
        let profile = shared.profile.read();
        (
            profile.channel.clone().unwrap_or_default(),
            profile.start_message.clone(),
        )
    };
    write_command(shared, ClientCommand::Join(channel.clone())).await?;
    {
        let mut profile = shared.profile.write();
        if profile.channel.is_none() {
            profile.channel = Some(channel.clone());
        }
    }
    if !start_message.is_empty() {
        shared.gate.wait().await;
        write_command(
            shared,
            ClientCommand::Privmsg {
                channel: channel.clone(),
                text: start_message,
            },
        )
        .await?;
    }
    shared.set_state(ConnectionState::Joined);
    info!(channel = %channel, "joined");

    read_loop(shared, &mut reader).await
}

/// Read lines until end-of-stream, error, or shutdown.
///
/// One line is handled completely - pong written, observers notified -
/// before the next is read, so events are processed strictly in arrival
/// order.
async fn read_loop(shared: &Arc<Shared>, reader: &mut TransportReader) -> Result<(), BotError> {
    loop {
        let next = tokio::select! {
            _ = shared.shutdown.cancelled() => {
                info!("shutdown requested");
                return Ok(());
            }
            next = reader.read_line() => next,
        };

        match next {
            Ok(Some(line)) => {
                debug!(raw = %line, "line received");
                match ServerEvent::parse(&line) {
                    ServerEvent::Ping(token) => {
                        // Answered inline so a slow observer cannot starve
                        // the keep-alive.
                        write_command(shared, ClientCommand::Pong(token)).await?;
                    }
                    ServerEvent::Chat(message) => {
                        shared.dispatcher.emit(&message);
                    }
                    ServerEvent::Ignored => {
                        trace!(raw = %line, "ignored line");
                    }
                }
            }
            Ok(None) => {
                info!("server closed the connection");
                return Ok(());
            }
            Err(e) => {
                warn!(error = %e, "read failed");
                return Err(e.into());
            }
        }
    }
}

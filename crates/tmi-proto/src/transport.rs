//! Framed line transport over TCP.
//!
//! [`Transport::connect`] opens the stream; [`Transport::into_split`] hands
//! out independently owned read and write halves so a read loop and
//! concurrent writers can run from different tasks.

use futures_util::{SinkExt, StreamExt};
use tokio::io::AsyncWriteExt;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio_util::codec::{FramedRead, FramedWrite};
use tracing::warn;

use crate::command::ClientCommand;
use crate::error::Result;
use crate::line::LineCodec;

/// A connected stream, not yet split into halves.
pub struct Transport {
    stream: TcpStream,
}

impl Transport {
    /// Open a TCP connection to the chat service.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ProtocolError::Io`] if the socket cannot be
    /// established.
    pub async fn connect(host: &str, port: u16) -> Result<Self> {
        let stream = TcpStream::connect((host, port)).await?;

        if let Err(e) = Self::enable_keepalive(&stream) {
            warn!("failed to enable TCP keepalive: {}", e);
        }

        Ok(Self { stream })
    }

    fn enable_keepalive(stream: &TcpStream) -> std::io::Result<()> {
        use socket2::{SockRef, TcpKeepalive};
        use std::time::Duration;

        let sock = SockRef::from(stream);
        let keepalive = TcpKeepalive::new()
            .with_time(Duration::from_secs(120))
            .with_interval(Duration::from_secs(30));

        sock.set_tcp_keepalive(&keepalive)?;
        Ok(())
    }

    /// Split into independently owned read and write halves.
    pub fn into_split(self) -> (TransportReader, TransportWriter) {
        let (read_half, write_half) = self.stream.into_split();
        (
            TransportReader {
                inner: FramedRead::new(read_half, LineCodec::new()),
            },
            TransportWriter {
                inner: FramedWrite::new(write_half, LineCodec::new()),
            },
        )
    }
}

/// The reading half of a [`Transport`].
pub struct TransportReader {
    inner: FramedRead<OwnedReadHalf, LineCodec>,
}

impl TransportReader {
    /// Read the next line, delimiter stripped.
    ///
    /// Returns `Ok(None)` when the remote end closes the stream; remote
    /// close is never an error.
    pub async fn read_line(&mut self) -> Result<Option<String>> {
        match self.inner.next().await {
            Some(Ok(line)) => Ok(Some(line)),
            Some(Err(e)) => Err(e),
            None => Ok(None),
        }
    }
}

/// The writing half of a [`Transport`].
///
/// Every write appends the line delimiter and flushes before returning;
/// nothing is buffered across calls.
pub struct TransportWriter {
    inner: FramedWrite<OwnedWriteHalf, LineCodec>,
}

impl TransportWriter {
    /// Write one line, appending the delimiter and flushing.
    pub async fn write_line(&mut self, line: &str) -> Result<()> {
        self.inner.send(line.to_string()).await
    }

    /// Serialize and write one command.
    pub async fn write_command(&mut self, command: &ClientCommand) -> Result<()> {
        self.write_line(&command.to_string()).await
    }

    /// Shut down the write side of the stream.
    pub async fn shutdown(&mut self) -> Result<()> {
        self.inner.get_mut().shutdown().await?;
        Ok(())
    }
}

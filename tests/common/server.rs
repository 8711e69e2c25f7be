//! Mock chat service.
//!
//! Accepts one connection at a time, records the lines the bot writes, and
//! injects inbound lines, so tests can assert on exact wire traffic.

use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::timeout;

const IO_TIMEOUT: Duration = Duration::from_secs(5);

/// An in-process chat service listening on a random loopback port.
pub struct MockServer {
    listener: TcpListener,
    addr: SocketAddr,
}

impl MockServer {
    /// Bind to a random port on the loopback interface.
    pub async fn bind() -> anyhow::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        Ok(Self { listener, addr })
    }

    /// Host string to hand to `Bot::with_address`.
    pub fn host(&self) -> String {
        self.addr.ip().to_string()
    }

    /// Port to hand to `Bot::with_address`.
    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    /// Accept the next client connection.
    pub async fn accept(&self) -> anyhow::Result<MockConnection> {
        let (stream, _) = timeout(IO_TIMEOUT, self.listener.accept()).await??;
        Ok(MockConnection::new(stream))
    }

    /// Assert that no client connects within the given window.
    pub async fn expect_no_connection(&self, window: Duration) -> bool {
        timeout(window, self.listener.accept()).await.is_err()
    }
}

/// One accepted client connection.
pub struct MockConnection {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
}

impl MockConnection {
    fn new(stream: TcpStream) -> Self {
        let (read_half, write_half) = stream.into_split();
        Self {
            reader: BufReader::new(read_half),
            writer: write_half,
        }
    }

    /// Receive one line, delimiter stripped. `None` on end-of-stream.
    pub async fn recv_line(&mut self) -> anyhow::Result<Option<String>> {
        let mut line = String::new();
        let n = timeout(IO_TIMEOUT, self.reader.read_line(&mut line)).await??;
        if n == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end().to_string()))
    }

    /// Receive exactly `count` lines, failing on early end-of-stream.
    pub async fn recv_lines(&mut self, count: usize) -> anyhow::Result<Vec<String>> {
        let mut lines = Vec::with_capacity(count);
        for _ in 0..count {
            match self.recv_line().await? {
                Some(line) => lines.push(line),
                None => anyhow::bail!("connection closed after {} lines", lines.len()),
            }
        }
        Ok(lines)
    }

    /// Send one line to the client, appending CRLF.
    pub async fn send_line(&mut self, line: &str) -> anyhow::Result<()> {
        self.writer.write_all(line.as_bytes()).await?;
        self.writer.write_all(b"\r\n").await?;
        self.writer.flush().await?;
        Ok(())
    }

    /// Close the connection.
    pub async fn shutdown(mut self) -> anyhow::Result<()> {
        self.writer.shutdown().await?;
        Ok(())
    }
}

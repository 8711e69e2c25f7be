//! One-shot readiness signal gating outbound writes.

use tokio::sync::watch;

/// A single-fire signal: once opened it never resets, and every waiter,
/// past or future, proceeds.
///
/// One gate exists per bot instance. `Closed` is terminal, so one instance
/// is one connection attempt and the gate is never reused.
#[derive(Debug)]
pub struct ReadyGate {
    tx: watch::Sender<bool>,
}

impl ReadyGate {
    /// Create a closed gate.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx }
    }

    /// Open the gate, releasing all current and future waiters. Idempotent.
    pub fn open(&self) {
        self.tx.send_replace(true);
    }

    /// Whether the gate has been opened.
    pub fn is_open(&self) -> bool {
        *self.tx.borrow()
    }

    /// Wait until the gate is open. Returns immediately if already open.
    pub async fn wait(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives as long as &self, so wait_for cannot fail.
        let _ = rx.wait_for(|open| *open).await;
    }
}

impl Default for ReadyGate {
    fn default() -> Self {
        Self::new()
    }
}

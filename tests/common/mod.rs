//! Shared helpers for integration tests.

pub mod server;

pub use server::{MockConnection, MockServer};

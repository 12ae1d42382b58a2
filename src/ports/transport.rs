//! Transport ports - Interfaces for the physical push connection.
//!
//! The connection manager owns policy (state, retries, cancellation); a
//! `Connector` only knows how to open one authenticated session, and a
//! `TransportSession` only knows how to read events from it.
//!
//! ```text
//! ConnectionManager ──connect()──► Connector ──► TransportSession
//!        ▲                                              │
//!        └────────────── next_event() ◄─────────────────┘
//! ```

use async_trait::async_trait;
use secrecy::SecretString;
use thiserror::Error;

use crate::domain::foundation::RealtimeEvent;

/// Errors raised by a transport.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// The server rejected the handshake credentials.
    #[error("authentication rejected: {0}")]
    Unauthorized(String),

    /// The connection could not be established.
    #[error("connection failed: {0}")]
    ConnectFailed(String),

    /// The connection dropped or a read/write failed.
    #[error("connection lost: {0}")]
    ConnectionLost(String),

    /// The request could not be built (bad URL, bad header value).
    #[error("invalid connection request: {0}")]
    InvalidRequest(String),
}

impl TransportError {
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, TransportError::Unauthorized(_))
    }
}

/// Everything needed to open one session.
#[derive(Debug, Clone)]
pub struct ConnectRequest {
    pub server_url: String,
    /// Carried as connection metadata, never as a message.
    pub auth_token: SecretString,
}

/// An open, authenticated push session.
#[async_trait]
pub trait TransportSession: Send {
    /// Waits for the next named event.
    ///
    /// Returns `None` on orderly close and `Some(Err)` when the connection
    /// fails. Malformed frames are skipped by the implementation.
    async fn next_event(&mut self) -> Option<Result<RealtimeEvent, TransportError>>;

    /// Sends a keep-alive.
    async fn send_heartbeat(&mut self) -> Result<(), TransportError>;

    /// Closes the session. Errors are swallowed; the session is gone either way.
    async fn close(&mut self);
}

/// Opens transport sessions.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self, request: &ConnectRequest)
        -> Result<Box<dyn TransportSession>, TransportError>;
}

//! Error types shared across the realtime core.

use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use thiserror::Error;

/// A status change the connection state machine does not allow.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot move from {from} to {to}")]
pub struct TransitionError {
    pub from: String,
    pub to: String,
}

impl TransitionError {
    pub fn new(from: impl fmt::Debug, to: impl fmt::Debug) -> Self {
        Self {
            from: format!("{:?}", from),
            to: format!("{:?}", to),
        }
    }
}

/// Failure categories reported by event handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// The payload lacked something the handler cannot default.
    MalformedPayload,
    /// Anything else; the registry logs it and moves on.
    HandlerFailed,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::MalformedPayload => "MALFORMED_PAYLOAD",
            ErrorCode::HandlerFailed => "HANDLER_FAILED",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned by an [`EventHandler`](crate::ports::EventHandler).
///
/// Never escapes the registry: it is logged with the handler name and the
/// remaining handlers still run.
#[derive(Debug, Clone)]
pub struct DomainError {
    pub code: ErrorCode,
    pub message: String,
    pub details: HashMap<String, String>,
}

impl DomainError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: HashMap::new(),
        }
    }

    /// The payload of `event` could not be interpreted.
    pub fn malformed(event: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorCode::MalformedPayload, message).with_detail("event", event.into())
    }

    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }

    /// Name of the event that failed, when recorded.
    pub fn event(&self) -> Option<&str> {
        self.details.get("event").map(String::as_str)
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.event() {
            Some(event) => write!(f, "[{}] {}: {}", self.code, event, self.message),
            None => write!(f, "[{}] {}", self.code, self.message),
        }
    }
}

impl Error for DomainError {}

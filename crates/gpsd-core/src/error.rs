//! Error types for gpsd-core
//!
//! `SessionError` is terminal: once recorded it ends the session and is
//! handed out (cloned) to every caller that asks. `DecodeError` is per-frame
//! and never escapes the receive loop.

use std::io;
use std::sync::Arc;

use thiserror::Error;

/// Terminal condition of a session
#[derive(Debug, Clone, Error)]
pub enum SessionError {
    /// Session was closed by the caller
    #[error("closed")]
    Closed,

    /// Read or write on the transport failed
    #[error("I/O error: {0}")]
    Io(#[source] Arc<io::Error>),

    /// Daemon closed the stream
    #[error("connection closed by daemon")]
    Eof,

    /// A frame grew past the configured limit without a newline
    #[error("frame exceeds {limit} bytes without a newline")]
    FrameTooLong { limit: usize },

    /// Builder was asked to start a session without a transport
    #[error("no transport supplied")]
    MissingTransport,
}

impl SessionError {
    /// True for the sentinel recorded by an explicit close
    pub fn is_closed(&self) -> bool {
        matches!(self, SessionError::Closed)
    }

    /// True when the session ended because of the transport rather than the caller
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            SessionError::Io(_) | SessionError::Eof | SessionError::FrameTooLong { .. }
        )
    }
}

impl From<io::Error> for SessionError {
    fn from(e: io::Error) -> Self {
        SessionError::Io(Arc::new(e))
    }
}

/// Per-frame decoding failure, recoverable
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Nothing left after stripping the line terminator
    #[error("empty frame")]
    EmptyFrame,

    /// Class tag not in the dispatch table
    #[error("unknown class {0:?}")]
    UnknownClass(String),

    /// Frame is not valid JSON for the tagged report
    #[error("malformed {class} report: {source}")]
    Json {
        class: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T, E = SessionError> = std::result::Result<T, E>;

//! Streaming client for the gpsd JSON protocol
//!
//! - `protocol` - frame classification, report decoding, WATCH encoding
//! - `session` - connection lifecycle, receive loop, command writes
//! - `logger` - pluggable diagnostics sink
//! - `error` - session and decode errors

pub mod error;
pub mod logger;
pub mod protocol;
pub mod session;

pub use error::{DecodeError, SessionError};
pub use logger::{Logger, NoopLogger, TracingLogger};
pub use protocol::{Report, WatchFlags};
pub use session::{
    Session, SessionBuilder, SessionConfig, SessionState, DEFAULT_ADDRESS, DEFAULT_CAPACITY,
    DEFAULT_MAX_FRAME_LEN,
};

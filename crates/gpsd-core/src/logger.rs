//! Session logger
//!
//! Sink for per-frame diagnostics emitted by the receive loop and the
//! writer path. Logging is best-effort: a disabled sink must be tolerated.

use std::fmt;

/// Pluggable sink for session diagnostics
pub trait Logger: Send + Sync {
    /// Recoverable problems (decode failures, malformed frames)
    fn error(&self, args: fmt::Arguments<'_>);

    /// Traffic tracing (RX/TX frames)
    fn debug(&self, args: fmt::Arguments<'_>);
}

/// Forwards to `tracing` under the `gpsd` target
///
/// Does nothing unless a subscriber is installed, which makes it a safe default.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn error(&self, args: fmt::Arguments<'_>) {
        tracing::error!(target: "gpsd", "{}", args);
    }

    fn debug(&self, args: fmt::Arguments<'_>) {
        tracing::debug!(target: "gpsd", "{}", args);
    }
}

/// Discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopLogger;

impl Logger for NoopLogger {
    fn error(&self, _args: fmt::Arguments<'_>) {}

    fn debug(&self, _args: fmt::Arguments<'_>) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct Recorder {
        lines: Mutex<Vec<String>>,
    }

    impl Logger for Recorder {
        fn error(&self, args: fmt::Arguments<'_>) {
            self.lines.lock().push(format!("E {}", args));
        }

        fn debug(&self, args: fmt::Arguments<'_>) {
            self.lines.lock().push(format!("D {}", args));
        }
    }

    #[test]
    fn test_logger_trait_object() {
        let recorder = Recorder::default();
        {
            let logger: &dyn Logger = &recorder;
            logger.debug(format_args!("RX {}", "frame"));
            logger.error(format_args!("bad {}", 1));
        }
        assert_eq!(*recorder.lines.lock(), vec!["D RX frame", "E bad 1"]);
    }

    #[test]
    fn test_noop_and_tracing_do_not_panic() {
        NoopLogger.error(format_args!("x"));
        NoopLogger.debug(format_args!("x"));
        TracingLogger.error(format_args!("x"));
        TracingLogger.debug(format_args!("x"));
    }
}

//! Terminal signal for a session
//!
//! Records the first fatal condition and fires a one-shot broadcast. The
//! error slot and the token are updated under one lock so concurrent closers
//! race on a single compare-and-set; losers are no-ops.

use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use tokio_util::sync::{CancellationToken, WaitForCancellationFuture};

use crate::error::SessionError;

/// Close-once state shared by the session handle and the receive loop
#[derive(Default)]
pub(crate) struct Terminal {
    token: CancellationToken,
    error: Mutex<Option<SessionError>>,
    drained: AtomicBool,
}

impl Terminal {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Record `err` and fire the signal. Returns false when already fired.
    pub(crate) fn trigger(&self, err: SessionError) -> bool {
        let mut slot = self.error.lock();
        if self.token.is_cancelled() {
            return false;
        }
        *slot = Some(err);
        self.token.cancel();
        true
    }

    pub(crate) fn is_fired(&self) -> bool {
        self.token.is_cancelled()
    }

    /// The recorded error, `None` while the signal has not fired
    pub(crate) fn error(&self) -> Option<SessionError> {
        self.error.lock().clone()
    }

    /// Resolves once the signal has fired
    pub(crate) fn fired(&self) -> WaitForCancellationFuture<'_> {
        self.token.cancelled()
    }

    /// Called by the receive loop right before it drops the delivery sender
    pub(crate) fn mark_drained(&self) {
        self.drained.store(true, Ordering::Release);
    }

    pub(crate) fn is_drained(&self) -> bool {
        self.drained.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_first_trigger_wins() {
        let terminal = Terminal::new();
        assert!(!terminal.is_fired());
        assert!(terminal.error().is_none());

        assert!(terminal.trigger(SessionError::Eof));
        assert!(!terminal.trigger(SessionError::Closed));

        assert!(terminal.is_fired());
        assert!(matches!(terminal.error(), Some(SessionError::Eof)));
    }

    #[test]
    fn test_concurrent_triggers_single_winner() {
        let terminal = Arc::new(Terminal::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let terminal = terminal.clone();
                std::thread::spawn(move || {
                    let err = if i % 2 == 0 {
                        SessionError::Closed
                    } else {
                        SessionError::Eof
                    };
                    terminal.trigger(err)
                })
            })
            .collect();

        let winners = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|won| *won)
            .count();
        assert_eq!(winners, 1);
        assert!(terminal.error().is_some());
    }

    #[tokio::test]
    async fn test_fired_resolves() {
        let terminal = Arc::new(Terminal::new());
        let waiter = {
            let terminal = terminal.clone();
            tokio::spawn(async move { terminal.fired().await })
        };
        terminal.trigger(SessionError::Closed);
        waiter.await.unwrap();
    }
}

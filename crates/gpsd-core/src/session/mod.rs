//! gpsd connection session
//!
//! Owns one connection to the daemon. A spawned receive loop reads frames,
//! classifies and decodes them and publishes reports on a bounded channel.
//! Any task may write commands through `send`; writes are serialized by a
//! lock. The session ends exactly once, on the first of: read error, write
//! error, explicit close. The delivery channel closes after that, as the
//! receive loop's last act.

mod terminal;
mod transport;

use std::sync::Arc;

use bytes::Bytes;
use tokio::net::{TcpStream, ToSocketAddrs};
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, info};

use crate::error::{DecodeError, Result, SessionError};
use crate::logger::{Logger, TracingLogger};
use crate::protocol::{self, Report, WatchFlags};
use terminal::Terminal;
use transport::{BoxedReader, BoxedWriter, FrameReader, FrameWriter};

/// Address gpsd listens on by default
pub const DEFAULT_ADDRESS: &str = "127.0.0.1:2947";

/// Reports buffered between the receive loop and the consumer
pub const DEFAULT_CAPACITY: usize = 1;

/// Longest frame accepted before the session fails
pub const DEFAULT_MAX_FRAME_LEN: usize = 64 * 1024;

/// Tunables for a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Delivery channel capacity (at least 1)
    pub capacity: usize,
    /// Maximum frame length, terminator excluded
    pub max_frame_len: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            max_frame_len: DEFAULT_MAX_FRAME_LEN,
        }
    }
}

/// Lifecycle of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Open,
    /// Terminal signal fired, receive loop still winding down
    Closing,
    /// Delivery channel closed
    Closed,
}

/// Builds a [`Session`] from a transport and options
pub struct SessionBuilder {
    config: SessionConfig,
    logger: Arc<dyn Logger>,
    transport: Option<(BoxedReader, BoxedWriter)>,
}

impl Default for SessionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionBuilder {
    pub fn new() -> Self {
        Self {
            config: SessionConfig::default(),
            logger: Arc::new(TracingLogger),
            transport: None,
        }
    }

    pub fn config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    /// Delivery channel capacity, clamped to at least 1
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.config.capacity = capacity;
        self
    }

    pub fn max_frame_len(mut self, max_frame_len: usize) -> Self {
        self.config.max_frame_len = max_frame_len;
        self
    }

    pub fn logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    /// Use an already connected duplex stream
    pub fn transport<T>(mut self, io: T) -> Self
    where
        T: tokio::io::AsyncRead + tokio::io::AsyncWrite + Send + 'static,
    {
        self.transport = Some(transport::split(io));
        self
    }

    /// Use a connected TCP stream
    pub fn tcp(mut self, stream: TcpStream) -> Self {
        let (reader, writer) = stream.into_split();
        self.transport = Some((Box::new(reader), Box::new(writer)));
        self
    }

    /// Dial `addr` over TCP and start the session
    pub async fn connect<A: ToSocketAddrs>(self, addr: A) -> Result<Session> {
        let stream = TcpStream::connect(addr).await?;
        if let Ok(peer) = stream.peer_addr() {
            info!("Connected to gpsd at {}", peer);
        }
        self.tcp(stream).build()
    }

    /// Start the session
    ///
    /// Spawns the receive loop, so this must run inside a Tokio runtime.
    pub fn build(self) -> Result<Session> {
        let (reader, writer) = self.transport.ok_or(SessionError::MissingTransport)?;
        let capacity = self.config.capacity.max(1);
        let (tx, rx) = mpsc::channel(capacity);

        let shared = Arc::new(Shared {
            terminal: Terminal::new(),
            writer: Mutex::new(FrameWriter::new(writer)),
            logger: self.logger,
        });

        let frames = FrameReader::new(reader, self.config.max_frame_len);
        tokio::spawn(receive_loop(shared.clone(), frames, tx));
        debug!(
            "gpsd session started (capacity={}, max_frame_len={})",
            capacity, self.config.max_frame_len
        );

        Ok(Session {
            inner: Arc::new(Inner {
                shared,
                reports: Mutex::new(rx),
            }),
        })
    }
}

/// Handle to a running session, cheap to clone
///
/// Dropping the last handle closes the session.
#[derive(Clone)]
pub struct Session {
    inner: Arc<Inner>,
}

struct Inner {
    shared: Arc<Shared>,
    reports: Mutex<mpsc::Receiver<Report>>,
}

impl Drop for Inner {
    fn drop(&mut self) {
        if self.shared.terminal.trigger(SessionError::Closed) {
            debug!("gpsd session dropped");
        }
    }
}

/// State shared with the receive loop
struct Shared {
    terminal: Terminal,
    writer: Mutex<FrameWriter>,
    logger: Arc<dyn Logger>,
}

impl Session {
    pub fn builder() -> SessionBuilder {
        SessionBuilder::new()
    }

    /// Start a session over `io` with default options
    pub fn new<T>(io: T) -> Result<Self>
    where
        T: tokio::io::AsyncRead + tokio::io::AsyncWrite + Send + 'static,
    {
        SessionBuilder::new().transport(io).build()
    }

    /// Dial gpsd with default options
    pub async fn connect<A: ToSocketAddrs>(addr: A) -> Result<Self> {
        SessionBuilder::new().connect(addr).await
    }

    /// Next report, `None` once the session has ended and the channel is drained
    ///
    /// Check [`Session::err`] after `None` to learn why the stream ended.
    pub async fn recv(&self) -> Option<Report> {
        self.inner.reports.lock().await.recv().await
    }

    /// Write raw bytes to the daemon
    ///
    /// Each call's bytes reach the wire contiguously. Fails with the terminal
    /// error once the session is closing; a write failure closes the session.
    /// Do not send serialized reports here, commands have their own grammar.
    pub async fn send(&self, bytes: &[u8]) -> Result<()> {
        let shared = &self.inner.shared;
        let mut writer = shared.writer.lock().await;

        if let Some(err) = shared.terminal.error() {
            return Err(err);
        }

        let written = tokio::select! {
            biased;
            _ = shared.terminal.fired() => None,
            result = writer.write_frame(bytes) => Some(result),
        };

        match written {
            Some(Ok(())) => {
                shared
                    .logger
                    .debug(format_args!("TX {}", String::from_utf8_lossy(bytes)));
                Ok(())
            }
            Some(Err(e)) => {
                let err = SessionError::from(e);
                if shared.terminal.trigger(err.clone()) {
                    debug!("gpsd session closed on write error: {}", err);
                    let _ = writer.shutdown().await;
                }
                Err(err)
            }
            None => Err(shared.terminal.error().unwrap_or(SessionError::Closed)),
        }
    }

    /// Change the watch policy
    ///
    /// `device` is only sent with [`WatchFlags::DEVICE`] in the enabling form.
    pub async fn stream(&self, flags: WatchFlags, device: &str) -> Result<()> {
        let command = protocol::encode_watch(flags, device);
        self.send(command.as_bytes()).await
    }

    /// Close the session
    ///
    /// Records [`SessionError::Closed`] unless the session already ended, in
    /// which case this is a no-op.
    pub async fn close(&self) -> Result<()> {
        self.close_with_error(SessionError::Closed).await
    }

    /// Close the session recording `err`; no-op if it already ended
    pub async fn close_with_error(&self, err: SessionError) -> Result<()> {
        let shared = &self.inner.shared;
        if !shared.terminal.trigger(err) {
            return Ok(());
        }
        info!("gpsd session closed by caller");
        shared
            .writer
            .lock()
            .await
            .shutdown()
            .await
            .map_err(SessionError::from)
    }

    /// Why the session ended, `None` while it is open
    pub fn err(&self) -> Option<SessionError> {
        self.inner.shared.terminal.error()
    }

    pub fn state(&self) -> SessionState {
        let terminal = &self.inner.shared.terminal;
        if terminal.is_drained() {
            SessionState::Closed
        } else if terminal.is_fired() {
            SessionState::Closing
        } else {
            SessionState::Open
        }
    }

    /// Resolves when the session starts closing
    pub async fn closed(&self) {
        self.inner.shared.terminal.fired().await
    }
}

impl Shared {
    /// Turn a frame into a report, `None` when it must be dropped
    fn dispatch(&self, frame: &[u8]) -> Option<Report> {
        if frame.is_empty() {
            self.logger
                .error(format_args!("malformed frame: {}", DecodeError::EmptyFrame));
            return None;
        }

        if !protocol::is_json(frame) {
            self.logger
                .debug(format_args!("RX [RAW] {} bytes", frame.len()));
            return Some(Report::Raw(Bytes::copy_from_slice(frame)));
        }

        self.logger
            .debug(format_args!("RX {}", String::from_utf8_lossy(frame)));
        match protocol::decode(protocol::class(frame), frame) {
            Ok(report) => Some(report),
            Err(e) => {
                self.logger.error(format_args!("decode error: {}", e));
                None
            }
        }
    }

    /// Record a receive-side failure and close the transport
    async fn fail(&self, err: SessionError) {
        if !self.terminal.trigger(err.clone()) {
            return;
        }
        debug!("gpsd session closed on read error: {}", err);
        let _ = self.writer.lock().await.shutdown().await;
    }
}

async fn receive_loop(shared: Arc<Shared>, mut frames: FrameReader, tx: mpsc::Sender<Report>) {
    loop {
        let next = tokio::select! {
            biased;
            _ = shared.terminal.fired() => break,
            next = frames.next_frame() => next,
        };

        let report = match next {
            Ok(frame) => match shared.dispatch(frame) {
                Some(report) => report,
                None => continue,
            },
            Err(err) => {
                shared.fail(err).await;
                break;
            }
        };

        tokio::select! {
            biased;
            _ = shared.terminal.fired() => break,
            sent = tx.send(report) => {
                if sent.is_err() {
                    // every handle is gone
                    shared.terminal.trigger(SessionError::Closed);
                    break;
                }
            }
        }
    }

    drop(tx);
    shared.terminal.mark_drained();
}

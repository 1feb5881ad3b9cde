//! Session transport - newline framed byte stream
//!
//! The read half is owned by the receive loop; the write half sits behind the
//! session's write lock.

use std::io;

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use crate::error::SessionError;

pub(crate) type BoxedReader = Box<dyn AsyncRead + Send + Unpin>;
pub(crate) type BoxedWriter = Box<dyn AsyncWrite + Send + Unpin>;

/// Split any duplex stream into boxed halves
pub(crate) fn split<T>(io: T) -> (BoxedReader, BoxedWriter)
where
    T: AsyncRead + AsyncWrite + Send + 'static,
{
    let (reader, writer) = tokio::io::split(io);
    (Box::new(reader), Box::new(writer))
}

/// Reads one line-delimited frame at a time
pub(crate) struct FrameReader {
    inner: BufReader<BoxedReader>,
    max_frame_len: usize,
    buf: Vec<u8>,
}

impl FrameReader {
    pub(crate) fn new(reader: BoxedReader, max_frame_len: usize) -> Self {
        Self {
            inner: BufReader::new(reader),
            max_frame_len,
            buf: Vec::new(),
        }
    }

    /// Read the next frame with its `\n` (and a preceding `\r`) stripped
    ///
    /// A line cut short by end of stream is dropped and reported as `Eof`.
    pub(crate) async fn next_frame(&mut self) -> Result<&[u8], SessionError> {
        self.buf.clear();

        // room for the payload plus "\r\n"
        let limit = self.max_frame_len as u64 + 2;
        let n = (&mut self.inner)
            .take(limit)
            .read_until(b'\n', &mut self.buf)
            .await?;

        if n == 0 {
            return Err(SessionError::Eof);
        }

        if self.buf.last() != Some(&b'\n') {
            if n as u64 >= limit {
                return Err(SessionError::FrameTooLong {
                    limit: self.max_frame_len,
                });
            }
            return Err(SessionError::Eof);
        }

        self.buf.pop();
        if self.buf.last() == Some(&b'\r') {
            self.buf.pop();
        }

        if self.buf.len() > self.max_frame_len {
            return Err(SessionError::FrameTooLong {
                limit: self.max_frame_len,
            });
        }

        Ok(&self.buf)
    }
}

/// Write half of the transport
pub(crate) struct FrameWriter {
    inner: BoxedWriter,
}

impl FrameWriter {
    pub(crate) fn new(writer: BoxedWriter) -> Self {
        Self { inner: writer }
    }

    /// Write the whole buffer and flush it
    pub(crate) async fn write_frame(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.inner.write_all(bytes).await?;
        self.inner.flush().await?;
        Ok(())
    }

    pub(crate) async fn shutdown(&mut self) -> io::Result<()> {
        self.inner.shutdown().await
    }
}

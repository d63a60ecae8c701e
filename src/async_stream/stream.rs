//! Async stream adapter for chunk splitting.
//!
//! This module provides asynchronous splitting using the
//! `futures-io::AsyncRead` trait, making it runtime-agnostic and compatible
//! with tokio, async-std, smol, and other async runtimes.
//!
//! # Example
//!
//! ```ignore
//! use futures_util::StreamExt;
//! use splitrs::{split_async, SplitConfig};
//! use futures_io::AsyncRead;
//!
//! async fn demo<R: AsyncRead + Unpin>(reader: R) -> Result<(), splitrs::SplitError> {
//!     let mut stream = split_async(reader, &b"\r\n"[..], SplitConfig::default())?;
//!
//!     while let Some(chunk) = stream.next().await {
//!         let chunk = chunk?;
//!         println!("record: {} bytes", chunk.len());
//!     }
//!     Ok(())
//! }
//! ```

use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::{Buf, Bytes, BytesMut};
use futures_core::Stream;
use futures_io::AsyncRead;
use memchr::memmem;
use pin_project_lite::pin_project;

use crate::chunk::Chunk;
use crate::config::SplitConfig;
use crate::error::SplitError;

pin_project! {
    /// A stream that yields delimiter-bounded chunks from an async reader.
    ///
    /// This uses `futures_io::AsyncRead`, which is runtime-agnostic. The key
    /// is fixed for the stream's lifetime; boundary semantics match the
    /// synchronous [`ChunkReader`](crate::ChunkReader): chunks end at key
    /// occurrences (keys straddling two underlying reads included), the key
    /// is consumed but never yielded, and a final keyless remainder is
    /// yielded as an incomplete chunk.
    ///
    /// Whole chunks are buffered in memory; chunk size is bounded only by
    /// where the key occurs.
    ///
    /// # Example
    ///
    /// ```ignore
    /// use splitrs::{split_async, SplitConfig};
    /// use futures_util::StreamExt;
    ///
    /// async fn example(data: &[u8]) -> Result<(), splitrs::SplitError> {
    ///     let mut stream = split_async(data, &b"\n"[..], SplitConfig::default())?;
    ///
    ///     while let Some(chunk) = stream.next().await {
    ///         let chunk = chunk?;
    ///         println!("line: {} bytes", chunk.len());
    ///     }
    ///     Ok(())
    /// }
    /// ```
    pub struct SplitStream<R> {
        #[pin]
        reader: R,
        key: Bytes,
        lookahead: BytesMut,
        chunk: Vec<u8>,
        scratch: Vec<u8>,
        offset: u64,
        source_done: bool,
        finished: bool,
    }
}

impl<R> SplitStream<R> {
    /// Creates a new split stream from an async reader.
    ///
    /// # Arguments
    ///
    /// * `reader` - An async reader implementing `AsyncRead`
    /// * `key` - The chunk key; copied in, must be non-empty
    /// * `config` - Lookahead sizing, see [`SplitConfig`]
    ///
    /// # Errors
    ///
    /// Returns [`SplitError::InvalidKey`] if `key` is empty.
    pub fn new(reader: R, key: &[u8], config: SplitConfig) -> Result<Self, SplitError> {
        if key.is_empty() {
            return Err(SplitError::InvalidKey);
        }
        Ok(Self {
            reader,
            key: Bytes::copy_from_slice(key),
            lookahead: BytesMut::with_capacity(config.lookahead() + key.len()),
            chunk: Vec::new(),
            scratch: vec![0u8; config.lookahead()],
            offset: 0,
            source_done: false,
            finished: false,
        })
    }
}

impl<R: AsyncRead + Unpin> Stream for SplitStream<R> {
    type Item = Result<Chunk, SplitError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        if *this.finished {
            return Poll::Ready(None);
        }

        loop {
            // A key anywhere in the lookahead closes the pending chunk.
            if let Some(pos) = memmem::find(this.lookahead, this.key) {
                this.chunk.extend_from_slice(&this.lookahead[..pos]);
                this.lookahead.advance(pos + this.key.len());

                let data = Bytes::from(std::mem::take(this.chunk));
                let chunk = Chunk::with_offset(data, *this.offset);
                *this.offset += (chunk.len() + this.key.len()) as u64;
                return Poll::Ready(Some(Ok(chunk)));
            }

            // No match: everything except the last key-length of bytes can
            // no longer start an occurrence and moves to the pending chunk.
            if this.lookahead.len() > this.key.len() {
                let safe = this.lookahead.len() - this.key.len();
                this.chunk.extend_from_slice(&this.lookahead[..safe]);
                this.lookahead.advance(safe);
            }

            if *this.source_done {
                // Keyless remainder: the final, incomplete chunk.
                this.chunk.extend_from_slice(this.lookahead);
                this.lookahead.clear();
                *this.finished = true;
                if this.chunk.is_empty() {
                    return Poll::Ready(None);
                }
                let data = Bytes::from(std::mem::take(this.chunk));
                let chunk = Chunk::with_offset(data, *this.offset).truncated();
                return Poll::Ready(Some(Ok(chunk)));
            }

            match this.reader.as_mut().poll_read(cx, this.scratch.as_mut_slice()) {
                Poll::Pending => return Poll::Pending,
                Poll::Ready(Err(e)) => {
                    *this.finished = true;
                    return Poll::Ready(Some(Err(SplitError::Io(e))));
                }
                Poll::Ready(Ok(0)) => *this.source_done = true,
                Poll::Ready(Ok(n)) => this.lookahead.extend_from_slice(&this.scratch[..n]),
            }
        }
    }
}

/// Creates a chunk stream from an async reader.
///
/// Uses `futures_io::AsyncRead` for runtime-agnostic async I/O. This works
/// with any async runtime (tokio, async-std, smol, etc.).
///
/// # Runtime Compatibility
///
/// For tokio users, you can use `tokio_util::compat` to convert
/// `tokio::io::AsyncRead` to `futures_io::AsyncRead`:
///
/// ```ignore
/// use tokio_util::compat::TokioAsyncReadCompatExt;
/// use splitrs::{split_async, SplitConfig};
///
/// let tokio_reader = tokio::fs::File::open("records.log").await?;
/// let stream = split_async(tokio_reader.compat(), &b"\n"[..], SplitConfig::default())?;
/// ```
///
/// # Arguments
///
/// * `reader` - An async reader implementing `AsyncRead`
/// * `key` - The chunk key; copied in, must be non-empty
/// * `config` - Lookahead sizing, see [`SplitConfig`]
///
/// # Errors
///
/// Returns [`SplitError::InvalidKey`] if `key` is empty.
pub fn split_async<R: AsyncRead>(
    reader: R,
    key: &[u8],
    config: SplitConfig,
) -> Result<SplitStream<R>, SplitError> {
    SplitStream::new(reader, key, config)
}

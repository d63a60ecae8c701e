//! The core delimiter-scanning reader.
//!
//! [`ChunkReader`] wraps a [`std::io::Read`] source and serves bytes up to
//! (but not including) the active key. Bytes are pulled into a lookahead
//! buffer and searched for the key across fill boundaries, so a key that
//! straddles two underlying reads is still found. Bytes whose suffix could
//! still be the start of a key are held back until the question is settled.

use std::io::{self, Read};

use bytes::{Buf, Bytes, BytesMut};
use memchr::memmem;

use crate::chunk::ChunkEnd;
use crate::config::SplitConfig;
use crate::error::SplitError;

use super::Chunks;

/// Constructs the error returned for a truncated chunk.
fn truncation() -> io::Error {
    io::Error::new(io::ErrorKind::UnexpectedEof, SplitError::Truncated)
}

/// A reader that ends each chunk of its source at a caller-defined byte key.
///
/// `ChunkReader` implements [`Read`], so it can be handed to anything that
/// consumes a plain reader. While a key is set, reads return the bytes of
/// the current chunk and then signal end-of-stream (`Ok(0)`) once the key is
/// reached; the key itself is consumed but never returned. Calling
/// [`reset`](ChunkReader::reset) makes the remainder of the source readable
/// as the next chunk, with the same key, a different one, or none at all.
///
/// If the source ends before the key appears, the remaining bytes are still
/// delivered and the read that finds nothing left fails with
/// [`io::ErrorKind::UnexpectedEof`]. With no key set the reader passes
/// through to the source unchanged, after draining any bytes already
/// buffered by an earlier scan.
///
/// Terminal conditions are sticky: after a chunk ends, further reads keep
/// reporting the same condition until `reset` is called. The current
/// condition is also available via [`chunk_end`](ChunkReader::chunk_end).
///
/// # Example
///
/// ```
/// use std::io::{Cursor, Read};
/// use splitrs::ChunkReader;
///
/// let source = Cursor::new(&b"one;two"[..]);
/// let mut reader = ChunkReader::new(source);
/// reader.set_key(b";")?;
///
/// let mut chunk = String::new();
/// reader.read_to_string(&mut chunk)?;
/// assert_eq!(chunk, "one");
///
/// reader.reset();
/// let mut rest = String::new();
/// reader.read_to_string(&mut rest)?;
/// assert_eq!(rest, "two");
/// # Ok::<(), splitrs::SplitError>(())
/// ```
#[derive(Debug)]
pub struct ChunkReader<R> {
    source: R,
    key: Option<Bytes>,
    lookahead: BytesMut,
    config: SplitConfig,
    target: usize,
    scanned: usize,
    found: bool,
    state: Option<ChunkEnd>,
    source_done: bool,
    source_err: Option<io::Error>,
}

impl<R: Read> ChunkReader<R> {
    /// Creates a new chunk reader bound to `source`, with the default
    /// configuration and no key set.
    ///
    /// # Example
    ///
    /// ```
    /// use std::io::Cursor;
    /// use splitrs::ChunkReader;
    ///
    /// let reader = ChunkReader::new(Cursor::new(&b"data"[..]));
    /// assert!(reader.key().is_none());
    /// ```
    pub fn new(source: R) -> Self {
        Self::with_config(source, SplitConfig::default())
    }

    /// Creates a new chunk reader with an explicit configuration.
    ///
    /// # Arguments
    ///
    /// * `source` - The underlying reader; the binding lasts for the
    ///   reader's whole lifetime
    /// * `config` - Lookahead sizing, see [`SplitConfig`]
    pub fn with_config(source: R, config: SplitConfig) -> Self {
        Self {
            source,
            key: None,
            lookahead: BytesMut::new(),
            config,
            target: 0,
            scanned: 0,
            found: false,
            state: None,
            source_done: false,
            source_err: None,
        }
    }

    /// Sets the key that ends the current and subsequent chunks.
    ///
    /// The key bytes are copied in. The lookahead buffer grows to hold the
    /// configured margin plus the key length; it never shrinks. Changing the
    /// key mid-chunk is permitted and takes effect on the next read; it does
    /// not discard buffered bytes or clear a terminal condition (that is
    /// [`reset`](ChunkReader::reset)'s job).
    ///
    /// # Errors
    ///
    /// Returns [`SplitError::InvalidKey`] if `key` is empty. Use
    /// [`clear_key`](ChunkReader::clear_key) to disable scanning.
    ///
    /// # Example
    ///
    /// ```
    /// use std::io::Cursor;
    /// use splitrs::ChunkReader;
    ///
    /// let mut reader = ChunkReader::new(Cursor::new(&b"data"[..]));
    /// reader.set_key(b"\r\n")?;
    /// assert_eq!(reader.key(), Some(&b"\r\n"[..]));
    ///
    /// assert!(reader.set_key(b"").is_err());
    /// # Ok::<(), splitrs::SplitError>(())
    /// ```
    pub fn set_key(&mut self, key: &[u8]) -> Result<(), SplitError> {
        if key.is_empty() {
            return Err(SplitError::InvalidKey);
        }
        self.key = Some(Bytes::copy_from_slice(key));
        self.target = self.config.lookahead() + key.len();
        if self.lookahead.capacity() < self.target {
            self.lookahead.reserve(self.target - self.lookahead.len());
        }
        self.scanned = 0;
        Ok(())
    }

    /// Disables key scanning.
    ///
    /// Subsequent reads drain any bytes already buffered by an earlier scan
    /// in order, then pass through to the underlying source unchanged.
    pub fn clear_key(&mut self) {
        self.key = None;
    }

    /// Returns the currently active key, or `None` in pass-through mode.
    pub fn key(&self) -> Option<&[u8]> {
        self.key.as_deref()
    }

    /// Returns the terminal condition of the current chunk, or `None` while
    /// the chunk is still open.
    pub fn chunk_end(&self) -> Option<ChunkEnd> {
        self.state
    }

    /// Puts the reader back into a readable state for the next chunk.
    ///
    /// Clears the terminal condition and per-chunk scan state. The key, the
    /// source binding, and any bytes already buffered past the previous
    /// chunk's key are preserved; those bytes belong to the next chunk. If
    /// nothing is buffered and the source has already ended, the next chunk
    /// is empty and immediately truncated.
    ///
    /// # Example
    ///
    /// ```
    /// use std::io::{Cursor, Read};
    /// use splitrs::{ChunkEnd, ChunkReader};
    ///
    /// let mut reader = ChunkReader::new(Cursor::new(&b"a|b"[..]));
    /// reader.set_key(b"|")?;
    /// std::io::copy(&mut reader, &mut std::io::sink())?;
    /// assert_eq!(reader.chunk_end(), Some(ChunkEnd::Delimiter));
    ///
    /// reader.reset();
    /// assert_eq!(reader.chunk_end(), None);
    /// # Ok::<(), splitrs::SplitError>(())
    /// ```
    pub fn reset(&mut self) {
        if self.lookahead.is_empty() && self.source_done {
            self.state = Some(ChunkEnd::Truncated);
        } else {
            self.state = None;
        }
        self.scanned = 0;
        self.found = false;
    }

    /// Returns a reference to the underlying source.
    pub fn get_ref(&self) -> &R {
        &self.source
    }

    /// Returns a mutable reference to the underlying source.
    ///
    /// Reading from the source directly bypasses the lookahead buffer and
    /// will confuse chunk accounting; prefer reading through the
    /// `ChunkReader`.
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.source
    }

    /// Consumes the reader, returning the underlying source.
    ///
    /// Bytes held in the lookahead buffer are discarded.
    pub fn into_inner(self) -> R {
        self.source
    }

    /// Converts the reader into an iterator over its remaining chunks.
    ///
    /// Each item is one chunk read to its end; the reader is reset between
    /// chunks. See [`Chunks`].
    ///
    /// # Example
    ///
    /// ```
    /// use std::io::Cursor;
    /// use splitrs::ChunkReader;
    ///
    /// let mut reader = ChunkReader::new(Cursor::new(&b"a,b,c"[..]));
    /// reader.set_key(b",")?;
    ///
    /// let chunks: Vec<_> = reader.chunks().collect::<Result<_, _>>()?;
    /// assert_eq!(chunks.len(), 3);
    /// assert_eq!(&chunks[0].data[..], b"a");
    /// # Ok::<(), splitrs::SplitError>(())
    /// ```
    pub fn chunks(self) -> Chunks<R> {
        Chunks::new(self)
    }

    /// Delivers bytes from the front of the scanned run.
    fn read_scanned(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.scanned.min(buf.len()).min(self.lookahead.len());
        if n == 0 {
            // The scanned run claims bytes the buffer does not hold. Refuse
            // to hand out data we cannot back.
            self.state = Some(ChunkEnd::Truncated);
            return Err(truncation());
        }
        buf[..n].copy_from_slice(&self.lookahead[..n]);
        self.lookahead.advance(n);
        self.scanned -= n;
        Ok(n)
    }

    /// Discards the key at the front of the lookahead buffer and marks the
    /// chunk as cleanly ended.
    fn consume_key(&mut self, key_len: usize) -> io::Result<usize> {
        assert!(
            self.lookahead.len() >= key_len,
            "key accounting out of sync with lookahead buffer"
        );
        self.lookahead.advance(key_len);
        self.state = Some(ChunkEnd::Delimiter);
        Ok(0)
    }

    /// Serves reads while no key is set: leftover lookahead first, then the
    /// source verbatim.
    fn read_passthrough(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if !self.lookahead.is_empty() {
            let n = self.lookahead.len().min(buf.len());
            buf[..n].copy_from_slice(&self.lookahead[..n]);
            self.lookahead.advance(n);
            return Ok(n);
        }
        self.source.read(buf)
    }

    /// Runs one fill cycle: appends source reads to the lookahead buffer
    /// until the target size is reached or the source ends.
    ///
    /// A clean EOF and a hard error both mark the source as done; the error
    /// is kept aside to be surfaced once buffered data has drained.
    fn fill_lookahead(&mut self) {
        while !self.source_done && self.lookahead.len() < self.target {
            let start = self.lookahead.len();
            self.lookahead.resize(self.target, 0);
            match self.source.read(&mut self.lookahead[start..]) {
                Ok(0) => {
                    self.lookahead.truncate(start);
                    self.source_done = true;
                }
                Ok(n) => self.lookahead.truncate(start + n),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {
                    self.lookahead.truncate(start);
                }
                Err(e) => {
                    self.lookahead.truncate(start);
                    self.source_done = true;
                    self.source_err = Some(e);
                }
            }
        }
    }
}

impl<R: Read> Read for ChunkReader<R> {
    /// Reads bytes belonging to the current chunk into `buf`.
    ///
    /// The bytes come from already-buffered lookahead plus at most one fill
    /// cycle against the underlying source, so the returned count may be
    /// less than `buf.len()` even when more chunk data remains; callers
    /// loop until a terminal condition. When the key is reached the count
    /// is zero (conventional end-of-stream). If the source ends before the
    /// key appears, all remaining bytes are delivered first and the read
    /// that finds nothing left fails with [`io::ErrorKind::UnexpectedEof`].
    /// With no key set, this behaves like the source's own `read` once
    /// leftover lookahead has drained.
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        match self.state {
            Some(ChunkEnd::Delimiter) => return Ok(0),
            Some(ChunkEnd::Truncated) => return Err(truncation()),
            None => {}
        }
        let Some(key) = self.key.clone() else {
            return self.read_passthrough(buf);
        };
        if self.scanned > 0 {
            return self.read_scanned(buf);
        }
        if self.found {
            return self.consume_key(key.len());
        }

        self.fill_lookahead();
        match memmem::find(&self.lookahead, &key) {
            None if self.source_done => {
                // No further bytes can complete a match; everything left is
                // chunk data.
                self.scanned = self.lookahead.len();
            }
            None => {
                // The key may straddle the next fill. Hold back one key
                // length so no released byte can be part of a match still
                // being completed.
                let margin = self.lookahead.len().saturating_sub(key.len());
                assert!(margin > 0, "lookahead fill fell short of the scan target");
                self.scanned = margin;
            }
            Some(0) => {
                self.found = true;
                return self.consume_key(key.len());
            }
            Some(pos) => {
                self.scanned = pos;
                self.found = true;
            }
        }

        if self.scanned > 0 {
            return self.read_scanned(buf);
        }
        // Source exhausted with nothing buffered: the chunk ends without
        // its key. A recorded source error is surfaced once; afterwards the
        // condition is a plain truncation.
        self.state = Some(ChunkEnd::Truncated);
        match self.source_err.take() {
            Some(e) => Err(e),
            None => Err(truncation()),
        }
    }
}

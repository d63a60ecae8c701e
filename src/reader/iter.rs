//! Iterator over successive chunks of a reader.

use std::io::{self, Read};

use bytes::Bytes;

use crate::chunk::{Chunk, ChunkEnd};
use crate::error::SplitError;

use super::ChunkReader;

/// Scratch buffer size for draining one chunk.
const SCRATCH_SIZE: usize = 8 * 1024;

/// Returns true if `e` is the reader's own truncation marker rather than an
/// error from the underlying source.
fn is_truncation(e: &io::Error) -> bool {
    e.kind() == io::ErrorKind::UnexpectedEof
        && e.get_ref()
            .is_some_and(|inner| matches!(inner.downcast_ref(), Some(SplitError::Truncated)))
}

/// A consuming iterator over the chunks of a [`ChunkReader`].
///
/// Each item is one whole chunk, read to its terminal condition; the reader
/// is reset between chunks. Chunk [`offset`](Chunk::offset)s count every
/// byte of the original stream, keys included. A final chunk that ends
/// because the source ran out is yielded with
/// [`complete`](Chunk::complete) set to `false`; if the source ends exactly
/// at a key, iteration simply stops. With no key set, the remainder of the
/// stream is one final complete chunk.
///
/// Whole chunks are buffered in memory. Chunk size is bounded only by where
/// the key occurs, so feeding unbounded keyless input through this iterator
/// is the caller's responsibility.
///
/// # Example
///
/// ```
/// use std::io::Cursor;
/// use splitrs::ChunkReader;
///
/// let mut reader = ChunkReader::new(Cursor::new(&b"a,bb,ccc"[..]));
/// reader.set_key(b",")?;
///
/// let chunks: Vec<_> = reader.chunks().collect::<Result<_, _>>()?;
/// let lens: Vec<_> = chunks.iter().map(|c| c.len()).collect();
/// assert_eq!(lens, [1, 2, 3]);
/// assert!(!chunks[2].is_complete());
/// # Ok::<(), splitrs::SplitError>(())
/// ```
pub struct Chunks<R> {
    reader: ChunkReader<R>,
    scratch: Vec<u8>,
    offset: u64,
    finished: bool,
}

impl<R: Read> Chunks<R> {
    pub(crate) fn new(reader: ChunkReader<R>) -> Self {
        Self {
            reader,
            scratch: vec![0u8; SCRATCH_SIZE],
            offset: 0,
            finished: false,
        }
    }

    /// Stops iterating and returns the underlying chunk reader.
    pub fn into_inner(self) -> ChunkReader<R> {
        self.reader
    }

    fn emit(&mut self, data: Vec<u8>, key_len: usize) -> Chunk {
        let chunk = Chunk::with_offset(Bytes::from(data), self.offset);
        self.offset += (chunk.len() + key_len) as u64;
        chunk
    }
}

impl<R: Read> Iterator for Chunks<R> {
    type Item = Result<Chunk, SplitError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let mut data = Vec::new();
        loop {
            match self.reader.read(&mut self.scratch) {
                Ok(0) => {
                    if self.reader.chunk_end() == Some(ChunkEnd::Delimiter) {
                        let key_len = self.reader.key().map_or(0, <[u8]>::len);
                        let chunk = self.emit(data, key_len);
                        self.reader.reset();
                        return Some(Ok(chunk));
                    }
                    // Pass-through mode: a clean source end closes the
                    // final chunk.
                    self.finished = true;
                    if data.is_empty() {
                        return None;
                    }
                    return Some(Ok(self.emit(data, 0)));
                }
                Ok(n) => data.extend_from_slice(&self.scratch[..n]),
                Err(e) => {
                    self.finished = true;
                    if self.reader.chunk_end() == Some(ChunkEnd::Truncated) && is_truncation(&e) {
                        if data.is_empty() {
                            return None;
                        }
                        return Some(Ok(self.emit(data, 0).truncated()));
                    }
                    return Some(Err(SplitError::Io(e)));
                }
            }
        }
    }
}

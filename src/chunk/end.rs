//! Terminal conditions for a chunk.

use std::fmt;

/// How the current chunk ended.
///
/// A [`ChunkReader`](crate::ChunkReader) is in one of three states: open
/// (no terminal condition yet), ended at the key, or truncated. The two end
/// states are sticky until [`reset`](crate::ChunkReader::reset) is called.
///
/// # Example
///
/// ```
/// use std::io::{Cursor, Read};
/// use splitrs::{ChunkEnd, ChunkReader};
///
/// let mut reader = ChunkReader::new(Cursor::new(&b"a;b"[..]));
/// reader.set_key(b";")?;
/// assert_eq!(reader.chunk_end(), None);
///
/// let mut chunk = Vec::new();
/// reader.read_to_end(&mut chunk)?;
/// assert_eq!(reader.chunk_end(), Some(ChunkEnd::Delimiter));
/// # Ok::<(), splitrs::SplitError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChunkEnd {
    /// The key was found; the chunk ended cleanly just before it.
    Delimiter,

    /// The underlying source ended before the key appeared.
    Truncated,
}

impl fmt::Display for ChunkEnd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChunkEnd::Delimiter => write!(f, "delimiter reached"),
            ChunkEnd::Truncated => write!(f, "truncated"),
        }
    }
}

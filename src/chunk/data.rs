//! The Chunk type - one delimiter-bounded chunk of a stream.

use bytes::Bytes;
use std::fmt;

/// One chunk of a delimited stream, as yielded by
/// [`Chunks`](crate::Chunks) and the async stream.
///
/// The key itself is never part of the data. `complete` is `false` only for
/// a final chunk that ended because the source ran out before the key
/// appeared.
///
/// # Example
///
/// ```
/// use splitrs::Chunk;
/// use bytes::Bytes;
///
/// let chunk = Chunk::with_offset(Bytes::from_static(b"hello"), 0);
/// assert_eq!(chunk.len(), 5);
/// assert!(chunk.complete);
/// ```
#[derive(Debug, Clone)]
pub struct Chunk {
    /// The chunk data, excluding the key.
    pub data: Bytes,

    /// Byte offset of the chunk start in the original stream (if known).
    /// Keys consumed before this chunk are counted.
    pub offset: Option<u64>,

    /// False if the source ended before the key was found.
    pub complete: bool,
}

impl Chunk {
    /// Creates a new complete chunk with the given data.
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self {
            data: data.into(),
            offset: None,
            complete: true,
        }
    }

    /// Creates a new complete chunk with an offset.
    pub fn with_offset(data: impl Into<Bytes>, offset: u64) -> Self {
        Self {
            data: data.into(),
            offset: Some(offset),
            complete: true,
        }
    }

    /// Marks the chunk as truncated (source ended before the key).
    pub fn truncated(mut self) -> Self {
        self.complete = false;
        self
    }

    /// Returns the length of the chunk data.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the chunk has no data.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns a reference to the chunk data.
    pub fn data(&self) -> &Bytes {
        &self.data
    }

    /// Returns the offset, if known.
    pub fn offset(&self) -> Option<u64> {
        self.offset
    }

    /// Returns true if the chunk ended at the key (or at a clean source end
    /// in pass-through mode).
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Consumes the chunk and returns the underlying data.
    pub fn into_data(self) -> Bytes {
        self.data
    }
}

impl From<Bytes> for Chunk {
    fn from(data: Bytes) -> Self {
        Self::new(data)
    }
}

impl From<Vec<u8>> for Chunk {
    fn from(data: Vec<u8>) -> Self {
        Self::new(data)
    }
}

impl fmt::Display for Chunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Chunk({} bytes", self.len())?;
        if let Some(offset) = self.offset {
            write!(f, " @ {}", offset)?;
        }
        if !self.complete {
            write!(f, ", truncated")?;
        }
        write!(f, ")")
    }
}

//! Error types for splitrs.

use std::fmt;

/// Errors that can occur while splitting a stream into chunks.
#[derive(Debug)]
pub enum SplitError {
    /// An I/O error occurred while reading from the underlying source.
    Io(std::io::Error),

    /// The supplied chunk key was empty. A key must contain at least one
    /// byte; use [`ChunkReader::clear_key`](crate::ChunkReader::clear_key)
    /// to disable scanning instead.
    InvalidKey,

    /// The underlying source ended before the chunk key was found.
    Truncated,

    /// Invalid configuration parameter.
    InvalidConfig {
        /// Description of what was invalid.
        message: &'static str,
    },
}

impl fmt::Display for SplitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SplitError::Io(e) => write!(f, "io error: {}", e),
            SplitError::InvalidKey => {
                write!(f, "invalid key: a chunk key must contain at least one byte")
            }
            SplitError::Truncated => {
                write!(f, "stream ended before the chunk key was found")
            }
            SplitError::InvalidConfig { message } => {
                write!(f, "invalid config: {}", message)
            }
        }
    }
}

impl std::error::Error for SplitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SplitError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SplitError {
    fn from(e: std::io::Error) -> Self {
        SplitError::Io(e)
    }
}

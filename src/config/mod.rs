//! Configuration for chunk scanning behavior.
//!
//! This module provides [`SplitConfig`], which controls how much lookahead a
//! [`ChunkReader`](crate::ChunkReader) buffers beyond the key length while
//! scanning for chunk boundaries.
//!
//! # Example
//!
//! ```
//! use splitrs::SplitConfig;
//!
//! // Custom lookahead margin
//! let config = SplitConfig::new(16 * 1024)?;
//!
//! # Ok::<(), splitrs::SplitError>(())
//! ```

use crate::error::SplitError;

/// Default lookahead margin (4 KiB).
pub const DEFAULT_LOOKAHEAD_SIZE: usize = 4 * 1024;

/// Configuration for delimiter scanning.
///
/// `SplitConfig` controls the lookahead margin: the number of bytes a
/// [`ChunkReader`](crate::ChunkReader) buffers *beyond the key length* on
/// each fill cycle. The reader's fill target is always
/// `lookahead + key.len()`, which guarantees that whenever the key is not
/// found in a full buffer, at least `lookahead` bytes at the front are
/// provably not part of a key still being completed by unread input.
///
/// Larger margins amortize calls into the underlying source; smaller margins
/// reduce buffering. The margin must be at least 1.
///
/// # Example
///
/// ```
/// use splitrs::SplitConfig;
///
/// // Use the default margin (4 KiB)
/// let config = SplitConfig::default();
///
/// // Custom margin
/// let config = SplitConfig::new(64 * 1024)?;
///
/// // Builder pattern
/// let config = SplitConfig::default().with_lookahead(8 * 1024);
/// # Ok::<(), splitrs::SplitError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SplitConfig {
    /// Lookahead margin in bytes.
    lookahead: usize,
}

impl SplitConfig {
    /// Creates a new configuration with the specified lookahead margin.
    ///
    /// # Errors
    ///
    /// Returns [`SplitError::InvalidConfig`] if `lookahead` is zero. A zero
    /// margin would leave the scanner unable to release any bytes while a
    /// partial key match is still possible.
    ///
    /// # Example
    ///
    /// ```
    /// use splitrs::SplitConfig;
    ///
    /// let config = SplitConfig::new(1024)?;
    /// assert_eq!(config.lookahead(), 1024);
    /// # Ok::<(), splitrs::SplitError>(())
    /// ```
    pub fn new(lookahead: usize) -> Result<Self, SplitError> {
        if lookahead == 0 {
            return Err(SplitError::InvalidConfig {
                message: "lookahead margin must be non-zero",
            });
        }
        Ok(Self { lookahead })
    }

    /// Sets the lookahead margin.
    ///
    /// Note: This does not validate the configuration. Use
    /// [`SplitConfig::validate`] to check if the configuration is valid.
    ///
    /// # Example
    ///
    /// ```
    /// use splitrs::SplitConfig;
    ///
    /// let config = SplitConfig::default().with_lookahead(8192);
    /// assert_eq!(config.lookahead(), 8192);
    /// ```
    pub fn with_lookahead(mut self, lookahead: usize) -> Self {
        self.lookahead = lookahead;
        self
    }

    /// Returns the lookahead margin.
    pub fn lookahead(&self) -> usize {
        self.lookahead
    }

    /// Validates the current configuration.
    ///
    /// Returns an error if the configuration is invalid.
    ///
    /// # Example
    ///
    /// ```
    /// use splitrs::SplitConfig;
    ///
    /// let config = SplitConfig::default().with_lookahead(0);
    /// assert!(config.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), SplitError> {
        Self::new(self.lookahead).map(|_| ())
    }
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            lookahead: DEFAULT_LOOKAHEAD_SIZE,
        }
    }
}

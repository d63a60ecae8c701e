//! splitrs
//!
//! Streaming delimiter-bounded chunk reading for Rust.
//!
//! `splitrs` wraps any byte source and exposes the portion of the stream up
//! to (but not including) a caller-defined byte sequence, the *key*. When
//! the key is reached the wrapper reports end-of-stream for the current
//! chunk; calling [`ChunkReader::reset`] continues with the remainder of the
//! source as the next chunk. It is designed as a small, composable primitive
//! for:
//!
//! - splitting front matter from document bodies
//! - record-delimited protocols and log formats
//! - handing a bounded sub-stream to code that expects a plain reader
//!
//! The crate intentionally:
//! - does NOT parse or interpret chunk contents
//! - does NOT manage concurrency
//! - does NOT seek backward or support writing
//!
//! It only does one thing: **Read bytes → stop at the key**
//!
//! # Sync
//!
//! ```
//! use std::io::{Cursor, Read};
//! use splitrs::{ChunkReader, SplitError};
//!
//! fn main() -> Result<(), SplitError> {
//!     let source = Cursor::new(&b"title: demo\n---\nbody"[..]);
//!     let mut reader = ChunkReader::new(source);
//!     reader.set_key(b"---\n")?;
//!
//!     let mut front = String::new();
//!     reader.read_to_string(&mut front)?;
//!     assert_eq!(front, "title: demo\n");
//!
//!     reader.reset();
//!     reader.clear_key();
//!     let mut body = String::new();
//!     reader.read_to_string(&mut body)?;
//!     assert_eq!(body, "body");
//!     Ok(())
//! }
//! ```
//!
//! # Async (feature = "async-io")
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
//!         println!("record {} bytes", chunk.len());
//!     }
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod chunk;
mod config;
mod error;
mod reader;

#[cfg(feature = "async-io")]
mod async_stream;

//
// Public surface (intentionally tiny)
//

pub use chunk::{Chunk, ChunkEnd};
pub use config::SplitConfig;
pub use error::SplitError;
pub use reader::{ChunkReader, Chunks};

#[cfg(feature = "async-io")]
pub use async_stream::{SplitStream, split_async};

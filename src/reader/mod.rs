//! Chunk reading over synchronous sources.
//!
//! - [`ChunkReader`] - `Read` wrapper that ends each chunk at a byte key
//! - [`Chunks`] - Consuming iterator over successive chunks

mod chunk_reader;
mod iter;

pub use chunk_reader::ChunkReader;
pub use iter::Chunks;

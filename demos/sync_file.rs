//! Splitting a file into records with the chunk iterator.
//!
//! Run with:
//!     cargo run --example sync_file -- <path> [separator]
//!
//! The separator defaults to a newline.

use std::env;
use std::fs::File;
use std::io::BufReader;

use splitrs::ChunkReader;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = env::args().skip(1);
    let path = args.next().ok_or("usage: sync_file <path> [separator]")?;
    let separator = args.next().unwrap_or_else(|| "\n".to_string());

    let file = File::open(&path)?;
    let mut reader = ChunkReader::new(BufReader::new(file));
    reader.set_key(separator.as_bytes())?;

    let mut total_records = 0usize;
    let mut total_bytes = 0usize;

    for chunk in reader.chunks() {
        let chunk = chunk?;
        total_records += 1;
        total_bytes += chunk.len();
        println!("{}", chunk);
    }

    println!("\nTotal: {} records, {} bytes", total_records, total_bytes);
    Ok(())
}

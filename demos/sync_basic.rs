//! Basic synchronous splitting example.
//!
//! Run with:
//!     cargo run --example sync_basic

use std::io::{Cursor, Read};

use splitrs::ChunkReader;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let document = "\
title: splitrs demo
author: nobody
---
Body of the document starts here and
continues to the end of the stream.
";

    let mut reader = ChunkReader::new(Cursor::new(document.as_bytes().to_vec()));

    // Everything before the separator is front matter.
    reader.set_key(b"---\n")?;
    let mut front = String::new();
    reader.read_to_string(&mut front)?;
    println!("front matter ({} bytes):\n{}", front.len(), front);

    // The rest of the stream is the body; no further key needed.
    reader.reset();
    reader.clear_key();
    let mut body = String::new();
    reader.read_to_string(&mut body)?;
    println!("body ({} bytes):\n{}", body.len(), body);

    Ok(())
}

//! Async splitting with tokio via the compat layer.
//!
//! Run with:
//!     cargo run --example async_tokio --features async-io -- <path> [separator]

use std::env;

use futures_util::StreamExt;
use tokio_util::compat::TokioAsyncReadCompatExt;

use splitrs::{SplitConfig, split_async};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = env::args().skip(1);
    let path = args.next().ok_or("usage: async_tokio <path> [separator]")?;
    let separator = args.next().unwrap_or_else(|| "\n".to_string());

    let file = tokio::fs::File::open(&path).await?;
    let mut stream = split_async(file.compat(), separator.as_bytes(), SplitConfig::default())?;

    let mut total_records = 0usize;
    let mut total_bytes = 0usize;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        total_records += 1;
        total_bytes += chunk.len();
        println!("{}", chunk);
    }

    println!("\nTotal: {} records, {} bytes", total_records, total_bytes);
    Ok(())
}

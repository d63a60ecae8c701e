#![no_main]

use libfuzzer_sys::fuzz_target;
use splitrs::{ChunkEnd, ChunkReader};
use std::io::{Cursor, Read};

// Interpret the fuzz input as: 1 byte key length, 1 byte read-buffer size,
// then key bytes, then the stream itself. Whatever the scanner delivers for
// the first chunk must be exactly the stream up to the first key occurrence.
fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }
    let key_len = (data[0] as usize % 8) + 1;
    let read_size = (data[1] as usize % 64) + 1;
    let rest = &data[2..];
    if rest.len() < key_len {
        return;
    }
    let (key, stream) = rest.split_at(key_len);

    let expected_pos = stream
        .windows(key.len())
        .position(|w| w == key);
    let expected: &[u8] = match expected_pos {
        Some(pos) => &stream[..pos],
        None => stream,
    };

    let mut reader = ChunkReader::new(Cursor::new(stream.to_vec()));
    reader.set_key(key).unwrap();

    let mut output = Vec::new();
    let mut buf = vec![0u8; read_size];
    let truncated = loop {
        match reader.read(&mut buf) {
            Ok(0) => break false,
            Ok(n) => {
                assert!(n <= buf.len());
                output.extend_from_slice(&buf[..n]);
            }
            Err(_) => break true,
        }
    };

    // Exact reassembly, and the terminal condition matches whether the key
    // was present.
    assert_eq!(output, expected);
    assert_eq!(truncated, expected_pos.is_none());
    match expected_pos {
        Some(_) => assert_eq!(reader.chunk_end(), Some(ChunkEnd::Delimiter)),
        None => assert_eq!(reader.chunk_end(), Some(ChunkEnd::Truncated)),
    }

    // Terminal conditions are sticky and deliver no further bytes.
    match reader.read(&mut buf) {
        Ok(n) => {
            assert_eq!(n, 0);
            assert_eq!(reader.chunk_end(), Some(ChunkEnd::Delimiter));
        }
        Err(_) => assert_eq!(reader.chunk_end(), Some(ChunkEnd::Truncated)),
    }
});

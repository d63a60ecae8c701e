#![no_main]

use libfuzzer_sys::fuzz_target;
use splitrs::ChunkReader;
use std::io::Cursor;

// The chunks iterator must account for every byte of the stream: chunk data
// plus one key per complete chunk, with offsets in stream order.
fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }
    let key_len = (data[0] as usize % 4) + 1;
    let rest = &data[1..];
    if rest.len() < key_len {
        return;
    }
    let (key, stream) = rest.split_at(key_len);

    let mut reader = ChunkReader::new(Cursor::new(stream.to_vec()));
    reader.set_key(key).unwrap();

    let chunks: Vec<_> = reader
        .chunks()
        .collect::<Result<Vec<_>, _>>()
        .expect("in-memory source cannot fail");

    let mut expected_offset = 0u64;
    let mut accounted = 0usize;
    for (i, chunk) in chunks.iter().enumerate() {
        assert_eq!(chunk.offset(), Some(expected_offset));
        accounted += chunk.len();
        if chunk.is_complete() {
            accounted += key.len();
            expected_offset += (chunk.len() + key.len()) as u64;
        } else {
            // Only the last chunk may be truncated.
            assert_eq!(i, chunks.len() - 1);
            expected_offset += chunk.len() as u64;
        }
    }
    assert_eq!(accounted, stream.len());

    // Re-splitting the reassembled stream must give identical chunks.
    let mut rebuilt = Vec::new();
    for chunk in &chunks {
        rebuilt.extend_from_slice(&chunk.data);
        if chunk.is_complete() {
            rebuilt.extend_from_slice(key);
        }
    }
    assert_eq!(rebuilt, stream);
});

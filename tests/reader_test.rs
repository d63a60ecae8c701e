// Integration tests for the ChunkReader streaming API
// Tests cover: chunk boundaries, reset/rekey cycles, truncation, pass-through,
// buffer-boundary edges around the lookahead margin, randomized reassembly

use std::io::{self, Cursor, Read};

use splitrs::{ChunkEnd, ChunkReader, SplitConfig, SplitError};

/// Reads the current chunk to its terminal condition, returning the bytes
/// delivered and the error (if the chunk was truncated).
fn read_chunk<R: Read>(reader: &mut ChunkReader<R>) -> (Vec<u8>, Option<io::Error>) {
    let mut out = Vec::new();
    match reader.read_to_end(&mut out) {
        Ok(_) => (out, None),
        Err(e) => (out, Some(e)),
    }
}

/// A source that serves at most `piece` bytes per read call, so keys can be
/// made to straddle underlying reads.
struct PieceReader {
    data: Vec<u8>,
    pos: usize,
    piece: usize,
}

impl PieceReader {
    fn new(data: impl Into<Vec<u8>>, piece: usize) -> Self {
        Self {
            data: data.into(),
            pos: 0,
            piece,
        }
    }
}

impl Read for PieceReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.piece.min(buf.len()).min(self.data.len() - self.pos);
        buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}

/// Counts read calls made against the underlying source.
struct CountingReader {
    inner: Cursor<Vec<u8>>,
    calls: usize,
}

impl Read for CountingReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.calls += 1;
        self.inner.read(buf)
    }
}

// ============================================================================
// Scenario: successive chunks with rekeying
// ============================================================================

#[test]
fn test_uppercase_scenario() {
    let example = &b"the quick {U}brown fox jumps{L} over the lazy dog"[..];
    let mut reader = ChunkReader::new(Cursor::new(example));

    reader.set_key(b"{U}").unwrap();
    let (s1, err) = read_chunk(&mut reader);
    assert_eq!(s1, b"the quick ");
    assert!(err.is_none(), "first chunk must end cleanly");

    reader.reset();
    reader.set_key(b"{L}").unwrap();
    let (s2, err) = read_chunk(&mut reader);
    assert_eq!(s2, b"brown fox jumps");
    assert!(err.is_none(), "second chunk must end cleanly");

    reader.reset();
    reader.clear_key();
    let (s3, err) = read_chunk(&mut reader);
    assert_eq!(s3, b" over the lazy dog");
    assert!(err.is_none(), "pass-through tail must end cleanly");

    let stitched = format!(
        "{}{}{}",
        String::from_utf8(s1).unwrap(),
        String::from_utf8(s2).unwrap().to_uppercase(),
        String::from_utf8(s3).unwrap()
    );
    assert_eq!(stitched, "the quick BROWN FOX JUMPS over the lazy dog");
}

// ============================================================================
// Short inputs: two-chunk table cases
// ============================================================================

#[test]
fn test_two_chunk_cases() {
    struct Case {
        desc: &'static str,
        input: &'static [u8],
        key1: &'static [u8],
        out1: &'static [u8],
        truncated1: bool,
        key2: Option<&'static [u8]>,
        out2: &'static [u8],
        truncated2: bool,
    }

    let cases = [
        Case {
            desc: "no key detected",
            input: b"---\nauthor : Jason\n---\nqwerty",
            key1: b"123456",
            out1: b"---\nauthor : Jason\n---\nqwerty",
            truncated1: true,
            key2: Some(b"123456"),
            out2: b"",
            truncated2: true,
        },
        Case {
            desc: "key detected at start",
            input: b"---\nauthor : Jason\n---\nqwerty",
            key1: b"---\n",
            out1: b"",
            truncated1: false,
            key2: Some(b"---\n"),
            out2: b"author : Jason\n",
            truncated2: false,
        },
        Case {
            desc: "key detected mid stream",
            input: b"ytrewq\n---\nauthor : Jason",
            key1: b"---\n",
            out1: b"ytrewq\n",
            truncated1: false,
            key2: Some(b"---\n"),
            out2: b"author : Jason",
            truncated2: true,
        },
        Case {
            desc: "key detected mid stream then cleared",
            input: b"ytrewq\n---\nauthor : Jason",
            key1: b"---\n",
            out1: b"ytrewq\n",
            truncated1: false,
            key2: None,
            out2: b"author : Jason",
            truncated2: false,
        },
        Case {
            desc: "empty input stream",
            input: b"",
            key1: b"---\n",
            out1: b"",
            truncated1: true,
            key2: None,
            out2: b"",
            truncated2: true,
        },
    ];

    for case in &cases {
        let mut reader = ChunkReader::new(Cursor::new(case.input));
        reader.set_key(case.key1).unwrap();

        let (out1, err1) = read_chunk(&mut reader);
        assert_eq!(out1, case.out1, "case {:?}: first chunk bytes", case.desc);
        assert_eq!(
            err1.is_some(),
            case.truncated1,
            "case {:?}: first chunk condition",
            case.desc
        );
        if let Some(e) = err1 {
            assert_eq!(e.kind(), io::ErrorKind::UnexpectedEof, "case {:?}", case.desc);
        }

        reader.reset();
        match case.key2 {
            Some(key) => reader.set_key(key).unwrap(),
            None => reader.clear_key(),
        }

        let (out2, err2) = read_chunk(&mut reader);
        assert_eq!(out2, case.out2, "case {:?}: second chunk bytes", case.desc);
        assert_eq!(
            err2.is_some(),
            case.truncated2,
            "case {:?}: second chunk condition",
            case.desc
        );
    }
}

// ============================================================================
// Terminal conditions
// ============================================================================

#[test]
fn test_key_at_offset_zero_is_immediate_eof() {
    let mut reader = ChunkReader::new(Cursor::new(&b";;rest"[..]));
    reader.set_key(b";;").unwrap();

    let mut buf = [0u8; 8];
    assert_eq!(reader.read(&mut buf).unwrap(), 0);
    assert_eq!(reader.chunk_end(), Some(ChunkEnd::Delimiter));
}

#[test]
fn test_empty_input_with_key_is_truncated() {
    let mut reader = ChunkReader::new(Cursor::new(&b""[..]));
    reader.set_key(b"key").unwrap();

    let (out, err) = read_chunk(&mut reader);
    assert!(out.is_empty());
    assert_eq!(err.unwrap().kind(), io::ErrorKind::UnexpectedEof);
    assert_eq!(reader.chunk_end(), Some(ChunkEnd::Truncated));
}

#[test]
fn test_terminal_condition_is_idempotent() {
    // Clean end stays a clean end.
    let mut reader = ChunkReader::new(Cursor::new(&b"a;"[..]));
    reader.set_key(b";").unwrap();
    let (out, err) = read_chunk(&mut reader);
    assert_eq!(out, b"a");
    assert!(err.is_none());

    let mut buf = [0u8; 8];
    for _ in 0..4 {
        assert_eq!(reader.read(&mut buf).unwrap(), 0);
        assert_eq!(reader.chunk_end(), Some(ChunkEnd::Delimiter));
    }

    // A truncation stays a truncation.
    let mut reader = ChunkReader::new(Cursor::new(&b"abc"[..]));
    reader.set_key(b";").unwrap();
    let (out, err) = read_chunk(&mut reader);
    assert_eq!(out, b"abc");
    assert_eq!(err.unwrap().kind(), io::ErrorKind::UnexpectedEof);

    for _ in 0..4 {
        let err = reader.read(&mut buf).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
        assert_eq!(reader.chunk_end(), Some(ChunkEnd::Truncated));
    }
}

#[test]
fn test_truncation_error_wraps_split_error() {
    let mut reader = ChunkReader::new(Cursor::new(&b"abc"[..]));
    reader.set_key(b";").unwrap();
    let (_, err) = read_chunk(&mut reader);
    let err = err.unwrap();

    let inner = err.get_ref().expect("truncation carries its crate error");
    assert!(matches!(
        inner.downcast_ref::<SplitError>(),
        Some(SplitError::Truncated)
    ));
}

#[test]
fn test_reset_at_source_end_yields_empty_truncated_chunk() {
    let mut reader = ChunkReader::new(Cursor::new(&b"only;"[..]));
    reader.set_key(b";").unwrap();
    let (out, err) = read_chunk(&mut reader);
    assert_eq!(out, b"only");
    assert!(err.is_none());

    reader.reset();
    assert_eq!(reader.chunk_end(), Some(ChunkEnd::Truncated));
    let (out, err) = read_chunk(&mut reader);
    assert!(out.is_empty());
    assert_eq!(err.unwrap().kind(), io::ErrorKind::UnexpectedEof);
}

// ============================================================================
// Buffer-boundary edges
// ============================================================================

// Every input length from zero up to past twice the default lookahead
// margin, with a fixed 3-byte key appended.
#[test]
fn test_every_length_up_to_twice_the_margin() {
    for i in 0..=9000 {
        let mut input = vec![b'X'; i];
        input.extend_from_slice(b";;;");

        let mut reader = ChunkReader::new(Cursor::new(input));
        reader.set_key(b";;;").unwrap();

        let (out, err) = read_chunk(&mut reader);
        assert_eq!(out.len(), i, "length {}: wrong byte count", i);
        assert!(out.iter().all(|&b| b == b'X'), "length {}: wrong bytes", i);
        assert!(err.is_none(), "length {}: unexpected error", i);
    }
}

#[test]
fn test_key_straddles_underlying_reads() {
    // Small pieces force the key across every underlying read seam.
    for piece in 1..=8 {
        let mut reader = PieceReader::new(&b"alpha-*-beta"[..], piece);
        let mut chunked = ChunkReader::new(&mut reader);
        chunked.set_key(b"-*-").unwrap();

        let (out, err) = read_chunk(&mut chunked);
        assert_eq!(out, b"alpha", "piece size {}", piece);
        assert!(err.is_none(), "piece size {}", piece);

        chunked.reset();
        let (rest, err) = read_chunk(&mut chunked);
        assert_eq!(rest, b"beta", "piece size {}", piece);
        assert_eq!(err.unwrap().kind(), io::ErrorKind::UnexpectedEof);
    }
}

#[test]
fn test_small_lookahead_margin() {
    // A tiny margin exercises frequent refills and the hold-back logic.
    let config = SplitConfig::new(2).unwrap();
    let input = b"aaaa//bbbb//cc".to_vec();
    let mut reader = ChunkReader::with_config(Cursor::new(input), config);
    reader.set_key(b"//").unwrap();

    let (a, err) = read_chunk(&mut reader);
    assert_eq!(a, b"aaaa");
    assert!(err.is_none());

    reader.reset();
    let (b, err) = read_chunk(&mut reader);
    assert_eq!(b, b"bbbb");
    assert!(err.is_none());

    reader.reset();
    let (c, err) = read_chunk(&mut reader);
    assert_eq!(c, b"cc");
    assert_eq!(err.unwrap().kind(), io::ErrorKind::UnexpectedEof);
}

// ============================================================================
// Fill-cycle contract
// ============================================================================

#[test]
fn test_at_most_one_fill_cycle_per_read() {
    let source = CountingReader {
        inner: Cursor::new(b"abcdef;tail".to_vec()),
        calls: 0,
    };
    let mut reader = ChunkReader::new(source);
    reader.set_key(b";").unwrap();

    // First read runs one fill cycle: one data read plus the EOF probe.
    let mut buf = [0u8; 2];
    assert_eq!(reader.read(&mut buf).unwrap(), 2);
    let calls_after_first = reader.get_ref().calls;
    assert_eq!(calls_after_first, 2);

    // Draining the already-scanned run must not touch the source.
    while reader.read(&mut buf).unwrap() > 0 {}
    assert_eq!(reader.get_ref().calls, calls_after_first);
}

// ============================================================================
// Randomized reassembly
// ============================================================================

// Random key, random prefix free of the key, random garbage after it, and
// random caller buffer sizes: the prefix must reassemble exactly.
#[test]
fn test_randomized_reassembly() {
    use rand::Rng;

    const CYCLES: usize = 300;
    const MAX_INPUT: usize = 16 * 1024;
    const MAX_KEY: usize = 512;
    const MAX_READ: usize = 2048;

    let mut rng = rand::rng();

    for cycle in 0..CYCLES {
        let mut key = vec![0u8; rng.random_range(1..=MAX_KEY)];
        rng.fill(&mut key[..]);

        let mut prefix = vec![0u8; rng.random_range(1..=MAX_INPUT)];
        rng.fill(&mut prefix[..]);

        // Mutate the prefix until the key no longer occurs in it.
        while let Some(p) = prefix.windows(key.len()).position(|w| w == &key[..]) {
            prefix[p] = prefix[p].wrapping_add(1);
        }

        let mut garbage = vec![0u8; rng.random_range(1..=MAX_INPUT)];
        rng.fill(&mut garbage[..]);

        let mut stream = prefix.clone();
        stream.extend_from_slice(&key);
        stream.extend_from_slice(&garbage);

        let mut reader = ChunkReader::new(Cursor::new(stream));
        reader.set_key(&key).unwrap();

        let mut output = Vec::new();
        loop {
            let mut buf = vec![0u8; rng.random_range(1..=MAX_READ)];
            match reader.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => output.extend_from_slice(&buf[..n]),
                Err(e) => panic!("cycle {}: unexpected error {}", cycle, e),
            }
        }

        assert_eq!(
            output.len(),
            prefix.len(),
            "cycle {}: wrong reassembled length",
            cycle
        );
        assert_eq!(output, prefix, "cycle {}: prefix and output differ", cycle);
        assert_eq!(reader.chunk_end(), Some(ChunkEnd::Delimiter));
    }
}

// ============================================================================
// Chunk iterator over a real stream shape
// ============================================================================

#[test]
fn test_chunks_over_record_stream() {
    let mut reader = ChunkReader::new(Cursor::new(&b"rec1\r\nrec2\r\nrec3"[..]));
    reader.set_key(b"\r\n").unwrap();

    let chunks: Vec<_> = reader.chunks().collect::<Result<_, _>>().unwrap();
    let parts: Vec<_> = chunks.iter().map(|c| c.data.as_ref()).collect();
    assert_eq!(parts, [&b"rec1"[..], b"rec2", b"rec3"]);

    let offsets: Vec<_> = chunks.iter().map(|c| c.offset().unwrap()).collect();
    assert_eq!(offsets, [0, 6, 12]);

    assert!(chunks[0].is_complete());
    assert!(chunks[1].is_complete());
    assert!(!chunks[2].is_complete());
}

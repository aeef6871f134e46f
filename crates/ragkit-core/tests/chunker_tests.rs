use ragkit_core::chunker::{chunk_text, expected_chunk_count, ChunkingConfig};
use ragkit_core::Error;

fn reassemble(chunks: &[String], overlap: usize) -> String {
    let mut out = String::new();
    for (i, c) in chunks.iter().enumerate() {
        if i == 0 {
            out.push_str(c);
        } else {
            out.extend(c.chars().skip(overlap));
        }
    }
    out
}

#[test]
fn empty_text_yields_no_chunks() {
    let chunks = chunk_text("", 8, 3).unwrap();
    assert!(chunks.is_empty());
}

#[test]
fn short_text_is_a_single_chunk() {
    assert_eq!(chunk_text("Hello", 8, 3).unwrap(), vec!["Hello"]);
    assert_eq!(chunk_text("Hello Wo", 8, 3).unwrap(), vec!["Hello Wo"], "exactly chunk_size");
}

#[test]
fn hello_world_windows_advance_by_size_minus_overlap() {
    let chunks = chunk_text("Hello World Programming", 8, 3).unwrap();
    assert_eq!(chunks, vec!["Hello Wo", " World P", "d Progra", "gramming"]);
    // consecutive windows share exactly `overlap` characters
    for pair in chunks.windows(2) {
        let tail: String = pair[0].chars().skip(5).collect();
        let head: String = pair[1].chars().take(3).collect();
        assert_eq!(tail, head);
    }
}

#[test]
fn last_chunk_is_clipped_and_no_trailing_duplicate() {
    // 10 chars, size 4, overlap 1 -> starts 0,3,6; last window [6,10)
    let chunks = chunk_text("abcdefghij", 4, 1).unwrap();
    assert_eq!(chunks, vec!["abcd", "defg", "ghij"]);

    // 11 chars -> a fourth, shorter window covering the tail
    let chunks = chunk_text("abcdefghijk", 4, 1).unwrap();
    assert_eq!(chunks, vec!["abcd", "defg", "ghij", "jk"]);
}

#[test]
fn zero_overlap_partitions_the_text() {
    let chunks = chunk_text("aaabbbcc", 3, 0).unwrap();
    assert_eq!(chunks, vec!["aaa", "bbb", "cc"]);
}

#[test]
fn invalid_parameters_fail_fast() {
    for (size, overlap) in [(0, 0), (8, 8), (8, 9), (1, 1)] {
        let err = chunk_text("some text that is long enough", size, overlap).unwrap_err();
        assert!(matches!(err, Error::InvalidParameter(_)), "size={size} overlap={overlap}: {err}");
    }
    // validated even when there is nothing to chunk
    assert!(matches!(chunk_text("", 4, 4), Err(Error::InvalidParameter(_))));
    assert!(ChunkingConfig::new(500, 50).is_ok());
}

#[test]
fn chunks_cover_text_and_respect_size_for_many_shapes() {
    let text: String = (0..157).map(|i| char::from(b'a' + (i % 26) as u8)).collect();
    for size in 1..=20 {
        for overlap in 0..size {
            for len in [0, 1, size, size + 1, 37, 157] {
                let t: String = text.chars().take(len).collect();
                let chunks = chunk_text(&t, size, overlap).unwrap();
                assert_eq!(reassemble(&chunks, overlap), t, "size={size} overlap={overlap} len={len}");
                assert!(chunks.iter().all(|c| c.chars().count() <= size));
                assert_eq!(chunks.len(), expected_chunk_count(len, size, overlap));
                if len > size {
                    let stride = size - overlap;
                    assert_eq!(chunks.len(), (len - overlap).div_ceil(stride));
                    // every window but the last is full-sized
                    let full = &chunks[..chunks.len() - 1];
                    assert!(full.iter().all(|c| c.chars().count() == size));
                }
            }
        }
    }
}

#[test]
fn multibyte_characters_are_never_split() {
    let text = "héllo wörld ✓ ünïcode";
    let chunks = chunk_text(text, 4, 1).unwrap();
    assert!(chunks.iter().all(|c| c.chars().count() <= 4));
    assert_eq!(reassemble(&chunks, 1), text);
    assert_eq!(chunks[0], "héll");
}

#[test]
fn default_config_matches_documented_values() {
    let cfg = ChunkingConfig::default();
    assert_eq!((cfg.chunk_size, cfg.overlap), (500, 50));
    assert_eq!(cfg.stride(), 450);
}

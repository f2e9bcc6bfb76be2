//! Text chunking for knowledge retrieval.
//!
//! Splits document text into overlapping, word-boundary-respecting
//! segments of bounded size. Chunks are transient: they are regenerated
//! on every retrieval call and never persisted.
//!
//! Sizes are measured in bytes and every cut lands on a UTF-8 character
//! boundary, so multi-byte characters are never split.

/// Default chunk size in bytes.
pub const DEFAULT_CHUNK_SIZE: usize = 500;

/// Default overlap between consecutive chunks in bytes.
pub const DEFAULT_OVERLAP: usize = 50;

/// Minimum chunk size accepted by validated configurations.
pub const MIN_CHUNK_SIZE: usize = 100;

/// Maximum chunk size accepted by validated configurations.
pub const MAX_CHUNK_SIZE: usize = 2000;

/// Splits text into overlapping chunks, breaking at word boundaries.
///
/// Each chunk is at most `chunk_size` bytes. When no space or newline
/// exists between the cursor and the size boundary (a word longer than
/// `chunk_size`), the word is cut at the boundary instead. Consecutive
/// chunks share up to `overlap` bytes of context.
/// Emitted chunks are trimmed of leading/trailing whitespace; text no
/// longer than `chunk_size` is returned untrimmed as a single chunk.
///
/// The cursor is guaranteed to advance by at least one character per
/// iteration, so the function terminates for every input, including
/// degenerate configurations like `overlap >= chunk_size`.
///
/// # Examples
///
/// ```
/// use promptforge::chunking::chunk_text;
///
/// let chunks = chunk_text("Hello world. This is a test.", 10, 2);
/// assert!(!chunks.is_empty());
/// assert!(chunks[0].len() <= 10);
/// ```
#[must_use]
pub fn chunk_text(text: &str, chunk_size: usize, overlap: usize) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    if text.len() <= chunk_size {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut start = 0;

    while start < text.len() {
        // The candidate end may run past the text; slicing clamps it, but
        // the cursor advance below keeps using the unclamped value.
        let mut end = start.saturating_add(chunk_size);

        if end < text.len() {
            // Search backward from the boundary for the nearest space or
            // newline and break at the later of the two. Both are
            // single-byte in UTF-8, so a byte scan is exact.
            if let Some(break_point) = find_break_point(text.as_bytes(), end)
                && break_point > start
            {
                end = break_point;
            }
        }

        let slice_end = floor_char_boundary(text, end.min(text.len()));
        chunks.push(text[start..slice_end].trim().to_string());

        let mut next = end.saturating_sub(overlap);
        if next < text.len() {
            next = floor_char_boundary(text, next);
        }
        if next <= start {
            // Minimum advance of one character so the loop cannot stall.
            next = ceil_char_boundary(text, start + 1);
        }
        start = next;
    }

    chunks
}

/// Searches backward from `limit` (inclusive) for the nearest space or
/// newline byte.
fn find_break_point(bytes: &[u8], limit: usize) -> Option<usize> {
    let limit = limit.min(bytes.len() - 1);
    (0..=limit).rev().find(|&i| bytes[i] == b' ' || bytes[i] == b'\n')
}

/// Finds a valid UTF-8 character boundary at or before the given position.
fn floor_char_boundary(s: &str, pos: usize) -> usize {
    if pos >= s.len() {
        return s.len();
    }
    let mut boundary = pos;
    while !s.is_char_boundary(boundary) && boundary > 0 {
        boundary -= 1;
    }
    boundary
}

/// Finds a valid UTF-8 character boundary at or after the given position.
fn ceil_char_boundary(s: &str, pos: usize) -> usize {
    if pos >= s.len() {
        return s.len();
    }
    let mut boundary = pos;
    while !s.is_char_boundary(boundary) {
        boundary += 1;
    }
    boundary
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_empty_text() {
        assert!(chunk_text("", 100, 10).is_empty());
    }

    #[test]
    fn test_chunk_short_text_passthrough() {
        // Text within the chunk size comes back as a single untrimmed chunk.
        let text = "  Hello, world!  ";
        let chunks = chunk_text(text, 100, 10);
        assert_eq!(chunks, vec![text.to_string()]);
    }

    #[test]
    fn test_chunk_exact_size() {
        let text = "0123456789";
        let chunks = chunk_text(text, 10, 2);
        assert_eq!(chunks, vec![text.to_string()]);
    }

    #[test]
    fn test_chunk_breaks_at_word_boundary() {
        let chunks = chunk_text("Hello world. This is a test.", 10, 2);
        assert!(!chunks.is_empty());
        assert_eq!(chunks[0], "Hello");
        assert!(chunks[0].len() <= 10);
    }

    #[test]
    fn test_chunk_bound_respected() {
        let text = "The quick brown fox jumps over the lazy dog. ".repeat(20);
        for chunk in chunk_text(&text, 50, 10) {
            assert!(chunk.len() <= 50, "chunk too large: {}", chunk.len());
        }
    }

    #[test]
    fn test_chunk_prefers_newline_when_later() {
        // Newline at index 8 is later than the space at index 5.
        let text = "Hello to\nthe whole wide world out there today";
        let chunks = chunk_text(text, 10, 0);
        assert_eq!(chunks[0], "Hello to");
    }

    #[test]
    fn test_chunk_long_word_is_cut() {
        // No break point exists before the boundary; the word is cut at the
        // raw size boundary instead.
        let text = format!("{} tail", "x".repeat(30));
        let chunks = chunk_text(&text, 10, 0);
        assert!(!chunks.is_empty());
        for chunk in &chunks {
            assert!(chunk.len() <= 10);
        }
        assert!(chunks.iter().any(|c| c.contains("tail")));
    }

    #[test]
    fn test_chunk_overlap_shares_context() {
        let text = "alpha beta gamma delta epsilon zeta eta theta iota kappa";
        let chunks = chunk_text(text, 20, 10);
        assert!(chunks.len() >= 2);
        // With overlap, the second chunk re-starts inside the first window.
        let first_end = &chunks[0][chunks[0].len().saturating_sub(5)..];
        assert!(chunks[1].contains(first_end.trim()));
    }

    #[test]
    fn test_chunk_overlap_ge_chunk_size_terminates() {
        // Degenerate configuration: without the minimum-advance guard
        // the cursor would never move past the first break point.
        let text = "word ".repeat(100);
        let chunks = chunk_text(&text, 10, 10);
        assert!(!chunks.is_empty());

        let chunks = chunk_text(&text, 10, 50);
        assert!(!chunks.is_empty());
    }

    #[test]
    fn test_chunk_no_whitespace_terminates() {
        let text = "a".repeat(1000);
        let chunks = chunk_text(&text, 100, 50);
        assert!(!chunks.is_empty());
        for chunk in &chunks {
            assert!(chunk.len() <= 100);
        }
    }

    #[test]
    fn test_chunk_unicode_boundaries() {
        let text = "héllo wörld ".repeat(50);
        for chunk in chunk_text(&text, 37, 5) {
            // Slicing on a non-boundary would have panicked already; also
            // verify the content is intact.
            assert!(chunk.chars().all(|c| "hélowörd ".contains(c)));
        }
    }

    #[test]
    fn test_chunk_multibyte_only_terminates() {
        let text = "世界".repeat(200);
        let chunks = chunk_text(&text, 10, 5);
        assert!(!chunks.is_empty());
    }

    #[test]
    fn test_chunks_are_trimmed() {
        let text = "alpha beta gamma delta epsilon zeta eta theta iota kappa";
        for chunk in chunk_text(text, 20, 5) {
            assert_eq!(chunk, chunk.trim());
        }
    }

    #[test]
    fn test_floor_char_boundary() {
        let s = "Hello, 世界!";
        assert_eq!(floor_char_boundary(s, 5), 5);
        assert_eq!(floor_char_boundary(s, 8), 7); // inside '世'
        assert_eq!(floor_char_boundary(s, 100), s.len());
    }

    #[test]
    fn test_ceil_char_boundary() {
        let s = "a世b";
        assert_eq!(ceil_char_boundary(s, 1), 1);
        assert_eq!(ceil_char_boundary(s, 2), 4); // inside '世'
        assert_eq!(ceil_char_boundary(s, 100), s.len());
    }

    #[test]
    fn test_find_break_point() {
        let bytes = b"Hello world";
        assert_eq!(find_break_point(bytes, 8), Some(5));
        assert_eq!(find_break_point(bytes, 3), None);
        assert_eq!(find_break_point(b"a\nb c", 4), Some(3));
        assert_eq!(find_break_point(b"a\nb c", 2), Some(1));
    }
}

//! Line-frame splitter for the streaming feed.
//!
//! The feed is a `text/event-stream`-shaped body where each frame is a single
//! newline-terminated line carrying a `data:` marker followed by a JSON
//! payload. Chunks arrive at arbitrary boundaries, so complete lines are
//! extracted as they become available and the unterminated remainder stays
//! buffered for the next chunk.

const FRAME_MARKER: &str = "data:";

/// Accumulating splitter owned by exactly one channel decode loop.
///
/// Invariant: between chunk arrivals the buffer holds exactly the suffix of
/// all bytes received so far that has not resolved into a complete line; it
/// shrinks only by removing complete-line prefixes. A trailing fragment left
/// at end of stream without its newline is never treated as a frame.
#[derive(Default)]
pub struct FeedDecoder {
    buf: Vec<u8>,
}

impl FeedDecoder {
    /// Appends a chunk and returns the payloads of every complete frame.
    ///
    /// Lines without the `data:` marker (blank lines, comments) are dropped.
    /// Both `data: ` and `data:` marker variants are accepted. Invalid UTF-8
    /// is decoded lossily per line.
    pub fn push_chunk(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buf.extend_from_slice(chunk);
        let mut payloads = Vec::new();
        while let Some(idx) = self.buf.iter().position(|&b| b == b'\n') {
            let line_bytes: Vec<u8> = self.buf.drain(..=idx).collect();
            let line = String::from_utf8_lossy(&line_bytes);
            let line = line.trim();
            if let Some(rest) = line.strip_prefix(FRAME_MARKER) {
                payloads.push(rest.trim_start().to_string());
            }
        }
        payloads
    }

    /// Number of buffered bytes not yet resolved into a frame.
    pub fn residual_len(&self) -> usize {
        self.buf.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: &str = "data: {\"content\":\"Hello\"}\n\ndata: {\"content\":\" world\"}\ndata: {\"timings\":{\"predicted_ms\":120}}\n";

    fn decode_all(chunks: &[&[u8]]) -> Vec<String> {
        let mut decoder = FeedDecoder::default();
        let mut payloads = Vec::new();
        for chunk in chunks {
            payloads.extend(decoder.push_chunk(chunk));
        }
        payloads
    }

    #[test]
    fn single_chunk_extracts_all_frames() {
        let payloads = decode_all(&[FEED.as_bytes()]);
        assert_eq!(
            payloads,
            vec![
                r#"{"content":"Hello"}"#,
                r#"{"content":" world"}"#,
                r#"{"timings":{"predicted_ms":120}}"#,
            ]
        );
    }

    #[test]
    fn any_split_point_matches_single_chunk_delivery() {
        let reference = decode_all(&[FEED.as_bytes()]);
        let bytes = FEED.as_bytes();
        for split in 1..bytes.len() {
            let payloads = decode_all(&[&bytes[..split], &bytes[split..]]);
            assert_eq!(payloads, reference, "split at byte {split}");
        }
    }

    #[test]
    fn one_byte_at_a_time_matches_single_chunk_delivery() {
        let reference = decode_all(&[FEED.as_bytes()]);
        let mut decoder = FeedDecoder::default();
        let mut payloads = Vec::new();
        for byte in FEED.as_bytes() {
            payloads.extend(decoder.push_chunk(std::slice::from_ref(byte)));
        }
        assert_eq!(payloads, reference);
    }

    #[test]
    fn split_inside_marker_prefix() {
        let payloads = decode_all(&[b"da", b"ta: {\"content\":\"x\"}\n"]);
        assert_eq!(payloads, vec![r#"{"content":"x"}"#]);
    }

    #[test]
    fn marker_without_space_is_accepted() {
        let payloads = decode_all(&[b"data:{\"content\":\"x\"}\n"]);
        assert_eq!(payloads, vec![r#"{"content":"x"}"#]);
    }

    #[test]
    fn non_marker_lines_are_dropped() {
        let payloads = decode_all(&[b"\n: comment\nevent: ping\ndata: {\"a\":1}\n"]);
        assert_eq!(payloads, vec![r#"{"a":1}"#]);
    }

    #[test]
    fn crlf_line_endings_are_trimmed() {
        let payloads = decode_all(&[b"data: {\"a\":1}\r\n"]);
        assert_eq!(payloads, vec![r#"{"a":1}"#]);
    }

    #[test]
    fn trailing_fragment_without_newline_stays_buffered() {
        let mut decoder = FeedDecoder::default();
        let payloads = decoder.push_chunk(b"data: {\"content\":\"x\"}\ndata: {\"partial");
        assert_eq!(payloads, vec![r#"{"content":"x"}"#]);
        assert_eq!(decoder.residual_len(), "data: {\"partial".len());
        // At end of stream the fragment is simply abandoned with the decoder.
    }
}

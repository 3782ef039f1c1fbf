//! Pushback byte reader.
//!
//! Wraps any [`Read`] source with a small ring of recently returned bytes
//! so the scanner can return them to the stream. The ring records what was
//! handed out at each slot, which lets `ungetc` assert that callers only
//! push back what they actually read, in reverse order.

use std::io::{self, Read};

/// Capacity of the pushback ring.
pub const PUSHBACK: usize = 8;

/// A byte reader with bounded pushback.
///
/// `getc` returns `None` at end of input. End-of-input is an ordinary ring
/// entry (`None`), so a probe that overran the end can push it back like
/// any other byte.
///
/// Underlying read errors are treated as end of input: the scanner models
/// a `getc` contract, and its real sources are buffered files and
/// in-memory cursors.
pub struct PushbackReader<R> {
    inner: R,
    ring: [Option<u8>; PUSHBACK],
    /// Ring position; incremented by `getc`, decremented by `ungetc`.
    slot: u64,
    /// How many ring entries are queued for re-delivery.
    buffered: usize,
}

impl<R: Read> PushbackReader<R> {
    /// Creates a reader over the given byte source.
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            ring: [None; PUSHBACK],
            slot: 0,
            buffered: 0,
        }
    }

    /// Returns the next byte, or `None` at end of input.
    pub fn getc(&mut self) -> Option<u8> {
        let c = if self.buffered > 0 {
            self.buffered -= 1;
            self.ring[self.slot as usize % PUSHBACK]
        } else {
            let c = self.read_byte();
            self.ring[self.slot as usize % PUSHBACK] = c;
            c
        };
        self.slot += 1;
        c
    }

    /// Returns a byte to the stream.
    ///
    /// `c` must be exactly what the most recent `getc` returned; pushed
    /// back values are re-delivered newest first.
    pub fn ungetc(&mut self, c: Option<u8>) {
        self.buffered += 1;
        assert!(self.buffered < PUSHBACK, "pushback ring exhausted");
        assert!(self.slot > 0, "ungetc before any getc");
        self.slot -= 1;
        assert_eq!(
            self.ring[self.slot as usize % PUSHBACK],
            c,
            "ungetc of a byte that was not read at this slot"
        );
    }

    /// Probes whether `marker` follows, given that its first byte `c` has
    /// already been read.
    ///
    /// On a full match the marker is consumed and `true` is returned. On a
    /// mismatch every byte read beyond `c` is pushed back and `false` is
    /// returned; the caller still holds `c`.
    pub fn sequence_follows(&mut self, c: u8, marker: &[u8]) -> bool {
        if marker.is_empty() || c != marker[0] {
            return false;
        }
        let mut matched = 1;
        let mut last: Option<u8> = Some(c);
        while matched < marker.len() {
            last = self.getc();
            if last != Some(marker[matched]) {
                break;
            }
            matched += 1;
        }
        if matched == marker.len() {
            return true;
        }
        self.ungetc(last);
        while matched > 1 {
            matched -= 1;
            self.ungetc(Some(marker[matched]));
        }
        false
    }

    fn read_byte(&mut self) -> Option<u8> {
        let mut byte = [0u8; 1];
        loop {
            match self.inner.read(&mut byte) {
                Ok(0) => return None,
                Ok(_) => return Some(byte[0]),
                Err(ref e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(_) => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn reader(bytes: &[u8]) -> PushbackReader<Cursor<Vec<u8>>> {
        PushbackReader::new(Cursor::new(bytes.to_vec()))
    }

    #[test]
    fn test_getc_sequence() {
        let mut r = reader(b"abc");
        assert_eq!(r.getc(), Some(b'a'));
        assert_eq!(r.getc(), Some(b'b'));
        assert_eq!(r.getc(), Some(b'c'));
        assert_eq!(r.getc(), None);
        assert_eq!(r.getc(), None);
    }

    #[test]
    fn test_ungetc_roundtrip() {
        let mut r = reader(b"xy");
        let c = r.getc();
        assert_eq!(c, Some(b'x'));
        r.ungetc(c);
        assert_eq!(r.getc(), Some(b'x'));
        assert_eq!(r.getc(), Some(b'y'));
    }

    #[test]
    fn test_ungetc_multiple() {
        let mut r = reader(b"abcd");
        let a = r.getc();
        let b = r.getc();
        let c = r.getc();
        r.ungetc(c);
        r.ungetc(b);
        r.ungetc(a);
        assert_eq!(r.getc(), Some(b'a'));
        assert_eq!(r.getc(), Some(b'b'));
        assert_eq!(r.getc(), Some(b'c'));
        assert_eq!(r.getc(), Some(b'd'));
    }

    #[test]
    fn test_ungetc_eof() {
        let mut r = reader(b"a");
        assert_eq!(r.getc(), Some(b'a'));
        let end = r.getc();
        assert_eq!(end, None);
        r.ungetc(end);
        assert_eq!(r.getc(), None);
    }

    #[test]
    #[should_panic(expected = "ungetc of a byte that was not read")]
    fn test_ungetc_wrong_byte_panics() {
        let mut r = reader(b"a");
        let _ = r.getc();
        r.ungetc(Some(b'z'));
    }

    #[test]
    fn test_sequence_follows_match() {
        let mut r = reader(b"/* rest");
        let c = r.getc().unwrap();
        assert!(r.sequence_follows(c, b"/*"));
        assert_eq!(r.getc(), Some(b' '));
    }

    #[test]
    fn test_sequence_follows_single_byte_marker() {
        let mut r = reader(b"#x");
        let c = r.getc().unwrap();
        assert!(r.sequence_follows(c, b"#"));
        assert_eq!(r.getc(), Some(b'x'));
    }

    #[test]
    fn test_sequence_follows_mismatch_restores() {
        let mut r = reader(b"/+rest");
        let c = r.getc().unwrap();
        assert!(!r.sequence_follows(c, b"/*"));
        // `c` stays with the caller; the lookahead is back in the stream
        assert_eq!(r.getc(), Some(b'+'));
        assert_eq!(r.getc(), Some(b'r'));
    }

    #[test]
    fn test_sequence_follows_partial_long_marker() {
        let mut r = reader(b"\"\"x\"\"\"tail");
        let c = r.getc().unwrap();
        assert!(!r.sequence_follows(c, b"\"\"\""));
        assert_eq!(r.getc(), Some(b'"'));
        assert_eq!(r.getc(), Some(b'x'));
        let c = r.getc().unwrap();
        assert!(r.sequence_follows(c, b"\"\"\""));
        assert_eq!(r.getc(), Some(b't'));
    }

    #[test]
    fn test_sequence_follows_at_eof() {
        let mut r = reader(b"/");
        let c = r.getc().unwrap();
        assert!(!r.sequence_follows(c, b"/*"));
        assert_eq!(r.getc(), None);
    }

    #[test]
    fn test_sequence_follows_wrong_first_byte() {
        let mut r = reader(b"abc");
        let c = r.getc().unwrap();
        assert!(!r.sequence_follows(c, b"xy"));
        // nothing consumed beyond `c`
        assert_eq!(r.getc(), Some(b'b'));
    }
}

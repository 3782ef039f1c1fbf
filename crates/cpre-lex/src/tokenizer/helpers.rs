//! Raw-byte scanning helpers.
//!
//! Directive parsing sometimes needs bytes, not tokens: an `#include`
//! filename runs to a closing delimiter, an `#error` message runs to the
//! end of the line, and horizontal whitespace is skipped without
//! materializing separator tokens. These helpers bypass tokenization but
//! share the pushback reader and the coordinate tracking.

use std::io::Read;

use crate::error::LexError;
use crate::{Tokenizer, MAX_LEXEME};

impl<R: Read> Tokenizer<R> {
    /// Reads raw bytes into the lexeme buffer until `end` or end of input.
    ///
    /// The terminator is not placed in the buffer. With `consume_end` it
    /// is consumed from the stream; otherwise it is pushed back and will
    /// be lexed normally. The buffer is readable via
    /// [`Tokenizer::buffer`].
    pub fn read_until(&mut self, end: u8, consume_end: bool) -> Result<(), LexError> {
        self.buf.clear();
        let start = self.pos();
        loop {
            let c = match self.reader.getc() {
                Some(c) => c,
                None => return Ok(()),
            };
            if c == end {
                if consume_end {
                    self.advance_coords(c);
                } else {
                    self.reader.ungetc(Some(c));
                }
                return Ok(());
            }
            self.advance_coords(c);
            self.buf.push(c);
            if self.buf.len() >= MAX_LEXEME {
                return Err(LexError::Overflow {
                    pos: start,
                    lexeme: self.buf.clone(),
                });
            }
        }
    }

    /// Consumes bytes while they are in `set`, returning how many were
    /// skipped. The first byte outside the set is pushed back.
    pub fn skip_chars(&mut self, set: &[u8]) -> usize {
        let mut count = 0;
        loop {
            let c = match self.reader.getc() {
                Some(c) => c,
                None => return count,
            };
            if !set.contains(&c) {
                self.reader.ungetc(Some(c));
                return count;
            }
            self.advance_coords(c);
            count += 1;
        }
    }

    fn advance_coords(&mut self, c: u8) {
        if c == b'\n' {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::Tokenizer;
    use std::io::Cursor;

    fn tokenizer(source: &[u8]) -> Tokenizer<Cursor<Vec<u8>>> {
        Tokenizer::new(Cursor::new(source.to_vec()), "test")
    }

    #[test]
    fn test_read_until_keeps_terminator() {
        let mut t = tokenizer(b"file.h\" rest");
        t.read_until(b'"', false).unwrap();
        assert_eq!(t.buffer(), "file.h");
        // terminator was pushed back
        t.set_parse_strings(false);
        assert!(t.next_token().unwrap().is_sep(b'"'));
    }

    #[test]
    fn test_read_until_consumes_terminator() {
        let mut t = tokenizer(b"message here\nnext");
        t.read_until(b'\n', true).unwrap();
        assert_eq!(t.buffer(), "message here");
        assert_eq!(t.line(), 2);
        assert_eq!(t.column(), 0);
        assert_eq!(t.next_token().unwrap().text, "next");
    }

    #[test]
    fn test_read_until_stops_at_eof() {
        let mut t = tokenizer(b"tail");
        t.read_until(b'\n', true).unwrap();
        assert_eq!(t.buffer(), "tail");
        assert!(t.next_token().unwrap().is_eof());
    }

    #[test]
    fn test_skip_chars() {
        let mut t = tokenizer(b" \t\t x");
        let count = t.skip_chars(b" \t");
        assert_eq!(count, 4);
        assert_eq!(t.column(), 4);
        assert_eq!(t.next_token().unwrap().text, "x");
    }

    #[test]
    fn test_skip_chars_none_matching() {
        let mut t = tokenizer(b"x");
        assert_eq!(t.skip_chars(b" \t"), 0);
        assert_eq!(t.next_token().unwrap().text, "x");
    }
}

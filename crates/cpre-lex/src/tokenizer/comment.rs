//! Comment skipping.
//!
//! Markers are plain byte strings registered at configuration time; the
//! scanner probes them through the pushback reader before anything else,
//! since marker bytes (like `/`) are usually separators themselves.

use std::io::Read;

use crate::Tokenizer;

impl<R: Read> Tokenizer<R> {
    /// Discards input through the end marker of a block comment.
    ///
    /// The start marker has already been consumed by the probe;
    /// `start_len` is its length, owed to the column counter. Line and
    /// column advance across embedded newlines. An unterminated comment
    /// ends silently at end of input.
    pub(crate) fn skip_block_comment(&mut self, start_len: usize, end_marker: &[u8]) {
        self.column += start_len as u32;
        loop {
            let c = match self.reader.getc() {
                Some(c) => c,
                None => return,
            };
            if c == b'\n' {
                self.line += 1;
                self.column = 0;
            } else {
                self.column += 1;
            }
            if self.reader.sequence_follows(c, end_marker) {
                // bytes past the first were consumed by the probe
                self.column += end_marker.len().saturating_sub(1) as u32;
                return;
            }
        }
    }

    /// Discards input up to, but not including, the next newline.
    ///
    /// The newline is pushed back so it is lexed as an ordinary separator
    /// and still reaches the output.
    pub(crate) fn skip_line_comment(&mut self, start_len: usize) {
        self.column += start_len as u32;
        loop {
            match self.reader.getc() {
                None => return,
                Some(b'\n') => {
                    self.reader.ungetc(Some(b'\n'));
                    return;
                },
                Some(_) => self.column += 1,
            }
        }
    }
}

//! Core tokenizer implementation.
//!
//! This module contains the `Tokenizer` struct, its configuration surface,
//! and the main scan loop.

use std::io::Read;

use bstr::{BStr, BString};
use cpre_util::SourcePos;

use crate::error::LexError;
use crate::reader::PushbackReader;
use crate::token::{is_separator, Token};

/// Capacity of the lexeme buffer. A single token longer than this is an
/// `Overflow` error.
pub const MAX_LEXEME: usize = 4096;

/// A per-call scanner over a byte source.
///
/// Each call to [`Tokenizer::next_token`] consumes input and produces one
/// token. The tokenizer tracks line (1-based) and column (0-based, bytes
/// since the last newline); a token's position is that of its first byte.
///
/// Comment markers and string lexing are configured per instance: the
/// preprocessor registers C markers on file tokenizers and none on the
/// tokenizers it opens over macro bodies.
pub struct Tokenizer<R> {
    pub(crate) reader: PushbackReader<R>,
    filename: String,
    pub(crate) line: u32,
    pub(crate) column: u32,
    pub(crate) buf: BString,
    pub(crate) ml_start: Option<Vec<u8>>,
    pub(crate) ml_end: Option<Vec<u8>>,
    pub(crate) sl_start: Option<Vec<u8>>,
    parse_strings: bool,
    /// A comment just terminated a lexeme; the next call yields a single
    /// synthetic space so the neighbors stay separated in the output.
    pending_space: bool,
}

impl<R: Read> Tokenizer<R> {
    /// Creates a tokenizer over `input`.
    ///
    /// `filename` is used only in diagnostics. String lexing starts
    /// enabled; no comment markers are registered.
    pub fn new(input: R, filename: impl Into<String>) -> Self {
        Self {
            reader: PushbackReader::new(input),
            filename: filename.into(),
            line: 1,
            column: 0,
            buf: BString::from(Vec::new()),
            ml_start: None,
            ml_end: None,
            sl_start: None,
            parse_strings: true,
            pending_space: false,
        }
    }

    /// Registers the multi-line comment marker pair (e.g. `/*` and `*/`).
    pub fn register_block_comment(&mut self, start: &str, end: &str) {
        self.ml_start = Some(start.as_bytes().to_vec());
        self.ml_end = Some(end.as_bytes().to_vec());
    }

    /// Registers the single-line comment marker (e.g. `//`).
    ///
    /// The comment runs up to, but not including, the next newline; the
    /// newline itself is lexed normally.
    pub fn register_line_comment(&mut self, start: &str) {
        self.sl_start = Some(start.as_bytes().to_vec());
    }

    /// Enables or disables string lexing. When disabled, quote characters
    /// are ordinary separators; `#include` filename parsing relies on
    /// this.
    pub fn set_parse_strings(&mut self, on: bool) {
        self.parse_strings = on;
    }

    /// Name of the input, for diagnostics.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Current line (1-based).
    pub fn line(&self) -> u32 {
        self.line
    }

    /// Current column (0-based, bytes consumed since the last newline).
    pub fn column(&self) -> u32 {
        self.column
    }

    /// Current position.
    pub fn pos(&self) -> SourcePos {
        SourcePos::new(self.line, self.column)
    }

    /// The lexeme buffer. After [`Tokenizer::read_until`] this holds the
    /// bytes read; after an error it holds the offending lexeme.
    pub fn buffer(&self) -> &BStr {
        self.buf.as_ref()
    }

    /// Produces the next token.
    ///
    /// Returns a token of kind `Eof` at end of input; a lexeme that fits
    /// no category, a too-long lexeme, or a truncated string literal is an
    /// error carrying the position and buffer contents.
    pub fn next_token(&mut self) -> Result<Token, LexError> {
        if self.pending_space {
            self.pending_space = false;
            return Ok(Token::sep(b' ', self.pos()));
        }
        self.buf.clear();
        let mut start = self.pos();
        loop {
            let c = match self.reader.getc() {
                Some(c) => c,
                None => {
                    // a lexeme pending at end of input is still a token;
                    // the next call reports Eof
                    if self.buf.is_empty() {
                        return Ok(Token::eof(self.pos()));
                    }
                    return self.categorize_buffer(start);
                },
            };

            // Comment markers are probed before the separator check: their
            // first byte is usually a separator itself.
            let block_hit = match &self.ml_start {
                Some(marker) => self.reader.sequence_follows(c, marker),
                None => false,
            };
            if block_hit {
                let start_len = self.ml_start.as_ref().map_or(0, Vec::len);
                let end = self.ml_end.clone().unwrap_or_default();
                self.skip_block_comment(start_len, &end);
                if !self.buf.is_empty() {
                    self.pending_space = true;
                    return self.categorize_buffer(start);
                }
                start = self.pos();
                continue;
            }

            let line_hit = match &self.sl_start {
                Some(marker) => self.reader.sequence_follows(c, marker),
                None => false,
            };
            if line_hit {
                let start_len = self.sl_start.as_ref().map_or(0, Vec::len);
                self.skip_line_comment(start_len);
                if !self.buf.is_empty() {
                    self.pending_space = true;
                    return self.categorize_buffer(start);
                }
                start = self.pos();
                continue;
            }

            if is_separator(c) {
                if self.buf.is_empty() {
                    return self.lex_separator(c, start);
                }
                self.reader.ungetc(Some(c));
                return self.categorize_buffer(start);
            }

            self.buf.push(c);
            self.column += 1;
            if self.buf.len() >= MAX_LEXEME {
                return Err(LexError::Overflow {
                    pos: start,
                    lexeme: self.buf.clone(),
                });
            }
        }
    }

    /// Lexes a single separator byte into a token, dispatching to string
    /// lexing for quotes when enabled.
    fn lex_separator(&mut self, c: u8, start: SourcePos) -> Result<Token, LexError> {
        self.buf.push(c);
        self.column += 1;
        if (c == b'"' || c == b'\'') && self.parse_strings {
            return self.lex_string(c, start);
        }
        let tok = Token::sep(c, start);
        if c == b'\n' {
            self.line += 1;
            self.column = 0;
        }
        Ok(tok)
    }
}

impl<R: Read> Iterator for Tokenizer<R> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_token() {
            Ok(tok) if tok.is_eof() => None,
            other => Some(other),
        }
    }
}

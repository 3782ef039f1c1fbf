//! String literal lexing.
//!
//! Entered from the scan loop when an unescaped quote is seen and string
//! parsing is enabled. The token text includes both quotes; escape
//! sequences are preserved verbatim, never decoded — the preprocessor
//! passes literals through untouched.

use std::io::Read;

use cpre_util::SourcePos;

use crate::error::LexError;
use crate::token::{Token, TokenKind};
use crate::{Tokenizer, MAX_LEXEME};

impl<R: Read> Tokenizer<R> {
    /// Lexes a quoted literal. The opening quote is already in the buffer.
    ///
    /// A raw newline inside the literal is malformed; end of input before
    /// the closing quote is its own error so the caller can report a
    /// truncated file distinctly.
    pub(crate) fn lex_string(&mut self, quote: u8, start: SourcePos) -> Result<Token, LexError> {
        let mut escaped = false;
        loop {
            let c = match self.reader.getc() {
                Some(c) => c,
                None => {
                    return Err(LexError::UnexpectedEof {
                        pos: start,
                        lexeme: self.buf.clone(),
                    })
                },
            };
            if c == b'\n' {
                return Err(LexError::Unknown {
                    pos: start,
                    lexeme: self.buf.clone(),
                });
            }
            self.buf.push(c);
            self.column += 1;
            if self.buf.len() >= MAX_LEXEME {
                return Err(LexError::Overflow {
                    pos: start,
                    lexeme: self.buf.clone(),
                });
            }
            if escaped {
                escaped = false;
            } else if c == quote {
                let kind = if quote == b'"' {
                    TokenKind::DqStringLit
                } else {
                    TokenKind::SqStringLit
                };
                return Ok(Token::with_text(kind, self.buf.clone(), start));
            } else if c == b'\\' {
                escaped = true;
            }
        }
    }
}

//! The preprocessor driver.
//!
//! Owns the context and the diagnostic emitter, and runs the main
//! line-framing loop: recognize directives at the start of each logical
//! line, expand identifiers on content lines, pass everything else
//! through.

use std::io::{self, Read, Write};

use bstr::BString;
use cpre_lex::{LexError, Token, TokenKind, Tokenizer};
use cpre_util::{Diagnostic, Emitter};

use crate::context::PreprocessorContext;
use crate::error::PreprocError;

/// Frame name used for tokenizers opened over macro bodies and captured
/// arguments.
pub(crate) const MACRO_FRAME: &str = "<macro>";

/// The preprocessor engine.
///
/// One value is one independent run: the macro table lives here and is
/// shared across `#include` recursion, nothing else is retained between
/// [`Preprocessor::parse_file`] calls except that table.
///
/// # Examples
///
/// ```
/// use std::io::Cursor;
/// use cpre_pp::Preprocessor;
///
/// let mut pp = Preprocessor::new();
/// let mut out = Vec::new();
/// pp.parse_file(
///     Cursor::new(b"#define X 42\nint a = X;\n".to_vec()),
///     "example",
///     &mut out,
/// )
/// .unwrap();
/// assert_eq!(out, b"int a = 42;\n");
/// ```
pub struct Preprocessor {
    pub(crate) ctx: PreprocessorContext,
    pub(crate) emitter: Emitter,
    ml_start: String,
    ml_end: String,
    sl_start: String,
}

impl Preprocessor {
    /// Creates a preprocessor reporting diagnostics to stderr, with
    /// C-family comment markers.
    pub fn new() -> Self {
        Self::with_emitter(Emitter::stderr())
    }

    /// Creates a preprocessor reporting diagnostics to the given emitter.
    pub fn with_emitter(emitter: Emitter) -> Self {
        Self {
            ctx: PreprocessorContext::new(),
            emitter,
            ml_start: "/*".to_string(),
            ml_end: "*/".to_string(),
            sl_start: "//".to_string(),
        }
    }

    /// Overrides the comment markers registered on input tokenizers.
    pub fn set_comment_markers(&mut self, block_start: &str, block_end: &str, line: &str) {
        self.ml_start = block_start.to_string();
        self.ml_end = block_end.to_string();
        self.sl_start = line.to_string();
    }

    /// The macro table and include state.
    pub fn context(&self) -> &PreprocessorContext {
        &self.ctx
    }

    /// The diagnostic emitter, for error/warning counts.
    pub fn emitter(&self) -> &Emitter {
        &self.emitter
    }

    /// Preprocesses `input` to `out`, reading until end of input.
    ///
    /// `filename` appears in diagnostics only; `#include` re-enters this
    /// method with the included file. Returns on the first hard error;
    /// whatever was already written to `out` stays written.
    pub fn parse_file<R: Read>(
        &mut self,
        input: R,
        filename: &str,
        out: &mut dyn Write,
    ) -> Result<(), PreprocError> {
        let mut t = Tokenizer::new(input, filename);
        t.register_block_comment(&self.ml_start, &self.ml_end);
        t.register_line_comment(&self.sl_start);
        tracing::debug!(file = filename, "preprocessing");

        loop {
            let mut curr = self.next_token(&mut t)?;
            if curr.is_eof() {
                break;
            }
            let newline = curr.pos.column == 0;
            if newline {
                let (tok, ws_count) = self.eat_whitespace(&mut t, curr)?;
                curr = tok;
                if ws_count > 0 {
                    out.write_all(b" ")?;
                }
                if curr.is_eof() {
                    break;
                }
            }
            if curr.is_sep(b'#') {
                if !newline {
                    self.error_tok(&t, &curr, "stray #");
                    return Err(PreprocError::Syntax("stray #".into()));
                }
                let Some(directive) = self.read_directive(&mut t)? else {
                    // an unrecognized directive ends the file without
                    // failing the run
                    return Ok(());
                };
                self.dispatch(&mut t, out, directive)?;
                continue;
            }
            if curr.kind == TokenKind::Identifier {
                let name = curr.text.clone();
                self.expand_macro(&mut t, out, &name, 0)?;
            } else {
                write_token(out, &curr)?;
            }
        }
        Ok(())
    }

    /// Fetches one token, converting tokenizer failures into diagnostics.
    pub(crate) fn next_token<R: Read>(
        &mut self,
        t: &mut Tokenizer<R>,
    ) -> Result<Token, PreprocError> {
        match t.next_token() {
            Ok(tok) => Ok(tok),
            Err(err) => Err(self.report_lex(t, err)),
        }
    }

    /// Emits a diagnostic for a tokenizer failure and wraps it.
    pub(crate) fn report_lex<R: Read>(&mut self, t: &Tokenizer<R>, err: LexError) -> PreprocError {
        self.emitter.emit(
            &Diagnostic::error(err.to_string())
                .at(t.filename(), err.pos())
                .with_lexeme(err.lexeme()),
        );
        PreprocError::Lexical(err)
    }

    /// Consumes horizontal whitespace tokens starting from `curr`,
    /// returning the first non-whitespace token and how many were eaten.
    pub(crate) fn eat_whitespace<R: Read>(
        &mut self,
        t: &mut Tokenizer<R>,
        mut curr: Token,
    ) -> Result<(Token, usize), PreprocError> {
        let mut count = 0;
        while curr.is_whitespace() {
            count += 1;
            curr = self.next_token(t)?;
        }
        Ok((curr, count))
    }

    /// Fetches the next token that is not a space, tab, or newline
    /// separator.
    pub(crate) fn next_non_ws<R: Read>(
        &mut self,
        t: &mut Tokenizer<R>,
    ) -> Result<Token, PreprocError> {
        loop {
            let tok = self.next_token(t)?;
            if tok.kind == TokenKind::Sep && matches!(tok.value, b' ' | b'\t' | b'\n') {
                continue;
            }
            return Ok(tok);
        }
    }

    /// Emits an error diagnostic at a token's position.
    pub(crate) fn error_tok<R: Read>(&mut self, t: &Tokenizer<R>, tok: &Token, message: &str) {
        self.emitter.emit(
            &Diagnostic::error(message)
                .at(t.filename(), tok.pos)
                .with_lexeme(t.buffer()),
        );
    }

    /// Emits an error diagnostic at the tokenizer's current position.
    pub(crate) fn error_here<R: Read>(&mut self, t: &Tokenizer<R>, message: &str) {
        self.emitter.emit(
            &Diagnostic::error(message)
                .at(t.filename(), t.pos())
                .with_lexeme(t.buffer()),
        );
    }

    /// Emits a warning diagnostic at the tokenizer's current position.
    pub(crate) fn warning_here<R: Read>(&mut self, t: &Tokenizer<R>, message: &str) {
        self.emitter.emit(
            &Diagnostic::warning(message)
                .at(t.filename(), t.pos())
                .with_lexeme(t.buffer()),
        );
    }
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new()
    }
}

/// Appends a token's textual form to a capture buffer.
pub(crate) fn push_token(buf: &mut BString, tok: &Token) {
    if tok.kind == TokenKind::Sep {
        buf.push(tok.value);
    } else {
        buf.extend_from_slice(&tok.text);
    }
}

/// Writes a token's textual form to the output.
pub(crate) fn write_token(out: &mut dyn Write, tok: &Token) -> io::Result<()> {
    if tok.kind == TokenKind::Sep {
        out.write_all(&[tok.value])
    } else {
        out.write_all(&tok.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cpre_util::SourcePos;

    #[test]
    fn test_push_token() {
        let mut buf = BString::from(Vec::new());
        push_token(&mut buf, &Token::sep(b'(', SourcePos::DUMMY));
        push_token(
            &mut buf,
            &Token::with_text(
                TokenKind::Identifier,
                BString::from("ab"),
                SourcePos::DUMMY,
            ),
        );
        push_token(&mut buf, &Token::sep(b')', SourcePos::DUMMY));
        assert_eq!(buf, "(ab)");
    }

    #[test]
    fn test_write_token() {
        let mut out = Vec::new();
        write_token(
            &mut out,
            &Token::with_text(TokenKind::DecIntLit, BString::from("42"), SourcePos::DUMMY),
        )
        .unwrap();
        write_token(&mut out, &Token::sep(b';', SourcePos::DUMMY)).unwrap();
        assert_eq!(out, b"42;");
    }
}

//! Directive recognition and handling.
//!
//! A directive is a logical line whose first non-whitespace token is `#`.
//! The name after `#` must come from a fixed set; `undef` and the
//! conditional names are reserved words that parse but do nothing.

use std::fs::File;
use std::io::{BufReader, Read, Write};

use bstr::BString;
use cpre_lex::{TokenKind, Tokenizer};

use crate::context::MacroDef;
use crate::error::PreprocError;
use crate::preprocessor::{push_token, Preprocessor};

/// Maximum `#include` nesting depth.
pub(crate) const MAX_INCLUDE_DEPTH: u32 = 64;

/// The recognized directive set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Directive {
    /// `#include "file"` or `#include <file>`.
    Include,
    /// `#error message` - fatal user diagnostic.
    Error,
    /// `#warning message` - non-fatal user diagnostic.
    Warning,
    /// `#define NAME body` or `#define NAME(params) body`.
    Define,
    /// Reserved, no effect.
    Undef,
    /// Reserved, no effect.
    If,
    /// Reserved, no effect.
    Elif,
    /// Reserved, no effect.
    Ifdef,
    /// Reserved, no effect.
    Endif,
}

impl Directive {
    /// Resolves a directive name, or `None` for unknown names.
    pub fn from_name(name: &[u8]) -> Option<Self> {
        match name {
            b"include" => Some(Directive::Include),
            b"error" => Some(Directive::Error),
            b"warning" => Some(Directive::Warning),
            b"define" => Some(Directive::Define),
            b"undef" => Some(Directive::Undef),
            b"if" => Some(Directive::If),
            b"elif" => Some(Directive::Elif),
            b"ifdef" => Some(Directive::Ifdef),
            b"endif" => Some(Directive::Endif),
            _ => None,
        }
    }

    /// The directive's source-level name.
    pub fn name(self) -> &'static str {
        match self {
            Directive::Include => "include",
            Directive::Error => "error",
            Directive::Warning => "warning",
            Directive::Define => "define",
            Directive::Undef => "undef",
            Directive::If => "if",
            Directive::Elif => "elif",
            Directive::Ifdef => "ifdef",
            Directive::Endif => "endif",
        }
    }
}

impl Preprocessor {
    /// Reads the directive name after a line-initial `#`.
    ///
    /// Returns `Ok(None)` when the token is not an identifier or names no
    /// known directive; both cases are diagnosed and end the current file
    /// with success.
    pub(crate) fn read_directive<R: Read>(
        &mut self,
        t: &mut Tokenizer<R>,
    ) -> Result<Option<Directive>, PreprocError> {
        let tok = self.next_non_ws(t)?;
        if tok.kind != TokenKind::Identifier {
            self.error_tok(t, &tok, "unexpected token");
            return Ok(None);
        }
        match Directive::from_name(&tok.text) {
            Some(directive) => Ok(Some(directive)),
            None => {
                self.error_tok(t, &tok, "unknown directive");
                Ok(None)
            },
        }
    }

    /// Runs one recognized directive.
    pub(crate) fn dispatch<R: Read>(
        &mut self,
        t: &mut Tokenizer<R>,
        out: &mut dyn Write,
        directive: Directive,
    ) -> Result<(), PreprocError> {
        match directive {
            Directive::Include => self.include_file(t, out),
            Directive::Error => self.user_diagnostic(t, true),
            Directive::Warning => self.user_diagnostic(t, false),
            Directive::Define => self.parse_macro(t),
            Directive::Undef
            | Directive::If
            | Directive::Elif
            | Directive::Ifdef
            | Directive::Endif => {
                tracing::debug!(directive = directive.name(), "reserved directive ignored");
                Ok(())
            },
        }
    }

    /// Handles `#include`: read the filename with string lexing disabled,
    /// open it literally, and recurse.
    fn include_file<R: Read>(
        &mut self,
        t: &mut Tokenizer<R>,
        out: &mut dyn Write,
    ) -> Result<(), PreprocError> {
        t.set_parse_strings(false);
        let opener = self.next_non_ws(t)?;
        let end = if opener.is_sep(b'"') {
            b'"'
        } else if opener.is_sep(b'<') {
            b'>'
        } else {
            self.error_tok(t, &opener, "expected one of [\"<]");
            return Err(PreprocError::Syntax("expected one of [\"<]".into()));
        };
        if let Err(err) = t.read_until(end, false) {
            return Err(self.report_lex(t, err));
        }
        let filename = String::from_utf8_lossy(t.buffer()).into_owned();
        let closer = self.next_token(t)?;
        if !closer.is_sep(end) {
            self.error_tok(t, &closer, "error parsing filename");
            return Err(PreprocError::Syntax("error parsing filename".into()));
        }
        t.set_parse_strings(true);

        if self.ctx.include_depth >= MAX_INCLUDE_DEPTH {
            self.error_here(t, "maximum include depth reached");
            return Err(PreprocError::Syntax("maximum include depth reached".into()));
        }
        // both "file" and <file> resolve to the literal name
        let file = match File::open(&filename) {
            Ok(file) => file,
            Err(err) => {
                self.error_here(t, &format!("cannot open '{}': {}", filename, err));
                return Err(PreprocError::Include {
                    path: filename,
                    source: err,
                });
            },
        };
        tracing::debug!(file = %filename, depth = self.ctx.include_depth, "entering include");
        self.ctx.include_depth += 1;
        let result = self.parse_file(BufReader::new(file), &filename, out);
        self.ctx.include_depth -= 1;
        result
    }

    /// Handles `#error` and `#warning`: the rest of the line is the
    /// message.
    fn user_diagnostic<R: Read>(
        &mut self,
        t: &mut Tokenizer<R>,
        fatal: bool,
    ) -> Result<(), PreprocError> {
        t.skip_chars(b" \t");
        let pos = t.pos();
        if let Err(err) = t.read_until(b'\n', true) {
            return Err(self.report_lex(t, err));
        }
        let message = String::from_utf8_lossy(t.buffer()).into_owned();
        let diag = if fatal {
            cpre_util::Diagnostic::error(message.as_str())
        } else {
            cpre_util::Diagnostic::warning(message.as_str())
        };
        self.emitter
            .emit(&diag.at(t.filename(), pos).with_lexeme(t.buffer()));
        if fatal {
            Err(PreprocError::User(message))
        } else {
            Ok(())
        }
    }

    /// Handles `#define`: parse the name and optional parameter list,
    /// then capture the body up to the first unescaped newline.
    fn parse_macro<R: Read>(&mut self, t: &mut Tokenizer<R>) -> Result<(), PreprocError> {
        t.skip_chars(b" \t");
        let name_tok = self.next_token(t)?;
        if name_tok.is_eof() {
            self.error_here(t, "missing macro name");
            return Err(PreprocError::Syntax("missing macro name".into()));
        }
        if name_tok.kind != TokenKind::Identifier {
            self.error_tok(t, &name_tok, "expected identifier");
            return Err(PreprocError::Syntax("expected identifier".into()));
        }
        let name = name_tok.text.clone();

        let mut params: Vec<BString> = Vec::new();
        let first = self.next_token(t)?;
        if first.is_eof() {
            self.error_here(t, "unexpected end of file in macro definition");
            return Err(PreprocError::Syntax(
                "unexpected end of file in macro definition".into(),
            ));
        }

        if first.is_sep(b'(') {
            // function-like: `(` must touch the name, and the scanner
            // guarantees it did or we would have seen whitespace first
            t.skip_chars(b" \t");
            loop {
                let param = self.next_token(t)?;
                if param.is_eof() {
                    self.error_here(t, "unexpected end of file in macro definition");
                    return Err(PreprocError::Syntax(
                        "unexpected end of file in macro definition".into(),
                    ));
                }
                if param.kind != TokenKind::Identifier {
                    self.error_tok(t, &param, "expected identifier for macro arg");
                    return Err(PreprocError::Syntax(
                        "expected identifier for macro arg".into(),
                    ));
                }
                if params.iter().any(|p| *p == param.text) {
                    self.error_tok(t, &param, "duplicate macro parameter");
                    return Err(PreprocError::Syntax("duplicate macro parameter".into()));
                }
                params.push(param.text.clone());
                t.skip_chars(b" \t");
                let sep = self.next_token(t)?;
                if sep.kind != TokenKind::Sep {
                    self.error_tok(t, &sep, "expected ) or ,");
                    return Err(PreprocError::Syntax("expected ) or ,".into()));
                }
                match sep.value {
                    b')' => {
                        t.skip_chars(b" \t");
                        break;
                    },
                    b',' => {
                        t.skip_chars(b" \t");
                    },
                    _ => {
                        self.error_tok(t, &sep, "expected ) or ,");
                        return Err(PreprocError::Syntax("expected ) or ,".into()));
                    },
                }
            }
        } else if first.is_whitespace() {
            // object-like; exactly one whitespace separator is consumed,
            // anything further belongs to the body
        } else if first.is_sep(b'\n') {
            // `#define NAME` alone: object-like with an empty body
            self.define_macro(name, params, BString::from(Vec::new()));
            return Ok(());
        } else {
            self.error_tok(t, &first, "expected whitespace or '(' after macro name");
            return Err(PreprocError::Syntax(
                "expected whitespace or '(' after macro name".into(),
            ));
        }

        let body = self.capture_body(t)?;
        self.define_macro(name, params, body);
        Ok(())
    }

    /// Captures a macro body token by token until an unescaped newline.
    ///
    /// A `\` separator arms a one-shot flag: a newline right after it is
    /// discarded along with the backslash (line continuation); any other
    /// token restores the backslash into the body and is captured
    /// normally.
    fn capture_body<R: Read>(&mut self, t: &mut Tokenizer<R>) -> Result<BString, PreprocError> {
        let mut body = BString::from(Vec::new());
        let mut continuation = false;
        loop {
            let tok = self.next_token(t)?;
            if tok.is_eof() {
                self.error_here(t, "unexpected end of file in macro definition");
                return Err(PreprocError::Syntax(
                    "unexpected end of file in macro definition".into(),
                ));
            }
            if tok.is_sep(b'\\') {
                if continuation {
                    body.push(b'\\');
                }
                continuation = true;
                continue;
            }
            if continuation {
                continuation = false;
                if tok.is_sep(b'\n') {
                    continue;
                }
                body.push(b'\\');
            }
            if tok.is_sep(b'\n') {
                break;
            }
            push_token(&mut body, &tok);
        }
        Ok(body)
    }

    fn define_macro(&mut self, name: BString, params: Vec<BString>, body: BString) {
        tracing::debug!(name = %name, params = params.len(), bytes = body.len(), "defined macro");
        let replaced = self.ctx.define(name, MacroDef::new(params, body));
        if replaced {
            tracing::debug!("previous definition replaced");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name() {
        assert_eq!(Directive::from_name(b"include"), Some(Directive::Include));
        assert_eq!(Directive::from_name(b"define"), Some(Directive::Define));
        assert_eq!(Directive::from_name(b"endif"), Some(Directive::Endif));
        assert_eq!(Directive::from_name(b"pragma"), None);
        assert_eq!(Directive::from_name(b""), None);
    }

    #[test]
    fn test_name_roundtrip() {
        for d in [
            Directive::Include,
            Directive::Error,
            Directive::Warning,
            Directive::Define,
            Directive::Undef,
            Directive::If,
            Directive::Elif,
            Directive::Ifdef,
            Directive::Endif,
        ] {
            assert_eq!(Directive::from_name(d.name().as_bytes()), Some(d));
        }
    }
}

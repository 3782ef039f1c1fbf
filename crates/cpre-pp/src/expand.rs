//! Macro expansion.
//!
//! Replacement is textual: the stored body is re-tokenized on every
//! expansion, parameters are replaced by re-tokenizing their captured
//! argument bytes, and identifiers found along the way are expanded
//! recursively. Arguments are expanded eagerly at each use site, and a
//! fixed depth limit takes the place of self-reference suppression.

use std::io::{Cursor, Read, Write};

use bstr::{BString, ByteSlice};
use cpre_lex::{TokenKind, Tokenizer};

use crate::context::MacroDef;
use crate::error::PreprocError;
use crate::preprocessor::{push_token, write_token, Preprocessor, MACRO_FRAME};

/// Maximum macro expansion depth.
pub(crate) const MAX_RECURSION: u32 = 32;

impl Preprocessor {
    /// Expands `name` to `out`, or writes it verbatim when it names no
    /// macro. For function-like macros the argument list is read from
    /// `t`, the stream the name was seen in.
    pub(crate) fn expand_macro<R: Read>(
        &mut self,
        t: &mut Tokenizer<R>,
        out: &mut dyn Write,
        name: &[u8],
        depth: u32,
    ) -> Result<(), PreprocError> {
        let Some(def) = self.ctx.lookup(name) else {
            out.write_all(name)?;
            return Ok(());
        };
        let def = def.clone();
        if depth > MAX_RECURSION {
            self.error_here(t, "max recursion level reached");
            return Err(PreprocError::Macro("max recursion level reached".into()));
        }
        tracing::trace!(name = %name.as_bstr(), depth, "expanding macro");
        let args = if def.is_function_like() {
            self.collect_args(t, &def)?
        } else {
            Vec::new()
        };
        self.replay_body(out, &def, &args, depth)
    }

    /// Collects one captured byte buffer per parameter from a call site.
    ///
    /// Commas only separate arguments at parenthesis depth zero; leading
    /// horizontal whitespace of each argument is skipped, everything else
    /// is captured verbatim.
    fn collect_args<R: Read>(
        &mut self,
        t: &mut Tokenizer<R>,
        def: &MacroDef,
    ) -> Result<Vec<BString>, PreprocError> {
        let opener = self.next_non_ws(t)?;
        if !opener.is_sep(b'(') {
            self.error_tok(t, &opener, "expected (");
            return Err(PreprocError::Syntax("expected (".into()));
        }
        let count = def.params.len();
        let mut args = vec![BString::from(Vec::new()); count];
        let mut curr_arg = 0usize;
        let mut need_arg = true;
        let mut parens = 0u32;
        t.skip_chars(b" \t");
        loop {
            let tok = self.next_token(t)?;
            if tok.is_eof() {
                self.warning_here(t, "unexpected end of file in macro arguments");
                break;
            }
            if parens == 0 && tok.is_sep(b',') {
                if need_arg {
                    self.error_tok(t, &tok, "unexpected: ','");
                    return Err(PreprocError::Macro("unexpected: ','".into()));
                }
                curr_arg += 1;
                if curr_arg >= count {
                    self.error_tok(t, &tok, "too many arguments for function macro");
                    return Err(PreprocError::Macro(
                        "too many arguments for function macro".into(),
                    ));
                }
                need_arg = true;
                t.skip_chars(b" \t");
                continue;
            }
            if tok.is_sep(b'(') {
                parens += 1;
            } else if tok.is_sep(b')') {
                if parens == 0 {
                    if curr_arg != count - 1 {
                        self.error_tok(t, &tok, "too few args for function macro");
                        return Err(PreprocError::Macro(
                            "too few args for function macro".into(),
                        ));
                    }
                    break;
                }
                parens -= 1;
            }
            need_arg = false;
            push_token(&mut args[curr_arg], &tok);
        }
        Ok(args)
    }

    /// Replays a macro body, substituting parameters and tracking the
    /// stringize operator.
    fn replay_body(
        &mut self,
        out: &mut dyn Write,
        def: &MacroDef,
        args: &[BString],
        depth: u32,
    ) -> Result<(), PreprocError> {
        let mut body = Tokenizer::new(Cursor::new(def.body.to_vec()), MACRO_FRAME);
        let mut hash_count = 0u32;
        loop {
            let tok = self.next_token(&mut body)?;
            if tok.is_eof() {
                break;
            }
            if tok.kind == TokenKind::Identifier {
                if let Some(index) = def.param_position(&tok.text) {
                    if hash_count == 1 {
                        self.stringize_argument(out, &args[index], depth)?;
                        hash_count = 0;
                    } else {
                        self.replay_argument(out, &args[index], depth)?;
                    }
                } else {
                    if hash_count == 1 {
                        self.error_tok(&body, &tok, "'#' is not followed by macro parameter");
                        return Err(PreprocError::Macro(
                            "'#' is not followed by macro parameter".into(),
                        ));
                    }
                    let name = tok.text.clone();
                    self.expand_macro(&mut body, out, &name, depth + 1)?;
                }
            } else if tok.is_sep(b'#') {
                hash_count += 1;
            } else {
                if hash_count == 1 {
                    self.error_tok(&body, &tok, "'#' is not followed by macro parameter");
                    return Err(PreprocError::Macro(
                        "'#' is not followed by macro parameter".into(),
                    ));
                }
                write_token(out, &tok)?;
            }
            if hash_count > 2 {
                self.error_tok(&body, &tok, "only two '#' characters allowed for macro expansion");
                return Err(PreprocError::Macro(
                    "only two '#' characters allowed for macro expansion".into(),
                ));
            }
        }
        Ok(())
    }

    /// Replays one captured argument, expanding identifiers found in it.
    fn replay_argument(
        &mut self,
        out: &mut dyn Write,
        arg: &BString,
        depth: u32,
    ) -> Result<(), PreprocError> {
        let mut tokens = Tokenizer::new(Cursor::new(arg.to_vec()), MACRO_FRAME);
        loop {
            let tok = self.next_token(&mut tokens)?;
            if tok.is_eof() {
                break;
            }
            if tok.kind == TokenKind::Identifier {
                let name = tok.text.clone();
                self.expand_macro(&mut tokens, out, &name, depth + 1)?;
            } else {
                write_token(out, &tok)?;
            }
        }
        Ok(())
    }

    /// Stringizes one argument: expand it into scratch space, escape
    /// backslashes and double quotes, and emit it wrapped in quotes.
    fn stringize_argument(
        &mut self,
        out: &mut dyn Write,
        arg: &BString,
        depth: u32,
    ) -> Result<(), PreprocError> {
        let mut scratch: Vec<u8> = Vec::new();
        self.replay_argument(&mut scratch, arg, depth)?;
        let mut quoted = Vec::with_capacity(scratch.len() + 2);
        quoted.push(b'"');
        for &b in &scratch {
            if b == b'"' || b == b'\\' {
                quoted.push(b'\\');
            }
            quoted.push(b);
        }
        quoted.push(b'"');
        out.write_all(&quoted)?;
        Ok(())
    }
}

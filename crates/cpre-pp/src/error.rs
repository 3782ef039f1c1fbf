//! Preprocessor error types.
//!
//! Every hard failure aborts the current `parse_file` invocation and
//! propagates; only `#warning` reports without failing. The variants
//! mirror where a failure was detected, not how it is rendered - the
//! human-readable diagnostic has already been emitted by the time one of
//! these is returned.

use std::io;

use cpre_lex::LexError;
use thiserror::Error;

/// A failed preprocessing run.
#[derive(Debug, Error)]
pub enum PreprocError {
    /// The tokenizer could not produce a token.
    #[error("lexical error: {0}")]
    Lexical(#[from] LexError),

    /// An unexpected token in a directive or a malformed macro
    /// definition.
    #[error("syntax error: {0}")]
    Syntax(String),

    /// A macro was used incorrectly: wrong argument count, misplaced
    /// stringize operator, or expansion recursion too deep.
    #[error("macro error: {0}")]
    Macro(String),

    /// An included file could not be opened.
    #[error("cannot open include file '{path}': {source}")]
    Include {
        /// The literal filename from the directive.
        path: String,
        /// The underlying open failure.
        #[source]
        source: io::Error,
    },

    /// The output sink failed.
    #[error("error writing output: {0}")]
    Output(#[from] io::Error),

    /// An `#error` directive fired.
    #[error("#error: {0}")]
    User(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(
            PreprocError::Syntax("stray #".into()).to_string(),
            "syntax error: stray #"
        );
        assert_eq!(
            PreprocError::Macro("too few args for function macro".into()).to_string(),
            "macro error: too few args for function macro"
        );
        assert_eq!(
            PreprocError::User("unsupported platform".into()).to_string(),
            "#error: unsupported platform"
        );
    }

    #[test]
    fn test_include_carries_path() {
        let err = PreprocError::Include {
            path: "missing.h".into(),
            source: io::Error::new(io::ErrorKind::NotFound, "not found"),
        };
        assert!(err.to_string().contains("missing.h"));
    }
}

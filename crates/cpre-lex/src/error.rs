//! Tokenizer error types.

use bstr::{BStr, BString};
use cpre_util::SourcePos;
use thiserror::Error;

/// A failure to produce a token.
///
/// The scanner never panics on input; every malformed construct maps to
/// one of these variants, each carrying the position and the lexeme
/// buffer at the time of failure so the caller can build a diagnostic.
#[derive(Debug, Error)]
pub enum LexError {
    /// The accumulated lexeme fits no category.
    #[error("malformed token")]
    Unknown {
        /// Position of the lexeme's first byte.
        pos: SourcePos,
        /// The uncategorizable lexeme.
        lexeme: BString,
    },

    /// The lexeme buffer capacity was exceeded.
    #[error("token too long")]
    Overflow {
        /// Position of the lexeme's first byte.
        pos: SourcePos,
        /// The buffer contents at the point of overflow.
        lexeme: BString,
    },

    /// End of input inside a string literal.
    #[error("unexpected end of file in string literal")]
    UnexpectedEof {
        /// Position of the opening quote.
        pos: SourcePos,
        /// The partial literal, opening quote included.
        lexeme: BString,
    },
}

impl LexError {
    /// Position the error was detected at.
    pub fn pos(&self) -> SourcePos {
        match self {
            LexError::Unknown { pos, .. }
            | LexError::Overflow { pos, .. }
            | LexError::UnexpectedEof { pos, .. } => *pos,
        }
    }

    /// The lexeme buffer at the time of the error.
    pub fn lexeme(&self) -> &BStr {
        match self {
            LexError::Unknown { lexeme, .. }
            | LexError::Overflow { lexeme, .. }
            | LexError::UnexpectedEof { lexeme, .. } => lexeme.as_ref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = LexError::Unknown {
            pos: SourcePos::new(2, 4),
            lexeme: BString::from("1z"),
        };
        assert_eq!(err.to_string(), "malformed token");
        assert_eq!(err.pos(), SourcePos::new(2, 4));
        assert_eq!(err.lexeme(), "1z");
    }

    #[test]
    fn test_overflow_accessors() {
        let err = LexError::Overflow {
            pos: SourcePos::new(1, 0),
            lexeme: BString::from("aaaa"),
        };
        assert_eq!(err.to_string(), "token too long");
        assert_eq!(err.lexeme(), "aaaa");
    }
}

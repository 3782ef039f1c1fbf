//! Token model.
//!
//! Tokens carry their kind, source position, and either a separator byte
//! (`Sep`) or an owned copy of the lexeme (everything else). Copying the
//! lexeme into the token costs an allocation per token but means a token
//! never dangles when the scanner's buffer is reused for the next one.

use std::fmt;

use bstr::BString;
use cpre_util::SourcePos;

/// The separator set: any of these bytes terminates lexeme accumulation
/// and becomes a single-byte `Sep` token.
pub const SEPARATORS: &[u8] = b" \t\n()[]<>{}\\?:;.,!=+-*&|/%#'\"";

/// Returns true if `byte` is a separator.
#[inline]
pub fn is_separator(byte: u8) -> bool {
    SEPARATORS.contains(&byte)
}

/// Lexical category of a token.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenKind {
    /// `[_A-Za-z][_A-Za-z0-9]*`
    Identifier,
    /// Single-quoted literal, both quotes included in the text.
    SqStringLit,
    /// Double-quoted literal, both quotes included in the text.
    DqStringLit,
    /// The literal `...`.
    Ellipsis,
    /// `0x`/`0X`-prefixed integer, optional `u`/`l` tail.
    HexIntLit,
    /// `0`-prefixed octal integer (including plain `0`).
    OctIntLit,
    /// Decimal integer, optional `u`/`l` tail.
    DecIntLit,
    /// A single separator byte, carried in [`Token::value`].
    Sep,
    /// A lexeme that fits no category.
    Unknown,
    /// The lexeme buffer capacity was exceeded.
    Overflow,
    /// End of input.
    Eof,
}

impl TokenKind {
    /// Returns true for kinds whose tokens carry lexeme text.
    pub fn has_text(self) -> bool {
        matches!(
            self,
            TokenKind::Identifier
                | TokenKind::SqStringLit
                | TokenKind::DqStringLit
                | TokenKind::Ellipsis
                | TokenKind::HexIntLit
                | TokenKind::OctIntLit
                | TokenKind::DecIntLit
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Identifier => "iden",
            TokenKind::SqStringLit => "single-quoted string",
            TokenKind::DqStringLit => "double-quoted string",
            TokenKind::Ellipsis => "ellipsis",
            TokenKind::HexIntLit => "hexint",
            TokenKind::OctIntLit => "octint",
            TokenKind::DecIntLit => "decint",
            TokenKind::Sep => "separator",
            TokenKind::Unknown => "unknown",
            TokenKind::Overflow => "overflow",
            TokenKind::Eof => "eof",
        };
        write!(f, "{}", name)
    }
}

/// A single lexical token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    /// Lexical category.
    pub kind: TokenKind,
    /// Position of the token's first byte.
    pub pos: SourcePos,
    /// The separator byte; meaningful only for `Sep` tokens.
    pub value: u8,
    /// Owned lexeme text; empty for `Sep` and `Eof` tokens.
    pub text: BString,
}

impl Token {
    /// Creates a separator token.
    pub fn sep(value: u8, pos: SourcePos) -> Self {
        Self {
            kind: TokenKind::Sep,
            pos,
            value,
            text: BString::from(Vec::new()),
        }
    }

    /// Creates an end-of-input token.
    pub fn eof(pos: SourcePos) -> Self {
        Self {
            kind: TokenKind::Eof,
            pos,
            value: 0,
            text: BString::from(Vec::new()),
        }
    }

    /// Creates a token that carries lexeme text.
    pub fn with_text(kind: TokenKind, text: BString, pos: SourcePos) -> Self {
        Self {
            kind,
            pos,
            value: 0,
            text,
        }
    }

    /// Returns true if this is a `Sep` token for the given byte.
    #[inline]
    pub fn is_sep(&self, byte: u8) -> bool {
        self.kind == TokenKind::Sep && self.value == byte
    }

    /// Returns true for horizontal whitespace separators (space, tab).
    #[inline]
    pub fn is_whitespace(&self) -> bool {
        self.kind == TokenKind::Sep && (self.value == b' ' || self.value == b'\t')
    }

    /// Returns true at end of input.
    #[inline]
    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_separator_set() {
        for &b in b" \t\n()[]<>{}\\?:;.,!=+-*&|/%#'\"" {
            assert!(is_separator(b), "{:?} should be a separator", b as char);
        }
        for &b in b"abcXYZ_09$@^~`" {
            assert!(!is_separator(b), "{:?} should not be a separator", b as char);
        }
    }

    #[test]
    fn test_has_text() {
        assert!(TokenKind::Identifier.has_text());
        assert!(TokenKind::DqStringLit.has_text());
        assert!(TokenKind::Ellipsis.has_text());
        assert!(TokenKind::HexIntLit.has_text());
        assert!(!TokenKind::Sep.has_text());
        assert!(!TokenKind::Eof.has_text());
        assert!(!TokenKind::Unknown.has_text());
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(format!("{}", TokenKind::Identifier), "iden");
        assert_eq!(format!("{}", TokenKind::DecIntLit), "decint");
        assert_eq!(format!("{}", TokenKind::Sep), "separator");
        assert_eq!(format!("{}", TokenKind::Eof), "eof");
    }

    #[test]
    fn test_sep_helpers() {
        let tok = Token::sep(b'#', SourcePos::new(1, 0));
        assert!(tok.is_sep(b'#'));
        assert!(!tok.is_sep(b'('));
        assert!(!tok.is_whitespace());
        assert!(Token::sep(b' ', SourcePos::DUMMY).is_whitespace());
        assert!(Token::sep(b'\t', SourcePos::DUMMY).is_whitespace());
        assert!(!Token::sep(b'\n', SourcePos::DUMMY).is_whitespace());
    }
}

//! cpre-lex - Tokenizer for the cpre preprocessor.
//!
//! This crate turns a byte stream into a sequence of lexical tokens with
//! source coordinates. It is the bottom half of the preprocessor: the
//! directive and macro machinery in `cpre-pp` drives one [`Tokenizer`] per
//! input frame (the primary source, each included file, and every macro
//! body or captured argument replayed from memory).
//!
//! The scanner is deliberately simple:
//!
//! - A fixed separator set terminates lexeme accumulation; every separator
//!   byte is itself a one-byte [`Token`] of kind [`TokenKind::Sep`].
//! - Completed lexemes are categorized after the fact (ellipsis, integer
//!   literals, identifiers) rather than predicted character by character.
//! - Input is consumed through a small pushback ring ([`PushbackReader`])
//!   so multi-byte comment markers can be probed without buffering the
//!   whole input.
//! - Comment markers are configurable; the scanner itself knows nothing
//!   about any particular language's comment syntax.
//!
//! Lexemes are raw bytes, not UTF-8; token text is exposed as
//! [`bstr::BString`] so that arbitrary input round-trips.

pub mod error;
pub mod reader;
pub mod token;
pub mod tokenizer;

pub use error::LexError;
pub use reader::PushbackReader;
pub use token::{is_separator, Token, TokenKind, SEPARATORS};
pub use tokenizer::{Tokenizer, MAX_LEXEME};

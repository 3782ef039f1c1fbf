//! Tokenizer module.
//!
//! The implementation is split into focused pieces:
//! - `core` - the `Tokenizer` struct, configuration, and the scan loop
//! - `categorize` - lexeme classification (literals, identifiers)
//! - `string` - quoted literal lexing
//! - `comment` - configurable comment skipping
//! - `helpers` - raw-byte helpers used by directive parsing

mod categorize;
mod comment;
mod core;
mod helpers;
mod string;

pub use self::core::{Tokenizer, MAX_LEXEME};

//! cpre-util - Foundation types shared by the cpre engines.
//!
//! This crate provides the pieces both the tokenizer and the preprocessor
//! need but neither owns:
//!
//! - [`SourcePos`] - line/column coordinates attached to tokens and
//!   diagnostics. Lines are 1-based; columns are 0-based and count bytes
//!   consumed since the last newline.
//! - [`Diagnostic`] and [`Emitter`] - the error/warning report format and
//!   the sink it is rendered to. Diagnostics carry the offending lexeme so
//!   the emitter can echo and underline it.

pub mod diagnostic;
pub mod pos;

pub use diagnostic::{Diagnostic, Emitter, Level};
pub use pos::SourcePos;

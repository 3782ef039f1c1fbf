//! cpre-pp - The preprocessor engine.
//!
//! Drives a [`cpre_lex::Tokenizer`] over an input stream, recognizes
//! directives at the start of each logical line, and writes everything
//! else - macro-expanded - to an output sink.
//!
//! Supported directives: `#include` (literal filename, recursive),
//! `#define` (object-like and function-like macros with the `#` stringize
//! operator), `#error`, and `#warning`. The names `undef`, `if`, `elif`,
//! `ifdef`, and `endif` are reserved: they are accepted and ignored.
//!
//! All macro state lives in an explicit [`PreprocessorContext`] owned by
//! the [`Preprocessor`] and threaded through include recursion, so one
//! engine value is one independent preprocessing run.
//!
//! Expansion is textual and eager: a function-like macro's arguments are
//! captured unexpanded, then re-tokenized and expanded at every use site
//! in the body. There is no self-reference suppression; runaway recursion
//! is stopped by a fixed depth limit instead.

pub mod context;
pub mod directive;
pub mod error;
pub mod expand;
pub mod preprocessor;

pub use context::{MacroDef, PreprocessorContext};
pub use directive::Directive;
pub use error::PreprocError;
pub use preprocessor::Preprocessor;

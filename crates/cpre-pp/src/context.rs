//! Macro definitions and the preprocessing context.
//!
//! The context is the only mutable state shared across an entire run:
//! the macro table plus the current include nesting depth. It is owned by
//! the [`crate::Preprocessor`] and threaded through include recursion
//! rather than living in process-global storage, so independent runs
//! cannot observe each other.

use bstr::{BStr, BString};
use rustc_hash::FxHashMap;

/// A macro definition.
///
/// `params` is empty for object-like macros. The body is the raw byte
/// sequence captured between the definition's parameter list and its
/// terminating newline; it is re-tokenized from the start on every
/// expansion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MacroDef {
    /// Ordered parameter names; unique within one macro.
    pub params: Vec<BString>,
    /// Replacement body bytes.
    pub body: BString,
}

impl MacroDef {
    /// Creates a definition from its parameter list and body.
    pub fn new(params: Vec<BString>, body: BString) -> Self {
        Self { params, body }
    }

    /// Returns true if the macro takes arguments.
    pub fn is_function_like(&self) -> bool {
        !self.params.is_empty()
    }

    /// Position of `name` in the parameter list, by linear scan.
    pub fn param_position(&self, name: &[u8]) -> Option<usize> {
        self.params.iter().position(|p| p.as_slice() == name)
    }
}

/// State threaded through one preprocessing run.
#[derive(Debug, Default)]
pub struct PreprocessorContext {
    macros: FxHashMap<BString, MacroDef>,
    /// Current `#include` nesting depth.
    pub(crate) include_depth: u32,
}

impl PreprocessorContext {
    /// Creates an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a macro. Returns true if a previous definition
    /// was replaced.
    pub fn define(&mut self, name: BString, def: MacroDef) -> bool {
        self.macros.insert(name, def).is_some()
    }

    /// Looks up a macro by name.
    pub fn lookup(&self, name: &[u8]) -> Option<&MacroDef> {
        self.macros.get(BStr::new(name))
    }

    /// Returns true if `name` is defined.
    pub fn is_defined(&self, name: &[u8]) -> bool {
        self.lookup(name).is_some()
    }

    /// Number of defined macros.
    pub fn macro_count(&self) -> usize {
        self.macros.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn def(params: &[&str], body: &str) -> MacroDef {
        MacroDef::new(
            params.iter().map(|p| BString::from(*p)).collect(),
            BString::from(body),
        )
    }

    #[test]
    fn test_object_like() {
        let m = def(&[], "42");
        assert!(!m.is_function_like());
        assert_eq!(m.param_position(b"x"), None);
    }

    #[test]
    fn test_param_position() {
        let m = def(&["a", "b", "c"], "a+b+c");
        assert!(m.is_function_like());
        assert_eq!(m.param_position(b"a"), Some(0));
        assert_eq!(m.param_position(b"c"), Some(2));
        assert_eq!(m.param_position(b"d"), None);
    }

    #[test]
    fn test_define_and_lookup() {
        let mut ctx = PreprocessorContext::new();
        assert!(!ctx.define(BString::from("X"), def(&[], "1")));
        assert!(ctx.is_defined(b"X"));
        assert!(!ctx.is_defined(b"Y"));
        assert_eq!(ctx.lookup(b"X").unwrap().body, "1");
        assert_eq!(ctx.macro_count(), 1);
    }

    #[test]
    fn test_redefinition_replaces() {
        let mut ctx = PreprocessorContext::new();
        ctx.define(BString::from("X"), def(&[], "1"));
        assert!(ctx.define(BString::from("X"), def(&[], "2")));
        assert_eq!(ctx.lookup(b"X").unwrap().body, "2");
        assert_eq!(ctx.macro_count(), 1);
    }
}

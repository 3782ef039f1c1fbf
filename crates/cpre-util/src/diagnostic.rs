//! Diagnostic reporting infrastructure.
//!
//! Diagnostics are rendered to a dedicated error sink, separate from the
//! preprocessor's output stream, in the format
//!
//! ```text
//! <filename> line:column kind: 'message'
//! <offending lexeme>
//! ^^^^^^^^^^^^^^^^^^
//! ```
//!
//! The [`Emitter`] owns the sink and keeps running error/warning counts so
//! callers can decide an exit code without re-parsing their own output.

use std::fmt;
use std::io::Write;

use bstr::BString;

use crate::pos::SourcePos;

/// Diagnostic severity level.
///
/// # Examples
///
/// ```
/// use cpre_util::Level;
///
/// assert_eq!(format!("{}", Level::Error), "error");
/// assert_eq!(format!("{}", Level::Warning), "warning");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    /// A hard error; the current parse aborts after reporting.
    Error,
    /// A warning; parsing continues.
    Warning,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Error => write!(f, "error"),
            Level::Warning => write!(f, "warning"),
        }
    }
}

/// A single diagnostic message with location and the offending lexeme.
///
/// Built with a fluent API:
///
/// ```
/// use cpre_util::{Diagnostic, SourcePos};
///
/// let diag = Diagnostic::error("unexpected token")
///     .at("stdin", SourcePos::new(2, 5))
///     .with_lexeme(b"@@");
/// assert_eq!(diag.pos.line, 2);
/// ```
#[derive(Clone, Debug)]
pub struct Diagnostic {
    /// Severity level.
    pub level: Level,
    /// Main message text.
    pub message: String,
    /// Name of the input the diagnostic refers to.
    pub filename: String,
    /// Location in that input.
    pub pos: SourcePos,
    /// The scanner's lexeme buffer at the time of the report, echoed and
    /// underlined below the message.
    pub lexeme: BString,
}

impl Diagnostic {
    /// Creates a diagnostic with the given level and message.
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            filename: String::new(),
            pos: SourcePos::DUMMY,
            lexeme: BString::from(Vec::new()),
        }
    }

    /// Creates an error diagnostic.
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Level::Error, message)
    }

    /// Creates a warning diagnostic.
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Level::Warning, message)
    }

    /// Sets the input name and position.
    pub fn at(mut self, filename: impl Into<String>, pos: SourcePos) -> Self {
        self.filename = filename.into();
        self.pos = pos;
        self
    }

    /// Attaches the lexeme buffer to echo under the message.
    pub fn with_lexeme(mut self, lexeme: &[u8]) -> Self {
        self.lexeme = BString::from(lexeme);
        self
    }
}

/// Collects and renders diagnostics to an error sink.
///
/// Write failures on the sink are ignored: diagnostics are best-effort,
/// and the counts still record what was reported.
///
/// # Examples
///
/// ```
/// use cpre_util::{Diagnostic, Emitter, SourcePos};
///
/// let mut emitter = Emitter::new(Box::new(Vec::new()));
/// emitter.emit(&Diagnostic::error("boom").at("stdin", SourcePos::new(1, 0)));
/// assert!(emitter.has_errors());
/// assert_eq!(emitter.error_count(), 1);
/// ```
pub struct Emitter {
    sink: Box<dyn Write>,
    errors: usize,
    warnings: usize,
}

impl Emitter {
    /// Creates an emitter writing to the given sink.
    pub fn new(sink: Box<dyn Write>) -> Self {
        Self {
            sink,
            errors: 0,
            warnings: 0,
        }
    }

    /// Creates an emitter writing to standard error.
    pub fn stderr() -> Self {
        Self::new(Box::new(std::io::stderr()))
    }

    /// Renders a diagnostic to the sink and updates the counts.
    pub fn emit(&mut self, diagnostic: &Diagnostic) {
        match diagnostic.level {
            Level::Error => self.errors += 1,
            Level::Warning => self.warnings += 1,
        }
        let _ = writeln!(
            self.sink,
            "<{}> {} {}: '{}'",
            diagnostic.filename, diagnostic.pos, diagnostic.level, diagnostic.message
        );
        let _ = writeln!(self.sink, "{}", diagnostic.lexeme);
        let _ = writeln!(self.sink, "{}", "^".repeat(diagnostic.lexeme.len()));
        let _ = self.sink.flush();
    }

    /// Returns true if any errors have been emitted.
    pub fn has_errors(&self) -> bool {
        self.errors > 0
    }

    /// Number of errors emitted so far.
    pub fn error_count(&self) -> usize {
        self.errors
    }

    /// Number of warnings emitted so far.
    pub fn warning_count(&self) -> usize {
        self.warnings
    }
}

impl Default for Emitter {
    fn default() -> Self {
        Self::stderr()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// A writer handle that lets the test read back what was emitted.
    #[derive(Clone, Default)]
    struct SharedSink(Rc<RefCell<Vec<u8>>>);

    impl Write for SharedSink {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_level_display() {
        assert_eq!(format!("{}", Level::Error), "error");
        assert_eq!(format!("{}", Level::Warning), "warning");
    }

    #[test]
    fn test_diagnostic_builders() {
        let diag = Diagnostic::error("bad token")
            .at("input.c", SourcePos::new(4, 2))
            .with_lexeme(b"oops");
        assert_eq!(diag.level, Level::Error);
        assert_eq!(diag.message, "bad token");
        assert_eq!(diag.filename, "input.c");
        assert_eq!(diag.lexeme, "oops");
    }

    #[test]
    fn test_emit_format() {
        let sink = SharedSink::default();
        let mut emitter = Emitter::new(Box::new(sink.clone()));
        emitter.emit(
            &Diagnostic::error("stray #")
                .at("stdin", SourcePos::new(3, 7))
                .with_lexeme(b"abc"),
        );
        let text = String::from_utf8(sink.0.borrow().clone()).unwrap();
        assert_eq!(text, "<stdin> 3:7 error: 'stray #'\nabc\n^^^\n");
    }

    #[test]
    fn test_emit_empty_lexeme() {
        let sink = SharedSink::default();
        let mut emitter = Emitter::new(Box::new(sink.clone()));
        emitter.emit(&Diagnostic::warning("odd").at("stdin", SourcePos::new(1, 0)));
        let text = String::from_utf8(sink.0.borrow().clone()).unwrap();
        assert_eq!(text, "<stdin> 1:0 warning: 'odd'\n\n\n");
    }

    #[test]
    fn test_counts() {
        let mut emitter = Emitter::new(Box::new(Vec::new()));
        assert!(!emitter.has_errors());
        emitter.emit(&Diagnostic::warning("w"));
        assert!(!emitter.has_errors());
        assert_eq!(emitter.warning_count(), 1);
        emitter.emit(&Diagnostic::error("e"));
        emitter.emit(&Diagnostic::error("e2"));
        assert!(emitter.has_errors());
        assert_eq!(emitter.error_count(), 2);
        assert_eq!(emitter.warning_count(), 1);
    }
}

//! Source position tracking.
//!
//! This module provides the [`SourcePos`] type used to tag tokens and
//! diagnostics with their location in the input stream.

use std::fmt;

/// A position in a source stream.
///
/// Unlike typical compiler spans there is no byte-offset component: the
/// scanner works over a forward-only byte stream, so only line and column
/// are known.
///
/// # Examples
///
/// ```
/// use cpre_util::SourcePos;
///
/// let pos = SourcePos::new(3, 14);
/// assert_eq!(format!("{}", pos), "3:14");
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SourcePos {
    /// Line number (1-based).
    pub line: u32,
    /// Column number (0-based, bytes consumed since the last newline).
    pub column: u32,
}

impl SourcePos {
    /// A placeholder position for diagnostics with no usable location.
    pub const DUMMY: SourcePos = SourcePos { line: 0, column: 0 };

    /// Creates a position from line and column.
    #[inline]
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }

    /// Returns the position of the first byte of a stream.
    #[inline]
    pub const fn start() -> Self {
        Self { line: 1, column: 0 }
    }
}

impl fmt::Display for SourcePos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let pos = SourcePos::new(7, 42);
        assert_eq!(pos.line, 7);
        assert_eq!(pos.column, 42);
    }

    #[test]
    fn test_start() {
        let pos = SourcePos::start();
        assert_eq!(pos.line, 1);
        assert_eq!(pos.column, 0);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", SourcePos::new(12, 3)), "12:3");
        assert_eq!(format!("{}", SourcePos::DUMMY), "0:0");
    }
}

//! Source location types for tracking positions in Go source files.

use std::fmt;

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

/// A position within a project source file.
///
/// # Field Conventions
///
/// - `file` is relative to the project root
/// - `line` is 1-indexed (first line is line 1)
/// - `column` is 1-indexed and counts UTF-8 bytes, as the Go toolchain does
/// - `byte_offset` is the absolute byte position from the start of the file
///
/// # Examples
///
/// ```
/// use gm_core::SourceLocation;
///
/// let loc = SourceLocation::new("main.go", 10, 5, 245);
/// assert_eq!(loc.to_string(), "main.go:10:5");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SourceLocation {
    /// File path relative to the project root.
    pub file: Utf8PathBuf,

    /// Line number (1-indexed).
    pub line: u32,

    /// Column number (1-indexed byte column).
    pub column: u32,

    /// Absolute byte offset from the start of the file.
    pub byte_offset: u32,
}

impl SourceLocation {
    /// Creates a new source location.
    #[inline]
    #[must_use]
    pub fn new(file: impl Into<Utf8PathBuf>, line: u32, column: u32, byte_offset: u32) -> Self {
        Self {
            file: file.into(),
            line,
            column,
            byte_offset,
        }
    }

    /// Returns the same position attributed to another file.
    ///
    /// The parser produces locations before it knows where the file sits in
    /// the project; the scanner rebases them onto the relative path.
    #[must_use]
    pub fn with_file(mut self, file: impl Into<Utf8PathBuf>) -> Self {
        self.file = file.into();
        self
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_location_new() {
        let loc = SourceLocation::new("cmd/server/main.go", 10, 5, 245);
        assert_eq!(loc.file, "cmd/server/main.go");
        assert_eq!(loc.line, 10);
        assert_eq!(loc.column, 5);
        assert_eq!(loc.byte_offset, 245);
    }

    #[test]
    fn test_source_location_with_file() {
        let loc = SourceLocation::new("", 3, 1, 40).with_file("flows/summarize.go");
        assert_eq!(loc.file, "flows/summarize.go");
        assert_eq!(loc.line, 3);
    }

    #[test]
    fn test_source_location_display() {
        let loc = SourceLocation::new("main.go", 12, 14, 300);
        assert_eq!(loc.to_string(), "main.go:12:14");
    }

    #[test]
    fn test_source_location_serialization_shape() {
        let loc = SourceLocation::new("main.go", 1, 2, 3);
        let value = serde_json::to_value(&loc).unwrap();
        assert_eq!(value["file"], "main.go");
        assert_eq!(value["line"], 1);
        assert_eq!(value["column"], 2);
        assert_eq!(value["byte_offset"], 3);
    }
}

//! Error types for the gm-go-parser crate.
//!
//! This module provides the [`ParseError`] type for errors that can occur
//! while parsing Go source and extracting framework constructs.

/// Errors that can occur during Go parsing.
///
/// # Examples
///
/// ```
/// use gm_go_parser::ParseError;
///
/// fn describe(err: &ParseError) -> String {
///     match err {
///         ParseError::LanguageInit => "grammar unavailable".to_owned(),
///         ParseError::QueryCompile { offset, .. } => format!("bad query at {offset}"),
///         ParseError::Parse => "parser gave up".to_owned(),
///         ParseError::Syntax { line, column } => format!("syntax error at {line}:{column}"),
///     }
/// }
///
/// let msg = describe(&ParseError::Syntax { line: 3, column: 7 });
/// assert_eq!(msg, "syntax error at 3:7");
/// ```
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// Failed to set the Go language on the parser.
    #[error("failed to set Go language")]
    LanguageInit,

    /// Failed to compile a tree-sitter query.
    ///
    /// Contains the byte offset where the error occurred and the error kind.
    #[error("failed to compile query at offset {offset}: {kind:?}")]
    QueryCompile {
        /// The byte offset in the query string where the error occurred.
        offset: usize,
        /// The kind of query error.
        kind: tree_sitter::QueryError,
    },

    /// Failed to parse the source code.
    ///
    /// This typically indicates the parser ran out of memory or was cancelled.
    #[error("failed to parse source code")]
    Parse,

    /// The source is not syntactically valid Go.
    #[error("syntax error at line {line}, column {column}")]
    Syntax {
        /// Line of the first error (1-indexed).
        line: u32,
        /// Column of the first error (1-indexed).
        column: u32,
    },
}

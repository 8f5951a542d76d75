//! Pre-compiled tree-sitter queries for Go package and import extraction.
//!
//! This module provides the [`HEADER_QUERY`] constant containing S-expression
//! patterns for the package clause and import specs, and
//! [`get_header_query`] for lazily compiling and caching the query.

use std::sync::OnceLock;

use tree_sitter::{Language, Query};

use crate::error::ParseError;

/// Tree-sitter query for the header of a Go file.
///
/// # Capture Names
///
/// - `package.name` - The identifier in the `package` clause
/// - `import.path` - The string literal of each import spec, grouped or not
pub const HEADER_QUERY: &str = r"
; package main
(package_clause
  (package_identifier) @package.name)

; grouped or single imports, with or without an alias
(import_spec
  path: (_) @import.path)
";

/// Capture index for `package.name`.
pub const CAPTURE_PACKAGE_NAME: u32 = 0;

/// Capture index for `import.path`.
pub const CAPTURE_IMPORT_PATH: u32 = 1;

/// Global cache for the compiled header query.
static COMPILED_HEADER_QUERY: OnceLock<Query> = OnceLock::new();

/// Returns the compiled header query for Go.
///
/// The query is compiled once and cached for all subsequent calls.
/// This function is thread-safe.
///
/// # Errors
///
/// Returns [`ParseError::QueryCompile`] if the query fails to compile.
pub fn get_header_query() -> Result<&'static Query, ParseError> {
    if let Some(query) = COMPILED_HEADER_QUERY.get() {
        return Ok(query);
    }

    let language: Language = tree_sitter_go::LANGUAGE.into();
    let query = compile_query(&language)?;

    Ok(COMPILED_HEADER_QUERY.get_or_init(|| query))
}

/// Compiles the header query for the given language.
fn compile_query(language: &Language) -> Result<Query, ParseError> {
    Query::new(language, HEADER_QUERY).map_err(|e| ParseError::QueryCompile {
        offset: e.offset,
        kind: e,
    })
}

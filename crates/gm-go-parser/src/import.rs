//! Package and import extraction from Go source using tree-sitter queries.

use smallvec::SmallVec;
use streaming_iterator::StreamingIterator;
use tree_sitter::{Query, QueryCursor, Tree};

use crate::node::{node_text, string_literal};
use crate::queries::{CAPTURE_IMPORT_PATH, CAPTURE_PACKAGE_NAME};

/// Import path fragments that mark a file as using the framework.
pub const GENKIT_IMPORT_MARKERS: &[&str] = &["genkit", "firebase/genkit", "genkit/go/plugins"];

/// Package name and imports of a Go file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileHeader {
    /// Name from the `package` clause, empty if there is none.
    pub package_name: String,

    /// Import paths in source order, quotes stripped.
    pub imports: SmallVec<[String; 8]>,
}

impl FileHeader {
    /// Returns `true` if any import names the framework.
    #[must_use]
    pub fn has_genkit(&self) -> bool {
        self.imports.iter().any(|path| is_genkit_import(path))
    }
}

/// Returns `true` if an import path belongs to the framework or its plugins.
///
/// # Examples
///
/// ```
/// use gm_go_parser::is_genkit_import;
///
/// assert!(is_genkit_import("github.com/firebase/genkit/go/genkit"));
/// assert!(is_genkit_import("github.com/firebase/genkit/go/plugins/googleai"));
/// assert!(!is_genkit_import("net/http"));
/// ```
#[inline]
#[must_use]
pub fn is_genkit_import(path: &str) -> bool {
    GENKIT_IMPORT_MARKERS.iter().any(|marker| path.contains(marker))
}

/// Extracts the package name and import paths from a parsed Go tree.
pub fn extract_header(tree: &Tree, source: &str, query: &Query) -> FileHeader {
    let source_bytes = source.as_bytes();
    let mut cursor = QueryCursor::new();
    let mut header = FileHeader::default();
    let mut imports: SmallVec<[(usize, String); 8]> = SmallVec::new();

    let mut matches = cursor.matches(query, tree.root_node(), source_bytes);
    while let Some(match_) = matches.next() {
        for capture in match_.captures {
            let node = capture.node;
            match capture.index {
                idx if idx == CAPTURE_PACKAGE_NAME => {
                    if header.package_name.is_empty() {
                        if let Some(name) = node_text(node, source_bytes) {
                            name.clone_into(&mut header.package_name);
                        }
                    }
                }
                idx if idx == CAPTURE_IMPORT_PATH => {
                    if let Some(path) = string_literal(node, source_bytes) {
                        imports.push((node.start_byte(), path.to_owned()));
                    }
                }
                _ => {}
            }
        }
    }

    // Source order
    imports.sort_by_key(|(offset, _)| *offset);
    header.imports = imports.into_iter().map(|(_, path)| path).collect();
    header
}

//! Small helpers over tree-sitter nodes.

use gm_core::SourceLocation;
use tree_sitter::Node;

/// Extracts text from a node.
pub(crate) fn node_text<'a>(node: Node<'_>, source: &'a [u8]) -> Option<&'a str> {
    let start = node.start_byte();
    let end = node.end_byte();
    std::str::from_utf8(source.get(start..end)?).ok()
}

/// Converts a node's start position to a [`SourceLocation`] with no file.
///
/// # Note
///
/// The casts from `usize` to `u32` are safe because source files
/// are limited to 4GB, which fits in `u32`.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn node_to_location(node: Node<'_>) -> SourceLocation {
    let start = node.start_position();
    SourceLocation::new(
        "",
        start.row as u32 + 1,    // Convert 0-indexed to 1-indexed
        start.column as u32 + 1, // Go columns are 1-indexed too
        node.start_byte() as u32,
    )
}

/// Returns the contents of a Go string literal node, quotes stripped.
///
/// Handles interpreted (`"..."`) and raw (`` `...` ``) literals. Returns
/// `None` for any other node kind. Escape sequences are kept verbatim.
pub(crate) fn string_literal<'a>(node: Node<'_>, source: &'a [u8]) -> Option<&'a str> {
    let quote = match node.kind() {
        "interpreted_string_literal" => '"',
        "raw_string_literal" => '`',
        _ => return None,
    };
    let text = node_text(node, source)?;
    text.strip_prefix(quote)?.strip_suffix(quote)
}

/// Finds the first error or missing node in pre-order.
pub(crate) fn first_error(root: Node<'_>) -> Option<Node<'_>> {
    if !root.has_error() {
        return None;
    }
    let mut node = root;
    'descend: loop {
        if node.is_error() || node.is_missing() {
            return Some(node);
        }
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if child.has_error() {
                node = child;
                continue 'descend;
            }
        }
        // has_error() without an erroring child; report the node itself
        return Some(node);
    }
}

/// Declarations allowed at file scope after the `package` clause.
const FILE_SCOPE_KINDS: &[&str] = &[
    "import_declaration",
    "function_declaration",
    "method_declaration",
    "type_declaration",
    "var_declaration",
    "const_declaration",
];

/// Finds the first file-scope node that breaks the shape of a Go file.
///
/// Comments aside, a file must open with exactly one `package` clause and
/// hold nothing but declarations after it. tree-sitter accepts statements
/// at file scope without flagging an error, so they are caught here. A file
/// with no `package` clause at all reports the root.
pub(crate) fn first_misplaced<'t>(root: Node<'t>) -> Option<Node<'t>> {
    let mut seen_package = false;
    let mut cursor = root.walk();
    for child in root.named_children(&mut cursor) {
        match child.kind() {
            "comment" => {}
            "package_clause" if !seen_package => seen_package = true,
            kind if seen_package && FILE_SCOPE_KINDS.contains(&kind) => {}
            _ => return Some(child),
        }
    }
    (!seen_package).then_some(root)
}

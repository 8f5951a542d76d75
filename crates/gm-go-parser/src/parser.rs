//! Go parser management using tree-sitter.
//!
//! This module provides the [`GoParser`] struct for parsing Go files and
//! extracting framework constructs.

use camino::Utf8Path;
use gm_core::{Flow, Model, SourceFile};
use smallvec::SmallVec;
use tree_sitter::{Language, Parser};

use crate::error::ParseError;
use crate::import::{extract_header, FileHeader};
use crate::node::{first_error, first_misplaced, node_to_location};
use crate::queries::get_header_query;
use crate::shapes::{extract_constructs, Constructs};

/// Result of parsing a Go file.
#[derive(Debug)]
pub struct ParsedFile {
    /// Name from the `package` clause.
    pub package_name: String,

    /// Import paths in source order, quotes stripped.
    pub imports: SmallVec<[String; 8]>,

    /// Flow definitions, in traversal order. Locations carry no file.
    pub flows: Vec<Flow>,

    /// Model references, in traversal order. Locations carry no file.
    pub models: Vec<Model>,

    /// Whether any import names the framework.
    pub has_genkit: bool,
}

impl ParsedFile {
    /// Converts into a [`SourceFile`] if the file imports the framework.
    ///
    /// `absolute` becomes the file path; `relative` is attached to every
    /// construct location.
    #[must_use]
    pub fn into_source_file(self, absolute: &Utf8Path, relative: &Utf8Path) -> Option<SourceFile> {
        if !self.has_genkit {
            return None;
        }
        let flows = self
            .flows
            .into_iter()
            .map(|mut flow| {
                flow.location = flow.location.with_file(relative);
                flow
            })
            .collect();
        let models = self
            .models
            .into_iter()
            .map(|mut model| {
                model.location = model.location.with_file(relative);
                model
            })
            .collect();

        Some(SourceFile {
            path: absolute.to_owned(),
            package_name: self.package_name,
            imports: self.imports,
            flows,
            models,
            has_genkit: true,
        })
    }
}

/// Go parser for extracting framework constructs from source files.
///
/// Wraps a tree-sitter parser configured for Go. The parser can be reused
/// for multiple files to avoid repeated initialization.
///
/// # Thread Safety
///
/// `GoParser` is `Send` but not `Sync`. For parallel scanning with rayon,
/// create one parser per worker (`map_init`). The compiled header query is
/// shared globally.
///
/// # Examples
///
/// ```
/// use gm_go_parser::GoParser;
///
/// let mut parser = GoParser::new()?;
/// let source = r#"
/// package main
///
/// import "github.com/firebase/genkit/go/genkit"
///
/// func main() {
///     genkit.DefineFlow("summarize", handler)
/// }
/// "#;
///
/// let parsed = parser.parse(source)?;
/// assert!(parsed.has_genkit);
/// assert_eq!(parsed.flows[0].name, "summarize");
/// # Ok::<(), gm_go_parser::ParseError>(())
/// ```
pub struct GoParser {
    parser: Parser,
}

impl GoParser {
    /// Creates a new Go parser.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::LanguageInit`] if the Go language cannot be set
    /// on the parser.
    pub fn new() -> Result<Self, ParseError> {
        let mut parser = Parser::new();
        let language: Language = tree_sitter_go::LANGUAGE.into();

        parser
            .set_language(&language)
            .map_err(|_| ParseError::LanguageInit)?;

        Ok(Self { parser })
    }

    /// Parses Go source and extracts its header and constructs.
    ///
    /// Constructs are only collected from files that import the framework;
    /// other files come back with empty flow and model lists.
    ///
    /// # Errors
    ///
    /// - [`ParseError::Parse`] if tree-sitter gives up
    /// - [`ParseError::Syntax`] if the tree contains an error node, the file
    ///   lacks a `package` clause, or a statement sits at file scope
    /// - [`ParseError::QueryCompile`] if the header query fails to compile
    pub fn parse(&mut self, source: &str) -> Result<ParsedFile, ParseError> {
        let tree = self.parser.parse(source, None).ok_or(ParseError::Parse)?;

        let root = tree.root_node();
        if let Some(error) = first_error(root).or_else(|| first_misplaced(root)) {
            let location = node_to_location(error);
            return Err(ParseError::Syntax {
                line: location.line,
                column: location.column,
            });
        }

        let query = get_header_query()?;
        let header = extract_header(&tree, source, query);
        let has_genkit = header.has_genkit();
        let FileHeader {
            package_name,
            imports,
        } = header;

        let constructs = if has_genkit {
            extract_constructs(&tree, source)
        } else {
            Constructs::default()
        };

        Ok(ParsedFile {
            package_name,
            imports,
            flows: constructs.flows,
            models: constructs.models,
            has_genkit,
        })
    }

    /// Parses a file and returns its [`SourceFile`] if it is relevant.
    ///
    /// Irrelevant files yield `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Same as [`parse`](Self::parse).
    pub fn extract(
        &mut self,
        source: &str,
        absolute: &Utf8Path,
        relative: &Utf8Path,
    ) -> Result<Option<SourceFile>, ParseError> {
        Ok(self.parse(source)?.into_source_file(absolute, relative))
    }
}

impl std::fmt::Debug for GoParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoParser")
            .field("language", &"Go")
            .finish_non_exhaustive()
    }
}

//! Go parser using tree-sitter for Genkit flow and model detection.
//!
//! This crate parses Go source files to:
//!
//! - Extract the package name and import paths
//! - Decide whether a file uses the framework (any import containing `genkit`)
//! - Find flow definitions (`genkit.DefineFlow("name", ...)`) and model
//!   references (`genkit.Model("provider/model")`) with their positions
//! - Classify model identifiers by provider
//!
//! # Overview
//!
//! The main entry point is [`GoParser`]:
//!
//! ```
//! use gm_core::Provider;
//! use gm_go_parser::GoParser;
//!
//! let mut parser = GoParser::new()?;
//! let source = r#"
//! package main
//!
//! import "github.com/firebase/genkit/go/genkit"
//!
//! func main() {
//!     genkit.Model("googleai/gemini-1.5-pro")
//! }
//! "#;
//!
//! let parsed = parser.parse(source)?;
//! assert_eq!(parsed.models[0].provider, Provider::Gcp);
//! # Ok::<(), gm_go_parser::ParseError>(())
//! ```
//!
//! # Call Shapes
//!
//! Recognized calls are described by the [`CALL_SHAPES`] table; see the
//! [`shapes`] module. Only qualified calls with a literal string name are
//! recorded. Calls built from variables are ignored.
//!
//! # Thread Safety
//!
//! [`GoParser`] is `Send` but not `Sync`. Create one per rayon worker. The
//! underlying tree-sitter query is compiled once and shared globally.

#![deny(clippy::all)]
#![warn(missing_docs)]

mod classify;
pub mod error;
mod import;
mod node;
mod parser;
pub mod queries;
pub mod shapes;

pub use classify::{classify_model, PROVIDER_MARKERS};
pub use error::ParseError;
pub use import::{extract_header, is_genkit_import, FileHeader, GENKIT_IMPORT_MARKERS};
pub use parser::{GoParser, ParsedFile};
pub use shapes::{extract_constructs, CallShape, CallSite, Constructs, CALL_SHAPES};

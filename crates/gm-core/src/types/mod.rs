//! Domain types for the genkit-migrate tool.
//!
//! This module contains the core domain types shared by the parser, scanner and
//! transform crates: the analyzed [`Project`] and its constructs, and the
//! planned [`Migration`].
//!
//! # Module Organization
//!
//! - [`construct`] - Flows and model references found in source
//! - [`location`] - Source code locations
//! - [`migration`] - Planned changes and generated files
//! - [`project`] - The aggregated project and its source files
//! - [`provider`] - Backend provider tags
//!
//! # Re-exports
//!
//! All public types are re-exported at the crate root:
//!
//! ```
//! use gm_core::{Flow, Migration, Model, Project, Provider, SourceFile};
//! ```

mod construct;
mod location;
mod migration;
mod project;
mod provider;

pub use construct::{Flow, Model};
pub use location::SourceLocation;
pub use migration::{Change, ChangeKind, Migration};
pub use project::{Project, SourceFile};
pub use provider::{Provider, ProviderParseError};

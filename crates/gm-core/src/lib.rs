//! Core types, errors, and configuration for the genkit-migrate tool.
//!
//! This crate provides the foundational types shared across the workspace:
//!
//! - Domain types describing an analyzed Genkit project ([`Project`],
//!   [`SourceFile`], [`Flow`], [`Model`]) and the rewrite plan built from it
//!   ([`Migration`], [`Change`])
//! - The closed set of backend [`Provider`] tags
//! - Configuration structures ([`Config`]) and [`ConfigError`]

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod types;

pub use config::{Config, OutputConfig, ScanConfig};
pub use error::ConfigError;
pub use types::{
    Change, ChangeKind, Flow, Migration, Model, Project, Provider, ProviderParseError,
    SourceFile, SourceLocation,
};

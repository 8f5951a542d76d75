//! Error types for planning and materialization.

use std::{fmt, io};

use camino::{Utf8Path, Utf8PathBuf};
use gm_scanner::ScanError;
use thiserror::Error;

use crate::planner::PlanStep;

/// Errors produced while planning a migration.
///
/// A failed plan yields no partial [`Migration`](gm_core::Migration).
#[derive(Debug, Error)]
pub enum PlanError {
    /// A template failed to render.
    #[error("failed to render {step} template")]
    Template {
        /// The step that was rendering.
        step: PlanStep,
        /// The underlying formatter error.
        #[source]
        source: fmt::Error,
    },
}

/// Errors produced while writing a migrated project to disk.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// A file or directory operation failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// The path being written, copied or renamed.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The output path exists and is not an empty directory.
    #[error("output path already exists: {0}")]
    OutputExists(Utf8PathBuf),

    /// Walking the source project failed.
    #[error(transparent)]
    Scan(#[from] ScanError),

    /// Generation was cancelled before the output was renamed into place.
    #[error("generation cancelled")]
    Cancelled,

    /// The migration guide failed to render.
    #[error("failed to render migration guide")]
    Render(#[from] fmt::Error),
}

impl GenerateError {
    /// Creates an I/O error for `path`.
    pub fn io(path: impl AsRef<Utf8Path>, source: io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_owned(),
            source,
        }
    }
}

//! Error types for the gm-scanner crate.
//!
//! This module provides the [`ScanError`] type for errors that can occur
//! while walking a project and analyzing its files.

use camino::Utf8PathBuf;

/// Errors that can occur during scanning operations.
///
/// # Error Recovery Strategy
///
/// - **Per-entry errors** ([`ScanError::Walk`], [`ScanError::Read`],
///   [`ScanError::Parse`]): recoverable. Whether the scan continues is
///   decided by the caller's [`FailurePolicy`](crate::FailurePolicy).
/// - **Manifest errors** ([`ScanError::Manifest`]): always fatal.
/// - **Configuration errors**: always fatal.
///
/// # Examples
///
/// ```
/// use gm_scanner::ScanError;
///
/// fn handle_error(err: &ScanError) -> &'static str {
///     match err {
///         ScanError::Walk(_) => "walk",
///         ScanError::Read { .. } => "read",
///         ScanError::Parse { .. } => "parse",
///         ScanError::Manifest { .. } => "manifest",
///         ScanError::Config(_) => "config",
///         ScanError::NonUtf8Path(_) => "path",
///     }
/// }
///
/// assert_eq!(handle_error(&ScanError::config("bad root")), "config");
/// ```
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// Failed to read a directory entry.
    #[error("failed to walk directory: {0}")]
    Walk(#[from] ignore::Error),

    /// Failed to read a source file.
    #[error("failed to read file {path}: {source}")]
    Read {
        /// The path of the file that couldn't be read.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse a Go file.
    #[error("failed to parse file {path}: {source}")]
    Parse {
        /// The path of the file that couldn't be parsed.
        path: Utf8PathBuf,
        /// The underlying parse error.
        #[source]
        source: gm_go_parser::ParseError,
    },

    /// The module manifest is missing or unreadable.
    #[error("failed to read module manifest {path}: {source}")]
    Manifest {
        /// Path of the expected `go.mod`.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Invalid scanner configuration.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A path is not valid UTF-8.
    #[error("path is not valid UTF-8: {}", _0.display())]
    NonUtf8Path(std::path::PathBuf),
}

impl ScanError {
    /// Creates a new [`ScanError::Read`] error.
    #[inline]
    pub fn read(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    /// Creates a new [`ScanError::Parse`] error.
    #[inline]
    pub fn parse(path: impl Into<Utf8PathBuf>, source: gm_go_parser::ParseError) -> Self {
        Self::Parse {
            path: path.into(),
            source,
        }
    }

    /// Creates a new [`ScanError::Manifest`] error.
    #[inline]
    pub fn manifest(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        Self::Manifest {
            path: path.into(),
            source,
        }
    }

    /// Creates a new [`ScanError::Config`] error.
    #[inline]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Returns `true` if this error concerns a single entry and scanning
    /// could continue without it.
    #[inline]
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Walk(_) | Self::Read { .. } | Self::Parse { .. } | Self::NonUtf8Path(_)
        )
    }

    /// Returns `true` if this error is fatal (scanning should stop).
    #[inline]
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        !self.is_recoverable()
    }

    /// Returns the file path associated with this error, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Utf8PathBuf> {
        match self {
            Self::Read { path, .. } | Self::Parse { path, .. } | Self::Manifest { path, .. } => {
                Some(path)
            }
            Self::Walk(_) | Self::Config(_) | Self::NonUtf8Path(_) => None,
        }
    }
}

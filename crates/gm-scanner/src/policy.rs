//! What to do when a single file or directory entry fails.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ScanError;

/// Handling of recoverable per-entry errors.
///
/// Fatal errors abort under either policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Stop at the first error.
    #[default]
    Abort,
    /// Log a warning, skip the entry and keep going.
    SkipWithWarning,
}

impl FailurePolicy {
    /// Verbose runs skip bad entries; quiet runs abort on them.
    #[inline]
    #[must_use]
    pub const fn from_verbose(verbose: bool) -> Self {
        if verbose {
            Self::SkipWithWarning
        } else {
            Self::Abort
        }
    }

    /// Decides whether `error` stops the scan.
    ///
    /// Returns the error back as `Ok` when it was skipped, so the caller can
    /// keep it for the report.
    ///
    /// # Errors
    ///
    /// Returns `error` unchanged when the scan must stop.
    pub fn triage(self, error: ScanError) -> Result<ScanError, ScanError> {
        match self {
            Self::SkipWithWarning if error.is_recoverable() => {
                match error.path() {
                    Some(path) => warn!(path = %path, error = %error, "Skipping entry"),
                    None => warn!(error = %error, "Skipping entry"),
                }
                Ok(error)
            }
            _ => Err(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    fn read_error() -> ScanError {
        ScanError::read("a.go", io::Error::other("boom"))
    }

    #[test]
    fn test_from_verbose() {
        assert_eq!(FailurePolicy::from_verbose(true), FailurePolicy::SkipWithWarning);
        assert_eq!(FailurePolicy::from_verbose(false), FailurePolicy::Abort);
    }

    #[test]
    fn test_abort_returns_error() {
        assert!(FailurePolicy::Abort.triage(read_error()).is_err());
    }

    #[test]
    fn test_skip_keeps_recoverable_errors() {
        let skipped = FailurePolicy::SkipWithWarning
            .triage(read_error())
            .expect("read errors are skippable");
        assert!(matches!(skipped, ScanError::Read { .. }));
    }

    #[test]
    fn test_skip_still_aborts_on_fatal() {
        let err = ScanError::config("bad");
        assert!(FailurePolicy::SkipWithWarning.triage(err).is_err());
    }
}

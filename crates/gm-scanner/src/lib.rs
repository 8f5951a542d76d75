//! Project scanner for Genkit Go sources with parallel analysis.
//!
//! This crate turns a directory into a [`Project`]: it walks the tree for
//! `.go` files, parses them with `gm-go-parser`, and merges the relevant
//! ones together with the module manifest and root configuration files.
//!
//! # Overview
//!
//! The main entry point is [`Scanner`], which combines:
//!
//! - [`FileWalker`]: Sorted directory traversal with `vendor`/`.git` pruning
//! - [`FileAnalyzer`]: Parallel file processing with rayon
//! - [`read_go_mod`]: Module path and dependencies from `go.mod`
//! - [`probe_config_files`] and [`ProviderDetector`]: project-level facts
//! - [`ScanStats`]: Atomic statistics reported at the end
//!
//! # Example
//!
//! ```no_run
//! use gm_core::Provider;
//! use gm_scanner::{ScanOptions, Scanner};
//! use camino::Utf8Path;
//!
//! let options = ScanOptions::new()
//!     .with_source(Provider::Gcp)
//!     .with_target(Provider::Aws);
//! let report = Scanner::new(Utf8Path::new("./my-app"), options).scan()?;
//!
//! for flow in report.project.flows() {
//!     println!("{} at {}", flow.name, flow.location);
//! }
//! # Ok::<(), gm_scanner::ScanError>(())
//! ```
//!
//! # Architecture
//!
//! ```text
//! Scanner (main entry point)
//!     │
//!     ├── read_go_mod (fatal if missing)
//!     │
//!     ├── FileWalker (collect paths, sorted)
//!     │       │
//!     │       └── WalkBuilder (ignore crate)
//!     │
//!     ├── FileAnalyzer (parallel parsing, ordered collect)
//!     │       │
//!     │       └── GoParser (gm-go-parser)
//!     │
//!     ├── Project::add_file (walk order)
//!     │
//!     └── ScanStats (atomic counters)
//! ```
//!
//! # Determinism
//!
//! Paths are walked in lexical order and the parallel stage preserves input
//! order, so two scans of the same tree produce identical projects.

#![deny(clippy::all)]
#![warn(missing_docs)]

mod analyzer;
mod error;
mod manifest;
mod policy;
mod probe;
mod stats;
mod walker;

pub use analyzer::{FileAnalyzer, FileOutcome};
pub use error::ScanError;
pub use manifest::{parse_go_mod, read_go_mod, GoModule, MANIFEST_FILE};
pub use policy::FailurePolicy;
pub use probe::{probe_config_files, ProviderDetector, CONFIG_FILES};
pub use stats::{ScanStats, StatsSnapshot};
pub use walker::{FileWalker, WalkMode, SKIP_DIRECTORIES};

use camino::{Utf8Path, Utf8PathBuf};
use gm_core::{Project, Provider, ScanConfig};
use tracing::{debug, info};

/// Options for a single scan.
///
/// # Examples
///
/// ```
/// use gm_core::Provider;
/// use gm_scanner::{FailurePolicy, ScanOptions};
///
/// let options = ScanOptions::new()
///     .with_target(Provider::Aws)
///     .with_policy(FailurePolicy::SkipWithWarning)
///     .with_skip_dirs(&["testdata"]);
/// assert!(options.source.is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    /// Source provider. `None` detects it from the models found.
    pub source: Option<Provider>,
    /// Target provider, if a migration is planned.
    pub target: Option<Provider>,
    /// Handling of per-file errors.
    pub policy: FailurePolicy,
    /// Additional directory names to skip.
    pub skip_dirs: Vec<String>,
    /// Whether to follow symbolic links.
    pub follow_links: bool,
}

impl ScanOptions {
    /// Options with auto-detection, no target and [`FailurePolicy::Abort`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Options seeded from the walker settings of a loaded configuration.
    #[must_use]
    pub fn from_config(config: &ScanConfig) -> Self {
        Self {
            skip_dirs: config.extra_skip_dirs.clone(),
            follow_links: config.follow_links,
            ..Self::default()
        }
    }

    /// Fixes the source provider instead of detecting it.
    #[must_use]
    pub const fn with_source(mut self, source: Provider) -> Self {
        self.source = Some(source);
        self
    }

    /// Sets the target provider.
    #[must_use]
    pub const fn with_target(mut self, target: Provider) -> Self {
        self.target = Some(target);
        self
    }

    /// Sets the failure policy.
    #[must_use]
    pub const fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Adds directory names to skip.
    #[must_use]
    pub fn with_skip_dirs<S: AsRef<str>>(mut self, dirs: &[S]) -> Self {
        self.skip_dirs
            .extend(dirs.iter().map(|d| d.as_ref().to_owned()));
        self
    }
}

/// Result of a scan.
#[derive(Debug)]
pub struct ScanReport {
    /// The aggregated project.
    pub project: Project,
    /// Final counters.
    pub stats: StatsSnapshot,
    /// Recoverable errors that were skipped.
    pub skipped: Vec<ScanError>,
}

/// Scans one project directory.
#[derive(Debug, Clone)]
pub struct Scanner {
    root: Utf8PathBuf,
    options: ScanOptions,
}

impl Scanner {
    /// Creates a scanner for `root`.
    #[must_use]
    pub fn new(root: &Utf8Path, options: ScanOptions) -> Self {
        Self {
            root: root.to_owned(),
            options,
        }
    }

    /// Walks, parses and aggregates the project.
    ///
    /// # Errors
    ///
    /// - [`ScanError::Config`] if the root is not a directory
    /// - [`ScanError::Manifest`] if `go.mod` is missing or unreadable
    /// - Any per-file error when the policy is [`FailurePolicy::Abort`]
    pub fn scan(&self) -> Result<ScanReport, ScanError> {
        let root = &self.root;
        let policy = self.options.policy;
        info!(root = %root, "Starting scan");

        let walker = self.build_walker()?;
        let module = read_go_mod(root)?;
        debug!(
            module = module.module_path.as_deref().unwrap_or("-"),
            dependencies = module.dependencies.len(),
            "Read module manifest"
        );

        let stats = ScanStats::new();
        let mut skipped = Vec::new();

        let mut paths = Vec::new();
        for result in walker.walk() {
            match result {
                Ok(path) => paths.push(path),
                Err(e) => {
                    stats.increment_errors();
                    skipped.push(policy.triage(e)?);
                    stats.increment_skipped();
                }
            }
        }
        info!(count = paths.len(), "Collected Go files");

        let mut project = Project::new(
            root.clone(),
            self.options.source.unwrap_or_default(),
            self.options.target,
        );
        project.module_path = module.module_path;
        project.dependencies = module.dependencies;

        let results = FileAnalyzer::new(root, &stats).analyze_files(&paths);
        for (path, result) in results {
            match result {
                Ok(Some(file)) => {
                    let relative = path.strip_prefix(root).unwrap_or(&path).to_owned();
                    debug!(
                        path = %relative,
                        flows = file.flows.len(),
                        models = file.models.len(),
                        "Analyzed file"
                    );
                    project.add_file(relative, file);
                }
                Ok(None) => {}
                Err(e) => {
                    stats.increment_errors();
                    skipped.push(policy.triage(e)?);
                    stats.increment_skipped();
                }
            }
        }

        project.configuration = probe_config_files(root);

        if self.options.source.is_none() {
            let detected = ProviderDetector::detect(project.models()).unwrap_or_default();
            debug!(provider = %detected, "Detected source provider");
            project.source_provider = detected;
        }

        let stats = stats.snapshot();
        info!(
            visited = stats.visited,
            relevant = stats.relevant,
            flows = project.flows().len(),
            models = project.models().len(),
            skipped = stats.skipped,
            "Scan completed"
        );

        Ok(ScanReport {
            project,
            stats,
            skipped,
        })
    }

    /// Returns the scanned root.
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Returns the options in effect.
    #[inline]
    #[must_use]
    pub const fn options(&self) -> &ScanOptions {
        &self.options
    }

    fn build_walker(&self) -> Result<FileWalker, ScanError> {
        Ok(FileWalker::new(&self.root)?
            .with_skip_dirs(&self.options.skip_dirs)
            .with_follow_links(self.options.follow_links))
    }
}

/// Scans `root` with `options`. Shorthand for [`Scanner::scan`].
///
/// # Errors
///
/// See [`Scanner::scan`].
pub fn analyze_project(root: &Utf8Path, options: ScanOptions) -> Result<ScanReport, ScanError> {
    Scanner::new(root, options).scan()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_options_builders() {
        let options = ScanOptions::new()
            .with_source(Provider::Gcp)
            .with_target(Provider::Aws)
            .with_skip_dirs(&["testdata"]);
        assert_eq!(options.source, Some(Provider::Gcp));
        assert_eq!(options.target, Some(Provider::Aws));
        assert_eq!(options.skip_dirs, ["testdata"]);
        assert_eq!(options.policy, FailurePolicy::Abort);
    }

    #[test]
    fn test_scan_options_from_config() {
        let config = ScanConfig {
            extra_skip_dirs: vec!["third_party".to_owned()],
            follow_links: true,
        };
        let options = ScanOptions::from_config(&config);
        assert_eq!(options.skip_dirs, ["third_party"]);
        assert!(options.follow_links);
        assert!(options.source.is_none());
    }

    #[test]
    fn test_scanner_invalid_root() {
        let scanner = Scanner::new(Utf8Path::new("/nonexistent/project"), ScanOptions::new());
        let err = scanner.scan().unwrap_err();
        assert!(matches!(err, ScanError::Config(_)));
    }
}

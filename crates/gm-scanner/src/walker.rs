//! Directory traversal for Go projects.
//!
//! This module provides [`FileWalker`], which uses the `ignore` crate to walk
//! a project in a deterministic order.
//!
//! # Features
//!
//! - Yields `.go` files, or every regular file in [`WalkMode::AllFiles`]
//! - Prunes `vendor` and `.git` (plus configured names) from traversal
//! - Visits entries in lexical order within each directory
//! - Converts paths to UTF-8 [`Utf8PathBuf`]
//!
//! Ignore files (`.gitignore`, `.ignore`) and hidden-file rules are not
//! applied: a migrated project must keep every file the source tree has.
//!
//! # Examples
//!
//! ```no_run
//! use gm_scanner::FileWalker;
//! use camino::Utf8Path;
//!
//! let walker = FileWalker::new(Utf8Path::new("/path/to/project"))?;
//! for path in walker.walk() {
//!     println!("Found: {}", path?);
//! }
//! # Ok::<(), gm_scanner::ScanError>(())
//! ```

use camino::{Utf8Path, Utf8PathBuf};
use ignore::WalkBuilder;

use crate::error::ScanError;

/// Directories never descended into.
pub const SKIP_DIRECTORIES: &[&str] = &["vendor", ".git"];

/// Extension of the files yielded in [`WalkMode::GoSources`].
const GO_EXTENSION: &str = "go";

/// Which files a [`FileWalker`] yields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WalkMode {
    /// Only `.go` files.
    #[default]
    GoSources,
    /// Every regular file.
    AllFiles,
}

/// A file walker that discovers files in a project tree.
///
/// # Design
///
/// The walker uses a "collect-then-parallelize" pattern:
/// 1. Walker collects all paths first (single-threaded, I/O bound)
/// 2. Paths are then processed in parallel with rayon
///
/// Because the walk is sorted, the collected order is stable across runs.
#[derive(Debug, Clone)]
pub struct FileWalker {
    /// The root directory to walk.
    root: Utf8PathBuf,
    /// Additional directory names to skip.
    skip_dirs: Vec<String>,
    /// Exact paths to prune, such as an output directory inside the root.
    skip_paths: Vec<Utf8PathBuf>,
    /// Whether to follow symbolic links.
    follow_links: bool,
    /// Which files to yield.
    mode: WalkMode,
}

impl FileWalker {
    /// Creates a new file walker for the given root directory.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::Config`] if the root path doesn't exist or
    /// isn't a directory.
    pub fn new(root: &Utf8Path) -> Result<Self, ScanError> {
        if !root.exists() {
            return Err(ScanError::config(format!(
                "root path does not exist: {root}"
            )));
        }
        if !root.is_dir() {
            return Err(ScanError::config(format!(
                "root path is not a directory: {root}"
            )));
        }

        Ok(Self {
            root: root.to_owned(),
            skip_dirs: Vec::new(),
            skip_paths: Vec::new(),
            follow_links: false,
            mode: WalkMode::GoSources,
        })
    }

    /// Adds directory names to skip, in addition to [`SKIP_DIRECTORIES`].
    #[must_use]
    pub fn with_skip_dirs<S: AsRef<str>>(mut self, dirs: &[S]) -> Self {
        self.skip_dirs
            .extend(dirs.iter().map(|d| d.as_ref().to_owned()));
        self
    }

    /// Prunes an exact path (file or directory) from the walk.
    #[must_use]
    pub fn with_skip_path(mut self, path: impl Into<Utf8PathBuf>) -> Self {
        self.skip_paths.push(path.into());
        self
    }

    /// Configures whether to follow symbolic links.
    ///
    /// By default, symbolic links are not followed.
    #[must_use]
    pub const fn with_follow_links(mut self, follow: bool) -> Self {
        self.follow_links = follow;
        self
    }

    /// Selects which files are yielded.
    #[must_use]
    pub const fn with_mode(mut self, mode: WalkMode) -> Self {
        self.mode = mode;
        self
    }

    /// Lazily walks the tree.
    ///
    /// Entry errors are yielded in place rather than ending the iteration,
    /// so the caller decides whether to skip them.
    pub fn walk(&self) -> impl Iterator<Item = Result<Utf8PathBuf, ScanError>> + '_ {
        self.build_walker().filter_map(move |result| {
            let entry = match result {
                Ok(entry) => entry,
                Err(e) => return Some(Err(ScanError::Walk(e))),
            };

            // Skip directories, symlinks we don't follow and special files
            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                return None;
            }

            let path = match Utf8PathBuf::from_path_buf(entry.into_path()) {
                Ok(path) => path,
                Err(raw) => return Some(Err(ScanError::NonUtf8Path(raw))),
            };

            self.wants(&path).then_some(Ok(path))
        })
    }

    /// Collects every path, stopping at the first error.
    ///
    /// # Errors
    ///
    /// Returns the first [`ScanError::Walk`] or [`ScanError::NonUtf8Path`].
    pub fn collect_paths(&self) -> Result<Vec<Utf8PathBuf>, ScanError> {
        self.walk().collect()
    }

    /// Builds the ignore walker with configured settings.
    fn build_walker(&self) -> ignore::Walk {
        let mut skip_dirs: Vec<String> = SKIP_DIRECTORIES.iter().map(|d| (*d).to_owned()).collect();
        skip_dirs.extend(self.skip_dirs.iter().cloned());
        let skip_paths = self.skip_paths.clone();

        let mut builder = WalkBuilder::new(&self.root);
        builder
            // Plain traversal: no ignore files, hidden files included
            .standard_filters(false)
            .follow_links(self.follow_links)
            .sort_by_file_name(|a, b| a.cmp(b))
            .filter_entry(move |entry| {
                if entry.depth() == 0 {
                    return true;
                }
                if skip_paths.iter().any(|p| p.as_std_path() == entry.path()) {
                    return false;
                }
                let is_dir = entry.file_type().is_some_and(|ft| ft.is_dir());
                !(is_dir
                    && entry
                        .file_name()
                        .to_str()
                        .is_some_and(|name| skip_dirs.iter().any(|d| d == name)))
            });
        builder.build()
    }

    /// Checks a file against the walk mode.
    fn wants(&self, path: &Utf8Path) -> bool {
        match self.mode {
            WalkMode::AllFiles => true,
            WalkMode::GoSources => path.extension() == Some(GO_EXTENSION),
        }
    }

    /// Returns the root directory being walked.
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn project() -> (tempfile::TempDir, Utf8PathBuf) {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_owned()).expect("utf-8 tempdir");
        for rel in [
            "main.go",
            "go.mod",
            "b/flows.go",
            "a/util.go",
            "a/README.md",
            "vendor/dep/dep.go",
            ".git/hooks/pre-commit.go",
            "third_party/x.go",
        ] {
            let path = root.join(rel);
            fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
            fs::write(&path, "package x\n").expect("write");
        }
        (dir, root)
    }

    fn relative(root: &Utf8Path, paths: Vec<Utf8PathBuf>) -> Vec<String> {
        paths
            .into_iter()
            .map(|p| p.strip_prefix(root).expect("under root").to_string())
            .collect()
    }

    #[test]
    fn test_go_sources_sorted_and_pruned() {
        let (_dir, root) = project();
        let walker = FileWalker::new(&root).expect("walker");
        let paths = relative(&root, walker.collect_paths().expect("walk"));
        assert_eq!(paths, ["a/util.go", "b/flows.go", "main.go", "third_party/x.go"]);
    }

    #[test]
    fn test_extra_skip_dirs() {
        let (_dir, root) = project();
        let walker = FileWalker::new(&root)
            .expect("walker")
            .with_skip_dirs(&["third_party"]);
        let paths = relative(&root, walker.collect_paths().expect("walk"));
        assert!(!paths.iter().any(|p| p.starts_with("third_party")));
    }

    #[test]
    fn test_all_files_mode_and_skip_path() {
        let (_dir, root) = project();
        let walker = FileWalker::new(&root)
            .expect("walker")
            .with_mode(WalkMode::AllFiles)
            .with_skip_path(root.join("b"));
        let paths = relative(&root, walker.collect_paths().expect("walk"));
        assert_eq!(
            paths,
            ["a/README.md", "a/util.go", "go.mod", "main.go", "third_party/x.go"]
        );
    }

    #[test]
    fn test_walk_is_repeatable() {
        let (_dir, root) = project();
        let walker = FileWalker::new(&root).expect("walker");
        let first = walker.collect_paths().expect("walk");
        let second = walker.collect_paths().expect("walk");
        assert_eq!(first, second);
    }

    #[test]
    fn test_missing_root() {
        let err = FileWalker::new(Utf8Path::new("/definitely/not/here")).unwrap_err();
        assert!(matches!(err, ScanError::Config(_)));
    }
}

//! Parallel file analysis using rayon.
//!
//! This module provides [`FileAnalyzer`], which reads and parses Go files in
//! parallel.
//!
//! # Design
//!
//! Uses the "collect-then-parallelize" pattern:
//!
//! 1. Paths are collected first by [`FileWalker`](crate::FileWalker)
//! 2. `FileAnalyzer` processes paths in parallel with `rayon::par_iter()`
//! 3. Per-thread parsers are initialized via `map_init()`
//! 4. `collect()` keeps the input order, so results line up with the walk

use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use gm_core::SourceFile;
use gm_go_parser::{GoParser, ParseError};
use rayon::prelude::*;

use crate::error::ScanError;
use crate::stats::ScanStats;

/// Outcome for one path: a relevant file, an irrelevant one, or an error.
pub type FileOutcome = (Utf8PathBuf, Result<Option<SourceFile>, ScanError>);

/// Parallel Go file analyzer.
///
/// # Thread Safety
///
/// `FileAnalyzer` is both `Send` and `Sync`. It creates per-thread parsers
/// during analysis, so no shared mutable state exists beyond the atomic
/// [`ScanStats`].
#[derive(Debug)]
pub struct FileAnalyzer<'a> {
    root: &'a Utf8Path,
    stats: &'a ScanStats,
}

impl<'a> FileAnalyzer<'a> {
    /// Creates an analyzer for files under `root`.
    #[inline]
    #[must_use]
    pub const fn new(root: &'a Utf8Path, stats: &'a ScanStats) -> Self {
        Self { root, stats }
    }

    /// Analyzes multiple files in parallel.
    ///
    /// Returns one outcome per input path, in input order.
    #[must_use]
    pub fn analyze_files(&self, paths: &[Utf8PathBuf]) -> Vec<FileOutcome> {
        paths
            .par_iter()
            .map_init(
                || GoParser::new().ok(),
                |parser, path| {
                    let result = match parser.as_mut() {
                        Some(parser) => self.analyze_single(parser, path),
                        None => Err(ScanError::parse(path, ParseError::LanguageInit)),
                    };
                    (path.clone(), result)
                },
            )
            .collect()
    }

    /// Reads and parses one file.
    ///
    /// # Errors
    ///
    /// - [`ScanError::Read`] if the file cannot be read as UTF-8 text
    /// - [`ScanError::Parse`] if the file is not valid Go
    pub fn analyze_single(
        &self,
        parser: &mut GoParser,
        path: &Utf8Path,
    ) -> Result<Option<SourceFile>, ScanError> {
        let source = fs::read_to_string(path).map_err(|e| ScanError::read(path, e))?;
        self.stats.increment_visited();

        let relative = path.strip_prefix(self.root).unwrap_or(path);
        let file = parser
            .extract(&source, path, relative)
            .map_err(|e| ScanError::parse(path, e))?;

        if file.is_some() {
            self.stats.increment_relevant();
        }
        Ok(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(root: &Utf8Path, rel: &str, content: &str) -> Utf8PathBuf {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        fs::write(&path, content).expect("write");
        path
    }

    #[test]
    fn test_analyze_files_preserves_order() {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = Utf8Path::from_path(dir.path()).expect("utf-8 tempdir");
        let paths: Vec<_> = (0..16)
            .map(|i| {
                write(
                    root,
                    &format!("f{i:02}.go"),
                    &format!(
                        "package main\n\nimport \"github.com/firebase/genkit/go/genkit\"\n\nvar _ = genkit.DefineFlow(\"flow{i}\", nil)\n"
                    ),
                )
            })
            .collect();

        let stats = ScanStats::new();
        let results = FileAnalyzer::new(root, &stats).analyze_files(&paths);

        assert_eq!(results.len(), 16);
        for (i, (path, result)) in results.iter().enumerate() {
            assert_eq!(path, &paths[i]);
            let file = result.as_ref().expect("ok").as_ref().expect("relevant");
            assert_eq!(file.flows[0].name, format!("flow{i}"));
            assert_eq!(file.flows[0].location.file, format!("f{i:02}.go"));
        }
        assert_eq!(stats.snapshot().relevant, 16);
    }

    #[test]
    fn test_irrelevant_and_broken_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = Utf8Path::from_path(dir.path()).expect("utf-8 tempdir");
        let plain = write(root, "plain.go", "package main\n\nfunc main() {}\n");
        let broken = write(root, "broken.go", "package main\n\nfunc main( {\n");

        let stats = ScanStats::new();
        let results = FileAnalyzer::new(root, &stats).analyze_files(&[plain, broken]);

        assert!(matches!(results[0].1, Ok(None)));
        assert!(matches!(results[1].1, Err(ScanError::Parse { .. })));
        assert_eq!(stats.snapshot().visited, 2);
        assert_eq!(stats.snapshot().relevant, 0);
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = Utf8Path::from_path(dir.path()).expect("utf-8 tempdir");
        let stats = ScanStats::new();
        let results =
            FileAnalyzer::new(root, &stats).analyze_files(&[root.join("missing.go")]);
        assert!(matches!(results[0].1, Err(ScanError::Read { .. })));
    }
}

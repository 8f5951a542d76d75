//! Writes a planned migration to disk.
//!
//! The new tree is assembled in a staging directory next to the output and
//! renamed into place once complete. If anything fails before the rename the
//! staging directory is dropped and the output path is left as it was.
//! Cancelling the configured token counts as a failure.

use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use gm_core::Migration;
use gm_scanner::{FailurePolicy, FileWalker, WalkMode};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::GenerateError;
use crate::planner::PlanConfig;
use crate::templates;

/// Name of the generated migration guide.
pub const GUIDE_FILE: &str = "MIGRATION.md";

const STAGING_PREFIX: &str = ".genkit-migrate-";

/// Settings for one generation run.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Directory to create.
    pub output: Utf8PathBuf,
    /// Handling of unreadable entries in the source tree.
    pub policy: FailurePolicy,
    /// Directory names left out of the copy, besides `vendor` and `.git`.
    pub skip_dirs: Vec<String>,
    /// Whether to follow symbolic links while copying.
    pub follow_links: bool,
    /// Checked between files; once cancelled the run stops and cleans up.
    pub cancellation_token: CancellationToken,
}

impl GeneratorConfig {
    /// Settings that abort on the first error.
    #[must_use]
    pub fn new(output: impl Into<Utf8PathBuf>) -> Self {
        Self {
            output: output.into(),
            policy: FailurePolicy::Abort,
            skip_dirs: Vec::new(),
            follow_links: false,
            cancellation_token: CancellationToken::new(),
        }
    }

    /// Sets the failure policy.
    #[must_use]
    pub const fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Adds directory names to leave out.
    #[must_use]
    pub fn with_skip_dirs<S: AsRef<str>>(mut self, dirs: &[S]) -> Self {
        self.skip_dirs
            .extend(dirs.iter().map(|d| d.as_ref().to_owned()));
        self
    }

    /// Configures whether to follow symbolic links.
    #[must_use]
    pub const fn with_follow_links(mut self, follow: bool) -> Self {
        self.follow_links = follow;
        self
    }

    /// Stops the run when `token` is cancelled.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = token;
        self
    }
}

/// What a generation run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateReport {
    /// The created directory.
    pub output: Utf8PathBuf,
    /// Files written from the plan, including the guide.
    pub written: usize,
    /// Files copied unchanged from the project.
    pub copied: usize,
}

/// Materializes migrations.
#[derive(Debug, Clone)]
pub struct Generator {
    config: GeneratorConfig,
}

impl Generator {
    /// Creates a generator.
    #[must_use]
    pub const fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    /// Writes `migration` to the configured output directory.
    ///
    /// # Errors
    ///
    /// - [`GenerateError::OutputExists`] if the output is a file or a
    ///   non-empty directory
    /// - [`GenerateError::Io`] if staging, copying or the final rename fails
    /// - [`GenerateError::Scan`] if the project cannot be walked
    /// - [`GenerateError::Cancelled`] if the token fires before the rename
    pub fn generate(
        &self,
        migration: &Migration<'_>,
        plan: &PlanConfig,
    ) -> Result<GenerateReport, GenerateError> {
        let output = &self.config.output;
        let output_is_empty_dir = check_output(output)?;

        let parent = match output.parent() {
            Some(p) if !p.as_str().is_empty() => p.to_owned(),
            _ => Utf8PathBuf::from("."),
        };
        fs::create_dir_all(&parent).map_err(|e| GenerateError::io(&parent, e))?;

        let staging = tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .tempdir_in(&parent)
            .map_err(|e| GenerateError::io(&parent, e))?;
        let staging_path = Utf8Path::from_path(staging.path())
            .map(Utf8Path::to_owned)
            .ok_or_else(|| {
                GenerateError::Scan(gm_scanner::ScanError::NonUtf8Path(staging.path().to_owned()))
            })?;
        info!(output = %output, staging = %staging_path, "Generating migrated project");

        let mut written = 0;
        for (relative, content) in &migration.new_files {
            self.check_cancelled()?;
            write_file(&staging_path.join(relative), content)?;
            written += 1;
        }

        let copied = self.copy_untouched(migration, &staging_path)?;

        let mut guide = String::new();
        templates::migration_guide(&mut guide, migration, plan)?;
        write_file(&staging_path.join(GUIDE_FILE), &guide)?;
        written += 1;

        self.check_cancelled()?;
        if output_is_empty_dir {
            fs::remove_dir(output).map_err(|e| GenerateError::io(output, e))?;
        }
        let kept = staging.keep();
        if let Err(e) = fs::rename(&kept, output) {
            if let Err(cleanup) = fs::remove_dir_all(&kept) {
                warn!(staging = %staging_path, error = %cleanup, "Failed to remove staging directory");
            }
            return Err(GenerateError::io(output, e));
        }

        info!(output = %output, written, copied, "Migrated project written");
        Ok(GenerateReport {
            output: output.clone(),
            written,
            copied,
        })
    }

    fn check_cancelled(&self) -> Result<(), GenerateError> {
        if self.config.cancellation_token.is_cancelled() {
            debug!("Generation cancelled, dropping staging directory");
            return Err(GenerateError::Cancelled);
        }
        Ok(())
    }

    fn copy_untouched(
        &self,
        migration: &Migration<'_>,
        staging: &Utf8Path,
    ) -> Result<usize, GenerateError> {
        let root = &migration.project().path;
        let walker = FileWalker::new(root)?
            .with_mode(WalkMode::AllFiles)
            .with_skip_dirs(&self.config.skip_dirs)
            .with_follow_links(self.config.follow_links)
            .with_skip_path(self.config.output.clone())
            .with_skip_path(staging.to_owned());

        let mut copied = 0;
        for entry in walker.walk() {
            self.check_cancelled()?;
            let path = match entry {
                Ok(path) => path,
                Err(e) => {
                    self.config.policy.triage(e)?;
                    continue;
                }
            };
            let relative = path.strip_prefix(root).unwrap_or(&path);
            if migration.new_files.contains_key(relative)
                || migration.delete_files.iter().any(|d| d == relative)
                || relative == GUIDE_FILE
            {
                debug!(path = %relative, "Not copying planned file");
                continue;
            }

            let dest = staging.join(relative);
            ensure_parent(&dest)?;
            fs::copy(&path, &dest).map_err(|e| GenerateError::io(&path, e))?;
            copied += 1;
        }
        Ok(copied)
    }
}

/// Returns whether `output` is an existing empty directory.
fn check_output(output: &Utf8Path) -> Result<bool, GenerateError> {
    if !output.exists() {
        return Ok(false);
    }
    if !output.is_dir() {
        return Err(GenerateError::OutputExists(output.to_owned()));
    }
    let mut entries = fs::read_dir(output).map_err(|e| GenerateError::io(output, e))?;
    if entries.next().is_some() {
        return Err(GenerateError::OutputExists(output.to_owned()));
    }
    Ok(true)
}

fn ensure_parent(path: &Utf8Path) -> Result<(), GenerateError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| GenerateError::io(parent, e))?;
    }
    Ok(())
}

fn write_file(path: &Utf8Path, content: &str) -> Result<(), GenerateError> {
    ensure_parent(path)?;
    fs::write(path, content).map_err(|e| GenerateError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_output() {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = Utf8Path::from_path(dir.path()).expect("utf-8 tempdir");

        assert!(!check_output(&root.join("missing")).expect("absent is fine"));

        fs::create_dir(root.join("empty")).expect("mkdir");
        assert!(check_output(&root.join("empty")).expect("empty is fine"));

        fs::write(root.join("file"), "x").expect("write");
        assert!(matches!(
            check_output(&root.join("file")),
            Err(GenerateError::OutputExists(_))
        ));

        fs::create_dir(root.join("full")).expect("mkdir");
        fs::write(root.join("full/a"), "x").expect("write");
        assert!(matches!(
            check_output(&root.join("full")),
            Err(GenerateError::OutputExists(_))
        ));
    }
}

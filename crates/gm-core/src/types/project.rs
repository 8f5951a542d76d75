//! The aggregated project model.
//!
//! A [`Project`] owns every relevant [`SourceFile`] plus the project-wide
//! views (flows, models, dependencies, configuration files) the planner reads.

use std::collections::BTreeMap;

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::construct::{Flow, Model};
use super::provider::Provider;

/// A Go source file that imports the framework.
///
/// Files without a framework import never become a `SourceFile`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFile {
    /// Absolute path of the file.
    pub path: Utf8PathBuf,

    /// Name from the `package` clause.
    pub package_name: String,

    /// Import paths in source order, quotes stripped.
    pub imports: SmallVec<[String; 8]>,

    /// Flows defined in this file, in traversal order.
    pub flows: Vec<Flow>,

    /// Model references in this file, in traversal order.
    pub models: Vec<Model>,

    /// Whether any import path names the framework.
    pub has_genkit: bool,
}

/// A scanned Go project.
///
/// # Invariant
///
/// `flows` and `models` are exactly the concatenation, in insertion order, of
/// the lists held by each file. [`Project::add_file`] is the only way files
/// enter a project, and it maintains this.
///
/// # Examples
///
/// ```
/// use gm_core::{Project, Provider};
///
/// let project = Project::new("/src/app", Provider::Gcp, None);
/// assert!(project.files().is_empty());
/// assert!(project.flows().is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Root directory of the project.
    pub path: Utf8PathBuf,

    /// Provider the project currently targets.
    pub source_provider: Provider,

    /// Provider the migration targets, if one was requested.
    pub target_provider: Option<Provider>,

    /// Path from the `module` directive of `go.mod`.
    pub module_path: Option<String>,

    files: BTreeMap<Utf8PathBuf, SourceFile>,

    /// Module dependencies from `go.mod`, name to version.
    pub dependencies: BTreeMap<String, String>,

    flows: Vec<Flow>,

    models: Vec<Model>,

    /// Configuration files found at the root, filename to absolute path.
    pub configuration: BTreeMap<String, Utf8PathBuf>,
}

impl Project {
    /// Creates an empty project rooted at `path`.
    #[must_use]
    pub fn new(
        path: impl Into<Utf8PathBuf>,
        source_provider: Provider,
        target_provider: Option<Provider>,
    ) -> Self {
        Self {
            path: path.into(),
            source_provider,
            target_provider,
            module_path: None,
            files: BTreeMap::new(),
            dependencies: BTreeMap::new(),
            flows: Vec::new(),
            models: Vec::new(),
            configuration: BTreeMap::new(),
        }
    }

    /// Adds a file under its project-relative path.
    ///
    /// The file's flows and models are appended to the project-wide lists.
    /// Returns `false` and leaves the project unchanged if the file is not
    /// relevant or `relative` is already present.
    pub fn add_file(&mut self, relative: impl Into<Utf8PathBuf>, file: SourceFile) -> bool {
        let relative = relative.into();
        if !file.has_genkit || self.files.contains_key(&relative) {
            return false;
        }
        self.flows.extend(file.flows.iter().cloned());
        self.models.extend(file.models.iter().cloned());
        self.files.insert(relative, file);
        true
    }

    /// Relevant files, ordered by relative path.
    #[inline]
    #[must_use]
    pub const fn files(&self) -> &BTreeMap<Utf8PathBuf, SourceFile> {
        &self.files
    }

    /// Looks up a file by relative path.
    #[must_use]
    pub fn file(&self, relative: &Utf8Path) -> Option<&SourceFile> {
        self.files.get(relative)
    }

    /// Every flow in the project, in file insertion order.
    #[inline]
    #[must_use]
    pub fn flows(&self) -> &[Flow] {
        &self.flows
    }

    /// Every model reference in the project, in file insertion order.
    #[inline]
    #[must_use]
    pub fn models(&self) -> &[Model] {
        &self.models
    }

    /// Last path component of the root, if it has one.
    #[must_use]
    pub fn dir_name(&self) -> Option<&str> {
        self.path.file_name()
    }
}

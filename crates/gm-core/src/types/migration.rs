//! Planned migration output.

use std::collections::BTreeMap;
use std::fmt;

use camino::Utf8PathBuf;
use serde::Serialize;

use super::project::Project;

/// Category of a planned change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    /// Rewritten module manifest.
    Dependency,
    /// Rewritten import block.
    Import,
    /// Model identifier to replace.
    Model,
    /// Generated provider configuration.
    Configuration,
}

impl ChangeKind {
    /// Returns the lower-case tag for this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dependency => "dependency",
            Self::Import => "import",
            Self::Model => "model",
            Self::Configuration => "configuration",
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One planned change, relative to the project root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Change {
    /// What kind of change this is.
    pub kind: ChangeKind,

    /// Human-readable summary.
    pub description: String,

    /// File the change applies to, relative to the project root.
    pub file: Utf8PathBuf,

    /// Value being replaced, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_value: Option<String>,

    /// Replacement value, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_value: Option<String>,
}

impl Change {
    /// Creates a change with no old/new values.
    #[must_use]
    pub fn new(kind: ChangeKind, description: impl Into<String>, file: impl Into<Utf8PathBuf>) -> Self {
        Self {
            kind,
            description: description.into(),
            file: file.into(),
            old_value: None,
            new_value: None,
        }
    }

    /// Attaches the replaced and replacement values.
    #[must_use]
    pub fn with_values(mut self, old: impl Into<String>, new: impl Into<String>) -> Self {
        self.old_value = Some(old.into());
        self.new_value = Some(new.into());
        self
    }
}

/// A migration plan for one project.
///
/// Borrows the project it was planned from; the plan is only meaningful while
/// that project is alive. Changes are append-only.
///
/// # Examples
///
/// ```
/// use gm_core::{Change, ChangeKind, Migration, Project, Provider};
///
/// let project = Project::new("/app", Provider::Gcp, Some(Provider::Aws));
/// let mut migration = Migration::new(&project);
/// migration.push_change(Change::new(ChangeKind::Dependency, "Update go.mod", "go.mod"));
/// assert_eq!(migration.count(ChangeKind::Dependency), 1);
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct Migration<'p> {
    #[serde(skip)]
    project: &'p Project,

    changes: Vec<Change>,

    /// Generated file contents, keyed by project-relative path.
    pub new_files: BTreeMap<Utf8PathBuf, String>,

    /// Project-relative paths to leave out of the generated tree.
    pub delete_files: Vec<Utf8PathBuf>,

    /// Commands to run in the generated project.
    pub commands: Vec<String>,
}

impl<'p> Migration<'p> {
    /// Creates an empty plan for `project`.
    #[must_use]
    pub const fn new(project: &'p Project) -> Self {
        Self {
            project,
            changes: Vec::new(),
            new_files: BTreeMap::new(),
            delete_files: Vec::new(),
            commands: Vec::new(),
        }
    }

    /// The project this plan was made for.
    #[inline]
    #[must_use]
    pub const fn project(&self) -> &'p Project {
        self.project
    }

    /// Planned changes, in the order they were recorded.
    #[inline]
    #[must_use]
    pub fn changes(&self) -> &[Change] {
        &self.changes
    }

    /// Appends a change.
    pub fn push_change(&mut self, change: Change) {
        self.changes.push(change);
    }

    /// Sets the content of a generated file, returning the previous content.
    pub fn add_file(&mut self, path: impl Into<Utf8PathBuf>, content: String) -> Option<String> {
        self.new_files.insert(path.into(), content)
    }

    /// Marks a file to be left out of the generated tree.
    pub fn delete_file(&mut self, path: impl Into<Utf8PathBuf>) {
        let path = path.into();
        if !self.delete_files.contains(&path) {
            self.delete_files.push(path);
        }
    }

    /// Appends a command to run after generation.
    pub fn add_command(&mut self, command: impl Into<String>) {
        self.commands.push(command.into());
    }

    /// Number of changes of the given kind.
    #[must_use]
    pub fn count(&self, kind: ChangeKind) -> usize {
        self.changes.iter().filter(|c| c.kind == kind).count()
    }
}

//! Turns a scanned [`Project`] into a [`Migration`].
//!
//! Planning runs the steps of [`PlanStep::ORDER`] one after the other. Each
//! step only appends to the plan; when two steps produce the same path the
//! later one wins and the replacement is logged at debug level.

use std::collections::BTreeMap;
use std::fmt;

use gm_core::{Change, ChangeKind, Migration, Project, Provider};
use tracing::{debug, info};

use crate::error::PlanError;
use crate::mapping::{model_mappings, ModelMap};
use crate::templates;

/// Module name used when `go.mod` declares none.
pub const DEFAULT_MODULE: &str = "genkit-app";

/// Project name used when the root directory name yields nothing.
pub const DEFAULT_PROJECT_NAME: &str = "GenKitApp";

/// Framework modules that the generated manifest pins itself.
const FRAMEWORK_PREFIX: &str = "github.com/firebase/genkit";

/// Module path prefixes never carried over from the old manifest.
const PINNED_PREFIXES: &[&str] = &[FRAMEWORK_PREFIX, templates::GENKIT_AWS_MODULE];

/// One stage of planning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlanStep {
    /// Rewrites `go.mod`.
    Dependencies,
    /// Rewrites the import block of each framework source file.
    SourceFiles,
    /// Records model identifiers to replace.
    Models,
    /// Generates provider configuration.
    Configuration,
    /// Generates infrastructure and CI descriptors.
    Deployment,
}

impl PlanStep {
    /// Execution order.
    pub const ORDER: [Self; 5] = [
        Self::Dependencies,
        Self::SourceFiles,
        Self::Models,
        Self::Configuration,
        Self::Deployment,
    ];

    /// Returns a short name for this step.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dependencies => "dependencies",
            Self::SourceFiles => "source files",
            Self::Models => "models",
            Self::Configuration => "configuration",
            Self::Deployment => "deployment",
        }
    }
}

impl fmt::Display for PlanStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Provider pair a plan is made for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanConfig {
    /// Provider the project currently uses.
    pub source: Provider,
    /// Provider to migrate to.
    pub target: Provider,
}

impl PlanConfig {
    /// Takes both providers from the project, defaulting the target to AWS.
    #[must_use]
    pub fn for_project(project: &Project) -> Self {
        Self {
            source: project.source_provider,
            target: project.target_provider.unwrap_or(Provider::Aws),
        }
    }
}

/// Name fragments that tie a dependency to a provider's own SDKs.
#[must_use]
pub const fn vendor_markers(provider: Provider) -> &'static [&'static str] {
    match provider {
        Provider::Gcp => &["firebase", "google"],
        Provider::Aws => &["aws"],
        Provider::OpenAi => &["openai"],
        Provider::Anthropic => &["anthropic"],
        Provider::Ollama => &["ollama"],
        Provider::Azure => &["azure"],
        Provider::Unknown => &[],
    }
}

/// Dependencies that survive a move away from `source`, in name order.
///
/// Modules the rewritten manifest requires itself are dropped as well, so a
/// project that was already migrated doesn't end up with duplicates.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeMap;
/// use gm_core::Provider;
/// use gm_transform::filter_dependencies;
///
/// let deps = BTreeMap::from([
///     ("cloud.google.com/go/storage".to_owned(), "v1.40.0".to_owned()),
///     ("github.com/stretchr/testify".to_owned(), "v1.9.0".to_owned()),
/// ]);
/// let kept = filter_dependencies(&deps, Provider::Gcp);
/// assert_eq!(kept, [("github.com/stretchr/testify", "v1.9.0")]);
/// ```
#[must_use]
pub fn filter_dependencies(
    dependencies: &BTreeMap<String, String>,
    source: Provider,
) -> Vec<(&str, &str)> {
    let markers = vendor_markers(source);
    dependencies
        .iter()
        .filter(|(name, _)| !PINNED_PREFIXES.iter().any(|p| name.starts_with(p)))
        .filter(|(name, _)| !markers.iter().any(|m| name.contains(m)))
        .map(|(name, version)| (name.as_str(), version.as_str()))
        .collect()
}

/// `PascalCase` name of the project root, or [`DEFAULT_PROJECT_NAME`].
#[must_use]
pub fn project_name(project: &Project) -> String {
    let name: String = words(project)
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect()
            })
        })
        .collect();
    if name.is_empty() {
        DEFAULT_PROJECT_NAME.to_owned()
    } else {
        name
    }
}

/// `kebab-case` name of the project root, or [`DEFAULT_MODULE`].
#[must_use]
pub fn project_slug(project: &Project) -> String {
    let slug = words(project)
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-");
    if slug.is_empty() {
        DEFAULT_MODULE.to_owned()
    } else {
        slug
    }
}

fn words(project: &Project) -> impl Iterator<Item = &str> {
    project
        .dir_name()
        .unwrap_or_default()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
}

/// Builds migration plans for one provider pair.
///
/// # Examples
///
/// ```
/// use camino::Utf8Path;
/// use gm_core::{ChangeKind, Project, Provider};
/// use gm_transform::{PlanConfig, Planner};
///
/// let project = Project::new("/work/chat-bot", Provider::Gcp, Some(Provider::Aws));
/// let planner = Planner::new(PlanConfig::for_project(&project));
/// let migration = planner.plan(&project)?;
///
/// assert_eq!(migration.count(ChangeKind::Dependency), 1);
/// assert!(migration.new_files.contains_key(Utf8Path::new("terraform/main.tf")));
/// # Ok::<(), gm_transform::PlanError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Planner {
    config: PlanConfig,
    mappings: ModelMap,
}

impl Planner {
    /// Creates a planner and loads the mapping table for its provider pair.
    #[must_use]
    pub fn new(config: PlanConfig) -> Self {
        Self {
            config,
            mappings: model_mappings(config.source, config.target),
        }
    }

    /// The provider pair in effect.
    #[inline]
    #[must_use]
    pub const fn config(&self) -> &PlanConfig {
        &self.config
    }

    /// The mapping table in effect.
    #[inline]
    #[must_use]
    pub const fn mappings(&self) -> &ModelMap {
        &self.mappings
    }

    /// Plans the migration of `project`.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::Template`] if a template fails to render. No
    /// partial plan is returned.
    pub fn plan<'p>(&self, project: &'p Project) -> Result<Migration<'p>, PlanError> {
        info!(
            root = %project.path,
            source = %self.config.source,
            target = %self.config.target,
            "Planning migration"
        );

        let mut migration = Migration::new(project);
        for step in PlanStep::ORDER {
            self.run_step(step, project, &mut migration)
                .map_err(|source| PlanError::Template { step, source })?;
            debug!(step = %step, changes = migration.changes().len(), "Plan step done");
        }

        info!(
            changes = migration.changes().len(),
            new_files = migration.new_files.len(),
            commands = migration.commands.len(),
            "Migration planned"
        );
        Ok(migration)
    }

    fn run_step(
        &self,
        step: PlanStep,
        project: &Project,
        migration: &mut Migration<'_>,
    ) -> fmt::Result {
        match step {
            PlanStep::Dependencies => self.plan_dependencies(project, migration),
            PlanStep::SourceFiles => self.plan_source_files(project, migration),
            PlanStep::Models => {
                self.plan_models(project, migration);
                Ok(())
            }
            PlanStep::Configuration => self.plan_configuration(project, migration),
            PlanStep::Deployment => self.plan_deployment(project, migration),
        }
    }

    fn plan_dependencies(&self, project: &Project, migration: &mut Migration<'_>) -> fmt::Result {
        let module = project.module_path.as_deref().unwrap_or(DEFAULT_MODULE);
        let kept = filter_dependencies(&project.dependencies, self.config.source);
        debug!(
            kept = kept.len(),
            dropped = project.dependencies.len() - kept.len(),
            "Filtered dependencies"
        );

        let mut content = String::new();
        templates::go_mod(&mut content, module, self.config.target, kept)?;
        put(migration, PlanStep::Dependencies, "go.mod", content);

        migration.push_change(Change::new(
            ChangeKind::Dependency,
            format!("Updated dependencies for {}", self.config.target),
            "go.mod",
        ));
        migration.delete_file("go.sum");
        migration.add_command("go mod tidy");
        Ok(())
    }

    fn plan_source_files(&self, project: &Project, migration: &mut Migration<'_>) -> fmt::Result {
        for (relative, file) in project.files() {
            let mut content = String::new();
            templates::import_skeleton(
                &mut content,
                &file.package_name,
                self.config.target,
                relative.as_str(),
            )?;
            put(migration, PlanStep::SourceFiles, relative.as_str(), content);
            migration.push_change(Change::new(
                ChangeKind::Import,
                format!("Added {} imports", self.config.target),
                relative.clone(),
            ));
        }
        Ok(())
    }

    fn plan_models(&self, project: &Project, migration: &mut Migration<'_>) {
        for model in project.models() {
            let Some(replacement) = self.mappings.get(&model.name) else {
                debug!(model = %model.name, at = %model.location, "No mapping for model");
                continue;
            };
            migration.push_change(
                Change::new(
                    ChangeKind::Model,
                    format!("Map model {} -> {replacement}", model.name),
                    model.location.file.clone(),
                )
                .with_values(model.name.clone(), replacement),
            );
        }
    }

    fn plan_configuration(&self, project: &Project, migration: &mut Migration<'_>) -> fmt::Result {
        if self.config.target != Provider::Aws {
            return Ok(());
        }
        let mut content = String::new();
        templates::aws_config(&mut content, &project_name(project))?;
        put(migration, PlanStep::Configuration, "config.yaml", content);
        migration.push_change(Change::new(
            ChangeKind::Configuration,
            "Generated AWS configuration",
            "config.yaml",
        ));
        Ok(())
    }

    fn plan_deployment(&self, project: &Project, migration: &mut Migration<'_>) -> fmt::Result {
        if self.config.target != Provider::Aws {
            return Ok(());
        }
        put(
            migration,
            PlanStep::Deployment,
            "terraform/main.tf",
            templates::TERRAFORM_MAIN.to_owned(),
        );

        let mut variables = String::new();
        templates::terraform_variables(&mut variables, &project_slug(project))?;
        put(migration, PlanStep::Deployment, "terraform/variables.tf", variables);

        let mut dockerfile = String::new();
        templates::dockerfile(&mut dockerfile)?;
        put(migration, PlanStep::Deployment, "Dockerfile", dockerfile);

        let mut workflow = String::new();
        templates::deploy_workflow(&mut workflow)?;
        put(migration, PlanStep::Deployment, ".github/workflows/deploy.yml", workflow);

        migration.add_command("terraform -chdir=terraform init");
        migration.add_command("terraform -chdir=terraform plan");
        Ok(())
    }
}

fn put(migration: &mut Migration<'_>, step: PlanStep, path: &str, content: String) {
    if migration.add_file(path, content).is_some() {
        debug!(step = %step, path, "Replaced earlier plan entry");
    }
}

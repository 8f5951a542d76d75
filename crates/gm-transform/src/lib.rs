//! Migration planning and output for Genkit Go projects.
//!
//! Given a [`Project`](gm_core::Project) from `gm-scanner`, the [`Planner`]
//! produces a [`Migration`](gm_core::Migration): a new `go.mod`, import
//! skeletons for framework source files, advisory model replacements and,
//! for AWS, configuration and deployment descriptors. The [`Generator`]
//! writes that plan next to a verbatim copy of the rest of the project.
//!
//! # Example
//!
//! ```no_run
//! use camino::Utf8Path;
//! use gm_core::Provider;
//! use gm_scanner::{analyze_project, ScanOptions};
//! use gm_transform::{Generator, GeneratorConfig, PlanConfig, Planner};
//!
//! let report = analyze_project(
//!     Utf8Path::new("./my-app"),
//!     ScanOptions::new().with_target(Provider::Aws),
//! )?;
//! let plan = PlanConfig::for_project(&report.project);
//! let migration = Planner::new(plan).plan(&report.project)?;
//! Generator::new(GeneratorConfig::new("./my-app_aws")).generate(&migration, &plan)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

mod error;
mod generator;
mod mapping;
mod planner;
pub mod templates;

pub use error::{GenerateError, PlanError};
pub use generator::{GenerateReport, Generator, GeneratorConfig, GUIDE_FILE};
pub use mapping::{model_mappings, ModelMap};
pub use planner::{
    filter_dependencies, project_name, project_slug, vendor_markers, PlanConfig, PlanStep,
    Planner, DEFAULT_MODULE, DEFAULT_PROJECT_NAME,
};

//! Scan, plan and generate over throwaway Go projects.

use std::fs;
use std::path::Path;

use camino::{Utf8Path, Utf8PathBuf};
use gm_core::{ChangeKind, Provider};
use gm_scanner::{analyze_project, ScanOptions};
use gm_transform::templates::GENKIT_AWS_MODULE;
use gm_transform::{
    vendor_markers, GenerateError, Generator, GeneratorConfig, PlanConfig, Planner, GUIDE_FILE,
};
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

const GO_MOD: &str = "module github.com/acme/summarizer

go 1.22

require (
	github.com/firebase/genkit/go v0.5.0
	github.com/firebase/genkit/go/plugins/googleai v0.5.0
	cloud.google.com/go/vertexai v0.12.0
	github.com/google/uuid v1.6.0
	github.com/stretchr/testify v1.9.0
)
";

const MAIN_GO: &str = r#"package main

import (
	"context"

	"github.com/firebase/genkit/go/genkit"
)

func main() {
	genkit.DefineFlow("summarize", func(ctx context.Context, input string) (string, error) {
		model := genkit.Model("googleai/gemini-1.5-pro")
		_ = model
		return input, nil
	})
}
"#;

fn workspace() -> (TempDir, Utf8PathBuf) {
    let dir = tempfile::tempdir().expect("tempdir");
    let base = Utf8PathBuf::from_path_buf(dir.path().to_owned()).expect("utf-8 tempdir");
    let root = base.join("summarizer");
    for (rel, content) in [
        ("go.mod", GO_MOD),
        ("go.sum", "github.com/google/uuid v1.6.0 h1:x\n"),
        ("main.go", MAIN_GO),
        ("README.md", "# summarizer\n"),
        ("internal/text.go", "package internal\n\nfunc Trim(s string) string { return s }\n"),
        (".git/HEAD", "ref: refs/heads/main\n"),
    ] {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        fs::write(&path, content).expect("write");
    }
    (dir, root)
}

fn staging_dirs(parent: &Path) -> Vec<String> {
    fs::read_dir(parent)
        .expect("read_dir")
        .filter_map(Result::ok)
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .filter(|name| name.starts_with(".genkit-migrate-"))
        .collect()
}

#[test]
fn summarize_scenario_plan() {
    let (_dir, root) = workspace();
    let report =
        analyze_project(&root, ScanOptions::new().with_target(Provider::Aws)).expect("scan");
    let project = &report.project;
    assert_eq!(project.flows().len(), 1);
    assert_eq!(project.models().len(), 1);
    assert_eq!(project.source_provider, Provider::Gcp);

    let plan = PlanConfig::for_project(project);
    let migration = Planner::new(plan).plan(project).expect("plan");

    assert_eq!(migration.count(ChangeKind::Dependency), 1);
    assert_eq!(migration.count(ChangeKind::Import), 1);
    assert_eq!(migration.count(ChangeKind::Model), 1);
    assert_eq!(migration.count(ChangeKind::Configuration), 1);
    for path in [
        "go.mod",
        "main.go",
        "config.yaml",
        "terraform/main.tf",
        "terraform/variables.tf",
        "Dockerfile",
        ".github/workflows/deploy.yml",
    ] {
        assert!(migration.new_files.contains_key(Utf8Path::new(path)), "missing {path}");
    }

    let go_mod = &migration.new_files[Utf8Path::new("go.mod")];
    assert!(go_mod.starts_with("module github.com/acme/summarizer\n"));
    assert!(go_mod.contains("\tgithub.com/stretchr/testify v1.9.0\n"));
    assert!(migration.new_files[Utf8Path::new("config.yaml")].contains("GenKit/Summarizer"));
    assert!(migration.new_files[Utf8Path::new("main.go")].starts_with("package main\n"));

    let model_change = migration
        .changes()
        .iter()
        .find(|c| c.kind == ChangeKind::Model)
        .expect("model change");
    assert_eq!(model_change.file, "main.go");
    assert_eq!(
        model_change.new_value.as_deref(),
        Some("anthropic.claude-3-sonnet-20240229-v1:0")
    );
}

#[test]
fn filtered_dependencies_carry_no_vendor_markers() {
    let (_dir, root) = workspace();
    let report =
        analyze_project(&root, ScanOptions::new().with_target(Provider::Aws)).expect("scan");
    let migration = Planner::new(PlanConfig::for_project(&report.project))
        .plan(&report.project)
        .expect("plan");

    let go_mod = &migration.new_files[Utf8Path::new("go.mod")];
    let require: Vec<_> = go_mod
        .lines()
        .skip_while(|l| *l != "require (")
        .skip(1)
        .take_while(|l| *l != ")")
        .map(str::trim)
        .collect();
    // The pinned framework and plugin lead the block; the rest is carried over.
    assert_eq!(
        require,
        [
            "github.com/firebase/genkit/go v1.0.2",
            "github.com/scttfrdmn/genkit-aws v0.1.0",
            "github.com/stretchr/testify v1.9.0",
        ]
    );
    for line in &require[2..] {
        for marker in vendor_markers(Provider::Gcp) {
            assert!(!line.contains(marker), "{line} carries {marker}");
        }
    }
}

#[test]
fn planning_is_deterministic() {
    let (_dir, root) = workspace();
    let render = || {
        let report =
            analyze_project(&root, ScanOptions::new().with_target(Provider::Aws)).expect("scan");
        let migration = Planner::new(PlanConfig::for_project(&report.project))
            .plan(&report.project)
            .expect("plan");
        (migration.new_files.clone(), migration.changes().to_vec())
    };
    assert_eq!(render(), render());
}

#[test]
fn generator_writes_plan_and_copies_the_rest() {
    let (dir, root) = workspace();
    let report =
        analyze_project(&root, ScanOptions::new().with_target(Provider::Aws)).expect("scan");
    let plan = PlanConfig::for_project(&report.project);
    let migration = Planner::new(plan).plan(&report.project).expect("plan");

    let output = Utf8PathBuf::from_path_buf(dir.path().join("summarizer_aws")).expect("utf-8");
    let generated = Generator::new(GeneratorConfig::new(output.clone()))
        .generate(&migration, &plan)
        .expect("generate");

    assert_eq!(generated.output, output);
    assert_eq!(generated.written, migration.new_files.len() + 1);
    // README.md and internal/text.go
    assert_eq!(generated.copied, 2);

    let read = |rel: &str| fs::read_to_string(output.join(rel)).expect(rel);
    assert_eq!(read("go.mod"), migration.new_files[Utf8Path::new("go.mod")]);
    assert_eq!(read("README.md"), "# summarizer\n");
    assert!(read("internal/text.go").contains("func Trim"));
    assert!(read(GUIDE_FILE).contains("## Model Mappings Applied"));
    assert!(!output.join("go.sum").exists());
    assert!(!output.join(".git").exists());

    let leftovers = staging_dirs(dir.path());
    assert!(leftovers.is_empty(), "staging left behind: {leftovers:?}");

    // Source tree is untouched.
    assert_eq!(fs::read_to_string(root.join("go.mod")).expect("go.mod"), GO_MOD);
}

#[test]
fn migrating_generated_output_again_keeps_one_aws_plugin() {
    let (dir, root) = workspace();
    let report =
        analyze_project(&root, ScanOptions::new().with_target(Provider::Aws)).expect("scan");
    let plan = PlanConfig::for_project(&report.project);
    let migration = Planner::new(plan).plan(&report.project).expect("plan");
    let output = Utf8PathBuf::from_path_buf(dir.path().join("summarizer_aws")).expect("utf-8");
    Generator::new(GeneratorConfig::new(output.clone()))
        .generate(&migration, &plan)
        .expect("generate");

    let options = ScanOptions::new()
        .with_source(Provider::Gcp)
        .with_target(Provider::Aws);
    let rescan = analyze_project(&output, options).expect("rescan");
    assert!(rescan.project.dependencies.contains_key(GENKIT_AWS_MODULE));

    let plan = PlanConfig::for_project(&rescan.project);
    let again = Planner::new(plan).plan(&rescan.project).expect("plan again");
    let go_mod = &again.new_files[Utf8Path::new("go.mod")];
    assert_eq!(go_mod.matches(GENKIT_AWS_MODULE).count(), 1, "{go_mod}");
    assert_eq!(go_mod.matches("github.com/firebase/genkit/go ").count(), 1, "{go_mod}");
    assert!(go_mod.contains("\tgithub.com/stretchr/testify v1.9.0\n"));
}

#[test]
fn cancelled_generation_leaves_no_staging_behind() {
    let (dir, root) = workspace();
    let report =
        analyze_project(&root, ScanOptions::new().with_target(Provider::Aws)).expect("scan");
    let plan = PlanConfig::for_project(&report.project);
    let migration = Planner::new(plan).plan(&report.project).expect("plan");

    let token = CancellationToken::new();
    token.cancel();
    let output = Utf8PathBuf::from_path_buf(dir.path().join("summarizer_aws")).expect("utf-8");
    let err = Generator::new(GeneratorConfig::new(output.clone()).with_cancellation(token))
        .generate(&migration, &plan)
        .unwrap_err();

    assert!(matches!(err, GenerateError::Cancelled));
    assert!(!output.exists());
    assert!(staging_dirs(dir.path()).is_empty());
}

#[test]
fn generator_refuses_non_empty_output() {
    let (dir, root) = workspace();
    let report =
        analyze_project(&root, ScanOptions::new().with_target(Provider::Aws)).expect("scan");
    let plan = PlanConfig::for_project(&report.project);
    let migration = Planner::new(plan).plan(&report.project).expect("plan");

    let output = Utf8PathBuf::from_path_buf(dir.path().join("taken")).expect("utf-8");
    fs::create_dir(&output).expect("mkdir");
    fs::write(output.join("keep.txt"), "mine").expect("write");

    let err = Generator::new(GeneratorConfig::new(output.clone()))
        .generate(&migration, &plan)
        .unwrap_err();
    assert!(matches!(err, GenerateError::OutputExists(_)));
    assert_eq!(fs::read_to_string(output.join("keep.txt")).expect("keep"), "mine");
}

#[test]
fn generator_accepts_empty_output_directory() {
    let (dir, root) = workspace();
    let report =
        analyze_project(&root, ScanOptions::new().with_target(Provider::Aws)).expect("scan");
    let plan = PlanConfig::for_project(&report.project);
    let migration = Planner::new(plan).plan(&report.project).expect("plan");

    let output = Utf8PathBuf::from_path_buf(dir.path().join("empty")).expect("utf-8");
    fs::create_dir(&output).expect("mkdir");
    Generator::new(GeneratorConfig::new(output.clone()))
        .generate(&migration, &plan)
        .expect("generate");
    assert!(output.join("Dockerfile").is_file());
}

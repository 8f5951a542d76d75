//! End-to-end scans over throwaway Go projects.

use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use gm_core::Provider;
use gm_scanner::{analyze_project, FailurePolicy, ScanError, ScanOptions};
use tempfile::TempDir;

const GO_MOD: &str = "module github.com/acme/summarizer

go 1.22

require (
	github.com/firebase/genkit/go v0.5.0
	github.com/firebase/genkit/go/plugins/googleai v0.5.0
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

fn project(files: &[(&str, &str)]) -> (TempDir, Utf8PathBuf) {
    let dir = tempfile::tempdir().expect("tempdir");
    let root = Utf8PathBuf::from_path_buf(dir.path().to_owned()).expect("utf-8 tempdir");
    for (rel, content) in files {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        fs::write(&path, content).expect("write");
    }
    (dir, root)
}

fn relevant_flow_file(name: &str) -> String {
    format!(
        "package flows\n\nimport \"github.com/firebase/genkit/go/genkit\"\n\nvar _ = genkit.DefineFlow(\"{name}\", nil)\n"
    )
}

#[test]
fn summarize_project() {
    let (_dir, root) = project(&[("go.mod", GO_MOD), ("main.go", MAIN_GO)]);
    let report = analyze_project(&root, ScanOptions::new().with_target(Provider::Aws))
        .expect("scan should succeed");
    let project = &report.project;

    assert_eq!(project.source_provider, Provider::Gcp);
    assert_eq!(project.target_provider, Some(Provider::Aws));
    assert_eq!(project.module_path.as_deref(), Some("github.com/acme/summarizer"));
    assert_eq!(project.dependencies.len(), 2);

    assert_eq!(project.flows().len(), 1);
    assert_eq!(project.flows()[0].name, "summarize");
    assert_eq!(project.flows()[0].location.file, "main.go");
    assert_eq!(project.flows()[0].location.line, 10);

    assert_eq!(project.models().len(), 1);
    assert_eq!(project.models()[0].name, "googleai/gemini-1.5-pro");
    assert_eq!(project.models()[0].provider, Provider::Gcp);

    let file = project.file(Utf8Path::new("main.go")).expect("main.go is relevant");
    assert_eq!(file.package_name, "main");
    assert_eq!(file.path, root.join("main.go"));
    assert_eq!(report.stats.relevant, 1);
}

#[test]
fn irrelevant_files_are_left_out() {
    let (_dir, root) = project(&[
        ("go.mod", "module example.com/x\n"),
        ("util.go", "package main\n\nimport \"strings\"\n\nvar _ = strings.ToUpper\n"),
        ("flows/a.go", &relevant_flow_file("a")),
    ]);
    let report = analyze_project(&root, ScanOptions::new()).expect("scan");

    let files: Vec<_> = report.project.files().keys().map(|p| p.as_str()).collect();
    assert_eq!(files, ["flows/a.go"]);
    assert_eq!(report.stats.visited, 2);
}

#[test]
fn flows_follow_walk_order() {
    let (_dir, root) = project(&[
        ("go.mod", "module example.com/x\n"),
        ("z.go", &relevant_flow_file("z")),
        ("b/b.go", &relevant_flow_file("b")),
        ("a.go", &relevant_flow_file("a")),
        ("vendor/v/v.go", &relevant_flow_file("vendored")),
    ]);
    let report = analyze_project(&root, ScanOptions::new()).expect("scan");

    let names: Vec<_> = report.project.flows().iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, ["a", "b", "z"]);
}

#[test]
fn missing_manifest_is_fatal() {
    let (_dir, root) = project(&[("main.go", MAIN_GO)]);
    let err = analyze_project(
        &root,
        ScanOptions::new().with_policy(FailurePolicy::SkipWithWarning),
    )
    .unwrap_err();
    assert!(matches!(err, ScanError::Manifest { .. }));
}

#[test]
fn manifest_without_valid_lines_gives_empty_dependencies() {
    let (_dir, root) = project(&[("go.mod", "// empty\n"), ("main.go", MAIN_GO)]);
    let report = analyze_project(&root, ScanOptions::new()).expect("scan");
    assert!(report.project.dependencies.is_empty());
    assert!(report.project.module_path.is_none());
}

#[test]
fn syntax_errors_follow_the_failure_policy() {
    let files = [
        ("go.mod", "module example.com/x\n"),
        ("bad.go", "package main\n\nfunc main( {\n"),
        ("good.go", MAIN_GO),
    ];

    let (_dir, root) = project(&files);
    let err = analyze_project(&root, ScanOptions::new()).unwrap_err();
    assert!(matches!(err, ScanError::Parse { .. }));

    let report = analyze_project(
        &root,
        ScanOptions::new().with_policy(FailurePolicy::SkipWithWarning),
    )
    .expect("verbose scan skips the bad file");
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.stats.skipped, 1);
    assert_eq!(report.project.flows().len(), 1);
}

#[test]
fn configuration_files_and_explicit_source() {
    let (_dir, root) = project(&[
        ("go.mod", "module example.com/x\n"),
        ("main.go", MAIN_GO),
        ("config.yaml", "x: 1\n"),
        ("app.yaml", "runtime: go\n"),
    ]);
    let report = analyze_project(&root, ScanOptions::new().with_source(Provider::OpenAi))
        .expect("scan");

    assert_eq!(report.project.source_provider, Provider::OpenAi);
    let configs: Vec<_> = report.project.configuration.keys().map(String::as_str).collect();
    assert_eq!(configs, ["app.yaml", "config.yaml"]);
}

#[test]
fn project_serializes_for_inspection() {
    let (_dir, root) = project(&[("go.mod", GO_MOD), ("main.go", MAIN_GO)]);
    let report = analyze_project(&root, ScanOptions::new()).expect("scan");
    let value = serde_json::to_value(&report.project).expect("serialize");

    assert_eq!(value["source_provider"], "gcp");
    assert_eq!(value["flows"][0]["name"], "summarize");
    assert_eq!(value["models"][0]["location"]["file"], "main.go");
    assert_eq!(value["files"]["main.go"]["has_genkit"], true);
}

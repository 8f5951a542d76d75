//! `go.mod` reading.
//!
//! The manifest is read with a line heuristic rather than a full grammar:
//! the module path and `require` entries are all the planner needs.
//!
//! A line is considered when it begins with `require` or carries a
//! whitespace-preceded `vX.Y.Z` token. The `require` keyword and a block's
//! opening `(` are stripped; the first remaining token is the module name and
//! the second its version. Directive lines (`module`, `go`, `toolchain`,
//! `replace`, `exclude`, `retract`) never produce dependencies.

use std::collections::BTreeMap;
use std::fs;
use std::sync::OnceLock;

use camino::Utf8Path;
use regex::Regex;

use crate::error::ScanError;

/// File name of the module manifest.
pub const MANIFEST_FILE: &str = "go.mod";

/// Directives that never declare a dependency.
const SKIPPED_DIRECTIVES: &[&str] = &["go", "toolchain", "replace", "exclude", "retract"];

static VERSION_TOKEN: OnceLock<Regex> = OnceLock::new();
static VERSION_LIKE: OnceLock<Regex> = OnceLock::new();

/// Parsed contents of a `go.mod`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoModule {
    /// Path from the `module` directive.
    pub module_path: Option<String>,
    /// Required modules, name to version.
    pub dependencies: BTreeMap<String, String>,
}

/// Reads `go.mod` from the project root.
///
/// # Errors
///
/// - [`ScanError::Manifest`] if the file is missing or unreadable
/// - [`ScanError::Config`] if the version patterns fail to compile
pub fn read_go_mod(root: &Utf8Path) -> Result<GoModule, ScanError> {
    let path = root.join(MANIFEST_FILE);
    let content = fs::read_to_string(&path).map_err(|e| ScanError::manifest(&path, e))?;
    parse_go_mod(&content)
}

/// Parses manifest text. Lines that don't fit the heuristic are dropped.
///
/// # Errors
///
/// Returns [`ScanError::Config`] if the version patterns fail to compile.
///
/// # Examples
///
/// ```
/// use gm_scanner::parse_go_mod;
///
/// let module = parse_go_mod("module example.com/app\n\nrequire github.com/pkg/errors v0.9.1\n")?;
/// assert_eq!(module.module_path.as_deref(), Some("example.com/app"));
/// assert_eq!(module.dependencies["github.com/pkg/errors"], "v0.9.1");
/// # Ok::<(), gm_scanner::ScanError>(())
/// ```
pub fn parse_go_mod(content: &str) -> Result<GoModule, ScanError> {
    let token = version_token()?;
    let like = version_like()?;
    let mut module = GoModule::default();

    for raw in content.lines() {
        let line = strip_comment(raw).trim();
        let mut words = line.split_whitespace();
        let Some(first) = words.next() else {
            continue;
        };

        if first == "module" {
            module.module_path = words.next().map(|path| path.trim_matches('"').to_owned());
            continue;
        }
        if SKIPPED_DIRECTIVES.contains(&first) {
            continue;
        }
        if !(first == "require" || token.is_match(line)) {
            continue;
        }

        let rest = line.strip_prefix("require").unwrap_or(line).trim_start();
        let rest = rest.strip_prefix('(').unwrap_or(rest);
        let mut fields = rest.split_whitespace();
        let (Some(name), Some(version)) = (fields.next(), fields.next()) else {
            continue;
        };
        if name.is_empty() || !like.is_match(version) {
            continue;
        }
        module
            .dependencies
            .insert(name.trim_matches('"').to_owned(), version.to_owned());
    }

    Ok(module)
}

/// Drops a trailing `//` comment (`// indirect` and friends).
fn strip_comment(line: &str) -> &str {
    line.find("//").map_or(line, |idx| &line[..idx])
}

fn version_token() -> Result<&'static Regex, ScanError> {
    cached(&VERSION_TOKEN, r"\sv\d+\.\d+\.\d+")
}

fn version_like() -> Result<&'static Regex, ScanError> {
    cached(&VERSION_LIKE, r"^v\d+\.\d+\.\d+")
}

fn cached(cell: &'static OnceLock<Regex>, pattern: &str) -> Result<&'static Regex, ScanError> {
    if let Some(regex) = cell.get() {
        return Ok(regex);
    }
    let regex = Regex::new(pattern)
        .map_err(|e| ScanError::config(format!("invalid version pattern: {e}")))?;
    Ok(cell.get_or_init(|| regex))
}

#[cfg(test)]
mod tests {
    use super::*;

    const GO_MOD: &str = r"module github.com/acme/summarizer

go 1.22

toolchain go1.22.4

require (
	github.com/firebase/genkit/go v0.5.0
	github.com/google/uuid v1.6.0 // indirect
	golang.org/x/net v0.25.0
)

require github.com/pkg/errors v0.9.1

replace github.com/old/thing v1.0.0 => ../thing
";

    #[test]
    fn test_parse_block_and_single_require() {
        let module = parse_go_mod(GO_MOD).expect("parse");
        assert_eq!(module.module_path.as_deref(), Some("github.com/acme/summarizer"));

        let names: Vec<_> = module.dependencies.keys().map(String::as_str).collect();
        assert_eq!(
            names,
            [
                "github.com/firebase/genkit/go",
                "github.com/google/uuid",
                "github.com/pkg/errors",
                "golang.org/x/net",
            ]
        );
        assert_eq!(module.dependencies["github.com/google/uuid"], "v1.6.0");
    }

    #[test]
    fn test_directives_are_not_dependencies() {
        let module = parse_go_mod(GO_MOD).expect("parse");
        assert!(!module.dependencies.contains_key("github.com/old/thing"));
        assert!(!module.dependencies.contains_key("go"));
        assert!(!module.dependencies.contains_key("toolchain"));
    }

    #[test]
    fn test_no_valid_lines() {
        let module = parse_go_mod("// nothing here\n\nrequire (\n)\n").expect("parse");
        assert!(module.dependencies.is_empty());
        assert!(module.module_path.is_none());
    }

    #[test]
    fn test_non_version_entries_dropped() {
        let module = parse_go_mod("require example.com/x latest\n").expect("parse");
        assert!(module.dependencies.is_empty());
    }

    #[test]
    fn test_pseudo_version_kept() {
        let module =
            parse_go_mod("require example.com/x v0.0.0-20240101000000-abcdef123456\n").expect("parse");
        assert_eq!(
            module.dependencies["example.com/x"],
            "v0.0.0-20240101000000-abcdef123456"
        );
    }

    #[test]
    fn test_missing_manifest_is_io_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = Utf8Path::from_path(dir.path()).expect("utf-8 tempdir");
        let err = read_go_mod(root).unwrap_err();
        assert!(matches!(err, ScanError::Manifest { .. }));
        assert!(err.is_fatal());
    }
}

//! CLI entry point for the genkit-migrate tool.
//!
//! This binary scans a Genkit Go project, reports the flows and models it
//! finds, and plans or writes a migration to another model provider.
//!
//! # Usage
//!
//! ```bash
//! genkit-migrate [OPTIONS] <COMMAND>
//!
//! # Inspect a project
//! genkit-migrate analyze --source ./my-app
//!
//! # Machine-readable report
//! genkit-migrate analyze --source ./my-app --format json --output project.json
//!
//! # Preview, then write ./my-app_aws
//! genkit-migrate migrate --source ./my-app --dry-run
//! genkit-migrate migrate --source ./my-app --to aws
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

use std::io::{self, Write};
use std::str::FromStr;

use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};
use color_eyre::eyre::{eyre, WrapErr};
use gm_core::{Config, Migration, Project, Provider};
use gm_scanner::{analyze_project, FailurePolicy, ScanOptions, ScanReport, StatsSnapshot};
use gm_transform::{Generator, GeneratorConfig, PlanConfig, Planner};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// =============================================================================
// CLI ARGUMENT TYPES
// =============================================================================

/// Migrate Genkit Go projects between model providers.
///
/// Scans a Go module for flows and model references, then plans a new
/// `go.mod`, import skeletons, provider configuration and deployment files.
#[derive(Parser)]
#[command(name = "genkit-migrate", version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (debug level) and skip unreadable files.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    no_color: bool,

    /// JSON configuration file.
    #[arg(long, global = true, env = "GENKIT_MIGRATE_CONFIG")]
    config: Option<Utf8PathBuf>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Scan a project and report its flows, models and dependencies.
    Analyze {
        /// Project directory (contains `go.mod`).
        #[arg(short, long)]
        source: Utf8PathBuf,

        /// Source provider. Detected from model references if omitted.
        #[arg(long)]
        from: Option<Provider>,

        /// Output format: `table` or `json`.
        #[arg(long)]
        format: Option<String>,

        /// Output file (defaults to stdout).
        #[arg(short, long)]
        output: Option<Utf8PathBuf>,
    },

    /// Plan a migration and write the migrated project.
    Migrate {
        /// Project directory (contains `go.mod`).
        #[arg(short, long)]
        source: Utf8PathBuf,

        /// Output directory. Defaults to `<source>_<to>`.
        #[arg(short, long)]
        target: Option<Utf8PathBuf>,

        /// Provider the project uses today.
        #[arg(long)]
        from: Option<Provider>,

        /// Provider to migrate to.
        #[arg(long)]
        to: Option<Provider>,

        /// Print the plan without writing anything.
        #[arg(long)]
        dry_run: bool,
    },

    /// Print version and build target information.
    Version,
}

/// Report output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    /// Human-readable summary.
    Table,
    /// Pretty-printed JSON.
    Json,
}

/// A `--format` value that isn't supported.
#[derive(Debug, thiserror::Error)]
#[error("unsupported output format '{0}' (expected 'table' or 'json')")]
struct UnsupportedFormat(String);

impl FromStr for OutputFormat {
    type Err = UnsupportedFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            _ => Err(UnsupportedFormat(s.to_owned())),
        }
    }
}

// =============================================================================
// INITIALIZATION FUNCTIONS
// =============================================================================

/// Initializes the tracing subscriber for logging.
///
/// Respects the `RUST_LOG` environment variable if set. Otherwise, uses
/// `debug` level if `--verbose` is set, or `info` level by default.
/// Logs go to stderr so reports on stdout stay clean.
fn init_tracing(verbose: bool, no_color: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = if verbose { "debug" } else { "info" };
        EnvFilter::new(format!("{level},ignore=warn,globset=warn"))
    });

    // Check if colors should be disabled (flag or NO_COLOR env var)
    let use_ansi = !no_color && std::env::var("NO_COLOR").is_err();

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(use_ansi)
                .with_writer(io::stderr),
        )
        .with(filter)
        .init();
}

/// Loads the configuration file, if any.
///
/// # Errors
///
/// Returns an error if an explicitly named file is missing or invalid.
fn load_config(cli: &Cli) -> color_eyre::Result<Config> {
    let config = Config::load_or_default(cli.config.as_deref())
        .wrap_err("Failed to load configuration")?;
    if let Some(path) = &cli.config {
        info!(path = %path, "Loaded configuration");
    }
    Ok(config)
}

fn scan_options(config: &Config, verbose: bool) -> ScanOptions {
    ScanOptions::from_config(&config.scan).with_policy(FailurePolicy::from_verbose(verbose))
}

/// `<source>_<provider>` next to the source directory.
fn default_target(source: &Utf8Path, to: Provider) -> Utf8PathBuf {
    let base = source.as_str().trim_end_matches(['/', '\\']);
    let base = if base.is_empty() { "." } else { base };
    Utf8PathBuf::from(format!("{base}_{to}"))
}

// =============================================================================
// COMMAND IMPLEMENTATIONS
// =============================================================================

/// Scans a project and prints or writes the report.
///
/// # Errors
///
/// Returns an error if scanning, serialization or writing fails.
fn run_analyze(
    config: &Config,
    verbose: bool,
    source: &Utf8Path,
    from: Option<Provider>,
    format: OutputFormat,
    output: Option<&Utf8Path>,
) -> color_eyre::Result<()> {
    let mut options = scan_options(config, verbose);
    if let Some(from) = from {
        options = options.with_source(from);
    }
    let report = analyze_project(source, options)
        .wrap_err_with(|| format!("Failed to analyze {source}"))?;

    let content = match format {
        OutputFormat::Table => render_table(&report)?,
        OutputFormat::Json => render_json(&report)?,
    };

    if let Some(path) = output {
        std::fs::write(path, &content).wrap_err_with(|| format!("Failed to write {path}"))?;
        info!(path = %path, "Report written");
    } else {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        write!(handle, "{content}")?;
    }
    Ok(())
}

/// Arguments of `migrate` after defaults are applied.
struct MigrateArgs {
    source: Utf8PathBuf,
    target: Utf8PathBuf,
    from: Provider,
    to: Provider,
    dry_run: bool,
}

/// Scans, plans and, unless dry-running, writes the migrated project.
///
/// # Errors
///
/// Returns an error naming the stage that failed.
fn run_migrate(
    config: &Config,
    verbose: bool,
    args: &MigrateArgs,
    cancellation_token: CancellationToken,
) -> color_eyre::Result<()> {
    info!(
        source = %args.source,
        target = %args.target,
        from = %args.from,
        to = %args.to,
        dry_run = args.dry_run,
        "Starting migration"
    );

    let options = scan_options(config, verbose)
        .with_source(args.from)
        .with_target(args.to);
    let report = analyze_project(&args.source, options)
        .wrap_err_with(|| format!("Failed to analyze {}", args.source))?;
    let project = &report.project;

    let plan = PlanConfig {
        source: args.from,
        target: args.to,
    };
    let migration = Planner::new(plan)
        .plan(project)
        .wrap_err("Failed to plan migration")?;

    if args.dry_run {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        print_plan(&mut handle, &migration, &plan)?;
        return Ok(());
    }

    let generator = Generator::new(
        GeneratorConfig::new(args.target.clone())
            .with_policy(FailurePolicy::from_verbose(verbose))
            .with_skip_dirs(&config.scan.extra_skip_dirs)
            .with_follow_links(config.scan.follow_links)
            .with_cancellation(cancellation_token),
    );
    let generated = generator
        .generate(&migration, &plan)
        .wrap_err_with(|| format!("Failed to write {}", args.target))?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle)?;
    writeln!(handle, "Migration complete: {}", generated.output)?;
    writeln!(handle, "  Files generated: {}", generated.written)?;
    writeln!(handle, "  Files copied:    {}", generated.copied)?;
    writeln!(handle, "  Changes:         {}", migration.changes().len())?;
    writeln!(handle)?;
    writeln!(handle, "See {}/MIGRATION.md for next steps.", generated.output)?;
    Ok(())
}

/// Prints version and build target information.
fn run_version(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "genkit-migrate {}", env!("CARGO_PKG_VERSION"))?;
    writeln!(
        out,
        "target: {}-{} ({})",
        std::env::consts::ARCH,
        std::env::consts::OS,
        std::env::consts::FAMILY
    )
}

// =============================================================================
// OUTPUT HELPERS
// =============================================================================

/// Renders the human-readable project summary.
fn render_table(report: &ScanReport) -> Result<String, std::fmt::Error> {
    use std::fmt::Write;

    let project = &report.project;
    let mut out = String::new();

    writeln!(out)?;
    writeln!(out, "Project Analysis")?;
    writeln!(out, "================")?;
    writeln!(out)?;
    writeln!(out, "Path:            {}", project.path)?;
    writeln!(
        out,
        "Module:          {}",
        project.module_path.as_deref().unwrap_or("(none)")
    )?;
    writeln!(
        out,
        "Source provider: {} ({})",
        project.source_provider,
        project.source_provider.display_name()
    )?;
    write_stats(&mut out, &report.stats)?;

    writeln!(out)?;
    writeln!(out, "Flows ({}):", project.flows().len())?;
    for flow in project.flows() {
        let signature = match (&flow.input_type, &flow.output_type) {
            (Some(input), Some(output)) => format!(" ({input} -> {output})"),
            _ => String::new(),
        };
        writeln!(out, "  {}{signature}  {}", flow.name, flow.location)?;
    }

    writeln!(out)?;
    writeln!(out, "Models ({}):", project.models().len())?;
    for model in project.models() {
        writeln!(out, "  {} [{}]  {}", model.name, model.provider, model.location)?;
    }

    writeln!(out)?;
    writeln!(out, "Dependencies ({}):", project.dependencies.len())?;
    for (name, version) in &project.dependencies {
        writeln!(out, "  {name} {version}")?;
    }

    if !project.configuration.is_empty() {
        writeln!(out)?;
        writeln!(out, "Configuration files:")?;
        for name in project.configuration.keys() {
            writeln!(out, "  {name}")?;
        }
    }

    if !report.skipped.is_empty() {
        writeln!(out)?;
        writeln!(out, "Skipped ({}):", report.skipped.len())?;
        for error in &report.skipped {
            writeln!(out, "  {error}")?;
        }
    }
    Ok(out)
}

fn write_stats(out: &mut String, stats: &StatsSnapshot) -> std::fmt::Result {
    use std::fmt::Write;

    writeln!(
        out,
        "Go files:        {} scanned, {} use Genkit ({:.1}%)",
        stats.visited,
        stats.relevant,
        stats.relevant_percent()
    )?;
    if stats.errors > 0 {
        writeln!(out, "Errors:          {}", stats.errors)?;
    }
    Ok(())
}

/// Renders the project and statistics as pretty JSON.
fn render_json(report: &ScanReport) -> color_eyre::Result<String> {
    #[derive(serde::Serialize)]
    struct Report<'a> {
        project: &'a Project,
        stats: &'a StatsSnapshot,
    }

    let report = Report {
        project: &report.project,
        stats: &report.stats,
    };
    let mut json = serde_json::to_string_pretty(&report).wrap_err("Failed to serialize JSON")?;
    json.push('\n');
    Ok(json)
}

/// Prints a planned migration without writing it.
fn print_plan(out: &mut impl Write, migration: &Migration<'_>, plan: &PlanConfig) -> io::Result<()> {
    let project = migration.project();
    writeln!(out)?;
    writeln!(
        out,
        "Migration plan for {} ({} -> {})",
        project.path, plan.source, plan.target
    )?;
    writeln!(out, "====================")?;

    writeln!(out)?;
    writeln!(out, "Changes ({}):", migration.changes().len())?;
    for change in migration.changes() {
        writeln!(
            out,
            "  [{}] {} ({})",
            change.kind, change.description, change.file
        )?;
    }

    writeln!(out)?;
    writeln!(out, "New files ({}):", migration.new_files.len())?;
    for (path, content) in &migration.new_files {
        writeln!(out, "  {path} ({} bytes)", content.len())?;
    }

    if !migration.delete_files.is_empty() {
        writeln!(out)?;
        writeln!(out, "Files to delete:")?;
        for path in &migration.delete_files {
            writeln!(out, "  {path}")?;
        }
    }

    if !migration.commands.is_empty() {
        writeln!(out)?;
        writeln!(out, "Commands to run:")?;
        for command in &migration.commands {
            writeln!(out, "  {command}")?;
        }
    }
    writeln!(out)?;
    writeln!(out, "Dry run: nothing was written.")
}

// =============================================================================
// CANCELLATION
// =============================================================================

/// Resolves on Ctrl-C or, on Unix, SIGTERM, naming the signal.
#[cfg(unix)]
async fn shutdown_signal() -> io::Result<&'static str> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = signal(SignalKind::terminate())?;
    tokio::select! {
        result = tokio::signal::ctrl_c() => result.map(|()| "Ctrl-C"),
        _ = sigterm.recv() => Ok("SIGTERM"),
    }
}

#[cfg(not(unix))]
async fn shutdown_signal() -> io::Result<&'static str> {
    tokio::signal::ctrl_c().await.map(|()| "Ctrl-C")
}

/// Runs a blocking command on the blocking pool, racing it against
/// [`shutdown_signal`].
///
/// On a signal `cancellation_token` is cancelled and the command is awaited,
/// so a generator run can remove its staging directory before exit.
///
/// # Errors
///
/// Returns the command's error, or an error if it was interrupted.
async fn run_blocking<F>(cancellation_token: CancellationToken, task: F) -> color_eyre::Result<()>
where
    F: FnOnce() -> color_eyre::Result<()> + Send + 'static,
{
    let mut handle = tokio::task::spawn_blocking(task);

    let signal = tokio::select! {
        result = &mut handle => return result.wrap_err("Worker thread failed")?,
        signal = shutdown_signal() => signal?,
    };

    info!(signal, "Received signal, shutting down");
    cancellation_token.cancel();
    if let Ok(Err(e)) = handle.await {
        debug!(error = %e, "Worker stopped after cancellation");
    }
    Err(eyre!("Interrupted by {signal}"))
}

// =============================================================================
// MAIN ENTRY POINT
// =============================================================================

/// Application entry point.
#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    // 1. Install color-eyre FIRST (before any potential panics)
    color_eyre::install()?;

    // 2. Parse CLI arguments
    let cli = Cli::parse();

    // 3. Initialize tracing (handles --no-color for log output)
    init_tracing(cli.verbose, cli.no_color);

    // 4. Route to appropriate command
    match cli.command {
        Commands::Analyze {
            ref source,
            from,
            ref format,
            ref output,
        } => {
            let config = load_config(&cli)?;
            let format: OutputFormat = format
                .as_deref()
                .unwrap_or(config.output.format.as_str())
                .parse()?;
            let (verbose, source, output) = (cli.verbose, source.clone(), output.clone());
            run_blocking(CancellationToken::new(), move || {
                run_analyze(&config, verbose, &source, from, format, output.as_deref())
            })
            .await
        }
        Commands::Migrate {
            ref source,
            ref target,
            from,
            to,
            dry_run,
        } => {
            let config = load_config(&cli)?;
            let to = to.unwrap_or(config.default_target_provider);
            let args = MigrateArgs {
                target: target
                    .clone()
                    .unwrap_or_else(|| default_target(source, to)),
                source: source.clone(),
                from: from.unwrap_or(config.default_source_provider),
                to,
                dry_run,
            };
            let verbose = cli.verbose;
            let token = CancellationToken::new();
            let worker_token = token.clone();
            run_blocking(token, move || {
                run_migrate(&config, verbose, &args, worker_token)
            })
            .await
        }
        Commands::Version => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            run_version(&mut handle)?;
            Ok(())
        }
    }
}

#![forbid(unsafe_code)]

mod cmd;
mod output;

use clap::{CommandFactory, Parser, Subcommand};
use huddle_core::export::ExportError;
use huddle_core::seed::SeedError;
use output::{CliError, OutputMode};
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "huddle: workspace activity feed",
    long_about = None
)]
struct Cli {
    /// Enable debug-level logging (ignored when `HUDDLE_LOG` is set).
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format.
    #[arg(long, global = true, value_enum, value_name = "FORMAT")]
    format: Option<OutputMode>,

    /// Shorthand for `--format json`.
    #[arg(long, global = true, hide = true)]
    json: bool,

    /// Preference file to use instead of the configured one.
    #[arg(long, global = true, value_name = "PATH")]
    prefs: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn output_mode(&self) -> OutputMode {
        output::resolve_output_mode(self.format, self.json)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Read",
        about = "List the visible activity feed",
        long_about = "List activities passing the stored filter, newest first.",
        after_help = "EXAMPLES:\n    # Show the feed\n    hd feed\n\n    # One-off view of uploads only\n    hd feed --type upload\n\n    # Emit machine-readable output\n    hd feed --json"
    )]
    Feed(cmd::feed::FeedArgs),

    #[command(
        next_help_heading = "Read",
        about = "Show per-type activity counts",
        long_about = "Tally the visible activities by type, with chart bar sizes.",
        after_help = "EXAMPLES:\n    # Summary chart\n    hd summary\n\n    # Emit machine-readable output\n    hd summary --json"
    )]
    Summary,

    #[command(
        next_help_heading = "Read",
        about = "List document sections",
        long_about = "List the document outline, optionally jumping to one section.",
        after_help = "EXAMPLES:\n    # List sections\n    hd outline\n\n    # Jump to a section\n    hd outline --jump section-design"
    )]
    Outline(cmd::outline::OutlineArgs),

    #[command(
        next_help_heading = "Preferences",
        about = "Toggle stored feed filters",
        long_about = "Toggle user, type, or project criteria in the stored filter.",
        after_help = "EXAMPLES:\n    # Only show Carol's activity\n    hd filter user u3\n\n    # Add comments to the type filter\n    hd filter type comment\n\n    # Reset\n    hd filter clear"
    )]
    Filter {
        #[command(subcommand)]
        command: cmd::filter::FilterCommand,
    },

    #[command(
        next_help_heading = "Preferences",
        about = "Show or set the color theme",
        after_help = "EXAMPLES:\n    # Switch to dark mode\n    hd theme dark"
    )]
    Theme(cmd::theme::ThemeArgs),

    #[command(
        next_help_heading = "Interoperability",
        about = "Export the visible feed as JSON",
        long_about = "Write the visible activities to a JSON export document.",
        after_help = "EXAMPLES:\n    # Export to workspace-activity-<date>.json\n    hd export\n\n    # Export to stdout\n    hd export --output -"
    )]
    Export(cmd::export::ExportArgs),

    #[command(
        next_help_heading = "Live",
        about = "Run the mock activity generator",
        long_about = "Run the activity generator and print each update as it is applied.",
        after_help = "EXAMPLES:\n    # Five updates at the configured interval\n    hd live\n\n    # Fast, reproducible run\n    hd live --ticks 3 --interval-ms 10 --seed 42 --json"
    )]
    Live(cmd::live::LiveArgs),

    #[command(
        next_help_heading = "Project Maintenance",
        about = "Generate shell completion scripts",
        after_help = "EXAMPLES:\n    # Generate bash completions\n    hd completions bash"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

/// Directives used when `HUDDLE_LOG` is unset. `--verbose` or `DEBUG`
/// lowers our crates to debug.
fn default_log_directives(verbose: bool, debug_env: bool) -> &'static str {
    if verbose || debug_env {
        "huddle=debug,hd=debug,info"
    } else {
        "huddle=info,hd=info,warn"
    }
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("HUDDLE_LOG").unwrap_or_else(|_| {
        EnvFilter::new(default_log_directives(verbose, env::var("DEBUG").is_ok()))
    });

    let format = env::var("HUDDLE_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

/// Map a failure to a structured error, attaching a stable code when the
/// root cause is one of ours.
fn cli_error(err: &anyhow::Error) -> CliError {
    let message = format!("{err:#}");
    if let Some(seed) = err.downcast_ref::<SeedError>() {
        return CliError::with_code(message, seed.code());
    }
    if let Some(export) = err.downcast_ref::<ExportError>() {
        return CliError::with_code(message, export.code());
    }
    if err.chain().any(|cause| cause.is::<toml::de::Error>()) {
        return CliError::with_code(message, huddle_core::error::ErrorCode::ConfigParseError);
    }
    CliError::new(message)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    if cli.verbose {
        debug!("verbose logging enabled");
    }

    let output = cli.output_mode();
    let result = env::current_dir()
        .map_err(anyhow::Error::from)
        .and_then(|project_root| run(&cli, output, &project_root));

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if output::render_error(output, &cli_error(&err)).is_err() {
                eprintln!("error: {err:#}");
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli, output: OutputMode, project_root: &std::path::Path) -> anyhow::Result<()> {
    let prefs = cli.prefs.as_deref();
    match &cli.command {
        Commands::Feed(args) => cmd::feed::run_feed(args, output, project_root, prefs),
        Commands::Summary => cmd::summary::run_summary(output, project_root, prefs),
        Commands::Outline(args) => cmd::outline::run_outline(args, output, project_root, prefs),
        Commands::Filter { command } => {
            cmd::filter::run_filter(command, output, project_root, prefs)
        }
        Commands::Theme(args) => cmd::theme::run_theme(args, output, project_root, prefs),
        Commands::Export(args) => cmd::export::run_export(args, output, project_root, prefs),
        Commands::Live(args) => cmd::live::run_live(args, output, project_root, prefs),
        Commands::Completions(args) => {
            let mut command = Cli::command();
            cmd::completions::run_completions(args.shell, &mut command)
        }
    }
}

//! Kiln CLI: inspection of the incremental compile machinery.
//!
//! Provides `kiln key` and `kiln bridge` for the compiler bridge cache,
//! `kiln analysis` for summarising an analysis store, and `kiln lookup` for
//! checking how classpath entries resolve to upstream analyses.

#![warn(missing_docs)]

mod bridge;
mod inspect;
mod project;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Kiln: incremental compile orchestration for JVM builds.
#[derive(Parser, Debug)]
#[command(name = "kiln", version, about = "Kiln incremental compile tools")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a custom `kiln.toml` configuration file.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the bridge cache key of the configured toolchain.
    Key,
    /// Build the compiler bridge if needed and print its path.
    Bridge(BridgeArgs),
    /// Summarise an analysis store.
    Analysis(AnalysisArgs),
    /// Show how classpath entries resolve to upstream analyses.
    Lookup(LookupArgs),
}

/// Arguments for the `kiln bridge` subcommand.
#[derive(Parser, Debug)]
pub struct BridgeArgs {
    /// Build this bridge version instead of the one derived from the engine.
    #[arg(long = "bridge-version")]
    pub version: Option<String>,
}

/// Arguments for the `kiln analysis` subcommand.
#[derive(Parser, Debug)]
pub struct AnalysisArgs {
    /// Path of the analysis store file.
    pub store: PathBuf,

    /// List every source and the classes it defines.
    #[arg(short, long)]
    pub sources: bool,
}

/// Arguments for the `kiln lookup` subcommand.
#[derive(Parser, Debug)]
pub struct LookupArgs {
    /// Classpath entries (directories or jars).
    #[arg(required = true)]
    pub entries: Vec<PathBuf>,

    /// Also report whether an entry defines this binary class name.
    #[arg(long)]
    pub class: Option<String>,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print verbose/debug information.
    pub verbose: bool,
    /// Optional path to a custom config file.
    pub config: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        config: cli.config,
    };
    init_tracing(&global);

    let result = match cli.command {
        Command::Key => bridge::run_key(&global),
        Command::Bridge(ref args) => bridge::run_bridge(args, &global),
        Command::Analysis(ref args) => inspect::run_analysis(args),
        Command::Lookup(ref args) => inspect::run_lookup(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

/// Installs the log subscriber. `RUST_LOG` wins over the flags.
fn init_tracing(global: &GlobalArgs) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter(global).into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();
}

fn default_filter(global: &GlobalArgs) -> &'static str {
    if global.quiet {
        "error"
    } else if global.verbose {
        "debug"
    } else {
        "info"
    }
}

//! pilot — generate an operator scaffold from a `pilot.yaml` descriptor.
//!
//! # Usage
//!
//! ```text
//! pilot init [dir] --api-version <group/version> --kind <Kind> [--phase name[:inputs[:outputs]] ...]
//! pilot plan
//! pilot generate [--dry-run]
//! pilot diff
//! pilot deploy
//! ```
//!
//! Every command except `init` accepts `--descriptor`, `--module-root`,
//! `--templates` (or `PILOT_TEMPLATES`) and `--out`.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{
    deploy::DeployArgs, diff::DiffArgs, generate::GenerateArgs, init::InitArgs, plan::PlanArgs,
};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "pilot",
    version,
    about = "Generate operator scaffolding from a project descriptor",
    long_about = None,
)]
struct Cli {
    /// Log debug output to stderr (overrides RUST_LOG).
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write a starter pilot.yaml.
    Init(InitArgs),

    /// List the files a generation run would produce.
    Plan(PlanArgs),

    /// Render and write the scaffold.
    Generate(GenerateArgs),

    /// Show unified diff of what generate would write.
    Diff(DiffArgs),

    /// Print the operator's Kubernetes Deployment manifest.
    Deploy(DeployArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.command {
        Commands::Init(args) => args.run(),
        Commands::Plan(args) => args.run(),
        Commands::Generate(args) => args.run(),
        Commands::Diff(args) => args.run(),
        Commands::Deploy(args) => args.run(),
    }
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

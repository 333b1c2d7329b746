use std::path::PathBuf;

use clap::{Parser, Subcommand};
use registrar_tools::distribute::{AuditOptions, distribute_files};
use registrar_tools::registry::ProgramRegistry;
use registrar_tools::{DistributeError, Result};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    if let Err(error) = run(cli) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    init_logging()?;
    match cli.command {
        Command::Distribute(args) => execute_distribute(args),
    }
}

fn execute_distribute(args: DistributeArgs) -> Result<()> {
    for input in [&args.enrollment, &args.profiles, &args.grants] {
        if !input.exists() {
            return Err(DistributeError::MissingInput(input.clone()));
        }
    }

    let registry = match &args.registry {
        Some(path) => ProgramRegistry::from_json_file(path, &args.registrations)?,
        None => ProgramRegistry::builtin(&args.registrations),
    };

    let options = AuditOptions {
        dir: args.audit_dir,
        base: args.audit_base,
        history: args.history,
    };

    let trail = distribute_files(
        &args.enrollment,
        &args.profiles,
        &args.grants,
        &registry,
        &options,
    )?;
    println!("distributed {} record(s)", trail.len());
    Ok(())
}

fn init_logging() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| DistributeError::Logging(error.to_string()))
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Distribute scraped enrollment data into per-program registration workbooks."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Reconcile the scraped tables into the registration workbooks.
    Distribute(DistributeArgs),
}

#[derive(clap::Args)]
struct DistributeArgs {
    /// Enrollment table produced by the scraper.
    #[arg(long)]
    enrollment: PathBuf,

    /// User-profile table produced by the scraper.
    #[arg(long)]
    profiles: PathBuf,

    /// Grant table keyed by email address.
    #[arg(long)]
    grants: PathBuf,

    /// Folder holding the per-program registration workbooks.
    #[arg(long, default_value = "Registrations")]
    registrations: PathBuf,

    /// Optional JSON file overriding the built-in program registry.
    #[arg(long)]
    registry: Option<PathBuf>,

    /// Directory receiving the timestamped audit snapshot.
    #[arg(long, default_value = ".")]
    audit_dir: PathBuf,

    /// Base name of the audit snapshot file.
    #[arg(long, default_value = "distributed")]
    audit_base: String,

    /// Optional cumulative audit history workbook to fold this run into.
    #[arg(long)]
    history: Option<PathBuf>,
}

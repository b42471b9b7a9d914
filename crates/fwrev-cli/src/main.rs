mod version;

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use fwrev_core::backend::{GitBackend, ResolveError};
use fwrev_core::resolver::{resolve_version, Define, FirmwareVersion, DEFAULT_DEFINE_NAME};

const LOG_ENV: &str = "FWREV_LOG";

/// Print the firmware version define derived from git, e.g.
/// '-DFIRMWARE_VERSION="v2.3.0-abc1234-d"'.
#[derive(Parser)]
#[command(name = "fwrev", version = version::FULL)]
struct Cli {
    /// Repository to inspect (defaults to the current directory)
    #[arg(short = 'C', long, env = "FWREV_REPO")]
    repo: Option<PathBuf>,
    /// git program to run (defaults to the one on PATH)
    #[arg(long, env = "FWREV_GIT")]
    git: Option<PathBuf>,
    /// Name of the emitted define
    #[arg(long, default_value = DEFAULT_DEFINE_NAME)]
    name: String,
    /// Log resolution details to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "off" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn git_backend(cli: &Cli) -> Result<GitBackend, ResolveError> {
    let backend = match &cli.git {
        Some(program) => GitBackend::with_program(program),
        None => GitBackend::discover()?,
    };
    Ok(match &cli.repo {
        Some(repo) => backend.in_repo(repo),
        None => backend,
    })
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let version = match git_backend(&cli) {
        Ok(backend) => resolve_version(&backend),
        Err(err) => {
            tracing::debug!(error = %err, "no git backend, falling back to UNKNOWN");
            FirmwareVersion::Unknown
        }
    };

    let define = Define::new(cli.name, version);
    writeln!(std::io::stdout().lock(), "{define}")?;
    Ok(())
}

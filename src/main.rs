use anyhow;
use clap::{Parser, Subcommand};

use pilewin::coverage::{self, CoverageArgs};
use pilewin::domains::{self, DomainArgs};

#[derive(Parser)]
#[command(version, about, long_about=None)]
#[command(propagate_version = true)]
///
/// pilewin
///
struct Cli {
    #[command(subcommand)]
    commands: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Windowed per-sample coverage of BED regions from BAM files
    Coverage(CoverageArgs),
    /// Extract ENRICHED domains from rseg output and summarize them
    Domains(DomainArgs),
}

fn main() -> anyhow::Result<()> {
    /////////////////////////
    // set up event logger //
    /////////////////////////
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let cli = Cli::parse();

    match &cli.commands {
        Commands::Coverage(args) => {
            coverage::run_coverage(args)?;
        }
        Commands::Domains(args) => {
            domains::run_domains(args)?;
        }
    }
    Ok(())
}

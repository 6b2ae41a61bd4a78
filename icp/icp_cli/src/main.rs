use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod integration;

use commands::profile::{InspectArgs, ResetPhaseArgs};
use commands::push::PushIcpArgs;

/// Write Ideal Customer Profile reports into company profiles
#[derive(Parser)]
#[clap(author, version, about)]
struct Cli {
    /// TOML file with a [store] table; environment variables override it
    #[clap(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[clap(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the ICP report payload into a company profile
    #[clap(name = "push-icp")]
    PushIcp(PushIcpArgs),

    /// Show where ICP data sits in a company profile
    Inspect(InspectArgs),

    /// Return a company profile to the end of phase one
    #[clap(name = "reset-phase")]
    ResetPhase(ResetPhaseArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    integration::init_logging(cli.verbose);

    let config = cli.config.as_deref();
    match &cli.command {
        Commands::PushIcp(args) => commands::push::execute_push_icp(args, config),
        Commands::Inspect(args) => commands::profile::execute_inspect(args, config),
        Commands::ResetPhase(args) => commands::profile::execute_reset_phase(args, config),
    }
}

pub mod aliases;
pub mod reconcile;
pub mod snapshot;

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "catsync")]
#[command(about = "Reconcile service registrations against a service catalog.")]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Reduce output (-q warnings only, -qq errors only)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub quiet: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Reconcile every registration in a JSON file against a catalog snapshot
    #[command(alias = "r")]
    Reconcile {
        /// JSON array of service registrations
        registrations: PathBuf,
        /// Catalog snapshot; a missing file starts an empty catalog
        #[arg(long)]
        catalog: PathBuf,
        /// Run the upsert passes as background tasks
        #[arg(long)]
        detach: bool,
        /// Do not write the resulting catalog back
        #[arg(long)]
        dry_run: bool,
    },
    /// List the tiers, lifecycles and teams known to a catalog snapshot
    #[command(alias = "a")]
    Aliases {
        #[arg(long)]
        catalog: PathBuf,
    },
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

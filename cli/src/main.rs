mod commands;
mod terminal;

use commands::{CommandLine, Commands, aliases, reconcile};
use catsync_common::config::Config;
use terminal::{logging, print};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    logging::init_logging(commands.verbose, commands.quiet);

    match commands.command {
        Commands::Reconcile {
            registrations,
            catalog,
            detach,
            dry_run,
        } => {
            let cfg = Config {
                detach,
                quiet: commands.quiet,
            };
            print::header("reconciling registrations", cfg.quiet);
            reconcile::reconcile(&registrations, &catalog, dry_run, &cfg).await
        }
        Commands::Aliases { catalog } => {
            let cfg = Config {
                detach: false,
                quiet: commands.quiet,
            };
            aliases::aliases(&catalog, &cfg).await
        }
    }
}

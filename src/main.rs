//! usbscale CLI
//!
//! Finds a supported USB scale, polls it until the weighing settles and
//! prints the weight. Status and error diagnostics go to stderr; stdout
//! carries only the result.

use clap::Parser;

mod cli;
use cli::{Cli, Commands};

mod commands;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("usbscale=info".parse()?)
                .add_directive("scale_transport=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match &cli.command {
        // Default: weigh once
        None | Some(Commands::Weigh) => commands::weigh(&cli),
        Some(Commands::List) => commands::list(&cli),
    }
}

mod cli;
mod commands;
mod config;
mod error;
mod fetcher;
mod normalize;
mod output;
mod prompt;
mod types;
mod writer;

use std::io;

use clap::{CommandFactory, Parser};
use clap_complete::generate;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use config::Config;
use error::Result;
use std::error::Error;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {e}");

        // Show error chain if verbose flag was passed
        if std::env::args().any(|arg| arg == "--verbose" || arg == "-v") {
            let mut source = e.source();
            while let Some(cause) = source {
                eprintln!("Caused by: {cause}");
                source = cause.source();
            }
        }

        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);
    output::set_json_output(cli.json);
    output::set_quiet(cli.quiet);

    match cli.command {
        // Commands that don't read the config file
        Some(Commands::Completions { shell }) => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "user-aggregator", &mut io::stdout());
        }
        Some(Commands::Init) => {
            commands::init::run()?;
        }
        command => {
            let config = Config::load()?;

            match command {
                Some(Commands::Sources { sources }) => {
                    commands::sources::list(&config, &sources)?;
                }
                Some(Commands::Fetch(args)) => {
                    commands::fetch::run(&config, args.or(cli.fetch)).await?;
                }
                None => {
                    commands::fetch::run(&config, cli.fetch).await?;
                }
                Some(Commands::Completions { .. }) | Some(Commands::Init) => {
                    // Already handled above
                }
            }
        }
    }

    Ok(())
}

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use crate::types::OutputFormat;

#[derive(Parser)]
#[command(name = "user-aggregator")]
#[command(about = "Fetch users from several public APIs and merge them into one file", version)]
#[command(after_help = "EXAMPLES:
    user-aggregator                          Prompt for directory and format
    user-aggregator -o ./out -f csv          Write ./out/users.csv
    user-aggregator -s https://dummyjson.com/users -o . -f json
    user-aggregator sources                  Show the configured sources")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub fetch: FetchArgs,

    /// Output as JSON for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress the per-source summary table
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Show debug logs and full error chains
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch, normalize and write users (the default)
    #[command(after_help = "EXAMPLES:
    user-aggregator fetch -o ./out -f csv
    user-aggregator fetch -s https://reqres.in/api/users -s https://dummyjson.com/users")]
    Fetch(FetchArgs),
    /// List the sources that would be fetched
    #[command(after_help = "EXAMPLES:
    user-aggregator sources
    user-aggregator sources --json")]
    Sources {
        /// Source URLs overriding the configured ones
        #[arg(long = "source", short = 's', value_name = "URL")]
        sources: Vec<String>,
    },
    /// Generate shell completions
    #[command(after_help = "EXAMPLES:
    user-aggregator completions bash > ~/.bash_completion.d/user-aggregator
    user-aggregator completions zsh > ~/.zfunc/_user-aggregator")]
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
    /// Initialize configuration file interactively
    Init,
}

#[derive(Args, Clone, Default)]
pub struct FetchArgs {
    /// Directory the users file is written to
    #[arg(long, short, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Output file format
    #[arg(long, short, value_enum, ignore_case = true)]
    pub format: Option<OutputFormat>,

    /// Source URL to fetch (repeatable; replaces the configured sources)
    #[arg(long = "source", short = 's', value_name = "URL")]
    pub sources: Vec<String>,
}

impl FetchArgs {
    /// Fill settings missing here from flags given before the subcommand.
    pub fn or(self, outer: FetchArgs) -> FetchArgs {
        FetchArgs {
            output_dir: self.output_dir.or(outer.output_dir),
            format: self.format.or(outer.format),
            sources: if self.sources.is_empty() {
                outer.sources
            } else {
                self.sources
            },
        }
    }
}

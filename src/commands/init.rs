use std::io::{BufRead, Write};
use std::path::PathBuf;

use crate::config::{parse_sources, Config, DEFAULT_SOURCES};
use crate::error::Result;
use crate::prompt::{self, Prompter};
use crate::types::OutputFormat;

pub fn run() -> Result<()> {
    let config_path = Config::config_path()?;
    let mut prompter = prompt::stdio();

    if config_path.exists() {
        let question = format!(
            "Config file already exists at {}. Overwrite?",
            config_path.display()
        );
        if !prompter.confirm(&question)? {
            println!("Aborted.");
            return Ok(());
        }
    }

    println!("User Aggregator Configuration");
    println!("=============================\n");

    let config = ask_config(&mut prompter)?;
    config.save_to(&config_path)?;

    println!("\nConfig saved to {}", config_path.display());
    Ok(())
}

/// Ask for every setting; blank answers leave the setting unset.
fn ask_config<R: BufRead, W: Write>(prompter: &mut Prompter<R, W>) -> Result<Config> {
    let sources = prompter.ask(&format!(
        "Source URLs, comma-separated [default: {}]:",
        DEFAULT_SOURCES.len()
    ))?;
    let sources: Vec<String> = sources
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect();
    if !sources.is_empty() {
        parse_sources(&sources)?;
    }

    let output_dir = prompter.ask("Default output directory [optional]:")?;

    let format = prompter.ask("Default format, json or csv [optional]:")?;
    let format = if format.is_empty() {
        None
    } else {
        Some(format.parse::<OutputFormat>()?)
    };

    Ok(Config {
        sources: (!sources.is_empty()).then_some(sources),
        output_dir: (!output_dir.is_empty()).then(|| PathBuf::from(output_dir)),
        format,
    })
}

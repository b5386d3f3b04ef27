//! Interactive questions asked when a setting was not given on the command line.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use crate::error::{AggregatorError, Result};
use crate::types::OutputFormat;

pub struct Prompter<R, W> {
    input: R,
    output: W,
}

/// Prompter wired to the terminal. Questions go to stderr so stdout only
/// carries results, which keeps `--json` output parseable.
pub fn stdio() -> Prompter<io::StdinLock<'static>, io::Stderr> {
    Prompter::new(io::stdin().lock(), io::stderr())
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Ask one question and return the trimmed answer (may be empty).
    pub fn ask(&mut self, question: &str) -> Result<String> {
        write!(self.output, "{question} ")?;
        self.output.flush()?;

        let mut answer = String::new();
        if self.input.read_line(&mut answer)? == 0 {
            return Err(AggregatorError::InputClosed);
        }
        Ok(answer.trim().to_string())
    }

    /// Ask until a non-empty directory is entered.
    pub fn ask_output_dir(&mut self) -> Result<PathBuf> {
        loop {
            let answer = self.ask("Enter the output directory:")?;
            if !answer.is_empty() {
                return Ok(PathBuf::from(answer));
            }
            writeln!(self.output, "A directory is required.")?;
        }
    }

    /// Ask until `json` or `csv` is entered, in any letter case.
    pub fn ask_format(&mut self) -> Result<OutputFormat> {
        loop {
            let answer = self.ask("Enter the file format (json or csv):")?;
            match answer.parse() {
                Ok(format) => return Ok(format),
                Err(e) => writeln!(self.output, "{e}")?,
            }
        }
    }

    /// Ask a yes/no question; anything but `y`/`yes` is no.
    pub fn confirm(&mut self, question: &str) -> Result<bool> {
        let answer = self.ask(&format!("{question} [y/N]"))?;
        Ok(answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes"))
    }
}

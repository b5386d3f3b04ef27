use serde::Serialize;
use tabled::Tabled;

use crate::config::Config;
use crate::error::Result;
use crate::output;

#[derive(Serialize)]
struct SourceEntry {
    index: usize,
    url: String,
    host: String,
}

#[derive(Tabled)]
struct SourceRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Host")]
    host: String,
    #[tabled(rename = "URL")]
    url: String,
}

impl From<&SourceEntry> for SourceRow {
    fn from(entry: &SourceEntry) -> Self {
        Self {
            index: entry.index,
            host: entry.host.clone(),
            url: entry.url.clone(),
        }
    }
}

pub fn list(config: &Config, explicit: &[String]) -> Result<()> {
    let entries: Vec<SourceEntry> = config
        .sources(explicit)?
        .into_iter()
        .enumerate()
        .map(|(i, url)| SourceEntry {
            index: i + 1,
            host: url.host_str().unwrap_or("-").to_string(),
            url: url.to_string(),
        })
        .collect();

    output::print_table(&entries, |entry| SourceRow::from(entry));
    Ok(())
}

use std::path::PathBuf;

use colored::Colorize;
use serde::Serialize;
use tabled::Tabled;
use tracing::info;
use url::Url;

use crate::cli::FetchArgs;
use crate::config::Config;
use crate::error::Result;
use crate::fetcher::{SourceClient, SourceFetch};
use crate::normalize::normalize_payload;
use crate::output::{self, status_colored, truncate};
use crate::prompt;
use crate::types::User;
use crate::writer::write_users;

/// What one source contributed to the run.
#[derive(Serialize, Debug, PartialEq)]
pub struct SourceReport {
    pub source: String,
    pub accepted: usize,
    pub skipped: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Users from every source, merged in source order.
pub struct Aggregate {
    pub users: Vec<User>,
    pub reports: Vec<SourceReport>,
}

#[derive(Serialize)]
struct RunSummary<'a> {
    path: PathBuf,
    total: usize,
    sources: &'a [SourceReport],
}

#[derive(Tabled)]
struct SourceRow {
    #[tabled(rename = "Source")]
    source: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Users")]
    accepted: usize,
    #[tabled(rename = "Skipped")]
    skipped: usize,
}

impl From<&SourceReport> for SourceRow {
    fn from(report: &SourceReport) -> Self {
        let status = match &report.error {
            Some(e) => status_colored(false, &truncate(e, 40)),
            None => status_colored(true, "ok"),
        };
        Self {
            source: report.source.clone(),
            status,
            accepted: report.accepted,
            skipped: report.skipped,
        }
    }
}

/// Normalize each settled fetch into its own buffer, then concatenate.
pub fn merge(fetches: Vec<SourceFetch>) -> Aggregate {
    let mut users = Vec::new();
    let mut reports = Vec::with_capacity(fetches.len());

    for fetch in fetches {
        let source = fetch.url.to_string();
        match fetch.result {
            Ok(payload) => {
                let normalized = normalize_payload(&payload, &source);
                reports.push(SourceReport {
                    source,
                    accepted: normalized.users.len(),
                    skipped: normalized.skipped,
                    error: None,
                });
                users.extend(normalized.users);
            }
            Err(e) => reports.push(SourceReport {
                source,
                accepted: 0,
                skipped: 0,
                error: Some(e.to_string()),
            }),
        }
    }

    Aggregate { users, reports }
}

pub async fn collect(client: &SourceClient, sources: &[Url]) -> Aggregate {
    merge(client.fetch_all(sources).await)
}

pub async fn run(config: &Config, args: FetchArgs) -> Result<()> {
    let sources = config.sources(&args.sources)?;

    let dir = match config.output_dir(args.output_dir) {
        Some(dir) => dir,
        None => prompt::stdio().ask_output_dir()?,
    };
    let format = match config.format(args.format) {
        Some(format) => format,
        None => prompt::stdio().ask_format()?,
    };

    info!(sources = sources.len(), format = %format, "starting fetch");
    let client = SourceClient::new()?;
    let aggregate = collect(&client, &sources).await;

    let (path, total) = write_users(&dir, format, &aggregate.users)?;

    if output::is_json_output() {
        let summary = RunSummary {
            path,
            total,
            sources: &aggregate.reports,
        };
        output::print_item(&summary, |_| {});
        return Ok(());
    }

    if !output::is_quiet() {
        output::print_table(&aggregate.reports, |report| SourceRow::from(report));
    }
    println!(
        "{} {}",
        "Data written successfully to".green(),
        path.display()
    );
    println!("Total number of users: {}", total.to_string().bold());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AggregatorError;
    use crate::fetcher::fake_api::FakeApi;
    use crate::types::NULL_SENTINEL;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_merge_keeps_source_order_and_reports_failures() {
        let a = Url::parse("https://a.test/").unwrap();
        let b = Url::parse("https://b.test/").unwrap();
        let c = Url::parse("https://c.test/").unwrap();

        let fetches = vec![
            SourceFetch {
                url: a.clone(),
                result: Ok(json!([
                    {"first_name": "Ada", "last_name": "Lovelace"},
                    {"email": "x@y.com"}
                ])),
            },
            SourceFetch {
                url: b.clone(),
                result: Err(AggregatorError::SourceStatus {
                    status: 500,
                    message: String::new(),
                }),
            },
            SourceFetch {
                url: c.clone(),
                result: Ok(json!({"firstName": "Grace", "lastName": "Hopper", "id": 3})),
            },
        ];

        let aggregate = merge(fetches);

        let names: Vec<&str> = aggregate.users.iter().map(|u| u.first_name.as_str()).collect();
        assert_eq!(names, vec!["Ada", "Grace"]);
        assert_eq!(aggregate.users[0].source_id, a.to_string());

        assert_eq!(aggregate.reports.len(), 3);
        assert_eq!((aggregate.reports[0].accepted, aggregate.reports[0].skipped), (1, 1));
        assert!(aggregate.reports[1].error.as_deref().unwrap().contains("500"));
        assert_eq!(aggregate.reports[1].accepted, 0);
        assert_eq!(aggregate.reports[2].accepted, 1);
    }

    #[tokio::test]
    async fn test_failing_source_does_not_affect_the_others() {
        let api = FakeApi::start().await;
        let client = SourceClient::new().unwrap();
        let sources = vec![
            api.url("snake"),
            api.url("broken"),
            api.url("envelope"),
            api.url("camel"),
        ];

        let aggregate = collect(&client, &sources).await;

        let expected = vec![
            User {
                first_name: "Ada".into(),
                last_name: "Lovelace".into(),
                email: "a@x.com".into(),
                source_id: "7".into(),
            },
            User {
                first_name: "Grace".into(),
                last_name: "Hopper".into(),
                email: "g@x.com".into(),
                source_id: sources[2].to_string(),
            },
            User {
                first_name: "Jennie".into(),
                last_name: "Nichols".into(),
                email: "j@x.com".into(),
                source_id: sources[2].to_string(),
            },
            User {
                first_name: "Emily".into(),
                last_name: "Johnson".into(),
                email: "e@x.com".into(),
                source_id: "1".into(),
            },
        ];
        assert_eq!(aggregate.users, expected);

        let broken = &aggregate.reports[1];
        assert_eq!(broken.accepted, 0);
        assert!(broken.error.is_some());
        assert_eq!(aggregate.reports[3].skipped, 1);
    }

    #[tokio::test]
    async fn test_nameless_payload_contributes_nothing() {
        let api = FakeApi::start().await;
        let client = SourceClient::new().unwrap();

        let aggregate = collect(&client, &[api.url("nameless")]).await;
        assert!(aggregate.users.is_empty());
        assert_eq!(
            aggregate.reports,
            vec![SourceReport {
                source: api.url("nameless").to_string(),
                accepted: 0,
                skipped: 1,
                error: None,
            }]
        );
    }

    #[tokio::test]
    async fn test_run_writes_file_without_prompting() {
        let api = FakeApi::start().await;
        let dir = tempfile::tempdir().unwrap();
        let args = FetchArgs {
            output_dir: Some(dir.path().to_path_buf()),
            format: Some(crate::types::OutputFormat::Csv),
            sources: vec![api.url("snake").to_string(), api.url("broken").to_string()],
        };

        run(&Config::default(), args).await.unwrap();

        let mut reader = csv::Reader::from_path(dir.path().join("users.csv")).unwrap();
        let users: Vec<User> = reader.deserialize().map(|row| row.unwrap()).collect();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].last_name, "Lovelace");
        assert_ne!(users[0].email, NULL_SENTINEL);
    }
}

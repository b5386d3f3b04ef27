use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AggregatorError, Result};
use crate::types::OutputFormat;

pub const SOURCES_ENV: &str = "USER_AGGREGATOR_SOURCES";
pub const OUTPUT_DIR_ENV: &str = "USER_AGGREGATOR_OUTPUT_DIR";

/// Public user APIs queried when nothing else is configured.
pub const DEFAULT_SOURCES: &[&str] = &[
    "https://randomuser.me/api/",
    "https://jsonplaceholder.typicode.com/users",
    "https://dummyjson.com/users",
    "https://reqres.in/api/users",
];

#[derive(Serialize, Deserialize, Default, Debug, PartialEq)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<OutputFormat>,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Config::default());
        }

        let contents =
            std::fs::read_to_string(config_path).map_err(|e| AggregatorError::ConfigRead {
                path: config_path.to_path_buf(),
                source: e,
            })?;

        toml::from_str(&contents).map_err(|e| AggregatorError::ConfigParse {
            path: config_path.to_path_buf(),
            source: e,
        })
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        let write_err = |e| AggregatorError::ConfigWrite {
            path: config_path.to_path_buf(),
            source: e,
        };

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }

        let contents =
            toml::to_string_pretty(self).map_err(|e| AggregatorError::ConfigSerialize {
                path: config_path.to_path_buf(),
                source: e,
            })?;
        std::fs::write(config_path, contents).map_err(write_err)
    }

    pub fn config_path() -> Result<PathBuf> {
        ProjectDirs::from("", "", "user-aggregator")
            .map(|dirs| dirs.config_dir().join("config.toml"))
            .ok_or(AggregatorError::NoConfigDir)
    }

    /// Get the source list: flags, then env var, then config file, then defaults
    pub fn sources(&self, explicit: &[String]) -> Result<Vec<Url>> {
        let env = std::env::var(SOURCES_ENV).ok();
        let raw = pick_sources(explicit, env.as_deref(), self.sources.as_deref());
        parse_sources(&raw)
    }

    /// Get the output directory, preferring explicit argument, then env var
    pub fn output_dir(&self, explicit: Option<PathBuf>) -> Option<PathBuf> {
        explicit
            .or_else(|| std::env::var_os(OUTPUT_DIR_ENV).map(PathBuf::from))
            .or_else(|| self.output_dir.clone())
    }

    pub fn format(&self, explicit: Option<OutputFormat>) -> Option<OutputFormat> {
        explicit.or(self.format)
    }
}

fn pick_sources(explicit: &[String], env: Option<&str>, file: Option<&[String]>) -> Vec<String> {
    if !explicit.is_empty() {
        return explicit.to_vec();
    }

    if let Some(env) = env {
        let from_env: Vec<String> = env
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();
        if !from_env.is_empty() {
            return from_env;
        }
    }

    match file {
        Some(list) if !list.is_empty() => list.to_vec(),
        _ => DEFAULT_SOURCES.iter().map(|s| s.to_string()).collect(),
    }
}

/// Parse and validate source URLs; only absolute http(s) URLs are accepted.
pub fn parse_sources(raw: &[String]) -> Result<Vec<Url>> {
    if raw.is_empty() {
        return Err(AggregatorError::NoSources);
    }

    raw.iter()
        .map(|s| {
            let url = Url::parse(s.trim()).map_err(|_| AggregatorError::InvalidUrl(s.clone()))?;
            match url.scheme() {
                "http" | "https" => Ok(url),
                _ => Err(AggregatorError::InvalidUrl(s.clone())),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_pick_sources_prefers_flags() {
        let explicit = strings(&["http://a.test/"]);
        let file = strings(&["http://c.test/"]);
        let picked = pick_sources(&explicit, Some("http://b.test/"), Some(&file));
        assert_eq!(picked, explicit);
    }

    #[test]
    fn test_pick_sources_env_is_comma_separated() {
        let picked = pick_sources(&[], Some(" http://a.test/ ,, http://b.test/"), None);
        assert_eq!(picked, strings(&["http://a.test/", "http://b.test/"]));
    }

    #[test]
    fn test_pick_sources_falls_back_to_file_then_defaults() {
        let file = strings(&["http://c.test/"]);
        assert_eq!(pick_sources(&[], Some(""), Some(&file)), file);
        assert_eq!(pick_sources(&[], None, Some(&[])).len(), DEFAULT_SOURCES.len());
    }

    #[test]
    fn test_parse_sources_rejects_non_http() {
        let err = parse_sources(&strings(&["ftp://a.test/"])).unwrap_err();
        assert!(matches!(err, AggregatorError::InvalidUrl(_)));

        let err = parse_sources(&strings(&["not a url"])).unwrap_err();
        assert!(matches!(err, AggregatorError::InvalidUrl(_)));

        assert!(matches!(parse_sources(&[]), Err(AggregatorError::NoSources)));
    }

    #[test]
    fn test_default_sources_are_valid() {
        let raw: Vec<String> = DEFAULT_SOURCES.iter().map(|s| s.to_string()).collect();
        assert_eq!(parse_sources(&raw).unwrap().len(), 4);
    }

    #[test]
    fn test_load_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = Config {
            sources: Some(strings(&["https://dummyjson.com/users"])),
            output_dir: Some(PathBuf::from("/tmp/out")),
            format: Some(OutputFormat::Csv),
        };

        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[cfg(unix)]
    #[test]
    fn test_save_non_utf8_output_dir_fails() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let config = Config {
            output_dir: Some(PathBuf::from(OsStr::from_bytes(b"/tmp/\xff\xfe"))),
            ..Config::default()
        };

        let err = config.save_to(&path).unwrap_err();
        assert!(matches!(err, AggregatorError::ConfigSerialize { .. }));
        assert!(!path.exists());
    }

    #[test]
    fn test_load_invalid_toml_names_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "format = \"xml\"").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, AggregatorError::ConfigParse { .. }));
        assert!(err.to_string().contains("config.toml"));
    }
}

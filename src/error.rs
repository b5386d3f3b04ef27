use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AggregatorError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Source returned status {status}: {message}")]
    SourceStatus { status: u16, message: String },

    #[error("Source returned an unparseable payload: {0}")]
    Payload(#[source] serde_json::Error),

    #[error("Failed to read config file at {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to write config file at {path}: {source}")]
    ConfigWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode config for {path}: {source}")]
    ConfigSerialize {
        path: PathBuf,
        #[source]
        source: toml::ser::Error,
    },

    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Invalid source URL: {0}")]
    InvalidUrl(String),

    #[error("No sources configured")]
    NoSources,

    #[error("Invalid format '{0}' (expected json or csv)")]
    InvalidFormat(String),

    #[error("Input closed before a value was entered")]
    InputClosed,

    #[error("Failed to write output file {path}: {source}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode output file {path}: {message}")]
    OutputEncode { path: PathBuf, message: String },
}

pub type Result<T> = std::result::Result<T, AggregatorError>;

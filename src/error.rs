use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while assembling the run configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required configuration key {0}")]
    Missing(&'static str),

    #[error("invalid value {value:?} for {key}")]
    Invalid { key: &'static str, value: String },

    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised by the browser session and site walker
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("could not connect to any WebDriver server (tried {0})")]
    Connect(String),

    #[error("invalid target url {0}")]
    InvalidUrl(String),

    #[error("browser command failed while {context}: {source}")]
    Command {
        context: String,
        #[source]
        source: fantoccini::error::CmdError,
    },

    #[error("timed out after {0}s")]
    Timeout(u64),

    #[error("target {0} was unreachable: no page could be captured")]
    Unreachable(String),
}

impl CrawlError {
    pub(crate) fn command(context: impl Into<String>, source: fantoccini::error::CmdError) -> Self {
        CrawlError::Command {
            context: context.into(),
            source,
        }
    }
}

/// Errors raised by the generation service client
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("request to generation service failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("generation service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed generation response: {0}")]
    Malformed(String),

    #[error("generation request timed out after {0}s")]
    Timeout(u64),
}

/// Errors raised while reading or writing the extraction output tree
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid json in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors raised while writing the generated project tree
#[derive(Debug, Error)]
pub enum MaterializeError {
    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize {what}: {source}")]
    Json {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Setup-level failures that abort a run
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Crawl(#[from] CrawlError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Materialize(#[from] MaterializeError),

    #[error("failed to build http client: {0}")]
    Client(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Attach a path to an io error
pub(crate) fn store_io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> StoreError {
    let path = path.into();
    move |source| StoreError::Io { path, source }
}

pub(crate) fn materialize_io(
    path: impl Into<PathBuf>,
) -> impl FnOnce(std::io::Error) -> MaterializeError {
    let path = path.into();
    move |source| MaterializeError::Io { path, source }
}

use std::path::PathBuf;

use thiserror::Error;

/// Faults that stop a stage before it issues any request.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("credential file {path} could not be read: {source}")]
    CredentialUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("credential file {path} is empty")]
    CredentialEmpty { path: PathBuf },
    #[error("leaderboard url template {0:?} has no {{page}} placeholder")]
    MissingPagePlaceholder(String),
    #[error("invalid url {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("leaderboard page size must be positive")]
    ZeroPageSize,
    #[error("http timeout must be positive")]
    ZeroTimeout,
    #[error("failed to build http client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

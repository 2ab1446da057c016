use std::path::PathBuf;
use thiserror::Error;

/// Run-level failures. Only these abort a run; per-attempt and per-file
/// failures are contained by the component that hit them.
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Missing required input: {0}")]
    Precondition(String),

    #[error("Cannot read source directory {}: {source}", .path.display())]
    Scan {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Classification unavailable after {attempts} attempts")]
    ClassificationUnavailable { attempts: u32 },

    #[error("An organize run is already in progress")]
    RunInProgress,

    #[error("Organize run aborted: {0}")]
    RunAborted(String),
}

/// Failure reported by a text-classification backend.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("HTTP request failed: {0}")]
    Http(#[source] reqwest::Error),

    #[error("Service returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Service returned no text")]
    EmptyResponse,

    #[error("Backend misconfigured: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

impl From<reqwest::Error> for ServiceError {
    /// The request URL is dropped: it may carry credentials and this error
    /// ends up in the logs.
    fn from(err: reqwest::Error) -> Self {
        ServiceError::Http(err.without_url())
    }
}

/// Why a single classification attempt did not produce a grouping.
#[derive(Error, Debug)]
pub enum AttemptError {
    #[error("service call failed: {0}")]
    Service(#[from] ServiceError),

    #[error("response is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("response has unexpected shape: {0}")]
    Structure(String),
}

/// Why a single file could not be moved.
#[derive(Error, Debug)]
pub enum MoveError {
    #[error("source not found: {}", .0.display())]
    MissingSource(PathBuf),

    #[error("cannot move {} to {}: {source}", .from.display(), .to.display())]
    Io {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

//! Error types for host-side operations.

use thiserror::Error;

/// Errors from probes, artifact writing, runtime invocation, and version
/// lookups. Configuration problems never land here — they come back as
/// data in a `ValidationReport`.
#[derive(Error, Debug)]
pub enum HostError {
    /// Docker (or docker-compose) not found on the host
    #[error("Docker is not installed or not in PATH")]
    DockerNotFound,

    /// A container-runtime command exited non-zero
    #[error("docker-compose command failed: {0}")]
    ComposeFailed(String),

    /// The generator's contract was violated (invalid request reached it)
    #[error("deployment contract violated: {0}")]
    Contract(#[from] stackdock_core::StackError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP error (registry version lookups)
    #[error("HTTP error: {0}")]
    Http(String),
}

impl From<reqwest::Error> for HostError {
    fn from(err: reqwest::Error) -> Self {
        HostError::Http(err.to_string())
    }
}

/// Result type for host operations.
pub type Result<T> = std::result::Result<T, HostError>;

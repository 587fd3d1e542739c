use std::path::PathBuf;

pub type ApiResult<T> = Result<T, ApiError>;

/// Errors raised while fetching or decoding tournament documents.
#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    /// The HTTP request could not be sent (DNS, TLS, timeout, ...).
    #[error("network error for {url}: {source}")]
    Network { url: String, source: reqwest::Error },

    /// The server answered with a non-success status other than 404.
    #[error("unexpected status {status} for {url}")]
    Status { url: String, status: reqwest::StatusCode },

    #[error("failed to read response body from {url}: {source}")]
    Body { url: String, source: reqwest::Error },

    #[error("could not read {}: {source}", path.display())]
    Io { path: PathBuf, source: std::io::Error },

    /// The document is not valid JSON or a field has the wrong type.
    #[error("invalid json at {location}: {source}")]
    Decode { location: String, source: serde_json::Error },

    #[error("not found: {0}")]
    NotFound(String),

    /// The document decoded but a record broke a model invariant.
    #[error("invalid record in {location}: {source}")]
    InvalidRecord { location: String, source: RecordError },
}

/// A single record refused at the document boundary.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("match {index}: missing field `{field}`")]
    MissingField { index: usize, field: &'static str },

    #[error("match {index}: unknown stage `{stage}`")]
    UnknownStage { index: usize, stage: String },

    #[error("match {index}: `{team}` cannot play itself")]
    SameTeam { index: usize, team: String },

    #[error("{list} entry {index}: rank must be at least 1")]
    ZeroRank { list: &'static str, index: usize },

    #[error("{list} entry {index}: rank {rank} appears more than once")]
    DuplicateRank { list: &'static str, index: usize, rank: u32 },
}

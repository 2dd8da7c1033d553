//! Error types for volley-core

use thiserror::Error;

use crate::stats::RunStats;
use crate::transport::SOCKS5_ENDPOINT;

/// Fatal engine errors
///
/// These abort the run before (or, for [`EngineError::Cancelled`], during)
/// request dispatch. Per-request failures never surface here; they are
/// aggregated under pseudo-status 0 in [`RunStats`].
#[derive(Debug, Error)]
pub enum EngineError {
    /// Request count was zero
    #[error("request count must be at least 1")]
    InvalidCount,

    /// HTTP method could not be parsed
    #[error("invalid http method: {0:?}")]
    InvalidMethod(String),

    /// The SOCKS5 proxy client could not be constructed
    #[error("socks5 proxy unavailable at {SOCKS5_ENDPOINT}: {0}")]
    ProxyUnavailable(String),

    /// The per-request log file could not be created
    #[error("cannot open log file {path}: {reason}")]
    CannotOpenLog {
        /// Path the sink tried to create
        path: String,
        /// Underlying create/write failure
        reason: String,
    },

    /// The direct HTTP client could not be constructed
    #[error("building http client: {0}")]
    Client(#[from] reqwest::Error),

    /// The run was shut down before all requests completed
    ///
    /// In-flight workers were drained cleanly; `stats` holds every outcome
    /// observed up to the point of cancellation.
    #[error("run cancelled after {} completed requests", .stats.total())]
    Cancelled {
        /// Partial aggregation at the moment the run stopped
        stats: RunStats,
    },
}

/// Per-request payload encoding errors
///
/// Recorded under pseudo-status 0; the run continues.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Field map could not be serialised as a JSON object
    #[error("json encode: {0}")]
    Json(#[source] serde_json::Error),

    /// GraphQL envelope could not be serialised
    #[error("graphql encode: {0}")]
    Graphql(#[source] serde_json::Error),

    /// Binary payloads carry exactly one field's raw bytes
    #[error("binary payload requires exactly one field, got {0}")]
    BinaryFieldCount(usize),

    /// Format name not recognised when parsing from a string
    #[error("unsupported payload format: {0:?}")]
    UnsupportedFormat(String),
}

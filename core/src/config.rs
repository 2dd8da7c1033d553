//! Engine run configuration

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::encode::PayloadFormat;
use crate::error::EngineError;

/// Worker count used when the caller passes 0
pub const DEFAULT_WORKERS: usize = 10;

/// Chunk size used when the caller passes 0
pub const DEFAULT_CHUNK_SIZE: usize = 1000;

/// Parameters for one bulk run
///
/// Immutable input to the engine, validated on entry. The header map is
/// treated as read-only: each request gets its own copy with `Content-Type`
/// overwritten by the encoder, and the caller's map is never touched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineParams {
    /// HTTP method, e.g. `POST`
    pub method: String,

    /// Target endpoint for every request
    pub target_url: String,

    /// Headers applied to every request
    #[serde(default)]
    pub headers: HashMap<String, String>,

    /// Body encoding for the generated payload fields
    pub format: PayloadFormat,

    /// Route through the local SOCKS5 proxy
    #[serde(default)]
    pub use_proxy: bool,

    /// Total number of requests to issue
    pub count: usize,

    /// Concurrent workers per batch; 0 falls back to [`DEFAULT_WORKERS`]
    pub workers: usize,

    /// Batch size; 0 falls back to [`DEFAULT_CHUNK_SIZE`]
    pub chunk_size: usize,

    /// Requests per second across all workers; 0 disables pacing
    pub rate_limit: u32,

    /// Per-request CSV log; `None` disables logging
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_path: Option<String>,
}

impl EngineParams {
    /// Create params for `count` requests against `target_url`
    pub fn new(method: impl Into<String>, target_url: impl Into<String>, count: usize) -> Self {
        Self {
            method: method.into(),
            target_url: target_url.into(),
            headers: HashMap::new(),
            format: PayloadFormat::Json,
            use_proxy: false,
            count,
            workers: DEFAULT_WORKERS,
            chunk_size: DEFAULT_CHUNK_SIZE,
            rate_limit: 0,
            log_path: None,
        }
    }

    /// Set the headers applied to every request
    pub fn with_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers = headers;
        self
    }

    /// Set the payload encoding
    pub fn with_format(mut self, format: PayloadFormat) -> Self {
        self.format = format;
        self
    }

    /// Route through the local SOCKS5 proxy
    pub fn with_proxy(mut self, use_proxy: bool) -> Self {
        self.use_proxy = use_proxy;
        self
    }

    /// Set the worker count
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Set the batch size
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Set the global rate limit in requests per second
    pub fn with_rate_limit(mut self, rate_limit: u32) -> Self {
        self.rate_limit = rate_limit;
        self
    }

    /// Enable the per-request CSV log
    pub fn with_log_path(mut self, log_path: impl Into<String>) -> Self {
        self.log_path = Some(log_path.into());
        self
    }

    /// Validate the parameters
    ///
    /// Only the request count is a hard error; out-of-range worker and chunk
    /// values are coerced by the accessors below.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.count == 0 {
            return Err(EngineError::InvalidCount);
        }
        Ok(())
    }

    /// Worker count with the zero fallback applied
    pub fn effective_workers(&self) -> usize {
        if self.workers == 0 {
            DEFAULT_WORKERS
        } else {
            self.workers
        }
    }

    /// Chunk size with the zero fallback applied
    pub fn effective_chunk_size(&self) -> usize {
        if self.chunk_size == 0 {
            DEFAULT_CHUNK_SIZE
        } else {
            self.chunk_size
        }
    }
}

//! Bulk HTTP request engine
//!
//! volley-core issues many requests against a single endpoint with bounded
//! concurrency, bounded memory and optional global rate pacing, aggregating
//! outcomes by status code. The crate provides:
//!
//! - The [`Engine`]: chunked batches, per-batch worker pools, closed-world
//!   accounting into [`RunStats`]
//! - Payload encoding for json / form / multipart / binary / graphql bodies
//! - An optional SOCKS5 transport and a per-request CSV log sink

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod encode;
pub mod engine;
pub mod error;
pub mod pacer;
pub mod payload;
pub mod request;
pub mod sink;
pub mod stats;
pub mod transport;

pub use config::{EngineParams, DEFAULT_CHUNK_SIZE, DEFAULT_WORKERS};
pub use encode::PayloadFormat;
pub use engine::Engine;
pub use error::{EncodeError, EngineError};
pub use payload::{PayloadSource, WordlistSource};
pub use request::SnippetResponse;
pub use stats::{RunStats, STATUS_TRANSPORT_FAILURE};

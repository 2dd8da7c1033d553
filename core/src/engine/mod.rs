//! The bulk request engine
//!
//! The engine turns a parameter set and a payload source into N issued
//! requests with bounded concurrency and bounded memory:
//!
//! 1. `[0, N)` is partitioned into contiguous chunks of the configured size
//! 2. Each chunk runs under a fresh pool of W workers fed from a bounded
//!    job queue
//! 3. Workers pace themselves against a shared token bucket, encode their
//!    payload, dispatch, and report through bounded result channels
//! 4. The coordinator folds every outcome into [`crate::stats::RunStats`]
//!    and waits for the chunk to drain before starting the next
//!
//! Per-request failures (transport or encoding) never abort the run; they
//! aggregate under pseudo-status 0.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use volley_core::{Engine, EngineParams, PayloadFormat};
//!
//! let params = EngineParams::new("POST", "http://127.0.0.1:8080/login", 100)
//!     .with_workers(8)
//!     .with_rate_limit(50);
//! let engine = Engine::new(params, Arc::new(generator));
//! let stats = engine.run().await?;
//! println!("2xx: {}", stats.success_total());
//! ```

mod coordinator;
mod worker;

pub use coordinator::Engine;

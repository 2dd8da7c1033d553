//! Per-batch worker loop

use std::collections::HashMap;
use std::sync::Arc;

use reqwest::{Client, Method};
use tokio::sync::{broadcast, mpsc, Mutex};

use crate::encode::{encode, PayloadFormat};
use crate::pacer::RatePacer;
use crate::payload::PayloadSource;
use crate::request::{execute, SnippetResponse};
use crate::sink::CsvSink;
use crate::stats::STATUS_TRANSPORT_FAILURE;

/// Shared state handed to every worker of a run
pub(crate) struct WorkerContext {
    pub client: Client,
    pub method: Method,
    pub url: String,
    pub headers: HashMap<String, String>,
    pub format: PayloadFormat,
    pub payloads: Arc<dyn PayloadSource>,
    pub pacer: Arc<RatePacer>,
    pub sink: Option<Arc<CsvSink>>,
}

/// A request that never produced an HTTP status
#[derive(Debug)]
pub(crate) struct RequestFailure {
    pub index: usize,
    pub reason: String,
}

/// Shared handle to a batch's job queue
///
/// The bounded receiver is shared across workers, which take turns popping
/// the next index; capacity and backpressure stay those of the underlying
/// channel.
pub(crate) type JobQueue = Arc<Mutex<mpsc::Receiver<usize>>>;

/// Consume jobs until the queue drains or shutdown is signalled
///
/// For each index: pacing permit, payload generation, encoding, a fresh
/// per-request header map with `Content-Type` overwritten, dispatch, then
/// one outcome emitted on exactly one of the two channels (plus a CSV row
/// when logging is on).
pub(crate) async fn run_worker(
    id: usize,
    ctx: Arc<WorkerContext>,
    jobs: JobQueue,
    results_tx: mpsc::Sender<SnippetResponse>,
    failures_tx: mpsc::Sender<RequestFailure>,
    mut shutdown: broadcast::Receiver<()>,
) {
    tracing::debug!(worker_id = id, "worker started");

    loop {
        let index = {
            let mut queue = jobs.lock().await;
            tokio::select! {
                biased;

                _ = shutdown.recv() => break,
                index = queue.recv() => match index {
                    Some(index) => index,
                    None => break,
                },
            }
        };

        // A worker parked on the pacer is not in flight, so shutdown may
        // interrupt the wait; once dispatched, the request runs to completion.
        tokio::select! {
            biased;

            _ = shutdown.recv() => break,
            _ = ctx.pacer.wait() => {}
        }

        let fields = ctx.payloads.payload(index);

        let (body, content_type) = match encode(ctx.format, &fields) {
            Ok(encoded) => encoded,
            Err(e) => {
                emit_failure(&ctx, &failures_tx, index, e.to_string()).await;
                continue;
            }
        };

        // Fresh copy per request; the caller's map is never touched. Any
        // caller-supplied content type is dropped so the encoder's value is
        // the only one on the wire.
        let mut headers = ctx.headers.clone();
        headers.retain(|name, _| !name.eq_ignore_ascii_case("content-type"));
        headers.insert("Content-Type".to_string(), content_type);

        match execute(&ctx.client, ctx.method.clone(), &ctx.url, body, &headers).await {
            Ok(response) => {
                log_row(&ctx, index, response.status_code, &response.snippet);
                let _ = results_tx.send(response).await;
            }
            Err(e) => {
                tracing::warn!(index, error = %e, "request failed");
                emit_failure(&ctx, &failures_tx, index, e.to_string()).await;
            }
        }
    }

    tracing::debug!(worker_id = id, "worker finished");
}

async fn emit_failure(
    ctx: &WorkerContext,
    failures_tx: &mpsc::Sender<RequestFailure>,
    index: usize,
    reason: String,
) {
    log_row(ctx, index, STATUS_TRANSPORT_FAILURE, &reason);
    let _ = failures_tx.send(RequestFailure { index, reason }).await;
}

fn log_row(ctx: &WorkerContext, index: usize, status: u16, snippet: &str) {
    if let Some(sink) = &ctx.sink {
        if let Err(e) = sink.append(index, status, snippet) {
            tracing::warn!(index, error = %e, "log row write failed");
        }
    }
}

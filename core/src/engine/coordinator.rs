//! Batch coordination and result aggregation

use std::ops::Range;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use reqwest::Method;
use tokio::sync::{broadcast, mpsc};

use crate::config::EngineParams;
use crate::error::EngineError;
use crate::pacer::RatePacer;
use crate::payload::PayloadSource;
use crate::request::SnippetResponse;
use crate::sink::CsvSink;
use crate::stats::RunStats;
use crate::transport::build_client;

use super::worker::{run_worker, RequestFailure, WorkerContext};

/// Liveness wakeup for the collector loop when both channels are quiet
const COLLECTOR_WAKEUP: Duration = Duration::from_secs(1);

/// The bulk request engine
///
/// Owns the full lifecycle of a run: transport, pacer and log sink
/// construction, chunked batches of workers, and aggregation of every
/// outcome into [`RunStats`].
pub struct Engine {
    params: EngineParams,
    payloads: Arc<dyn PayloadSource>,
    shutdown_tx: broadcast::Sender<()>,
}

impl Engine {
    /// Create an engine for one run
    pub fn new(params: EngineParams, payloads: Arc<dyn PayloadSource>) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);
        Self {
            params,
            payloads,
            shutdown_tx,
        }
    }

    /// The parameters this engine was built with
    pub fn params(&self) -> &EngineParams {
        &self.params
    }

    /// Signal a running engine to stop
    ///
    /// Workers finish their in-flight request and exit; `run` returns
    /// [`EngineError::Cancelled`] carrying the partial stats.
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(());
    }

    /// Issue all requests and return the aggregated statistics
    ///
    /// Processes `[0, count)` in chunks of the configured size; each chunk
    /// gets a fresh worker pool over bounded job/result/failure channels, so
    /// peak memory stays proportional to the chunk size regardless of the
    /// total count. On successful return every request is accounted for:
    /// the per-status totals sum to `count`.
    pub async fn run(&self) -> Result<RunStats, EngineError> {
        self.params.validate()?;
        let workers = self.params.effective_workers();
        let chunk_size = self.params.effective_chunk_size();
        let count = self.params.count;

        let method = Method::from_bytes(self.params.method.as_bytes())
            .map_err(|_| EngineError::InvalidMethod(self.params.method.clone()))?;

        let client = build_client(self.params.use_proxy)?;
        let pacer = Arc::new(RatePacer::new(self.params.rate_limit));
        let sink = match self.params.log_path.as_deref() {
            Some(path) if !path.is_empty() => Some(Arc::new(CsvSink::create(path)?)),
            _ => None,
        };

        let ctx = Arc::new(WorkerContext {
            client,
            method,
            url: self.params.target_url.clone(),
            headers: self.params.headers.clone(),
            format: self.params.format,
            payloads: Arc::clone(&self.payloads),
            pacer,
            sink: sink.clone(),
        });

        tracing::info!(
            count,
            workers,
            chunk_size,
            rate = self.params.rate_limit,
            proxy = self.params.use_proxy,
            "starting bulk run"
        );

        let stats = Arc::new(Mutex::new(RunStats::new()));
        let mut shutdown_probe = self.shutdown_tx.subscribe();
        let started = Instant::now();
        let mut cancelled = false;

        let mut start = 0;
        while start < count {
            // A new subscriber only sees messages sent after it subscribes,
            // so a shutdown landing between batches would be invisible to
            // the next pool's receivers. Catch it here before spawning.
            if shutdown_signalled(&mut shutdown_probe) {
                cancelled = true;
                break;
            }

            let end = (start + chunk_size).min(count);
            let outcomes = self
                .run_batch(start..end, Arc::clone(&ctx), workers, &stats)
                .await;

            if outcomes < end - start {
                cancelled = true;
                if !shutdown_signalled(&mut shutdown_probe) {
                    // Workers stopped without a shutdown signal; the batch
                    // cannot be completed, so surface what was collected.
                    tracing::error!(
                        batch_start = start,
                        expected = end - start,
                        observed = outcomes,
                        "batch ended short of its size"
                    );
                }
                break;
            }
            start = end;
        }

        if let Some(sink) = &sink {
            if let Err(e) = sink.finish() {
                tracing::warn!(error = %e, "log sink flush failed");
            }
        }

        let stats = Arc::try_unwrap(stats)
            .map(|mutex| mutex.into_inner().unwrap())
            .unwrap_or_else(|arc| arc.lock().unwrap().clone());

        if cancelled {
            tracing::info!(
                elapsed_secs = started.elapsed().as_secs_f64(),
                completed = stats.total(),
                "bulk run cancelled"
            );
            return Err(EngineError::Cancelled { stats });
        }

        tracing::info!(
            elapsed_secs = started.elapsed().as_secs_f64(),
            total = stats.total(),
            success = stats.success_total(),
            failed = stats.failure_total(),
            "bulk run finished"
        );
        Ok(stats)
    }

    /// Run one chunk and return the number of outcomes collected
    ///
    /// Anything short of the batch size means the pool was shut down early.
    async fn run_batch(
        &self,
        range: Range<usize>,
        ctx: Arc<WorkerContext>,
        workers: usize,
        stats: &Arc<Mutex<RunStats>>,
    ) -> usize {
        let batch = range.len();
        tracing::debug!(batch_start = range.start, batch_size = batch, "batch starting");

        let (jobs_tx, jobs_rx) = mpsc::channel::<usize>(batch);
        let jobs = Arc::new(tokio::sync::Mutex::new(jobs_rx));
        let (results_tx, mut results_rx) = mpsc::channel::<SnippetResponse>(batch);
        let (failures_tx, mut failures_rx) = mpsc::channel::<RequestFailure>(batch);

        let mut handles = Vec::with_capacity(workers);
        for id in 0..workers {
            handles.push(tokio::spawn(run_worker(
                id,
                Arc::clone(&ctx),
                Arc::clone(&jobs),
                results_tx.clone(),
                failures_tx.clone(),
                self.shutdown_tx.subscribe(),
            )));
        }
        // Workers hold the only senders now; the result channels close as
        // soon as the pool exits.
        drop(results_tx);
        drop(failures_tx);

        let feeder = tokio::spawn(async move {
            for index in range {
                if jobs_tx.send(index).await.is_err() {
                    break;
                }
            }
        });

        let mut outcomes = 0;
        let mut results_open = true;
        let mut failures_open = true;
        while outcomes < batch && (results_open || failures_open) {
            tokio::select! {
                response = results_rx.recv(), if results_open => match response {
                    Some(response) => {
                        stats
                            .lock()
                            .unwrap()
                            .record_response(response.status_code, &response.snippet);
                        outcomes += 1;
                    }
                    None => results_open = false,
                },
                failure = failures_rx.recv(), if failures_open => match failure {
                    Some(failure) => {
                        stats.lock().unwrap().record_failure(&failure.reason);
                        outcomes += 1;
                    }
                    None => failures_open = false,
                },
                // Wakeup so the loop stays live even with both channels quiet.
                _ = tokio::time::sleep(COLLECTOR_WAKEUP) => {}
            }
        }

        for (id, handle) in handles.into_iter().enumerate() {
            if let Err(e) = handle.await {
                tracing::error!(worker_id = id, error = %e, "worker task panicked");
            }
        }
        let _ = feeder.await;

        tracing::debug!(batch_size = batch, outcomes, "batch drained");
        outcomes
    }
}

/// Whether the shutdown broadcast has fired
///
/// A lagged receiver still means the signal was sent, so it counts.
fn shutdown_signalled(probe: &mut broadcast::Receiver<()>) -> bool {
    matches!(
        probe.try_recv(),
        Ok(()) | Err(broadcast::error::TryRecvError::Lagged(_))
    )
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("params", &self.params)
            .finish()
    }
}

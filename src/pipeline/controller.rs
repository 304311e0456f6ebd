//! Pipeline controller - owns the queue, the worker task and the shared
//! shutdown signal.
//!
//! The feed side calls `feed` from its event callback; the call is O(1) and
//! never awaits, so arrival bursts decouple cleanly from the worker's
//! schedule.

use crate::pipeline::config::PipelineConfig;
use crate::pipeline::queue::SharedQueue;
use crate::pipeline::resolver::{MintResolver, TransactionSource};
use crate::pipeline::sink::LaunchSink;
use crate::pipeline::worker::ResolveWorker;
use crate::types::PendingEvent;
use anyhow::Result;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

pub struct PipelineController {
    queue: SharedQueue,
    shutdown: watch::Sender<bool>,
    worker_handle: Option<JoinHandle<()>>,
    drop_report_every: u64,
}

impl PipelineController {
    /// Validate the configuration, build the shared queue and spawn the
    /// worker.
    pub fn start(
        config: &PipelineConfig,
        tx_source: Arc<dyn TransactionSource>,
        sink: Arc<dyn LaunchSink>,
    ) -> Result<Self> {
        config.validate()?;
        let queue = SharedQueue::new(config.queue_capacity)?;
        let resolver = MintResolver::new(tx_source);
        let worker = ResolveWorker::new(
            queue.clone(),
            resolver,
            sink,
            config.resolve_rate_per_sec,
        );
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        info!(
            "Pipeline starting: capacity={}, rate={}/s (tick {:?})",
            config.queue_capacity,
            config.resolve_rate_per_sec,
            worker.tick_duration()
        );
        let worker_handle = tokio::spawn(worker.run(shutdown_rx));
        Ok(Self {
            queue,
            shutdown: shutdown_tx,
            worker_handle: Some(worker_handle),
            drop_report_every: config.drop_report_every,
        })
    }

    /// Producer-side push. Stamps the event and inserts it drop-oldest;
    /// safe to call from the feed callback (no await, no blocking beyond
    /// the queue mutex).
    pub fn feed(&self, signature: impl Into<String>, slot: u64) {
        let evicted = self.queue.push(PendingEvent::now(signature, slot));
        if evicted.is_some() {
            let dropped = self.queue.dropped();
            if dropped % self.drop_report_every == 0 {
                warn!("Ingest queue overflow: {} events dropped so far", dropped);
            }
        }
    }

    /// Running overflow-drop counter.
    pub fn dropped(&self) -> u64 {
        self.queue.dropped()
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// Stop scheduling and wait for the worker to exit. Any resolution
    /// already in flight completes; nothing further is drained.
    pub async fn shutdown(mut self) {
        let _ = self.shutdown.send(true);
        if let Some(handle) = self.worker_handle.take() {
            if let Err(e) = handle.await {
                warn!("Worker task ended abnormally: {}", e);
            }
        }
        info!("Pipeline shut down");
    }
}

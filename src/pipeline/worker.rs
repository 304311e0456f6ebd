//! Rate-limited resolution worker.
//!
//! Drains at most one queued event per scheduling tick, resolves its mint
//! and forwards the record to the persistence sink. Ticks never overlap a
//! resolution already in flight (single-flight).

use crate::pipeline::queue::SharedQueue;
use crate::pipeline::resolver::MintResolver;
use crate::pipeline::sink::LaunchSink;
use crate::types::{PendingEvent, ResolvedLaunch};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info, warn};

/// Hard floor on the tick interval: never more than 5 resolutions per
/// second, regardless of the configured rate. RPC politeness ceiling.
pub const MIN_TICK_INTERVAL: Duration = Duration::from_millis(200);

/// Tick interval for a configured per-second rate, clamped to the floor.
pub fn tick_interval(rate_per_sec: u32) -> Duration {
    Duration::from_millis(1000 / rate_per_sec.max(1) as u64).max(MIN_TICK_INTERVAL)
}

/// Explicit IDLE/BUSY state for the worker's single-flight discipline.
/// A tick that observes BUSY is dropped, not queued.
#[derive(Debug, Default)]
pub struct WorkerGuard {
    busy: AtomicBool,
}

impl WorkerGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Transition IDLE -> BUSY. Returns false when already BUSY.
    pub fn begin(&self) -> bool {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Transition back to IDLE.
    pub fn finish(&self) {
        self.busy.store(false, Ordering::Release);
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Timer-driven consumer of the shared launch queue.
pub struct ResolveWorker {
    queue: SharedQueue,
    resolver: MintResolver,
    sink: Arc<dyn LaunchSink>,
    guard: Arc<WorkerGuard>,
    tick: Duration,
}

impl ResolveWorker {
    pub fn new(
        queue: SharedQueue,
        resolver: MintResolver,
        sink: Arc<dyn LaunchSink>,
        rate_per_sec: u32,
    ) -> Self {
        Self {
            queue,
            resolver,
            sink,
            guard: Arc::new(WorkerGuard::new()),
            tick: tick_interval(rate_per_sec),
        }
    }

    /// Shared handle to the single-flight state, for observers and tests.
    pub fn guard(&self) -> Arc<WorkerGuard> {
        Arc::clone(&self.guard)
    }

    pub fn tick_duration(&self) -> Duration {
        self.tick
    }

    /// Main loop: one `tick_once` per interval tick until the shutdown
    /// signal flips. An in-flight resolution is allowed to complete before
    /// the loop observes the signal.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        info!("ResolveWorker running, tick interval {:?}", self.tick);
        let mut ticker = interval(self.tick);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.tick_once().await;
                }
                _ = shutdown.changed() => {
                    info!("ResolveWorker received shutdown signal");
                    break;
                }
            }
        }
    }

    /// Process at most one queued event. No-op when the queue is empty or
    /// a previous resolution is still in flight.
    pub async fn tick_once(&self) {
        if !self.guard.begin() {
            debug!("Tick skipped: previous resolution still in flight");
            return;
        }
        if let Some(event) = self.queue.pop() {
            self.process(event).await;
        }
        self.guard.finish();
    }

    /// Resolve one event and forward it. The resolver and sink calls are
    /// isolated: a failed resolution still produces a (degraded) record,
    /// and a sink error never stops the worker.
    async fn process(&self, event: PendingEvent) {
        let mint = self.resolver.resolve(&event.signature).await;
        if mint.is_none() {
            warn!(
                "Launch at slot {} left unresolved ({})",
                event.slot, event.signature
            );
        }
        let record = ResolvedLaunch::new(event, mint);
        if let Err(e) = self.sink.append(&record).await {
            error!("Failed to persist launch record {}: {:#}", record.signature, e);
        }
    }
}

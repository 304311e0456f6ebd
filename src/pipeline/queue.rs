//! Bounded ingestion queue with a drop-oldest overflow policy.
//!
//! The queue itself is a pure data structure: O(1) push/pop, no locking.
//! `SharedQueue` is the single-mutex handle the feed side and the worker
//! share (see the concurrency notes on `PipelineController`).

use crate::types::PendingEvent;
use anyhow::{bail, Result};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

/// Fixed-capacity FIFO buffer of pending launch events.
///
/// When full, `push` evicts the head (the longest-waiting event) before
/// inserting the new arrival, so the newest events always survive a burst.
/// Every eviction is counted so callers can report loss.
#[derive(Debug)]
pub struct LaunchQueue {
    buf: VecDeque<PendingEvent>,
    capacity: usize,
    dropped: u64,
}

impl LaunchQueue {
    /// Create a queue. Zero capacity is invalid configuration and is
    /// rejected here, never at push time.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            bail!("Queue capacity must be at least 1");
        }
        Ok(Self {
            buf: VecDeque::with_capacity(capacity),
            capacity,
            dropped: 0,
        })
    }

    /// Insert at the tail. At capacity the head is evicted first and
    /// returned so the caller can observe the loss.
    pub fn push(&mut self, event: PendingEvent) -> Option<PendingEvent> {
        let evicted = if self.buf.len() >= self.capacity {
            self.dropped += 1;
            self.buf.pop_front()
        } else {
            None
        };
        self.buf.push_back(event);
        evicted
    }

    /// Remove and return the head, or `None` when empty.
    pub fn pop(&mut self) -> Option<PendingEvent> {
        self.buf.pop_front()
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Total number of events evicted by the drop-oldest policy.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

/// Queue handle shared between the feed side and the worker.
///
/// The queue is the only mutable state the producer and consumer share, so
/// one mutex protects it. The lock is only ever held for O(1) operations
/// and never across an await point.
#[derive(Debug, Clone)]
pub struct SharedQueue(Arc<Mutex<LaunchQueue>>);

impl SharedQueue {
    pub fn new(capacity: usize) -> Result<Self> {
        Ok(Self(Arc::new(Mutex::new(LaunchQueue::new(capacity)?))))
    }

    fn lock(&self) -> MutexGuard<'_, LaunchQueue> {
        // Push/pop cannot panic mid-mutation; a poisoned lock still holds a
        // consistent queue, so recover the guard instead of propagating.
        self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn push(&self, event: PendingEvent) -> Option<PendingEvent> {
        self.lock().push(event)
    }

    pub fn pop(&self) -> Option<PendingEvent> {
        self.lock().pop()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn dropped(&self) -> u64 {
        self.lock().dropped()
    }
}

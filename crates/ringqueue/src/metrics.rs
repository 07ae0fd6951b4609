use std::sync::atomic::{AtomicU64, Ordering};

/// Operation and stall counters for a queue.
///
/// Updated with relaxed atomics; a snapshot taken while workers run is
/// approximate.
#[derive(Debug, Default)]
pub(crate) struct Metrics {
    records_written: AtomicU64,
    records_read: AtomicU64,
    producer_stalls: AtomicU64,
    commit_retries: AtomicU64,
    consumer_stalls: AtomicU64,
}

/// Point-in-time copy of a queue's operation and stall counters.
///
/// Obtained from [`RingQueue::metrics`](crate::RingQueue::metrics); the
/// counters themselves are internal to the queue.
///
/// ```compile_fail
/// use ringqueue_rs::Metrics;
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    /// Completed `write` calls.
    pub records_written: u64,
    /// Completed `read` calls.
    pub records_read: u64,
    /// Wait iterations producers spent on reader progress.
    pub producer_stalls: u64,
    /// Failed publish attempts while waiting for a predecessor's commit.
    pub commit_retries: u64,
    /// Wait iterations consumers spent on an uncommitted slot.
    pub consumer_stalls: u64,
}

impl Metrics {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub(crate) fn record_write(&self, producer_stalls: u64, commit_retries: u64) {
        self.records_written.fetch_add(1, Ordering::Relaxed);
        if producer_stalls > 0 {
            self.producer_stalls.fetch_add(producer_stalls, Ordering::Relaxed);
        }
        if commit_retries > 0 {
            self.commit_retries.fetch_add(commit_retries, Ordering::Relaxed);
        }
    }

    #[inline]
    pub(crate) fn record_read(&self, consumer_stalls: u64) {
        self.records_read.fetch_add(1, Ordering::Relaxed);
        if consumer_stalls > 0 {
            self.consumer_stalls.fetch_add(consumer_stalls, Ordering::Relaxed);
        }
    }

    pub(crate) fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            records_written: self.records_written.load(Ordering::Relaxed),
            records_read: self.records_read.load(Ordering::Relaxed),
            producer_stalls: self.producer_stalls.load(Ordering::Relaxed),
            commit_retries: self.commit_retries.load(Ordering::Relaxed),
            consumer_stalls: self.consumer_stalls.load(Ordering::Relaxed),
        }
    }
}

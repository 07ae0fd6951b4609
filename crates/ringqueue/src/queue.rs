use crate::backoff::Backoff;
use crate::invariants::{
    debug_assert_committed_read, debug_assert_valid_claim, debug_assert_within_window,
};
use crate::metrics::Metrics;
use crate::trace::debug;
use crate::{Config, ConfigError, MetricsSnapshot, Record, DEFAULT_CONFIG};
use crossbeam_utils::CachePadded;
use std::cell::UnsafeCell;
use std::fmt;
use std::fmt::Write as _;
use std::sync::atomic::{AtomicU64, Ordering};

// =============================================================================
// CLAIM / COMMIT PROTOCOL
// =============================================================================
//
// Three monotonically increasing u64 counters coordinate any number of
// producers and consumers. Logical indices start at 1 and are never reused;
// the physical slot is `index & mask`.
//
// **Producer (`write`):**
// 1. `next_free_index.fetch_add(1)` claims `my_index` exclusively.
// 2. Wait until `my_index <= reader_index + capacity - 2`, then until the
//    slot's release stamp equals `my_index`.
// 3. Copy the record into the slot.
// 4. CAS `last_committed_index` from `my_index - 1` to `my_index`, retrying
//    until the predecessor has published. Commits are strictly index-ordered,
//    so the watermark alone tells readers what is safe.
//
// **Consumer (`read`):**
// 1. `reader_index.fetch_add(1)` claims `my_index` exclusively.
// 2. Wait until `my_index <= last_committed_index`.
// 3. Copy the record out, then store `my_index + capacity` into the slot's
//    release stamp.
//
// ## Release Stamps
//
// The reader-window check in producer step 2 only proves the previous
// occupant of the slot was *claimed*. With several consumers, the claimant may
// still be copying when the window opens. The stamp closes that gap: it names
// the next logical index allowed to write the slot and is advanced only after
// the copy-out. Readers never wait on stamps, so a consumer still has a
// single suspension point.
//
// ## Memory Ordering
//
// All counter operations are SeqCst. Every successful commit CAS is a
// read-modify-write and so continues the release sequence of earlier commits;
// a reader that observes `last_committed_index >= my_index` therefore
// synchronizes with the producer that wrote `my_index`. Stamps pair a Release
// store (reader, after copy-out) with an Acquire load (next-lap producer).
//
// ## Limitations
//
// - A side that stops making progress stalls the other side forever; waits
//   are never cancelled or timed out.
// - At most 2^64 - 1 records may ever be written.
//
// =============================================================================

/// One storage slot: the record and the next logical index allowed to write it.
struct Slot<T> {
    stamp: AtomicU64,
    value: UnsafeCell<T>,
}

/// Lock-free bounded multi-producer multi-consumer queue of `Copy` records.
///
/// Share it between threads with `Arc`. Both [`write`](Self::write) and
/// [`read`](Self::read) block by spinning (per the configured
/// [`WaitStrategy`](crate::WaitStrategy)) and never fail. Records are
/// delivered in the order producers claimed their indices.
///
/// # Example
///
/// ```
/// use ringqueue_rs::{Record, RingQueue};
///
/// let queue: RingQueue = RingQueue::new(8).unwrap();
/// queue.write(Record::new(1));
/// assert_eq!(queue.read().value(), 1);
/// ```
#[repr(C)]
pub struct RingQueue<T = Record> {
    /// Highest index whose write is visible to readers
    last_committed_index: CachePadded<AtomicU64>,
    /// Next index a producer may claim
    next_free_index: CachePadded<AtomicU64>,
    /// Next index a consumer may claim
    reader_index: CachePadded<AtomicU64>,

    config: Config,
    metrics: Metrics,

    /// Fixed at construction, never grows or shrinks.
    storage: CachePadded<Box<[CachePadded<Slot<T>>]>>,
}

// Safety: slot contents are only touched by the thread that claimed the
// slot's current logical index, and hand-off is ordered by the counters and
// stamps (see protocol notes above).
unsafe impl<T: Send> Send for RingQueue<T> {}
unsafe impl<T: Send> Sync for RingQueue<T> {}

impl<T: Copy + Default> RingQueue<T> {
    /// Creates a queue with `capacity` slots and default settings.
    ///
    /// Fails unless `capacity` is a power of two in `[2, 2^30]`.
    pub fn new(capacity: usize) -> Result<Self, ConfigError> {
        Ok(Self::build(Config::with_capacity(capacity)?))
    }

    /// Creates a queue from a full configuration.
    pub fn with_config(config: Config) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: Config) -> Self {
        let capacity = config.capacity();
        let storage: Box<[_]> = (0..capacity)
            .map(|slot| {
                // First-lap logical index of each slot; indices start at 1.
                let first = if slot == 0 { capacity } else { slot };
                CachePadded::new(Slot {
                    stamp: AtomicU64::new(first as u64),
                    value: UnsafeCell::new(T::default()),
                })
            })
            .collect();

        debug!(
            capacity,
            wait_strategy = ?config.wait_strategy,
            metrics = config.enable_metrics,
            "ring queue created"
        );

        Self {
            last_committed_index: CachePadded::new(AtomicU64::new(0)),
            next_free_index: CachePadded::new(AtomicU64::new(1)),
            reader_index: CachePadded::new(AtomicU64::new(1)),
            config,
            metrics: Metrics::new(),
            storage: CachePadded::new(storage),
        }
    }

    // ---------------------------------------------------------------------
    // PRODUCER API
    // ---------------------------------------------------------------------

    /// Appends a copy of `record`, waiting as long as the queue is full.
    ///
    /// Returns once the record is published to readers. If no consumer ever
    /// reads again this call never returns.
    pub fn write(&self, record: T) {
        let my_index = self.next_free_index.fetch_add(1, Ordering::SeqCst);
        debug_assert_valid_claim!("producer", my_index);

        let capacity = self.capacity() as u64;
        let wait = self.config.wait_strategy;
        let slot = self.slot(my_index);

        // Keep one slot of margin behind the reader position.
        let mut stalls = wait
            .wait_while(|| my_index > self.reader_index.load(Ordering::SeqCst) + capacity - 2);
        debug_assert_within_window!(my_index, self.reader_index.load(Ordering::SeqCst), capacity);

        // The previous lap's reader may still be copying out.
        stalls += wait.wait_while(|| slot.stamp.load(Ordering::Acquire) != my_index);

        // SAFETY: my_index is exclusively ours and the stamp proves the
        // previous occupant has been copied out; no reader touches this slot
        // until the commit below makes my_index visible.
        unsafe {
            *slot.value.get() = record;
        }

        let mut backoff = Backoff::new();
        let mut retries = 0;
        while self
            .last_committed_index
            .compare_exchange(my_index - 1, my_index, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            wait.pause(&mut backoff);
            retries += 1;
        }

        if self.config.enable_metrics {
            self.metrics.record_write(stalls, retries);
        }
    }

    // ---------------------------------------------------------------------
    // CONSUMER API
    // ---------------------------------------------------------------------

    /// Removes and returns the next record, waiting as long as none is committed.
    ///
    /// If no producer ever writes again this call never returns.
    pub fn read(&self) -> T {
        let my_index = self.reader_index.fetch_add(1, Ordering::SeqCst);
        debug_assert_valid_claim!("consumer", my_index);

        let stalls = self
            .config
            .wait_strategy
            .wait_while(|| my_index > self.last_committed_index.load(Ordering::SeqCst));
        debug_assert_committed_read!(my_index, self.last_committed_index.load(Ordering::SeqCst));

        let slot = self.slot(my_index);
        // SAFETY: my_index is committed, so its write happened-before the
        // watermark load above; the next-lap producer waits for the stamp
        // store below before overwriting.
        let record = unsafe { *slot.value.get() };
        slot.stamp
            .store(my_index + self.capacity() as u64, Ordering::Release);

        if self.config.enable_metrics {
            self.metrics.record_read(stalls);
        }

        record
    }

    #[inline]
    fn slot(&self, index: u64) -> &Slot<T> {
        &self.storage[(index as usize) & self.config.mask()]
    }
}

impl<T> RingQueue<T> {
    // ---------------------------------------------------------------------
    // STATUS
    // ---------------------------------------------------------------------

    /// Returns the number of slots.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.config.capacity()
    }

    /// Returns the configuration this queue was built with.
    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the number of committed records not yet claimed by a reader.
    ///
    /// Approximate under concurrency.
    pub fn len(&self) -> usize {
        self.snapshot().committed_unread() as usize
    }

    /// Returns true if no committed record is waiting to be read.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Loads the three counters.
    ///
    /// Each counter is read atomically but the triple is not; under
    /// concurrent use the result may mix values from different instants.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            last_committed_index: self.last_committed_index.load(Ordering::SeqCst),
            next_free_index: self.next_free_index.load(Ordering::SeqCst),
            reader_index: self.reader_index.load(Ordering::SeqCst),
        }
    }

    /// Get a snapshot of metrics if enabled.
    pub fn metrics(&self) -> MetricsSnapshot {
        if self.config.enable_metrics {
            self.metrics.snapshot()
        } else {
            MetricsSnapshot::default()
        }
    }
}

impl<T: fmt::Display> RingQueue<T> {
    /// Renders the counters and every slot for debugging.
    ///
    /// Needs exclusive access: reading a slot while a producer writes it would
    /// be a data race, so a dump can never run alongside workers. While
    /// workers are running, use [`snapshot`](Self::snapshot) instead, which
    /// reads only the counters and is safe through `&self`. Once they have
    /// stopped, get exclusive access back from an `Arc` with `Arc::get_mut`:
    ///
    /// ```
    /// use ringqueue_rs::RingQueue;
    /// use std::sync::Arc;
    /// use std::thread;
    ///
    /// let mut queue = Arc::new(RingQueue::<u64>::new(2).unwrap());
    ///
    /// let q = Arc::clone(&queue);
    /// let worker = thread::spawn(move || q.write(7));
    /// // Counters only, while the worker may still be running
    /// let _ = queue.snapshot();
    /// worker.join().unwrap();
    ///
    /// let dump = Arc::get_mut(&mut queue).unwrap().dump();
    /// assert!(dump.starts_with("lastCommitted:   1, nextFree:   2, readerIndex:   1"));
    /// assert!(dump.ends_with("    1 : 7"));
    /// ```
    pub fn dump(&mut self) -> String {
        let snapshot = Snapshot {
            last_committed_index: *self.last_committed_index.get_mut(),
            next_free_index: *self.next_free_index.get_mut(),
            reader_index: *self.reader_index.get_mut(),
        };
        debug!(%snapshot, "dumping ring queue");

        let mut out = format!("{snapshot}, content:");
        for (index, slot) in self.storage.iter_mut().enumerate() {
            // Writing into a String cannot fail.
            let _ = write!(out, "\n{index:5} : {}", slot.value.get_mut());
        }
        out
    }
}

impl<T: Copy + Default> Default for RingQueue<T> {
    fn default() -> Self {
        Self::build(DEFAULT_CONFIG)
    }
}

impl<T> fmt::Debug for RingQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let snapshot = self.snapshot();
        f.debug_struct("RingQueue")
            .field("capacity", &self.capacity())
            .field("last_committed_index", &snapshot.last_committed_index)
            .field("next_free_index", &snapshot.next_free_index)
            .field("reader_index", &snapshot.reader_index)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Counter values of a [`RingQueue`] at (roughly) one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot {
    /// Highest published index.
    pub last_committed_index: u64,
    /// Next index a producer will claim.
    pub next_free_index: u64,
    /// Next index a consumer will claim.
    pub reader_index: u64,
}

impl Snapshot {
    /// Committed records not yet claimed by a reader.
    pub fn committed_unread(&self) -> u64 {
        self.last_committed_index
            .saturating_sub(self.reader_index.saturating_sub(1))
    }

    /// Claims handed out to producers but not yet claimed by readers.
    pub fn claimed_unread(&self) -> u64 {
        self.next_free_index.saturating_sub(self.reader_index)
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "lastCommitted: {:3}, nextFree: {:3}, readerIndex: {:3}",
            self.last_committed_index, self.next_free_index, self.reader_index
        )
    }
}

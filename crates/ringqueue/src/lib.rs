//! RingQueue - Lock-Free Bounded Multi-Producer Multi-Consumer Queue
//!
//! A fixed-capacity ring of inline, fixed-size records shared by any number of
//! producer and consumer threads. Coordination uses three atomic counters and
//! no locks: every `write` and `read` claims a unique logical index with a
//! single `fetch_add`, waits (yielding) until its slot is usable, then copies
//! the record in or out.
//!
//! # Key Features
//!
//! - Cache-line padded counters and slots (no false sharing)
//! - Preallocated power-of-two storage, bitmask indexing, no per-item allocation
//! - Strict FIFO across all producers, by claim order
//! - Pluggable waiting: yield, busy spin, or spin-then-yield backoff
//!
//! # Limitations
//!
//! - Waits are unbounded: if one side stops, the other spins forever.
//! - At most 2^64 - 1 records can be written over a queue's lifetime.
//!
//! # Example
//!
//! ```
//! use ringqueue_rs::{Record, RingQueue};
//! use std::sync::Arc;
//! use std::thread;
//!
//! let queue: Arc<RingQueue> = Arc::new(RingQueue::new(1024).unwrap());
//!
//! let producer = {
//!     let queue = Arc::clone(&queue);
//!     thread::spawn(move || {
//!         for id in 1..=100 {
//!             queue.write(Record::new(id).with_price(id * 10));
//!         }
//!     })
//! };
//!
//! for id in 1..=100 {
//!     let record = queue.read();
//!     assert_eq!(record.value(), id);
//!     assert_eq!(record.price(), id * 10);
//! }
//! producer.join().unwrap();
//! ```

mod backoff;
mod config;
mod invariants;
mod metrics;
mod queue;
mod record;
mod trace;

pub use backoff::WaitStrategy;
pub use config::{
    Config, ConfigError, DEFAULT_CONFIG, HIGH_THROUGHPUT_CONFIG, LOW_LATENCY_CONFIG,
    MAX_RING_BITS, MIN_RING_BITS,
};
pub use metrics::MetricsSnapshot;
pub use queue::{RingQueue, Snapshot};
pub use record::{Record, FREETEXT_LEN};
pub use trace::init_tracing;

//! Debug assertion macros for queue counter invariants.
//!
//! Only active in debug builds (`debug_assert!`), so there is zero overhead
//! in release builds.

// =============================================================================
// Claim exclusivity
// =============================================================================

/// Assert that a claimed logical index is a real slot index.
///
/// **Invariant**: indices handed out by `fetch_add` start at 1; 0 is the
/// "nothing committed yet" sentinel of `last_committed_index`.
///
/// Used in: `write()` and `read()` right after claiming
macro_rules! debug_assert_valid_claim {
    ($side:literal, $index:expr) => {
        debug_assert!(
            $index != 0,
            "{} claimed index 0; the counter wrapped or was never initialized",
            $side
        )
    };
}

// =============================================================================
// Capacity safety
// =============================================================================

/// Assert that a producer is about to write within the reader window.
///
/// **Invariant**: `my_index <= reader_index + capacity - 2`
///
/// Used in: `write()` after the reader-progress wait
macro_rules! debug_assert_within_window {
    ($index:expr, $reader:expr, $capacity:expr) => {
        debug_assert!(
            $index <= $reader + $capacity - 2,
            "write at index {} would overrun reader at {} (capacity {})",
            $index,
            $reader,
            $capacity
        )
    };
}

// =============================================================================
// Ordered publication
// =============================================================================

/// Assert that a reader only copies out a committed slot.
///
/// **Invariant**: `my_index <= last_committed_index`
///
/// Used in: `read()` before copying out
macro_rules! debug_assert_committed_read {
    ($index:expr, $committed:expr) => {
        debug_assert!(
            $index <= $committed,
            "reading index {} beyond commit watermark {}",
            $index,
            $committed
        )
    };
}

pub(crate) use debug_assert_committed_read;
pub(crate) use debug_assert_valid_claim;
pub(crate) use debug_assert_within_window;

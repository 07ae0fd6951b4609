use std::hint;
use std::thread;

/// How a thread waits while its claimed slot is not yet usable.
///
/// The queue never parks a thread; every strategy keeps polling the counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WaitStrategy {
    /// Yield the processor on every failed check.
    #[default]
    Yield,
    /// Busy-loop with a PAUSE hint. Only sensible with a dedicated core per thread.
    BusySpin,
    /// Spin with exponentially more PAUSE hints, then fall back to yielding.
    Backoff,
}

impl WaitStrategy {
    /// Waits while `blocked` returns true. Returns the number of failed checks.
    #[inline]
    pub(crate) fn wait_while<F>(self, mut blocked: F) -> u64
    where
        F: FnMut() -> bool,
    {
        let mut backoff = Backoff::new();
        let mut iterations = 0;
        while blocked() {
            self.pause(&mut backoff);
            iterations += 1;
        }
        iterations
    }

    /// One wait step.
    #[inline]
    pub(crate) fn pause(self, backoff: &mut Backoff) {
        match self {
            Self::Yield => thread::yield_now(),
            Self::BusySpin => hint::spin_loop(),
            Self::Backoff => backoff.snooze(),
        }
    }
}

/// Adaptive backoff strategy (Crossbeam-style).
///
/// Progressively increases wait time: spin with PAUSE → yield to OS. Unlike a
/// bounded backoff it never gives up; the queue has no failure path to give up to.
#[derive(Debug)]
pub(crate) struct Backoff {
    step: u32,
}

impl Backoff {
    const SPIN_LIMIT: u32 = 6; // 2^6 = 64 spins max before yielding

    #[inline]
    pub(crate) fn new() -> Self {
        Self { step: 0 }
    }

    /// Light spin with PAUSE hints.
    #[inline]
    fn spin(&mut self) {
        let spins = 1 << self.step.min(Self::SPIN_LIMIT);
        for _ in 0..spins {
            hint::spin_loop();
        }
        self.step += 1;
    }

    /// Spin while under the limit, yield afterwards.
    #[inline]
    pub(crate) fn snooze(&mut self) {
        if self.step <= Self::SPIN_LIMIT {
            self.spin();
        } else {
            thread::yield_now();
        }
    }

    #[cfg(test)]
    fn is_yielding(&self) -> bool {
        self.step > Self::SPIN_LIMIT
    }
}

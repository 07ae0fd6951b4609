use crate::WaitStrategy;
use thiserror::Error;

/// Smallest supported `ring_bits` (2 slots). The write-side margin of `N - 2`
/// slots needs at least two.
pub const MIN_RING_BITS: u8 = 1;

/// Largest supported `ring_bits` (2^30 slots).
pub const MAX_RING_BITS: u8 = 30;

/// Error returned when a queue configuration is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Capacity must be a power of two so slots can be addressed by bitmask.
    #[error("capacity {capacity} is not a power of two")]
    NotPowerOfTwo {
        /// The rejected capacity.
        capacity: usize,
    },
    /// Capacity is below the supported minimum.
    #[error("capacity {capacity} is too small (min: {min})")]
    TooSmall {
        /// The rejected capacity.
        capacity: usize,
        /// Minimum supported capacity.
        min: usize,
    },
    /// Capacity is above the supported maximum.
    #[error("capacity {capacity} is too large (max: {max})")]
    TooLarge {
        /// The rejected capacity.
        capacity: usize,
        /// Maximum supported capacity.
        max: usize,
    },
}

/// Configuration for [`RingQueue`](crate::RingQueue).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Queue size as power of 2 (default: 12 = 4096 slots)
    pub ring_bits: u8,
    /// How threads wait while a claimed slot is not yet usable
    pub wait_strategy: WaitStrategy,
    /// Enable metrics collection (slight overhead)
    pub enable_metrics: bool,
}

impl Config {
    /// Creates a new configuration with custom settings.
    pub const fn new(ring_bits: u8, wait_strategy: WaitStrategy, enable_metrics: bool) -> Self {
        Self {
            ring_bits,
            wait_strategy,
            enable_metrics,
        }
    }

    /// Creates a default configuration for the given slot count.
    ///
    /// Fails unless `capacity` is a power of two within
    /// `[2^MIN_RING_BITS, 2^MAX_RING_BITS]`.
    pub fn with_capacity(capacity: usize) -> Result<Self, ConfigError> {
        if !capacity.is_power_of_two() {
            return Err(ConfigError::NotPowerOfTwo { capacity });
        }
        let config = Self {
            ring_bits: capacity.trailing_zeros() as u8,
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks that `ring_bits` describes a supported capacity.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ring_bits < MIN_RING_BITS {
            return Err(ConfigError::TooSmall {
                capacity: self.capacity(),
                min: 1 << MIN_RING_BITS,
            });
        }
        if self.ring_bits > MAX_RING_BITS {
            // Report the saturated value; `1 << ring_bits` may not fit in usize.
            return Err(ConfigError::TooLarge {
                capacity: 1usize.checked_shl(u32::from(self.ring_bits)).unwrap_or(usize::MAX),
                max: 1 << MAX_RING_BITS,
            });
        }
        Ok(())
    }

    /// Sets the wait strategy.
    pub const fn with_wait_strategy(mut self, wait_strategy: WaitStrategy) -> Self {
        self.wait_strategy = wait_strategy;
        self
    }

    /// Enables or disables metrics.
    pub const fn with_metrics(mut self, enable_metrics: bool) -> Self {
        self.enable_metrics = enable_metrics;
        self
    }

    /// Returns the capacity of the queue.
    #[inline]
    pub const fn capacity(&self) -> usize {
        1 << self.ring_bits
    }

    /// Returns the mask for index wrapping.
    #[inline]
    pub const fn mask(&self) -> usize {
        self.capacity() - 1
    }
}

impl Default for Config {
    fn default() -> Self {
        DEFAULT_CONFIG
    }
}

/// Default configuration (4K slots, yield while waiting)
pub const DEFAULT_CONFIG: Config = Config::new(12, WaitStrategy::Yield, false);

/// Low latency configuration (1K slots, busy spin; wants dedicated cores)
pub const LOW_LATENCY_CONFIG: Config = Config::new(10, WaitStrategy::BusySpin, false);

/// High throughput configuration (64K slots, spin-then-yield backoff)
pub const HIGH_THROUGHPUT_CONFIG: Config = Config::new(16, WaitStrategy::Backoff, false);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_capacity() {
        let config = Config::default();
        assert_eq!(config.capacity(), 4096);
        assert_eq!(config.mask(), 4095);
        assert_eq!(config.wait_strategy, WaitStrategy::Yield);
        assert!(!config.enable_metrics);
    }

    #[test]
    fn test_with_capacity() {
        let config = Config::with_capacity(8).unwrap();
        assert_eq!(config.ring_bits, 3);
        assert_eq!(config.capacity(), 8);

        assert_eq!(
            Config::with_capacity(12),
            Err(ConfigError::NotPowerOfTwo { capacity: 12 })
        );
        assert_eq!(
            Config::with_capacity(0),
            Err(ConfigError::NotPowerOfTwo { capacity: 0 })
        );
        assert_eq!(
            Config::with_capacity(1),
            Err(ConfigError::TooSmall { capacity: 1, min: 2 })
        );
        assert_eq!(
            Config::with_capacity(1 << 31),
            Err(ConfigError::TooLarge {
                capacity: 1 << 31,
                max: 1 << 30
            })
        );
    }

    #[test]
    fn test_presets_are_valid() {
        for config in [DEFAULT_CONFIG, LOW_LATENCY_CONFIG, HIGH_THROUGHPUT_CONFIG] {
            assert!(config.validate().is_ok());
        }
    }

    #[test]
    fn test_builders() {
        let config = Config::default()
            .with_wait_strategy(WaitStrategy::Backoff)
            .with_metrics(true);
        assert_eq!(config.wait_strategy, WaitStrategy::Backoff);
        assert!(config.enable_metrics);
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ConfigError::NotPowerOfTwo { capacity: 12 }.to_string(),
            "capacity 12 is not a power of two"
        );
        assert_eq!(
            ConfigError::TooSmall { capacity: 1, min: 2 }.to_string(),
            "capacity 1 is too small (min: 2)"
        );
    }
}

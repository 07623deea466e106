//! Time sources for sensor nodes
//!
//! The engine never reads a clock on its own. Callers hand it a
//! `TimeSource`, which keeps the calibration math deterministic and makes
//! the minimum-interval logic testable:
//! - System clock (std targets)
//! - Hardware tick counter (implemented by the board crate)
//! - Fixed/manual clock (tests and replays)

/// Timestamp in milliseconds since epoch (or device boot for monotonic)
pub type Timestamp = u64;

/// Source of time for the system
pub trait TimeSource {
    /// Get current timestamp in milliseconds
    fn now(&self) -> Timestamp;

    /// Check if this source provides wall clock time (vs monotonic)
    fn is_wall_clock(&self) -> bool;
}

/// System time source (requires std)
#[cfg(feature = "std")]
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTime;

#[cfg(feature = "std")]
impl TimeSource for SystemTime {
    fn now(&self) -> Timestamp {
        use std::time::{SystemTime as StdSystemTime, UNIX_EPOCH};

        StdSystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as Timestamp
    }

    fn is_wall_clock(&self) -> bool {
        true
    }
}

/// Manually driven time source for tests and replays
#[derive(Debug, Clone)]
pub struct FixedTime {
    timestamp: Timestamp,
}

impl FixedTime {
    /// Start the clock at `timestamp`
    pub fn new(timestamp: Timestamp) -> Self {
        Self { timestamp }
    }

    /// Jump to an absolute timestamp
    pub fn set(&mut self, timestamp: Timestamp) {
        self.timestamp = timestamp;
    }

    /// Move the clock forward
    pub fn advance(&mut self, ms: u64) {
        self.timestamp = self.timestamp.saturating_add(ms);
    }
}

impl TimeSource for FixedTime {
    fn now(&self) -> Timestamp {
        self.timestamp
    }

    fn is_wall_clock(&self) -> bool {
        false
    }
}

/// Milliseconds left before `interval_ms` has elapsed since `last`
///
/// Returns 0 when the interval has passed or there was no previous read.
/// A clock that went backwards is treated as "interval elapsed" rather than
/// locking the sensor out.
pub fn remaining_interval(last: Option<Timestamp>, now: Timestamp, interval_ms: u64) -> u64 {
    match last {
        Some(last) if now >= last => interval_ms.saturating_sub(now - last),
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_time_advances() {
        let mut time = FixedTime::new(1000);
        assert_eq!(time.now(), 1000);

        time.advance(500);
        assert_eq!(time.now(), 1500);

        time.set(10);
        assert_eq!(time.now(), 10);
    }

    #[test]
    fn remaining_interval_counts_down() {
        assert_eq!(remaining_interval(None, 5000, 2000), 0);
        assert_eq!(remaining_interval(Some(1000), 1500, 2000), 1500);
        assert_eq!(remaining_interval(Some(1000), 3000, 2000), 0);
        assert_eq!(remaining_interval(Some(1000), 9000, 2000), 0);
    }

    #[test]
    fn backwards_clock_does_not_lock_out() {
        assert_eq!(remaining_interval(Some(5000), 1000, 2000), 0);
    }
}

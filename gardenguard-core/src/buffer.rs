//! Fixed-size reading history
//!
//! ## Overview
//!
//! `ReadingHistory<N>` is a ring of the last `N` physical values the
//! monitor produced. It is sized at compile time and never allocates.
//! When full, each push overwrites the oldest reading.
//!
//! The history answers two questions gardeners actually ask:
//! - Did the value jump since the last reading? (`significant_change`)
//! - What did the last few readings look like? (`summary`)
//!
//! ```text
//! ReadingHistory<4> after 6 pushes (values 0..=5):
//! ┌─────┬─────┬─────┬─────┐
//! │  4  │  5  │  2  │  3  │  ← physical slots
//! └─────┴─────┴─────┴─────┘
//!          ↑
//!          └── write_pos = 2, oldest reading lives here
//!
//! Iteration order: 2, 3, 4, 5
//! ```
//!
//! ## Usage Example
//!
//! ```rust
//! use gardenguard_core::buffer::{ReadingHistory, TimestampedReading};
//!
//! let mut history: ReadingHistory<8> = ReadingHistory::new();
//! history.push(TimestampedReading { value: 42.0, timestamp: 1_000 });
//! history.push(TimestampedReading { value: 55.0, timestamp: 2_000 });
//!
//! // Soil moisture moved by 13 points
//! assert_eq!(history.significant_change(10.0), Some(13.0));
//!
//! let summary = history.summary().unwrap();
//! assert_eq!(summary.min, 42.0);
//! ```

use crate::diagnostics::BatchStats;
use crate::time::Timestamp;

/// Physical value with the time it was read
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimestampedReading {
    /// Calibrated, compensated value
    pub value: f32,
    /// When the underlying sample was taken
    pub timestamp: Timestamp,
}

/// Ring of the most recent `N` readings
///
/// ## Internal Invariants
///
/// - `write_pos < N`
/// - `len <= N`
/// - Iteration yields readings oldest first
#[derive(Debug, Clone)]
pub struct ReadingHistory<const N: usize> {
    data: [Option<TimestampedReading>; N],
    write_pos: usize,
    len: usize,
}

impl<const N: usize> ReadingHistory<N> {
    /// Empty history
    pub const fn new() -> Self {
        Self {
            data: [None; N],
            write_pos: 0,
            len: 0,
        }
    }

    /// Append a reading, overwriting the oldest when full
    pub fn push(&mut self, reading: TimestampedReading) {
        if N == 0 {
            return;
        }

        self.data[self.write_pos] = Some(reading);
        self.write_pos = (self.write_pos + 1) % N;

        if self.len < N {
            self.len += 1;
        }
    }

    /// Number of stored readings
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if history is empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Check if history is full
    pub fn is_full(&self) -> bool {
        self.len == N
    }

    /// Most recent reading
    pub fn last(&self) -> Option<&TimestampedReading> {
        if self.is_empty() {
            return None;
        }
        self.get(self.len - 1)
    }

    /// Iterate oldest to newest
    pub fn iter(&self) -> HistoryIter<'_, N> {
        HistoryIter { history: self, index: 0 }
    }

    /// Forget all readings
    pub fn clear(&mut self) {
        self.data = [None; N];
        self.write_pos = 0;
        self.len = 0;
    }

    /// Change between the two most recent readings, if it exceeds `threshold`
    ///
    /// Returns the signed delta (newest minus previous). `None` with fewer
    /// than two readings or when the change is within the threshold.
    pub fn significant_change(&self, threshold: f32) -> Option<f32> {
        if self.len < 2 {
            return None;
        }

        let previous = self.get(self.len - 2)?;
        let newest = self.get(self.len - 1)?;
        let delta = newest.value - previous.value;

        if libm::fabsf(delta) > threshold {
            Some(delta)
        } else {
            None
        }
    }

    /// Mean, spread and extremes over the stored readings
    pub fn summary(&self) -> Option<BatchStats> {
        BatchStats::from_values(self.iter().map(|r| r.value))
    }

    /// Logical index (0 = oldest) to physical slot
    fn get(&self, index: usize) -> Option<&TimestampedReading> {
        if index >= self.len {
            return None;
        }

        let slot = if self.len < N {
            index
        } else {
            (self.write_pos + index) % N
        };

        self.data[slot].as_ref()
    }
}

impl<const N: usize> Default for ReadingHistory<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over a `ReadingHistory`
#[derive(Clone)]
pub struct HistoryIter<'a, const N: usize> {
    history: &'a ReadingHistory<N>,
    index: usize,
}

impl<'a, const N: usize> Iterator for HistoryIter<'a, N> {
    type Item = &'a TimestampedReading;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.history.get(self.index)?;
        self.index += 1;
        Some(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(value: f32, timestamp: Timestamp) -> TimestampedReading {
        TimestampedReading { value, timestamp }
    }

    #[test]
    fn empty_history() {
        let history: ReadingHistory<5> = ReadingHistory::new();
        assert!(history.is_empty());
        assert!(history.last().is_none());
        assert!(history.summary().is_none());
        assert!(history.significant_change(10.0).is_none());
    }

    #[test]
    fn overwrites_oldest() {
        let mut history = ReadingHistory::<3>::new();
        for i in 0..5 {
            history.push(reading(i as f32, i * 1000));
        }

        assert!(history.is_full());
        let values: Vec<f32> = history.iter().map(|r| r.value).collect();
        assert_eq!(values, vec![2.0, 3.0, 4.0]);
        assert_eq!(history.last().unwrap().timestamp, 4000);
    }

    #[test]
    fn change_detection_uses_last_two() {
        let mut history = ReadingHistory::<4>::new();
        history.push(reading(40.0, 0));
        history.push(reading(45.0, 1));
        assert_eq!(history.significant_change(10.0), None);

        history.push(reading(30.0, 2));
        assert_eq!(history.significant_change(10.0), Some(-15.0));

        // Exactly at the threshold is not significant
        history.push(reading(40.0, 3));
        assert_eq!(history.significant_change(10.0), None);

        // Wrapped ring still compares the newest pair
        history.push(reading(52.0, 4));
        assert_eq!(history.significant_change(10.0), Some(12.0));
    }

    #[test]
    fn summary_over_window() {
        let mut history = ReadingHistory::<4>::new();
        for v in [10.0, 20.0, 30.0, 40.0, 50.0] {
            history.push(reading(v, 0));
        }

        let summary = history.summary().unwrap();
        assert_eq!(summary.count, 4);
        assert_eq!(summary.mean, 35.0);
        assert_eq!(summary.min, 20.0);
        assert_eq!(summary.max, 50.0);
    }

    #[test]
    fn clear_resets() {
        let mut history = ReadingHistory::<2>::new();
        history.push(reading(1.0, 0));
        history.clear();
        assert!(history.is_empty());
        assert_eq!(history.iter().count(), 0);
    }
}

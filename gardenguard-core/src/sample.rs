//! Raw samples and fixed-capacity sample batches

use heapless::Vec;

use crate::constants::MAX_BATCH_SAMPLES;
use crate::time::Timestamp;

/// Batch of samples gathered for one reference condition
pub type SampleBatch = Vec<Sample, MAX_BATCH_SAMPLES>;

/// Single raw measurement from a sensor
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sample {
    /// Unconverted sensor output (ADC counts, bus units)
    pub raw_value: f32,
    /// Validity flag reported by the driver (e.g. digital comparator agrees)
    pub valid: bool,
    /// When the sample was taken
    pub timestamp: Timestamp,
}

impl Sample {
    /// Valid sample
    pub const fn new(raw_value: f32, timestamp: Timestamp) -> Self {
        Self { raw_value, valid: true, timestamp }
    }

    /// Sample the driver flagged as unreliable
    pub const fn invalid(raw_value: f32, timestamp: Timestamp) -> Self {
        Self { raw_value, valid: false, timestamp }
    }

    /// Valid, finite, and inside `[min, max]`
    pub fn is_acceptable(&self, min: f32, max: f32) -> bool {
        self.valid && self.raw_value.is_finite() && self.raw_value >= min && self.raw_value <= max
    }
}

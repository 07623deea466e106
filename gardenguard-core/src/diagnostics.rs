//! Sensor Diagnostics
//!
//! Health checks that run beside calibration and the runtime loop:
//!
//! - **Batch statistics**: mean, spread and range of a set of readings
//! - **Stability grading**: did the readings hold still long enough?
//! - **Systematic offset detection**: compare against a trusted reference
//!   instrument and suggest a compensation (or a replacement)
//! - **Read health**: success rate of bus reads over the sensor's lifetime
//! - **Comparator check**: does the HW-080 digital output agree with the
//!   wet reference?
//!
//! All functions are pure and allocation free.

use crate::constants::garden::HW080_MIN_WET_DIGITAL_RATIO;
use crate::constants::quality::{
    HEALTH_DEGRADED_MIN_PCT, HEALTH_HEALTHY_MIN_PCT, HUMIDITY_OFFSET_REPLACE_PCT,
    HUMIDITY_OFFSET_SIGNIFICANT_PCT, HUMIDITY_STABILITY_EXCELLENT_PCT, HUMIDITY_STABILITY_GOOD_PCT,
    TEMP_OFFSET_REPLACE_C, TEMP_OFFSET_SIGNIFICANT_C, TEMP_STABILITY_EXCELLENT_C,
    TEMP_STABILITY_GOOD_C,
};
use crate::sample::Sample;

/// Summary statistics over a set of values
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BatchStats {
    /// Number of values
    pub count: usize,
    /// Arithmetic mean
    pub mean: f32,
    /// Population standard deviation
    pub stddev: f32,
    /// Smallest value
    pub min: f32,
    /// Largest value
    pub max: f32,
}

impl BatchStats {
    /// Two-pass mean and population stddev; `None` for an empty input
    pub fn from_values<I>(values: I) -> Option<Self>
    where
        I: Iterator<Item = f32> + Clone,
    {
        let mut count = 0usize;
        let mut sum = 0.0f32;
        let mut min = f32::INFINITY;
        let mut max = f32::NEG_INFINITY;

        for v in values.clone() {
            count += 1;
            sum += v;
            min = min.min(v);
            max = max.max(v);
        }

        if count == 0 {
            return None;
        }

        let mean = sum / count as f32;
        let variance = values.map(|v| (v - mean) * (v - mean)).sum::<f32>() / count as f32;

        Some(Self {
            count,
            mean,
            stddev: libm::sqrtf(variance),
            min,
            max,
        })
    }

    /// Statistics over the raw values of a set of samples
    pub fn from_samples(samples: &[Sample]) -> Option<Self> {
        Self::from_values(samples.iter().map(|s| s.raw_value))
    }

    /// Spread between the largest and smallest value
    pub fn range(&self) -> f32 {
        self.max - self.min
    }
}

/// How steady a batch of readings was
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StabilityGrade {
    /// Ready for use
    Excellent,
    /// Acceptable
    Good,
    /// Drafts, vibration or a loose connection
    Fair,
}

/// Range thresholds for grading stability
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StabilityThresholds {
    /// Range strictly below this is excellent
    pub excellent_below: f32,
    /// Range strictly below this is good
    pub good_below: f32,
}

impl StabilityThresholds {
    /// DHT22 temperature channel
    pub const TEMPERATURE: Self = Self {
        excellent_below: TEMP_STABILITY_EXCELLENT_C,
        good_below: TEMP_STABILITY_GOOD_C,
    };

    /// DHT22 humidity channel
    pub const HUMIDITY: Self = Self {
        excellent_below: HUMIDITY_STABILITY_EXCELLENT_PCT,
        good_below: HUMIDITY_STABILITY_GOOD_PCT,
    };

    /// Grade a batch by its range
    pub fn grade(&self, stats: &BatchStats) -> StabilityGrade {
        let range = stats.range();
        if range < self.excellent_below {
            StabilityGrade::Excellent
        } else if range < self.good_below {
            StabilityGrade::Good
        } else {
            StabilityGrade::Fair
        }
    }
}

/// Outcome of comparing a sensor against a reference instrument
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OffsetFinding {
    /// Within tolerance, nothing to do
    None,
    /// Apply this additive correction
    Compensate(f32),
    /// Deviation too large to trust a correction, replace the sensor
    Replace(f32),
}

/// Limits for systematic offset detection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OffsetLimits {
    /// Deviations at or below this are noise
    pub significance: f32,
    /// Deviations above this call for replacement
    pub replace_above: f32,
}

impl OffsetLimits {
    /// DHT22 temperature channel
    pub const TEMPERATURE: Self = Self {
        significance: TEMP_OFFSET_SIGNIFICANT_C,
        replace_above: TEMP_OFFSET_REPLACE_C,
    };

    /// DHT22 humidity channel
    pub const HUMIDITY: Self = Self {
        significance: HUMIDITY_OFFSET_SIGNIFICANT_PCT,
        replace_above: HUMIDITY_OFFSET_REPLACE_PCT,
    };
}

/// Compare a measured mean against a trusted reference value
///
/// The suggested correction is `reference - measured`, ready to pass to
/// `set_compensation` since compensation is additive.
pub fn detect_systematic_offset(measured_mean: f32, reference: f32, limits: OffsetLimits) -> OffsetFinding {
    let correction = reference - measured_mean;
    let deviation = libm::fabsf(correction);

    if !(deviation > limits.significance) {
        OffsetFinding::None
    } else if deviation > limits.replace_above {
        OffsetFinding::Replace(correction)
    } else {
        OffsetFinding::Compensate(correction)
    }
}

/// HW-080 digital output sampled during the wet reference
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ComparatorCheck {
    /// Share of samples where the comparator reported "humid" (0 to 1)
    pub humid_ratio: f32,
    /// Ratio below the minimum; turn the module potentiometer
    pub needs_adjustment: bool,
}

/// Check the HW-080 comparator against the wet reference
///
/// `humid_states` are the digital pin states read beside the wet-reference
/// samples, `true` meaning "humid". `None` when no states were given.
pub fn check_wet_comparator<I>(humid_states: I) -> Option<ComparatorCheck>
where
    I: IntoIterator<Item = bool>,
{
    let (humid, total) = humid_states
        .into_iter()
        .fold((0u32, 0u32), |(humid, total), state| (humid + state as u32, total + 1));

    if total == 0 {
        return None;
    }

    let humid_ratio = humid as f32 / total as f32;
    let needs_adjustment = humid_ratio < HW080_MIN_WET_DIGITAL_RATIO;
    if needs_adjustment {
        log_warn!("Comparator humid ratio {} in wet reference, adjust potentiometer", humid_ratio);
    }

    Some(ComparatorCheck { humid_ratio, needs_adjustment })
}

/// Overall sensor health derived from the read success rate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SensorHealth {
    /// Success rate at or above 80%
    Healthy,
    /// Success rate at or above 60%
    Degraded,
    /// Check wiring, pull-up resistor and supply
    Critical,
}

/// Lifetime read counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReadStats {
    /// Read attempts
    pub total: u32,
    /// Reads that produced an acceptable sample
    pub successful: u32,
    /// Reads that failed or were rejected
    pub failed: u32,
}

impl ReadStats {
    /// Count a successful read
    pub fn record_success(&mut self) {
        self.total = self.total.saturating_add(1);
        self.successful = self.successful.saturating_add(1);
    }

    /// Count a failed read
    pub fn record_failure(&mut self) {
        self.total = self.total.saturating_add(1);
        self.failed = self.failed.saturating_add(1);
    }

    /// Success rate in percent (100% before the first read)
    pub fn success_rate_pct(&self) -> f32 {
        if self.total == 0 {
            return 100.0;
        }
        self.successful as f32 * 100.0 / self.total as f32
    }

    /// Health classification
    pub fn health(&self) -> SensorHealth {
        let rate = self.success_rate_pct();
        if rate >= HEALTH_HEALTHY_MIN_PCT {
            SensorHealth::Healthy
        } else if rate >= HEALTH_DEGRADED_MIN_PCT {
            SensorHealth::Degraded
        } else {
            SensorHealth::Critical
        }
    }
}

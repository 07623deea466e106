//! Offset Compensation
//!
//! User-supplied additive corrections applied after the linear mapping,
//! typically found by holding the sensor next to a trusted reference
//! instrument (see `diagnostics::detect_systematic_offset`).
//!
//! Compensation has its own lifecycle: it survives recalibration of the
//! mapping and is persisted alongside it. A two-channel sensor such as the
//! DHT22 carries temperature on the primary channel and humidity on the
//! secondary one; single-channel sensors only use the primary.

use crate::constants::DEFAULT_OFFSET_BOUND;
use crate::errors::{CalibrationError, CalibrationResult};
use crate::time::Timestamp;

/// Inclusive physical output range of a sensor
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PhysicalRange {
    min: f32,
    max: f32,
}

impl PhysicalRange {
    /// Finite range with `min < max`
    pub fn new(min: f32, max: f32) -> CalibrationResult<Self> {
        if !min.is_finite() || !max.is_finite() {
            return Err(CalibrationError::InvalidConfig {
                reason: "physical range bounds must be finite",
            });
        }
        if min >= max {
            return Err(CalibrationError::InvalidConfig {
                reason: "physical range minimum must be below maximum",
            });
        }
        Ok(Self { min, max })
    }

    /// Unchecked constructor for the built-in profiles
    pub(crate) const fn preset(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Lower bound
    pub fn min(&self) -> f32 {
        self.min
    }

    /// Upper bound
    pub fn max(&self) -> f32 {
        self.max
    }

    /// Clamp into the range; NaN passes through for the evaluator to report
    pub fn clamp(&self, value: f32) -> f32 {
        if value < self.min {
            self.min
        } else if value > self.max {
            self.max
        } else {
            value
        }
    }

    /// Inclusive containment check
    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Which offset a reading takes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CompensationChannel {
    /// Temperature on the DHT22, the only channel elsewhere
    Primary,
    /// Humidity on the DHT22
    Secondary,
}

/// Additive corrections in physical units
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OffsetCompensation {
    /// Added to primary-channel readings
    pub primary_offset: f32,
    /// Added to secondary-channel readings
    pub secondary_offset: f32,
    /// When the offsets were last set
    pub last_calibration: Option<Timestamp>,
}

impl OffsetCompensation {
    /// No correction
    pub const fn zero() -> Self {
        Self {
            primary_offset: 0.0,
            secondary_offset: 0.0,
            last_calibration: None,
        }
    }

    /// Offset for a channel
    pub fn offset_for(&self, channel: CompensationChannel) -> f32 {
        match channel {
            CompensationChannel::Primary => self.primary_offset,
            CompensationChannel::Secondary => self.secondary_offset,
        }
    }
}

impl Default for OffsetCompensation {
    fn default() -> Self {
        Self::zero()
    }
}

/// Apply the primary offset and clamp to the physical range
#[inline]
pub fn apply(physical: f32, compensation: &OffsetCompensation, range: PhysicalRange) -> f32 {
    range.clamp(physical + compensation.primary_offset)
}

/// Apply the secondary offset and clamp to the physical range
#[inline]
pub fn apply_secondary(physical: f32, compensation: &OffsetCompensation, range: PhysicalRange) -> f32 {
    range.clamp(physical + compensation.secondary_offset)
}

/// Compensated value and whether the range clamp changed it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Compensated {
    /// Offset applied and clamped to the physical range
    pub value: f32,
    /// The offset result fell outside the range
    pub clamped: bool,
}

/// Apply the offset for `channel`, clamp to `range`, and report the clamp
///
/// Shared by every runtime path so a clamp is logged the same way
/// everywhere.
pub fn compensate_and_clamp(
    physical: f32,
    compensation: &OffsetCompensation,
    channel: CompensationChannel,
    range: PhysicalRange,
) -> Compensated {
    let shifted = physical + compensation.offset_for(channel);
    let value = range.clamp(shifted);
    let clamped = !shifted.is_nan() && value != shifted;
    if clamped {
        log_warn!("Reading {} clamped to {}", shifted, value);
    }
    Compensated { value, clamped }
}

/// Current compensation plus the bound new offsets are checked against
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompensationStore {
    current: OffsetCompensation,
    bound: f32,
}

impl CompensationStore {
    /// Zero compensation with an explicit absolute bound
    pub fn new(bound: f32) -> CalibrationResult<Self> {
        if !bound.is_finite() || bound < 0.0 {
            return Err(CalibrationError::InvalidConfig {
                reason: "offset bound must be finite and non-negative",
            });
        }
        Ok(Self { current: OffsetCompensation::zero(), bound })
    }

    /// Zero compensation with a bound already validated by a profile
    pub(crate) const fn with_bound(bound: f32) -> Self {
        Self { current: OffsetCompensation::zero(), bound }
    }

    /// Absolute bound on each offset
    pub fn bound(&self) -> f32 {
        self.bound
    }

    /// Compensation in effect
    pub fn current(&self) -> OffsetCompensation {
        self.current
    }

    /// Replace both offsets
    ///
    /// Each offset must be finite and within `+/-bound`; otherwise the
    /// stored value is left untouched. Calling twice with the same arguments
    /// yields the same state.
    pub fn set_compensation(&mut self, primary: f32, secondary: f32, now: Timestamp) -> CalibrationResult<()> {
        self.check(primary)?;
        self.check(secondary)?;

        self.current = OffsetCompensation {
            primary_offset: primary,
            secondary_offset: secondary,
            last_calibration: Some(now),
        };
        log_info!("Compensation set: primary {} secondary {}", primary, secondary);
        Ok(())
    }

    /// Install a compensation loaded from storage
    ///
    /// Offsets outside the bound are rejected and the current value kept.
    pub fn replace(&mut self, compensation: OffsetCompensation) -> CalibrationResult<()> {
        self.check(compensation.primary_offset)?;
        self.check(compensation.secondary_offset)?;
        self.current = compensation;
        Ok(())
    }

    /// Apply the offset for `channel` and clamp
    pub fn apply_channel(&self, physical: f32, channel: CompensationChannel, range: PhysicalRange) -> f32 {
        compensate_and_clamp(physical, &self.current, channel, range).value
    }

    fn check(&self, value: f32) -> CalibrationResult<()> {
        if value.is_finite() && libm::fabsf(value) <= self.bound {
            Ok(())
        } else {
            log_warn!("Rejected offset {} (bound {})", value, self.bound);
            Err(CalibrationError::OffsetOutOfBounds { value, bound: self.bound })
        }
    }
}

impl Default for CompensationStore {
    fn default() -> Self {
        Self { current: OffsetCompensation::zero(), bound: DEFAULT_OFFSET_BOUND }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn percent() -> PhysicalRange {
        PhysicalRange::new(0.0, 100.0).unwrap()
    }

    #[test]
    fn apply_adds_then_clamps() {
        let comp = OffsetCompensation { primary_offset: 2.5, secondary_offset: -4.0, last_calibration: None };

        assert_eq!(apply(50.0, &comp, percent()), 52.5);
        assert_eq!(apply(99.0, &comp, percent()), 100.0);
        assert_eq!(apply_secondary(2.0, &comp, percent()), 0.0);
        assert_eq!(apply_secondary(50.0, &comp, percent()), 46.0);
    }

    #[test]
    fn zero_compensation_is_identity_inside_range() {
        assert_eq!(apply(37.2, &OffsetCompensation::zero(), percent()), 37.2);
    }

    #[test]
    fn clamp_is_reported() {
        let comp = OffsetCompensation { primary_offset: 5.0, secondary_offset: -5.0, last_calibration: None };

        let inside = compensate_and_clamp(50.0, &comp, CompensationChannel::Primary, percent());
        assert_eq!(inside, Compensated { value: 55.0, clamped: false });

        let high = compensate_and_clamp(98.0, &comp, CompensationChannel::Primary, percent());
        assert_eq!(high, Compensated { value: 100.0, clamped: true });

        let low = compensate_and_clamp(3.0, &comp, CompensationChannel::Secondary, percent());
        assert_eq!(low, Compensated { value: 0.0, clamped: true });

        // Exactly on the bound is not a clamp
        let edge = compensate_and_clamp(95.0, &comp, CompensationChannel::Primary, percent());
        assert!(!edge.clamped);

        let nan = compensate_and_clamp(f32::NAN, &comp, CompensationChannel::Primary, percent());
        assert!(nan.value.is_nan());
        assert!(!nan.clamped);
    }

    #[test]
    fn set_within_bound() {
        let mut store = CompensationStore::default();
        store.set_compensation(1.5, -3.0, 5_000).unwrap();

        let current = store.current();
        assert_eq!(current.primary_offset, 1.5);
        assert_eq!(current.secondary_offset, -3.0);
        assert_eq!(current.last_calibration, Some(5_000));

        assert_eq!(store.apply_channel(20.0, CompensationChannel::Primary, percent()), 21.5);
        assert_eq!(store.apply_channel(20.0, CompensationChannel::Secondary, percent()), 17.0);
    }

    #[test]
    fn out_of_bounds_keeps_previous() {
        let mut store = CompensationStore::default();
        store.set_compensation(1.0, 1.0, 10).unwrap();

        let err = store.set_compensation(0.0, 10.5, 20).unwrap_err();
        assert_eq!(err, CalibrationError::OffsetOutOfBounds { value: 10.5, bound: 10.0 });
        assert!(store.set_compensation(f32::NAN, 0.0, 20).is_err());

        assert_eq!(store.current().primary_offset, 1.0);
        assert_eq!(store.current().last_calibration, Some(10));
    }

    #[test]
    fn bound_is_inclusive() {
        let mut store = CompensationStore::default();
        assert!(store.set_compensation(10.0, -10.0, 0).is_ok());
    }

    #[test]
    fn range_validation() {
        assert!(PhysicalRange::new(10.0, 0.0).is_err());
        assert!(PhysicalRange::new(0.0, f32::INFINITY).is_err());
        assert!(CompensationStore::new(-1.0).is_err());
    }
}

//! Two-Point Linear Calibration
//!
//! ## Overview
//!
//! Every supported sensor is close enough to linear over its garden range
//! that two reference conditions pin it down:
//!
//! ```text
//! physical = scale * raw + offset
//!
//! scale  = (high_physical - low_physical) / (high_mean - low_mean)
//! offset = low_physical - scale * low_mean
//! ```
//!
//! For the HW-080 the references are "sensor in open air" (0% moisture) and
//! "sensor fully inserted in wet soil" (100%). For the DHT22 they are two
//! saturated-salt chambers or a reference thermometer.
//!
//! ## Acceptance Checks
//!
//! A calibration run is rejected, in this order, when:
//!
//! 1. **Either batch is unstable**: stddev above `max_relative_stddev` of
//!    its mean. The sensor was moved or the soil had not settled.
//! 2. **References are too close**: `|high_mean - low_mean| <
//!    min_separation`. The working range would be too narrow to resolve.
//! 3. **References are inverted**: the raw ordering contradicts the
//!    sensor's declared direction.
//!
//! ## Direction
//!
//! Capacitive moisture sensors read *higher* when drier, so the "high"
//! (wet) reference has the *lower* raw mean. The DHT22 reports values that
//! rise with the physical quantity. The BH1750 depends on how the count is
//! wired through, so its direction is configuration.
//!
//! ```text
//! HW-080 (RawDecreasing)          DHT22 (RawIncreasing)
//! raw 65535 ── 0%  (dry, low)      raw 33 ── 33% (low)
//! raw 26221 ── 100% (wet, high)    raw 75 ── 75% (high)
//! ```

use core::fmt;

use crate::constants::calibration::MAPPING_REFERENCE_TOLERANCE;
use crate::diagnostics::BatchStats;
use crate::errors::{CalibrationError, CalibrationResult};
use crate::sample::SampleBatch;
use crate::time::Timestamp;

/// Which reference condition a batch was taken under
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ReferenceLabel {
    /// Reference mapped to the low physical value (dry sensor, cold bath)
    Low,
    /// Reference mapped to the high physical value (wet soil, warm bath)
    High,
}

impl ReferenceLabel {
    /// Human-readable name
    pub const fn name(&self) -> &'static str {
        match self {
            ReferenceLabel::Low => "low",
            ReferenceLabel::High => "high",
        }
    }
}

impl fmt::Display for ReferenceLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How raw values move as the physical quantity rises
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CalibrationDirection {
    /// Raw rises with the physical value (DHT22)
    RawIncreasing,
    /// Raw falls as the physical value rises (capacitive moisture sensors)
    RawDecreasing,
}

impl CalibrationDirection {
    /// Whether `low_mean -> high_mean` moves the way this direction expects
    pub fn accepts(&self, low_mean: f32, high_mean: f32) -> bool {
        match self {
            CalibrationDirection::RawIncreasing => high_mean > low_mean,
            CalibrationDirection::RawDecreasing => high_mean < low_mean,
        }
    }
}

/// Validated calibration parameters for one sensor family
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationConfig {
    direction: CalibrationDirection,
    low_physical: f32,
    high_physical: f32,
    min_separation: f32,
    max_relative_stddev: f32,
}

impl CalibrationConfig {
    /// Build a config, failing fast on nonsensical limits
    pub fn new(
        direction: CalibrationDirection,
        low_physical: f32,
        high_physical: f32,
        min_separation: f32,
        max_relative_stddev: f32,
    ) -> CalibrationResult<Self> {
        if !low_physical.is_finite() || !high_physical.is_finite() {
            return Err(CalibrationError::InvalidConfig {
                reason: "reference physical values must be finite",
            });
        }
        if low_physical >= high_physical {
            return Err(CalibrationError::InvalidConfig {
                reason: "low physical reference must be below high reference",
            });
        }
        if !(min_separation > 0.0) || !min_separation.is_finite() {
            return Err(CalibrationError::InvalidConfig {
                reason: "minimum separation must be positive",
            });
        }
        if !(max_relative_stddev > 0.0) || !max_relative_stddev.is_finite() {
            return Err(CalibrationError::InvalidConfig {
                reason: "maximum relative stddev must be positive",
            });
        }

        Ok(Self {
            direction,
            low_physical,
            high_physical,
            min_separation,
            max_relative_stddev,
        })
    }

    /// Unchecked constructor for the built-in profiles
    pub(crate) const fn preset(
        direction: CalibrationDirection,
        low_physical: f32,
        high_physical: f32,
        min_separation: f32,
        max_relative_stddev: f32,
    ) -> Self {
        Self { direction, low_physical, high_physical, min_separation, max_relative_stddev }
    }

    /// Declared raw direction
    pub fn direction(&self) -> CalibrationDirection {
        self.direction
    }

    /// Physical value of the low reference
    pub fn low_physical(&self) -> f32 {
        self.low_physical
    }

    /// Physical value of the high reference
    pub fn high_physical(&self) -> f32 {
        self.high_physical
    }

    /// Minimum raw separation between reference means
    pub fn min_separation(&self) -> f32 {
        self.min_separation
    }

    /// Maximum stddev as a fraction of a batch mean
    pub fn max_relative_stddev(&self) -> f32 {
        self.max_relative_stddev
    }
}

/// Samples and statistics for one reference condition
#[derive(Debug, Clone)]
pub struct CalibrationPoint {
    label: ReferenceLabel,
    samples: SampleBatch,
    mean: f32,
    stddev: f32,
}

impl CalibrationPoint {
    /// Compute mean and population stddev for a batch
    pub fn from_batch(label: ReferenceLabel, samples: SampleBatch) -> CalibrationResult<Self> {
        let raw = samples.iter().map(|s| s.raw_value);
        let stats = BatchStats::from_values(raw).ok_or(CalibrationError::InsufficientSamples {
            required: 1,
            collected: 0,
        })?;

        Ok(Self {
            label,
            samples,
            mean: stats.mean,
            stddev: stats.stddev,
        })
    }

    /// Reference label
    pub fn label(&self) -> ReferenceLabel {
        self.label
    }

    /// Samples the statistics were computed from
    pub fn samples(&self) -> &SampleBatch {
        &self.samples
    }

    /// Mean raw value
    pub fn mean(&self) -> f32 {
        self.mean
    }

    /// Population standard deviation of the raw values
    pub fn stddev(&self) -> f32 {
        self.stddev
    }

    /// Stddev as a fraction of the mean's magnitude
    ///
    /// A zero mean with any spread is infinitely unstable.
    pub fn relative_stddev(&self) -> f32 {
        let magnitude = libm::fabsf(self.mean);
        if magnitude > 0.0 {
            self.stddev / magnitude
        } else if self.stddev == 0.0 {
            0.0
        } else {
            f32::INFINITY
        }
    }

    fn check_stability(&self, max_relative_stddev: f32) -> CalibrationResult<()> {
        let relative_stddev = self.relative_stddev();
        if relative_stddev > max_relative_stddev {
            return Err(CalibrationError::UnstableBatch {
                label: self.label,
                relative_stddev,
                max: max_relative_stddev,
            });
        }
        Ok(())
    }
}

/// Linear raw-to-physical mapping
///
/// Created only by the calibration engine or restored from storage, and
/// replaced wholesale on recalibration. There are no setters. Deserializing
/// goes through `restore`, so a stored `valid` flag is never taken on
/// trust.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "StoredMapping"))]
pub struct CalibrationMapping {
    scale: f32,
    offset: f32,
    low_raw: f32,
    high_raw: f32,
    created_at: Timestamp,
    valid: bool,
}

impl CalibrationMapping {
    /// Derive a mapping from two reference raw values
    ///
    /// The mapping is marked invalid when the references are closer than
    /// the configured minimum separation or the result is not finite.
    pub fn from_reference_points(
        low_raw: f32,
        high_raw: f32,
        config: &CalibrationConfig,
        created_at: Timestamp,
    ) -> Self {
        let span = high_raw - low_raw;
        let scale = (config.high_physical - config.low_physical) / span;
        let offset = config.low_physical - scale * low_raw;

        let valid = libm::fabsf(span) >= config.min_separation
            && scale.is_finite()
            && offset.is_finite();

        Self { scale, offset, low_raw, high_raw, created_at, valid }
    }

    /// Rebuild a mapping loaded from storage
    ///
    /// `valid` is forced to false when the stored values cannot describe a
    /// usable mapping (non-finite, zero slope, identical references).
    pub fn restore(
        scale: f32,
        offset: f32,
        low_raw: f32,
        high_raw: f32,
        created_at: Timestamp,
        valid: bool,
    ) -> Self {
        let usable = scale.is_finite()
            && scale != 0.0
            && offset.is_finite()
            && low_raw.is_finite()
            && high_raw.is_finite()
            && low_raw != high_raw;

        Self {
            scale,
            offset,
            low_raw,
            high_raw,
            created_at,
            valid: valid && usable,
        }
    }

    /// Check the mapping against a sensor family's calibration limits
    ///
    /// A mapping from storage or another process can be self-consistent
    /// and still wrong for this sensor. It must:
    /// - be marked valid
    /// - keep its references at least `min_separation` apart
    /// - order its references the way the sensor's direction expects
    /// - map both references onto the configured physical values
    pub fn validate_against(&self, config: &CalibrationConfig) -> CalibrationResult<()> {
        if !self.valid {
            return Err(CalibrationError::InvalidConfig { reason: "mapping is marked invalid" });
        }

        let separation = self.separation();
        if !(separation >= config.min_separation) {
            return Err(CalibrationError::InsufficientSeparation {
                separation,
                required: config.min_separation,
            });
        }

        if !config.direction.accepts(self.low_raw, self.high_raw) {
            return Err(CalibrationError::InvertedCalibration {
                low_mean: self.low_raw,
                high_mean: self.high_raw,
            });
        }

        let tolerance = (config.high_physical - config.low_physical) * MAPPING_REFERENCE_TOLERANCE;
        let low_error = libm::fabsf(self.to_physical(self.low_raw) - config.low_physical);
        let high_error = libm::fabsf(self.to_physical(self.high_raw) - config.high_physical);
        if !(low_error <= tolerance && high_error <= tolerance) {
            return Err(CalibrationError::InvalidConfig {
                reason: "mapping does not reproduce its reference values",
            });
        }

        Ok(())
    }

    /// Convert a raw value to physical units
    #[inline]
    pub fn to_physical(&self, raw: f32) -> f32 {
        self.scale * raw + self.offset
    }

    /// Slope in physical units per raw unit
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Intercept in physical units
    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// Raw mean of the low reference
    pub fn low_raw(&self) -> f32 {
        self.low_raw
    }

    /// Raw mean of the high reference
    pub fn high_raw(&self) -> f32 {
        self.high_raw
    }

    /// Absolute raw distance between the references
    pub fn separation(&self) -> f32 {
        libm::fabsf(self.high_raw - self.low_raw)
    }

    /// When the calibration was taken
    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Whether this mapping may be persisted and used
    pub fn is_valid(&self) -> bool {
        self.valid
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct StoredMapping {
    scale: f32,
    offset: f32,
    low_raw: f32,
    high_raw: f32,
    created_at: Timestamp,
    valid: bool,
}

#[cfg(feature = "serde")]
impl From<StoredMapping> for CalibrationMapping {
    fn from(stored: StoredMapping) -> Self {
        Self::restore(
            stored.scale,
            stored.offset,
            stored.low_raw,
            stored.high_raw,
            stored.created_at,
            stored.valid,
        )
    }
}

/// Run the calibration checks and derive a mapping
///
/// Deterministic: identical points always give an identical mapping.
pub fn calibrate(
    low: &CalibrationPoint,
    high: &CalibrationPoint,
    config: &CalibrationConfig,
    created_at: Timestamp,
) -> CalibrationResult<CalibrationMapping> {
    let result = check_and_map(low, high, config, created_at);

    match &result {
        Ok(mapping) => {
            log_info!(
                "Calibration accepted: low {} high {} scale {} offset {}",
                mapping.low_raw, mapping.high_raw, mapping.scale, mapping.offset
            );
        }
        Err(_err) => {
            log_warn!(
                "Calibration rejected: low mean {} high mean {}",
                low.mean, high.mean
            );
        }
    }

    result
}

/// Build both reference points from raw batches, then calibrate
pub fn calibrate_batches(
    low_batch: SampleBatch,
    high_batch: SampleBatch,
    config: &CalibrationConfig,
    created_at: Timestamp,
) -> CalibrationResult<CalibrationMapping> {
    let low = CalibrationPoint::from_batch(ReferenceLabel::Low, low_batch)?;
    let high = CalibrationPoint::from_batch(ReferenceLabel::High, high_batch)?;
    calibrate(&low, &high, config, created_at)
}

fn check_and_map(
    low: &CalibrationPoint,
    high: &CalibrationPoint,
    config: &CalibrationConfig,
    created_at: Timestamp,
) -> CalibrationResult<CalibrationMapping> {
    low.check_stability(config.max_relative_stddev)?;
    high.check_stability(config.max_relative_stddev)?;

    let separation = libm::fabsf(high.mean - low.mean);
    if separation < config.min_separation {
        return Err(CalibrationError::InsufficientSeparation {
            separation,
            required: config.min_separation,
        });
    }

    if !config.direction.accepts(low.mean, high.mean) {
        return Err(CalibrationError::InvertedCalibration {
            low_mean: low.mean,
            high_mean: high.mean,
        });
    }

    let mapping = CalibrationMapping::from_reference_points(low.mean, high.mean, config, created_at);
    if !mapping.is_valid() {
        return Err(CalibrationError::InvalidConfig {
            reason: "calibration produced a non-finite mapping",
        });
    }

    Ok(mapping)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{DEFAULT_MAX_RELATIVE_STDDEV, HW080_MIN_SEPARATION_RAW};
    use crate::sample::Sample;

    fn moisture_config() -> CalibrationConfig {
        CalibrationConfig::new(
            CalibrationDirection::RawDecreasing,
            0.0,
            100.0,
            HW080_MIN_SEPARATION_RAW,
            DEFAULT_MAX_RELATIVE_STDDEV,
        )
        .unwrap()
    }

    fn batch(values: &[f32]) -> SampleBatch {
        let mut batch = SampleBatch::new();
        for (i, v) in values.iter().enumerate() {
            batch.push(Sample::new(*v, i as u64 * 300)).unwrap();
        }
        batch
    }

    fn point(label: ReferenceLabel, values: &[f32]) -> CalibrationPoint {
        CalibrationPoint::from_batch(label, batch(values)).unwrap()
    }

    #[test]
    fn hw080_field_calibration() {
        let low = point(ReferenceLabel::Low, &[65535.0; 15]);
        let high = point(ReferenceLabel::High, &[26221.0; 15]);

        let mapping = calibrate(&low, &high, &moisture_config(), 42).unwrap();

        assert!(mapping.is_valid());
        assert!((mapping.scale() - (-0.0025436)).abs() < 1e-6);
        assert!((mapping.offset() - 166.70).abs() < 0.05);
        assert!(mapping.to_physical(65535.0).abs() < 0.01);
        assert!((mapping.to_physical(26221.0) - 100.0).abs() < 0.01);
        assert!((mapping.to_physical(45000.0) - 52.23).abs() < 0.05);
        assert_eq!(mapping.created_at(), 42);
    }

    #[test]
    fn point_statistics() {
        let p = point(ReferenceLabel::Low, &[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert_eq!(p.mean(), 5.0);
        assert!((p.stddev() - 2.0).abs() < 1e-6);
        assert_eq!(p.samples().len(), 8);
        assert_eq!(p.label(), ReferenceLabel::Low);
    }

    #[test]
    fn empty_batch_is_insufficient() {
        let err = CalibrationPoint::from_batch(ReferenceLabel::High, SampleBatch::new()).unwrap_err();
        assert!(matches!(err, CalibrationError::InsufficientSamples { collected: 0, .. }));
    }

    #[test]
    fn noisy_batch_is_unstable() {
        let low = point(ReferenceLabel::Low, &[65535.0, 50000.0, 65535.0, 40000.0]);
        let high = point(ReferenceLabel::High, &[26221.0; 4]);

        let err = calibrate(&low, &high, &moisture_config(), 0).unwrap_err();
        assert!(matches!(err, CalibrationError::UnstableBatch { label: ReferenceLabel::Low, .. }));
    }

    #[test]
    fn close_references_are_rejected() {
        let low = point(ReferenceLabel::Low, &[30000.0; 4]);
        let high = point(ReferenceLabel::High, &[27000.0; 4]);

        let err = calibrate(&low, &high, &moisture_config(), 0).unwrap_err();
        assert_eq!(
            err,
            CalibrationError::InsufficientSeparation { separation: 3000.0, required: 5000.0 }
        );
    }

    #[test]
    fn swapped_references_are_inverted() {
        // Wet reading taken as "dry" and vice versa
        let low = point(ReferenceLabel::Low, &[26221.0; 4]);
        let high = point(ReferenceLabel::High, &[65535.0; 4]);

        let err = calibrate(&low, &high, &moisture_config(), 0).unwrap_err();
        assert!(matches!(err, CalibrationError::InvertedCalibration { .. }));
    }

    #[test]
    fn increasing_direction() {
        let config = CalibrationConfig::new(CalibrationDirection::RawIncreasing, 33.0, 75.0, 20.0, 0.05).unwrap();
        let low = point(ReferenceLabel::Low, &[35.0; 5]);
        let high = point(ReferenceLabel::High, &[78.0; 5]);

        let mapping = calibrate(&low, &high, &config, 0).unwrap();
        assert!((mapping.to_physical(35.0) - 33.0).abs() < 1e-4);
        assert!((mapping.to_physical(78.0) - 75.0).abs() < 1e-4);

        let err = calibrate(&high_as_low(&high), &low_as_high(&low), &config, 0).unwrap_err();
        assert!(matches!(err, CalibrationError::InvertedCalibration { .. }));
    }

    fn high_as_low(p: &CalibrationPoint) -> CalibrationPoint {
        CalibrationPoint::from_batch(ReferenceLabel::Low, p.samples().clone()).unwrap()
    }

    fn low_as_high(p: &CalibrationPoint) -> CalibrationPoint {
        CalibrationPoint::from_batch(ReferenceLabel::High, p.samples().clone()).unwrap()
    }

    #[test]
    fn config_validation() {
        use CalibrationDirection::RawIncreasing;
        assert!(CalibrationConfig::new(RawIncreasing, 100.0, 0.0, 1.0, 0.1).is_err());
        assert!(CalibrationConfig::new(RawIncreasing, 0.0, 100.0, 0.0, 0.1).is_err());
        assert!(CalibrationConfig::new(RawIncreasing, 0.0, 100.0, 1.0, 0.0).is_err());
        assert!(CalibrationConfig::new(RawIncreasing, f32::NAN, 100.0, 1.0, 0.1).is_err());
    }

    #[test]
    fn reference_points_below_separation_are_invalid() {
        let mapping = CalibrationMapping::from_reference_points(30000.0, 28000.0, &moisture_config(), 0);
        assert!(!mapping.is_valid());
    }

    #[test]
    fn restore_rejects_unusable_values() {
        assert!(CalibrationMapping::restore(-0.0025, 166.7, 65535.0, 26221.0, 0, true).is_valid());
        assert!(!CalibrationMapping::restore(-0.0025, 166.7, 65535.0, 26221.0, 0, false).is_valid());
        assert!(!CalibrationMapping::restore(f32::NAN, 166.7, 65535.0, 26221.0, 0, true).is_valid());
        assert!(!CalibrationMapping::restore(0.0, 166.7, 65535.0, 26221.0, 0, true).is_valid());
        assert!(!CalibrationMapping::restore(1.0, 0.0, 100.0, 100.0, 0, true).is_valid());
    }

    #[test]
    fn engine_mapping_validates_against_its_config() {
        let mapping = CalibrationMapping::from_reference_points(65535.0, 26221.0, &moisture_config(), 0);
        assert_eq!(mapping.validate_against(&moisture_config()), Ok(()));
    }

    #[test]
    fn close_stored_references_fail_validation() {
        // Marked valid and internally consistent, but only 1 raw unit apart
        let scale = -100.0;
        let mapping = CalibrationMapping::restore(scale, -scale * 30001.0, 30001.0, 30000.0, 0, true);
        assert!(mapping.is_valid());

        assert_eq!(
            mapping.validate_against(&moisture_config()),
            Err(CalibrationError::InsufficientSeparation { separation: 1.0, required: 5000.0 })
        );
    }

    #[test]
    fn wrong_direction_fails_validation() {
        let increasing =
            CalibrationConfig::new(CalibrationDirection::RawIncreasing, 0.0, 100.0, 5000.0, 0.05).unwrap();
        let mapping = CalibrationMapping::from_reference_points(0.0, 10000.0, &increasing, 0);
        assert_eq!(mapping.validate_against(&increasing), Ok(()));

        assert!(matches!(
            mapping.validate_against(&moisture_config()),
            Err(CalibrationError::InvertedCalibration { .. })
        ));
    }

    #[test]
    fn inconsistent_coefficients_fail_validation() {
        // References fine, but scale/offset belong to some other calibration
        let mapping = CalibrationMapping::restore(-0.001, 80.0, 65535.0, 26221.0, 0, true);
        assert!(matches!(
            mapping.validate_against(&moisture_config()),
            Err(CalibrationError::InvalidConfig { .. })
        ));

        let flagged = CalibrationMapping::restore(-0.0025, 166.7, 65535.0, 26221.0, 0, false);
        assert!(flagged.validate_against(&moisture_config()).is_err());
    }

    #[cfg(feature = "std")]
    #[test]
    fn deserialize_rechecks_valid_flag() {
        let json = r#"{"scale":1.0,"offset":0.0,"low_raw":5.0,"high_raw":5.0,"created_at":0,"valid":true}"#;
        let mapping: CalibrationMapping = serde_json::from_str(json).unwrap();
        assert!(!mapping.is_valid());

        let good = CalibrationMapping::from_reference_points(65535.0, 26221.0, &moisture_config(), 3);
        let text = serde_json::to_string(&good).unwrap();
        let back: CalibrationMapping = serde_json::from_str(&text).unwrap();
        assert_eq!(back, good);
    }

    #[test]
    fn calibrate_batches_builds_points() {
        let mapping = calibrate_batches(
            batch(&[65000.0, 65100.0, 65200.0]),
            batch(&[26000.0, 26100.0, 26200.0]),
            &moisture_config(),
            7,
        )
        .unwrap();
        assert!((mapping.low_raw() - 65100.0).abs() < 0.5);
        assert!((mapping.high_raw() - 26100.0).abs() < 0.5);
    }
}

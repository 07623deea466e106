//! Shared calibration state for threaded hosts
//!
//! On a Linux gateway the runtime loop and a calibration or settings
//! handler may run on different threads. `SharedCalibration` keeps the
//! mapping and compensation behind one mutex: a reader always sees a
//! mapping and a compensation that were current at the same instant, and
//! each update replaces a whole value.
//!
//! ```rust
//! use std::sync::Arc;
//! use gardenguard_core::sync::SharedCalibration;
//! use gardenguard_core::SensorProfile;
//!
//! let shared = Arc::new(SharedCalibration::new());
//! let profile = SensorProfile::hw080_soil_moisture();
//!
//! // Nothing installed yet
//! assert!(shared.convert(45000.0, &profile).is_err());
//! ```

use std::sync::{Mutex, MutexGuard};

use crate::calibration::CalibrationMapping;
use crate::compensation::{compensate_and_clamp, OffsetCompensation};
use crate::errors::{CalibrationError, MonitorError};
use crate::evaluator::ClassifiedReading;
use crate::profile::SensorProfile;

/// Mapping and compensation as seen at one instant
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CalibrationSnapshot {
    /// Installed mapping, if any
    pub mapping: Option<CalibrationMapping>,
    /// Compensation in effect
    pub compensation: OffsetCompensation,
}

/// Mutex-guarded calibration state
#[derive(Debug, Default)]
pub struct SharedCalibration {
    inner: Mutex<CalibrationSnapshot>,
}

impl SharedCalibration {
    /// Uncalibrated, zero compensation
    pub fn new() -> Self {
        Self::default()
    }

    // Updates are single assignments, so a poisoned value is still whole
    fn lock(&self) -> MutexGuard<'_, CalibrationSnapshot> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Copy of the current state
    pub fn snapshot(&self) -> CalibrationSnapshot {
        *self.lock()
    }

    /// Install a new mapping
    ///
    /// Invalid mappings, and mappings that fail `validate_against` for the
    /// profile, are refused.
    pub fn replace_mapping(
        &self,
        mapping: CalibrationMapping,
        profile: &SensorProfile,
    ) -> Result<(), MonitorError> {
        if !mapping.is_valid() {
            return Err(MonitorError::InvalidMapping);
        }
        mapping.validate_against(&profile.calibration)?;
        self.lock().mapping = Some(mapping);
        Ok(())
    }

    /// Install a new compensation
    ///
    /// Offsets must fit the profile's bound, as with `set_compensation`.
    pub fn replace_compensation(
        &self,
        compensation: OffsetCompensation,
        profile: &SensorProfile,
    ) -> Result<(), MonitorError> {
        let bound = profile.offset_bound();
        for value in [compensation.primary_offset, compensation.secondary_offset] {
            if !value.is_finite() || libm::fabsf(value) > bound {
                return Err(CalibrationError::OffsetOutOfBounds { value, bound }.into());
            }
        }
        self.lock().compensation = compensation;
        Ok(())
    }

    /// Convert and classify a raw value from one consistent snapshot
    pub fn convert(&self, raw: f32, profile: &SensorProfile) -> Result<ClassifiedReading, MonitorError> {
        let snapshot = self.snapshot();
        let mapping = snapshot
            .mapping
            .filter(CalibrationMapping::is_valid)
            .ok_or(MonitorError::NotCalibrated)?;

        let compensated = compensate_and_clamp(
            mapping.to_physical(raw),
            &snapshot.compensation,
            profile.channel(),
            profile.physical_range(),
        );

        Ok(profile.bands.classify(compensated.value))
    }
}

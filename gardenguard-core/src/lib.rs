//! Core calibration engine for GardenGuard
//!
//! Turns raw sensor units into calibrated physical values and classifies
//! them into garden condition bands. Designed for small nodes (RP2040,
//! ESP32) as well as Linux hosts.
//!
//! Key constraints:
//! - No heap allocation anywhere in the engine
//! - Calibration and runtime reads never overlap
//! - Runtime classification never fails
//!
//! ```no_run
//! use gardenguard_core::{SensorProfile, calibrate, ReferenceLabel, CalibrationPoint};
//! use gardenguard_core::sample::{Sample, SampleBatch};
//!
//! let profile = SensorProfile::hw080_soil_moisture();
//!
//! let mut dry = SampleBatch::new();
//! let mut wet = SampleBatch::new();
//! for i in 0..15 {
//!     dry.push(Sample::new(65535.0, i * 300)).ok();
//!     wet.push(Sample::new(26221.0, i * 300)).ok();
//! }
//!
//! let low = CalibrationPoint::from_batch(ReferenceLabel::Low, dry)?;
//! let high = CalibrationPoint::from_batch(ReferenceLabel::High, wet)?;
//! let mapping = calibrate(&low, &high, &profile.calibration, 0)?;
//!
//! let reading = profile.bands.classify(mapping.to_physical(45000.0));
//! println!("{}: {}", reading.category.name(), reading.recommendation);
//! # Ok::<(), gardenguard_core::CalibrationError>(())
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

#[macro_use]
mod macros;

pub mod buffer;
pub mod calibration;
pub mod collector;
pub mod compensation;
pub mod constants;
pub mod diagnostics;
pub mod errors;
pub mod evaluator;
pub mod monitor;
pub mod profile;
pub mod sample;
pub mod source;
pub mod store;
#[cfg(feature = "std")]
pub mod sync;
pub mod time;

// Public API
pub use calibration::{
    calibrate, calibrate_batches, CalibrationConfig, CalibrationDirection, CalibrationMapping,
    CalibrationPoint, ReferenceLabel,
};
pub use collector::SampleCollector;
pub use compensation::{
    apply, apply_secondary, compensate_and_clamp, CompensationChannel, CompensationStore,
    Compensated, OffsetCompensation, PhysicalRange,
};
pub use diagnostics::{
    check_wet_comparator, detect_systematic_offset, BatchStats, ComparatorCheck, OffsetFinding,
    ReadStats, SensorHealth, StabilityGrade,
};
pub use errors::{CalibrationError, CalibrationResult, MonitorError, ReadError};
pub use evaluator::{
    classify, greenhouse_actions, irrigation_decision, light_metrics, light_watering_advice,
    AirHumidity, AirTemperature, Band, BandTable, Category, ClassifiedReading, GreenhouseAction,
    IrrigationDecision, LightLevel, LightMetrics, SoilMoisture,
};
pub use monitor::{MonitorMode, SensorMonitor};
pub use profile::SensorProfile;
pub use sample::Sample;
pub use source::{RawReadingSource, ReplaySource};
pub use store::{CalibrationStore, MemoryStore, MemoryStoreError, PersistedCalibration, SaveError};
#[cfg(feature = "std")]
pub use sync::SharedCalibration;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_exists() {
        assert!(!VERSION.is_empty());
    }
}

//! Constants for GardenGuard Core
//!
//! Every numeric default used by the profiles and the engine lives here,
//! with units in the name.
//!
//! ## Organization
//!
//! - **Sensors**: raw and physical ranges per sensor family
//! - **Calibration**: separation, stability and offset limits
//! - **Time**: read intervals and settling times
//! - **Quality**: health, stability and drift thresholds
//! - **Garden**: irrigation, greenhouse and light advice thresholds

/// Raw and physical ranges for the supported sensor families.
pub mod sensors;

/// Calibration acceptance limits and batch sizes.
pub mod calibration;

/// Read intervals and stabilization times.
pub mod time;

/// Health, stability and offset-detection thresholds.
pub mod quality;

/// Irrigation, greenhouse and light advice thresholds.
pub mod garden;

pub use calibration::{
    CALIBRATION_SAMPLES, DEFAULT_MAX_RELATIVE_STDDEV, DEFAULT_OFFSET_BOUND,
    HW080_MIN_SEPARATION_RAW, MAX_BANDS, MAX_BATCH_SAMPLES,
};

pub use time::{
    DHT22_MIN_READ_INTERVAL_MS, HW080_SAMPLE_INTERVAL_MS,
    BH1750_MEASUREMENT_TIME_MS,
};

pub use quality::{HEALTH_HEALTHY_MIN_PCT, HEALTH_DEGRADED_MIN_PCT};

//! Calibration Acceptance Limits
//!
//! Limits applied by the calibration engine and the compensation store.

/// Samples taken per reference condition.
///
/// 15 readings at 300 ms is under five seconds per reference, short enough
/// that the operator keeps the sensor still.
pub const CALIBRATION_SAMPLES: usize = 15;

/// Capacity of a sample batch.
pub const MAX_BATCH_SAMPLES: usize = 32;

/// Read attempts allowed per requested sample when collecting a batch.
pub const ATTEMPTS_PER_SAMPLE: usize = 2;

/// Minimum dry/wet separation for the HW-080 (raw ADC units).
///
/// Below this the working range is too narrow to resolve moisture steps.
pub const HW080_MIN_SEPARATION_RAW: f32 = 5000.0;

/// Minimum separation between DHT22 humidity references (%RH).
///
/// Matches the spread between the common 33% and 75% salt references.
pub const DHT22_HUMIDITY_MIN_SEPARATION_PCT: f32 = 20.0;

/// Minimum separation between DHT22 temperature references (°C).
pub const DHT22_TEMP_MIN_SEPARATION_C: f32 = 10.0;

/// Minimum separation between BH1750 references (raw counts).
pub const BH1750_MIN_SEPARATION_RAW: f32 = 500.0;

/// Largest accepted batch stddev as a fraction of the batch mean.
pub const DEFAULT_MAX_RELATIVE_STDDEV: f32 = 0.05;

/// How far a stored mapping may miss its reference physical values, as a
/// fraction of the physical span.
///
/// Covers the rounding of a JSON round trip; anything larger means the
/// scale and offset were not derived from the stored references.
pub const MAPPING_REFERENCE_TOLERANCE: f32 = 0.01;

/// Largest accepted absolute compensation offset (physical units).
pub const DEFAULT_OFFSET_BOUND: f32 = 10.0;

/// Maximum number of bands in a classification table.
pub const MAX_BANDS: usize = 8;

// ===== REFERENCE CONDITIONS =====

/// Low humidity reference: saturated magnesium chloride (%RH at 25 °C).
///
/// Source: Greenspan (1977), Humidity Fixed Points of Binary Saturated
/// Aqueous Solutions
pub const DHT22_HUMIDITY_LOW_REFERENCE_PCT: f32 = 33.0;

/// High humidity reference: saturated sodium chloride (%RH at 25 °C).
pub const DHT22_HUMIDITY_HIGH_REFERENCE_PCT: f32 = 75.0;

/// Low temperature reference read from a trusted thermometer (°C).
pub const DHT22_TEMP_LOW_REFERENCE_C: f32 = 15.0;

/// High temperature reference read from a trusted thermometer (°C).
pub const DHT22_TEMP_HIGH_REFERENCE_C: f32 = 35.0;

/// Low illuminance reference from a lux meter (lx).
pub const BH1750_LOW_REFERENCE_LUX: f32 = 100.0;

/// High illuminance reference from a lux meter (lx).
pub const BH1750_HIGH_REFERENCE_LUX: f32 = 1000.0;

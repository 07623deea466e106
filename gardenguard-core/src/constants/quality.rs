//! Quality Thresholds
//!
//! Health, stability and offset-detection thresholds used by diagnostics.

// ===== SENSOR HEALTH =====

/// Minimum read success rate for a healthy sensor (%).
pub const HEALTH_HEALTHY_MIN_PCT: f32 = 80.0;

/// Minimum read success rate for a degraded (still usable) sensor (%).
///
/// Below this the sensor is critical: check wiring and pull-ups.
pub const HEALTH_DEGRADED_MIN_PCT: f32 = 60.0;

// ===== STABILITY GRADES (range over a batch) =====

/// Temperature range below which a batch is excellent (°C).
pub const TEMP_STABILITY_EXCELLENT_C: f32 = 1.0;

/// Temperature range below which a batch is good (°C).
pub const TEMP_STABILITY_GOOD_C: f32 = 2.0;

/// Humidity range below which a batch is excellent (%RH).
pub const HUMIDITY_STABILITY_EXCELLENT_PCT: f32 = 3.0;

/// Humidity range below which a batch is good (%RH).
pub const HUMIDITY_STABILITY_GOOD_PCT: f32 = 5.0;

// ===== SYSTEMATIC OFFSET DETECTION =====

/// Temperature deviation from a reference worth compensating (°C).
pub const TEMP_OFFSET_SIGNIFICANT_C: f32 = 1.0;

/// Temperature deviation beyond which the sensor should be replaced (°C).
pub const TEMP_OFFSET_REPLACE_C: f32 = 3.0;

/// Humidity deviation from a reference worth compensating (%RH).
pub const HUMIDITY_OFFSET_SIGNIFICANT_PCT: f32 = 3.0;

/// Humidity deviation beyond which the sensor should be replaced (%RH).
pub const HUMIDITY_OFFSET_REPLACE_PCT: f32 = 8.0;

// ===== CHANGE DETECTION =====

/// Change between consecutive soil moisture readings worth flagging (%).
pub const SOIL_SIGNIFICANT_CHANGE_PCT: f32 = 10.0;

/// Readings kept for change detection and summaries.
pub const HISTORY_SIZE: usize = 16;

/// Change between consecutive humidity readings worth flagging (%RH).
pub const HUMIDITY_SIGNIFICANT_CHANGE_PCT: f32 = 10.0;

/// Change between consecutive temperature readings worth flagging (°C).
pub const TEMP_SIGNIFICANT_CHANGE_C: f32 = 3.0;

/// Change between consecutive light readings worth flagging (lx).
pub const LIGHT_SIGNIFICANT_CHANGE_LUX: f32 = 1000.0;

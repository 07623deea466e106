//! Garden Action Thresholds
//!
//! Thresholds behind the irrigation, greenhouse and light advice helpers.

// ===== IRRIGATION =====

/// Default soil moisture below which watering is recommended (%).
pub const IRRIGATION_DEFAULT_THRESHOLD_PCT: f32 = 40.0;

/// Soil moisture at or above which the soil is left to drain (%).
pub const SOIL_SATURATION_PCT: f32 = 90.0;

/// Soil moisture below which watering is urgent (%).
pub const SOIL_CRITICAL_PCT: f32 = 20.0;

/// Smallest share of "humid" digital readings expected in the wet
/// reference before the HW-080 comparator needs its potentiometer adjusted.
pub const HW080_MIN_WET_DIGITAL_RATIO: f32 = 0.7;

// ===== GREENHOUSE =====

/// Above this air temperature the greenhouse is ventilated and shaded (°C).
pub const GREENHOUSE_HOT_C: f32 = 30.0;

/// Below this air temperature the greenhouse is heated (°C).
pub const GREENHOUSE_COLD_C: f32 = 15.0;

/// Above this relative humidity the greenhouse is dehumidified (%RH).
pub const GREENHOUSE_HUMID_PCT: f32 = 80.0;

/// Below this relative humidity the greenhouse is misted (%RH).
pub const GREENHOUSE_DRY_PCT: f32 = 40.0;

// ===== LIGHT =====

/// Footcandles per lux.
pub const FOOTCANDLES_PER_LUX: f32 = 0.0929;

/// Approximate irradiance per lux for sunlight (W/m²).
pub const WATTS_PER_M2_PER_LUX: f32 = 0.0079;

/// Below this illuminance plants use little water (lx).
pub const WATERING_LOW_LIGHT_LUX: f32 = 100.0;

/// Below this illuminance watering follows soil moisture alone (lx).
pub const WATERING_NORMAL_LIGHT_LUX: f32 = 1000.0;

/// At or above this illuminance evaporation is high (lx).
pub const WATERING_HIGH_LIGHT_LUX: f32 = 10000.0;

/// Above this illuminance temporary shade is worth considering (lx).
pub const WATERING_SHADE_LUX: f32 = 50000.0;

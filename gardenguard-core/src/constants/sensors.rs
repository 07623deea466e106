//! Sensor Specifications and Limits
//!
//! Operating ranges for the garden node's sensors, taken from the part
//! datasheets and from what the boards actually report.

// ===== DHT22 (AM2302) TEMPERATURE / HUMIDITY =====

/// Lowest temperature the DHT22 reports (°C).
///
/// Source: AM2302 datasheet, -40 to 80 °C range
pub const DHT22_TEMP_MIN_C: f32 = -40.0;

/// Highest temperature the DHT22 reports (°C).
pub const DHT22_TEMP_MAX_C: f32 = 80.0;

/// Relative humidity floor (%).
///
/// Source: Physics (0% RH = no water vapor)
pub const HUMIDITY_MIN_PCT: f32 = 0.0;

/// Relative humidity ceiling (%).
///
/// Compensated readings are clamped here rather than allowed to exceed it.
pub const HUMIDITY_MAX_PCT: f32 = 100.0;

// ===== HW-080 CAPACITIVE SOIL MOISTURE =====

/// Lowest value of the Pico's 16-bit scaled ADC read.
pub const ADC_U16_MIN: f32 = 0.0;

/// Highest value of the Pico's 16-bit scaled ADC read.
///
/// A dry sensor in open air saturates here.
pub const ADC_U16_MAX: f32 = 65535.0;

/// Soil moisture floor (%).
pub const SOIL_MOISTURE_MIN_PCT: f32 = 0.0;

/// Soil moisture ceiling (%).
///
/// Readings past 100% mean waterlogged soil; they clamp to the ceiling and
/// classify as saturated.
pub const SOIL_MOISTURE_MAX_PCT: f32 = 100.0;

// ===== BH1750 AMBIENT LIGHT =====

/// Lowest illuminance the BH1750 reports (lux).
pub const BH1750_LUX_MIN: f32 = 0.0;

/// Highest illuminance in high-resolution mode (lux).
///
/// Source: BH1750FVI datasheet, 16-bit count / 1.2
pub const BH1750_LUX_MAX: f32 = 54612.5;

/// Highest raw 16-bit count from the light sensor.
pub const BH1750_RAW_MAX: f32 = 65535.0;

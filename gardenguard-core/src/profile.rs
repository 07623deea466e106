//! Sensor profiles
//!
//! A `SensorProfile` is everything the monitor needs to know about one
//! sensor channel: how to calibrate it, what raw values are believable,
//! what physical range the output is clamped to, how fast it may be read
//! and how readings are classified.
//!
//! | Preset                | Direction      | Raw range     | Interval |
//! |-----------------------|----------------|---------------|----------|
//! | `hw080_soil_moisture` | RawDecreasing  | 0..=65535     | 300 ms   |
//! | `dht22_humidity`      | RawIncreasing  | 0..=100 %RH   | 2000 ms  |
//! | `dht22_temperature`   | RawIncreasing  | -40..=80 °C   | 2000 ms  |
//! | `bh1750_light`        | caller decides | 0..=65535     | 180 ms   |

use crate::calibration::{CalibrationConfig, CalibrationDirection};
use crate::compensation::{CompensationChannel, PhysicalRange};
use crate::constants::calibration::{
    BH1750_HIGH_REFERENCE_LUX, BH1750_LOW_REFERENCE_LUX, BH1750_MIN_SEPARATION_RAW,
    DHT22_HUMIDITY_HIGH_REFERENCE_PCT, DHT22_HUMIDITY_LOW_REFERENCE_PCT,
    DHT22_HUMIDITY_MIN_SEPARATION_PCT, DHT22_TEMP_HIGH_REFERENCE_C, DHT22_TEMP_LOW_REFERENCE_C,
    DHT22_TEMP_MIN_SEPARATION_C, DEFAULT_MAX_RELATIVE_STDDEV, DEFAULT_OFFSET_BOUND,
    HW080_MIN_SEPARATION_RAW,
};
use crate::constants::quality::{
    HUMIDITY_SIGNIFICANT_CHANGE_PCT, LIGHT_SIGNIFICANT_CHANGE_LUX, SOIL_SIGNIFICANT_CHANGE_PCT,
    TEMP_SIGNIFICANT_CHANGE_C,
};
use crate::constants::sensors::{
    ADC_U16_MAX, ADC_U16_MIN, BH1750_LUX_MAX, BH1750_LUX_MIN, BH1750_RAW_MAX, DHT22_TEMP_MAX_C,
    DHT22_TEMP_MIN_C, HUMIDITY_MAX_PCT, HUMIDITY_MIN_PCT, SOIL_MOISTURE_MAX_PCT,
    SOIL_MOISTURE_MIN_PCT,
};
use crate::constants::time::{
    BH1750_MEASUREMENT_TIME_MS, DHT22_MIN_READ_INTERVAL_MS, HW080_SAMPLE_INTERVAL_MS,
};
use crate::errors::{CalibrationError, CalibrationResult};
use crate::evaluator::BandTable;

/// Validated per-sensor configuration
#[derive(Debug, Clone, PartialEq)]
pub struct SensorProfile {
    /// Human-readable sensor name
    pub name: &'static str,
    /// Reference values and acceptance limits
    pub calibration: CalibrationConfig,
    /// Classification bands for the physical value
    pub bands: BandTable,
    raw_range: (f32, f32),
    physical_range: PhysicalRange,
    offset_bound: f32,
    min_read_interval_ms: u64,
    sample_interval_ms: u32,
    channel: CompensationChannel,
    change_threshold: f32,
}

impl SensorProfile {
    /// Custom profile
    ///
    /// Fails with `InvalidConfig` when the raw range is empty or not
    /// finite, the offset bound is negative, or the change threshold is not
    /// positive.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: &'static str,
        calibration: CalibrationConfig,
        bands: BandTable,
        raw_range: (f32, f32),
        physical_range: PhysicalRange,
        offset_bound: f32,
        min_read_interval_ms: u64,
        sample_interval_ms: u32,
        channel: CompensationChannel,
        change_threshold: f32,
    ) -> CalibrationResult<Self> {
        let (raw_min, raw_max) = raw_range;
        if !raw_min.is_finite() || !raw_max.is_finite() || raw_min >= raw_max {
            return Err(CalibrationError::InvalidConfig {
                reason: "raw range must be finite and non-empty",
            });
        }
        if !offset_bound.is_finite() || offset_bound < 0.0 {
            return Err(CalibrationError::InvalidConfig {
                reason: "offset bound must be finite and non-negative",
            });
        }
        if !(change_threshold > 0.0) {
            return Err(CalibrationError::InvalidConfig {
                reason: "change threshold must be positive",
            });
        }

        Ok(Self {
            name,
            calibration,
            bands,
            raw_range,
            physical_range,
            offset_bound,
            min_read_interval_ms,
            sample_interval_ms,
            channel,
            change_threshold,
        })
    }

    /// HW-080 capacitive soil moisture sensor on a 16-bit ADC
    ///
    /// Low reference is the sensor in open air (0%), high reference is the
    /// sensor in saturated soil (100%).
    pub fn hw080_soil_moisture() -> Self {
        Self {
            name: "HW-080",
            calibration: CalibrationConfig::preset(
                CalibrationDirection::RawDecreasing,
                SOIL_MOISTURE_MIN_PCT,
                SOIL_MOISTURE_MAX_PCT,
                HW080_MIN_SEPARATION_RAW,
                DEFAULT_MAX_RELATIVE_STDDEV,
            ),
            bands: BandTable::soil_moisture(),
            raw_range: (ADC_U16_MIN, ADC_U16_MAX),
            physical_range: PhysicalRange::preset(SOIL_MOISTURE_MIN_PCT, SOIL_MOISTURE_MAX_PCT),
            offset_bound: DEFAULT_OFFSET_BOUND,
            min_read_interval_ms: HW080_SAMPLE_INTERVAL_MS,
            sample_interval_ms: HW080_SAMPLE_INTERVAL_MS as u32,
            channel: CompensationChannel::Primary,
            change_threshold: SOIL_SIGNIFICANT_CHANGE_PCT,
        }
    }

    /// DHT22 relative humidity, calibrated against two saturated salts
    pub fn dht22_humidity() -> Self {
        Self {
            name: "DHT22 humidity",
            calibration: CalibrationConfig::preset(
                CalibrationDirection::RawIncreasing,
                DHT22_HUMIDITY_LOW_REFERENCE_PCT,
                DHT22_HUMIDITY_HIGH_REFERENCE_PCT,
                DHT22_HUMIDITY_MIN_SEPARATION_PCT,
                DEFAULT_MAX_RELATIVE_STDDEV,
            ),
            bands: BandTable::air_humidity(),
            raw_range: (HUMIDITY_MIN_PCT, HUMIDITY_MAX_PCT),
            physical_range: PhysicalRange::preset(HUMIDITY_MIN_PCT, HUMIDITY_MAX_PCT),
            offset_bound: DEFAULT_OFFSET_BOUND,
            min_read_interval_ms: DHT22_MIN_READ_INTERVAL_MS,
            sample_interval_ms: DHT22_MIN_READ_INTERVAL_MS as u32,
            channel: CompensationChannel::Secondary,
            change_threshold: HUMIDITY_SIGNIFICANT_CHANGE_PCT,
        }
    }

    /// DHT22 temperature, calibrated against a trusted thermometer
    pub fn dht22_temperature() -> Self {
        Self {
            name: "DHT22 temperature",
            calibration: CalibrationConfig::preset(
                CalibrationDirection::RawIncreasing,
                DHT22_TEMP_LOW_REFERENCE_C,
                DHT22_TEMP_HIGH_REFERENCE_C,
                DHT22_TEMP_MIN_SEPARATION_C,
                DEFAULT_MAX_RELATIVE_STDDEV,
            ),
            bands: BandTable::air_temperature(),
            raw_range: (DHT22_TEMP_MIN_C, DHT22_TEMP_MAX_C),
            physical_range: PhysicalRange::preset(DHT22_TEMP_MIN_C, DHT22_TEMP_MAX_C),
            offset_bound: DEFAULT_OFFSET_BOUND,
            min_read_interval_ms: DHT22_MIN_READ_INTERVAL_MS,
            sample_interval_ms: DHT22_MIN_READ_INTERVAL_MS as u32,
            channel: CompensationChannel::Primary,
            change_threshold: TEMP_SIGNIFICANT_CHANGE_C,
        }
    }

    /// BH1750 ambient light in high-resolution mode
    ///
    /// Whether counts rise or fall with illuminance depends on how the
    /// board hands the counts over, so the direction is the caller's.
    pub fn bh1750_light(direction: CalibrationDirection) -> Self {
        Self {
            name: "BH1750",
            calibration: CalibrationConfig::preset(
                direction,
                BH1750_LOW_REFERENCE_LUX,
                BH1750_HIGH_REFERENCE_LUX,
                BH1750_MIN_SEPARATION_RAW,
                DEFAULT_MAX_RELATIVE_STDDEV,
            ),
            bands: BandTable::light(),
            raw_range: (0.0, BH1750_RAW_MAX),
            physical_range: PhysicalRange::preset(BH1750_LUX_MIN, BH1750_LUX_MAX),
            offset_bound: DEFAULT_OFFSET_BOUND,
            min_read_interval_ms: BH1750_MEASUREMENT_TIME_MS,
            sample_interval_ms: BH1750_MEASUREMENT_TIME_MS as u32,
            channel: CompensationChannel::Primary,
            change_threshold: LIGHT_SIGNIFICANT_CHANGE_LUX,
        }
    }

    /// Inclusive range of believable raw values
    pub fn raw_range(&self) -> (f32, f32) {
        self.raw_range
    }

    /// Range the compensated output is clamped to
    pub fn physical_range(&self) -> PhysicalRange {
        self.physical_range
    }

    /// Largest accepted absolute compensation offset
    pub fn offset_bound(&self) -> f32 {
        self.offset_bound
    }

    /// Minimum spacing between runtime reads
    pub fn min_read_interval_ms(&self) -> u64 {
        self.min_read_interval_ms
    }

    /// Spacing between reads while collecting a calibration batch
    pub fn sample_interval_ms(&self) -> u32 {
        self.sample_interval_ms
    }

    /// Which compensation offset this sensor takes
    pub fn channel(&self) -> CompensationChannel {
        self.channel
    }

    /// Change between consecutive readings worth reporting
    pub fn change_threshold(&self) -> f32 {
        self.change_threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_are_consistent() {
        let profiles = [
            SensorProfile::hw080_soil_moisture(),
            SensorProfile::dht22_humidity(),
            SensorProfile::dht22_temperature(),
            SensorProfile::bh1750_light(CalibrationDirection::RawIncreasing),
        ];

        for p in &profiles {
            // Preset calibration values must survive the validating constructor
            let c = &p.calibration;
            assert!(CalibrationConfig::new(
                c.direction(),
                c.low_physical(),
                c.high_physical(),
                c.min_separation(),
                c.max_relative_stddev(),
            )
            .is_ok());

            let range = p.physical_range();
            assert!(PhysicalRange::new(range.min(), range.max()).is_ok());
            assert!(p.raw_range().0 < p.raw_range().1);
            assert!(p.min_read_interval_ms() > 0);
        }
    }

    #[test]
    fn read_intervals() {
        assert_eq!(SensorProfile::dht22_humidity().min_read_interval_ms(), 2000);
        assert_eq!(SensorProfile::hw080_soil_moisture().min_read_interval_ms(), 300);
        assert_eq!(
            SensorProfile::bh1750_light(CalibrationDirection::RawIncreasing).min_read_interval_ms(),
            180
        );
    }

    #[test]
    fn dht22_channels() {
        assert_eq!(SensorProfile::dht22_temperature().channel(), CompensationChannel::Primary);
        assert_eq!(SensorProfile::dht22_humidity().channel(), CompensationChannel::Secondary);
    }

    #[test]
    fn bh1750_direction_is_configurable() {
        let p = SensorProfile::bh1750_light(CalibrationDirection::RawDecreasing);
        assert_eq!(p.calibration.direction(), CalibrationDirection::RawDecreasing);
    }

    #[test]
    fn custom_profile_validation() {
        let base = SensorProfile::hw080_soil_moisture();
        let build = |raw_range: (f32, f32), bound: f32, threshold: f32| {
            SensorProfile::new(
                "custom",
                base.calibration,
                base.bands.clone(),
                raw_range,
                base.physical_range(),
                bound,
                1000,
                100,
                CompensationChannel::Primary,
                threshold,
            )
        };

        assert!(build((0.0, 4095.0), 5.0, 10.0).is_ok());
        assert!(build((4095.0, 0.0), 5.0, 10.0).is_err());
        assert!(build((0.0, 4095.0), -1.0, 10.0).is_err());
        assert!(build((0.0, 4095.0), 5.0, 0.0).is_err());
    }
}

//! Environmental Evaluator
//!
//! ## Overview
//!
//! Turns a calibrated, compensated physical value into a named garden
//! condition and a plain-language recommendation. A `BandTable` holds
//! ascending upper thresholds; each band covers `[previous, threshold)`.
//! The first band is open below and everything at or above the last
//! threshold falls into the ceiling category.
//!
//! ```text
//! Soil moisture (%)
//!
//!   very dry │  dry  │ moderate │ moist │ very moist │ saturated
//! ───────────┼───────┼──────────┼───────┼────────────┼──────────
//!           20      40         60      80          100
//! ```
//!
//! Classification never fails. A NaN reading is reported in the lowest
//! band with a warning so the runtime loop keeps going.
//!
//! ## Submodules
//!
//! - `psychrometrics`: dew point and heat index for the DHT22 pair
//! - `conditions`: combined temperature/humidity rating for plants
//! - `irrigation`: watering decisions from soil moisture and light
//! - `light`: footcandles, irradiance and photosynthetic efficiency
//! - `greenhouse`: climate control actions for a DHT22 reading

pub mod conditions;
pub mod greenhouse;
pub mod irrigation;
pub mod light;
pub mod psychrometrics;

use heapless::Vec;

use crate::constants::MAX_BANDS;
use crate::errors::{CalibrationError, CalibrationResult};

pub use conditions::{plant_conditions, OverallRating, PlantConditions};
pub use greenhouse::{greenhouse_actions, GreenhouseAction};
pub use irrigation::{
    irrigation_decision, light_watering_advice, IrrigationDecision, IrrigationReason,
    LightWateringAdvice, WateringFrequency, WateringTime,
};
pub use light::{light_metrics, photosynthetic_efficiency, LightMetrics, PhotosyntheticActivity};
pub use psychrometrics::{dew_point, heat_index};

/// Soil moisture condition (HW-080)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SoilMoisture {
    /// Below 20%
    VeryDry,
    /// 20% to 40%
    Dry,
    /// 40% to 60%
    Moderate,
    /// 60% to 80%
    Moist,
    /// 80% to 100%
    VeryMoist,
    /// 100% and above
    Saturated,
}

/// Relative air humidity condition (DHT22)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AirHumidity {
    /// Below 30%
    VeryDry,
    /// 30% to 40%
    Dry,
    /// 40% to 60%
    Optimal,
    /// 60% to 70%
    Humid,
    /// 70% to 85%
    VeryHumid,
    /// 85% and above
    Saturated,
}

/// Air temperature condition (DHT22)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AirTemperature {
    /// Below 5 °C
    VeryCold,
    /// 5 °C to 15 °C
    Cold,
    /// 15 °C to 25 °C
    Optimal,
    /// 25 °C to 30 °C
    Warm,
    /// 30 °C to 35 °C
    Hot,
    /// 35 °C and above
    VeryHot,
}

/// Illuminance condition (BH1750)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LightLevel {
    /// Below 10 lx
    VeryDark,
    /// 10 lx to 100 lx
    Dark,
    /// 100 lx to 500 lx
    Indoor,
    /// 500 lx to 1000 lx
    BrightIndoor,
    /// 1000 lx to 5000 lx
    Overcast,
    /// 5000 lx to 25000 lx
    Sunny,
    /// 25000 lx and above
    VeryBright,
}

/// Named condition a physical value falls into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Category {
    /// Soil moisture band
    Soil(SoilMoisture),
    /// Air humidity band
    Humidity(AirHumidity),
    /// Air temperature band
    Temperature(AirTemperature),
    /// Light band
    Light(LightLevel),
}

impl Category {
    /// Short display name
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Soil(level) => match level {
                SoilMoisture::VeryDry => "very dry",
                SoilMoisture::Dry => "dry",
                SoilMoisture::Moderate => "moderate",
                SoilMoisture::Moist => "moist",
                SoilMoisture::VeryMoist => "very moist",
                SoilMoisture::Saturated => "saturated",
            },
            Self::Humidity(level) => match level {
                AirHumidity::VeryDry => "very dry air",
                AirHumidity::Dry => "dry air",
                AirHumidity::Optimal => "optimal humidity",
                AirHumidity::Humid => "humid",
                AirHumidity::VeryHumid => "very humid",
                AirHumidity::Saturated => "saturated air",
            },
            Self::Temperature(level) => match level {
                AirTemperature::VeryCold => "very cold",
                AirTemperature::Cold => "cold",
                AirTemperature::Optimal => "optimal temperature",
                AirTemperature::Warm => "warm",
                AirTemperature::Hot => "hot",
                AirTemperature::VeryHot => "very hot",
            },
            Self::Light(level) => match level {
                LightLevel::VeryDark => "very dark",
                LightLevel::Dark => "dark",
                LightLevel::Indoor => "indoor light",
                LightLevel::BrightIndoor => "bright indoor",
                LightLevel::Overcast => "overcast",
                LightLevel::Sunny => "sunny",
                LightLevel::VeryBright => "full sun",
            },
        }
    }

    /// What the gardener should do about it
    pub const fn recommendation(&self) -> &'static str {
        match self {
            Self::Soil(level) => match level {
                SoilMoisture::VeryDry => "Water now",
                SoilMoisture::Dry => "Water soon",
                SoilMoisture::Moderate => "Check again tomorrow",
                SoilMoisture::Moist => "No watering needed",
                SoilMoisture::VeryMoist => "Skip the next watering",
                SoilMoisture::Saturated => "Let the soil drain",
            },
            Self::Humidity(level) => match level {
                AirHumidity::VeryDry => "Mist foliage or add a humidifier",
                AirHumidity::Dry => "Watch plants for dehydration",
                AirHumidity::Optimal => "No action needed",
                AirHumidity::Humid => "Keep air moving",
                AirHumidity::VeryHumid => "Improve ventilation to prevent fungus",
                AirHumidity::Saturated => "Ventilate now and check for fungus",
            },
            Self::Temperature(level) => match level {
                AirTemperature::VeryCold => "Protect plants from frost or add heating",
                AirTemperature::Cold => "Cover sensitive plants",
                AirTemperature::Optimal => "No action needed",
                AirTemperature::Warm => "Water in the early morning",
                AirTemperature::Hot => "Shade plants during the hottest hours",
                AirTemperature::VeryHot => "Shade now and water frequently",
            },
            Self::Light(level) => match level {
                LightLevel::VeryDark => "Add grow lights",
                LightLevel::Dark => "Only shade plants will cope, add grow lights",
                LightLevel::Indoor => "Suitable for low-light houseplants",
                LightLevel::BrightIndoor => "Suitable for seedlings and herbs",
                LightLevel::Overcast => "Good for leafy greens",
                LightLevel::Sunny => "Good for fruiting vegetables",
                LightLevel::VeryBright => "Shade delicate plants at midday",
            },
        }
    }
}

/// One band: values below `upper` (and at or above the previous band's
/// upper) fall into `category`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    /// Exclusive upper threshold
    pub upper: f32,
    /// Category for values in this band
    pub category: Category,
}

/// Ascending thresholds plus a ceiling category
#[derive(Debug, Clone, PartialEq)]
pub struct BandTable {
    bands: Vec<Band, MAX_BANDS>,
    ceiling: Category,
}

/// HW-080 soil moisture bands (%)
pub const SOIL_MOISTURE_BANDS: [(f32, Category); 5] = [
    (20.0, Category::Soil(SoilMoisture::VeryDry)),
    (40.0, Category::Soil(SoilMoisture::Dry)),
    (60.0, Category::Soil(SoilMoisture::Moderate)),
    (80.0, Category::Soil(SoilMoisture::Moist)),
    (100.0, Category::Soil(SoilMoisture::VeryMoist)),
];

/// DHT22 relative humidity thresholds (%), below the ceiling `Saturated`
pub const AIR_HUMIDITY_LEVELS: [(f32, AirHumidity); 5] = [
    (30.0, AirHumidity::VeryDry),
    (40.0, AirHumidity::Dry),
    (60.0, AirHumidity::Optimal),
    (70.0, AirHumidity::Humid),
    (85.0, AirHumidity::VeryHumid),
];

/// DHT22 temperature thresholds (°C), below the ceiling `VeryHot`
pub const AIR_TEMPERATURE_LEVELS: [(f32, AirTemperature); 5] = [
    (5.0, AirTemperature::VeryCold),
    (15.0, AirTemperature::Cold),
    (25.0, AirTemperature::Optimal),
    (30.0, AirTemperature::Warm),
    (35.0, AirTemperature::Hot),
];

/// DHT22 relative humidity bands (%)
pub const AIR_HUMIDITY_BANDS: [(f32, Category); 5] = humidity_bands(AIR_HUMIDITY_LEVELS);

/// DHT22 temperature bands (°C)
pub const AIR_TEMPERATURE_BANDS: [(f32, Category); 5] = temperature_bands(AIR_TEMPERATURE_LEVELS);

const fn humidity_bands(levels: [(f32, AirHumidity); 5]) -> [(f32, Category); 5] {
    let mut bands = [(0.0, Category::Humidity(AirHumidity::VeryDry)); 5];
    let mut i = 0;
    while i < levels.len() {
        bands[i] = (levels[i].0, Category::Humidity(levels[i].1));
        i += 1;
    }
    bands
}

const fn temperature_bands(levels: [(f32, AirTemperature); 5]) -> [(f32, Category); 5] {
    let mut bands = [(0.0, Category::Temperature(AirTemperature::VeryCold)); 5];
    let mut i = 0;
    while i < levels.len() {
        bands[i] = (levels[i].0, Category::Temperature(levels[i].1));
        i += 1;
    }
    bands
}

// Closed-open lookup shared by the band table and the typed lookups
fn band_for<T: Copy>(mut bands: impl Iterator<Item = (f32, T)>, ceiling: T, value: f32) -> T {
    if value.is_nan() {
        log_warn!("Classifying NaN reading as lowest band");
        return bands.next().map_or(ceiling, |(_, band)| band);
    }

    bands
        .find(|&(upper, _)| value < upper)
        .map_or(ceiling, |(_, band)| band)
}

impl AirTemperature {
    /// Band for a temperature in °C, using the preset thresholds
    pub fn from_celsius(temp_c: f32) -> Self {
        band_for(AIR_TEMPERATURE_LEVELS.iter().copied(), Self::VeryHot, temp_c)
    }
}

impl AirHumidity {
    /// Band for a relative humidity in %, using the preset thresholds
    pub fn from_percent(rh_percent: f32) -> Self {
        band_for(AIR_HUMIDITY_LEVELS.iter().copied(), Self::Saturated, rh_percent)
    }
}

/// BH1750 illuminance bands (lx)
pub const LIGHT_BANDS: [(f32, Category); 6] = [
    (10.0, Category::Light(LightLevel::VeryDark)),
    (100.0, Category::Light(LightLevel::Dark)),
    (500.0, Category::Light(LightLevel::Indoor)),
    (1000.0, Category::Light(LightLevel::BrightIndoor)),
    (5000.0, Category::Light(LightLevel::Overcast)),
    (25000.0, Category::Light(LightLevel::Sunny)),
];

impl BandTable {
    /// Validated table
    ///
    /// Thresholds must be finite and strictly ascending, with between one
    /// and `MAX_BANDS` entries.
    pub fn new(bands: &[(f32, Category)], ceiling: Category) -> CalibrationResult<Self> {
        if bands.is_empty() {
            return Err(CalibrationError::InvalidConfig { reason: "band table needs at least one band" });
        }
        if bands.len() > MAX_BANDS {
            return Err(CalibrationError::InvalidConfig { reason: "too many bands" });
        }

        let mut previous = f32::NEG_INFINITY;
        for &(upper, _) in bands {
            if !upper.is_finite() {
                return Err(CalibrationError::InvalidConfig { reason: "band thresholds must be finite" });
            }
            if upper <= previous {
                return Err(CalibrationError::InvalidConfig {
                    reason: "band thresholds must be strictly ascending",
                });
            }
            previous = upper;
        }

        Ok(Self::from_checked(bands, ceiling))
    }

    /// Soil moisture preset
    pub fn soil_moisture() -> Self {
        Self::from_checked(&SOIL_MOISTURE_BANDS, Category::Soil(SoilMoisture::Saturated))
    }

    /// Air humidity preset
    pub fn air_humidity() -> Self {
        Self::from_checked(&AIR_HUMIDITY_BANDS, Category::Humidity(AirHumidity::Saturated))
    }

    /// Air temperature preset
    pub fn air_temperature() -> Self {
        Self::from_checked(&AIR_TEMPERATURE_BANDS, Category::Temperature(AirTemperature::VeryHot))
    }

    /// Light preset
    pub fn light() -> Self {
        Self::from_checked(&LIGHT_BANDS, Category::Light(LightLevel::VeryBright))
    }

    fn from_checked(bands: &[(f32, Category)], ceiling: Category) -> Self {
        let mut table = Vec::new();
        for &(upper, category) in bands.iter().take(MAX_BANDS) {
            // Length bounded by take()
            let _ = table.push(Band { upper, category });
        }
        Self { bands: table, ceiling }
    }

    /// Bands in ascending order
    pub fn bands(&self) -> &[Band] {
        &self.bands
    }

    /// Category for values at or above the last threshold
    pub fn ceiling(&self) -> Category {
        self.ceiling
    }

    /// Category for a value
    pub fn category_for(&self, value: f32) -> Category {
        band_for(self.bands.iter().map(|b| (b.upper, b.category)), self.ceiling, value)
    }

    /// Classify a value with its recommendation
    pub fn classify(&self, value: f32) -> ClassifiedReading {
        let category = self.category_for(value);
        ClassifiedReading {
            physical_value: value,
            category,
            recommendation: category.recommendation(),
        }
    }
}

/// Physical value with its condition and advice
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ClassifiedReading {
    /// Calibrated, compensated value
    pub physical_value: f32,
    /// Condition band
    pub category: Category,
    /// Advice for the category
    pub recommendation: &'static str,
}

/// Classify `value` against `bands`
#[inline]
pub fn classify(value: f32, bands: &BandTable) -> ClassifiedReading {
    bands.classify(value)
}

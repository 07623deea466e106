//! Irrigation advice
//!
//! Two independent inputs feed watering decisions:
//!
//! - **Soil moisture** decides *whether* to water now
//! - **Illuminance** decides *how often* and *when* in the day
//!
//! ```text
//! Soil moisture (%)      water?  confidence
//!   < 20   critical       yes        95
//!   < threshold low       yes        80
//!   < 90   adequate       no         85
//!   ≥ 90   saturated      no         95
//! ```
//!
//! The saturation check runs before the threshold, so a threshold above
//! 90% never waters saturated soil.

use crate::constants::garden::{
    SOIL_CRITICAL_PCT, SOIL_SATURATION_PCT, WATERING_HIGH_LIGHT_LUX, WATERING_LOW_LIGHT_LUX,
    WATERING_NORMAL_LIGHT_LUX, WATERING_SHADE_LUX,
};

/// Why a watering decision came out the way it did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IrrigationReason {
    /// Reading unusable, nothing decided
    SensorFault,
    /// Soil is saturated; wait for it to drain
    Saturated,
    /// Moisture at or above the threshold
    Adequate,
    /// Moisture below the threshold
    Low,
    /// Moisture critically low; water urgently
    Critical,
}

/// Result of [`irrigation_decision`]
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct IrrigationDecision {
    /// Whether to water now
    pub should_irrigate: bool,
    /// Band that drove the decision
    pub reason: IrrigationReason,
    /// Confidence in percent (0 on a sensor fault)
    pub confidence_pct: u8,
    /// Moisture that was evaluated (%)
    pub moisture_pct: f32,
    /// Threshold it was compared with (%)
    pub threshold_pct: f32,
}

/// Decide whether to water from a compensated soil moisture reading
///
/// `threshold_pct` is usually `IRRIGATION_DEFAULT_THRESHOLD_PCT` (40%).
pub fn irrigation_decision(moisture_pct: f32, threshold_pct: f32) -> IrrigationDecision {
    let (should_irrigate, reason, confidence_pct) = if moisture_pct.is_nan() {
        log_warn!("No irrigation decision for NaN moisture");
        (false, IrrigationReason::SensorFault, 0)
    } else if moisture_pct >= SOIL_SATURATION_PCT {
        (false, IrrigationReason::Saturated, 95)
    } else if moisture_pct >= threshold_pct {
        (false, IrrigationReason::Adequate, 85)
    } else if moisture_pct >= SOIL_CRITICAL_PCT {
        (true, IrrigationReason::Low, 80)
    } else {
        (true, IrrigationReason::Critical, 95)
    };

    IrrigationDecision {
        should_irrigate,
        reason,
        confidence_pct,
        moisture_pct,
        threshold_pct,
    }
}

/// How watering frequency should follow the light level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WateringFrequency {
    /// Little evaporation; water less often
    Reduce,
    /// Follow soil moisture
    Normal,
    /// Water more often on sunny days
    IncreaseIfSunny,
    /// High evaporation; water more often
    Increase,
}

/// Best time of day to water
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WateringTime {
    /// No preference
    AnyTime,
    /// Early morning or late afternoon
    MorningOrLateAfternoon,
    /// Early morning
    EarlyMorning,
    /// Very early morning or at dusk
    VeryEarlyOrDusk,
}

/// Watering advice derived from ambient light
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct LightWateringAdvice {
    /// Frequency adjustment
    pub frequency: WateringFrequency,
    /// Preferred time of day
    pub timing: WateringTime,
    /// Light is strong enough to consider temporary shade
    pub consider_shade: bool,
}

/// Watering advice for an illuminance in lux
///
/// NaN is treated as darkness.
pub fn light_watering_advice(lux: f32) -> LightWateringAdvice {
    let (frequency, timing) = if lux.is_nan() || lux < WATERING_LOW_LIGHT_LUX {
        (WateringFrequency::Reduce, WateringTime::AnyTime)
    } else if lux < WATERING_NORMAL_LIGHT_LUX {
        (WateringFrequency::Normal, WateringTime::MorningOrLateAfternoon)
    } else if lux < WATERING_HIGH_LIGHT_LUX {
        (WateringFrequency::IncreaseIfSunny, WateringTime::EarlyMorning)
    } else {
        (WateringFrequency::Increase, WateringTime::VeryEarlyOrDusk)
    };

    LightWateringAdvice {
        frequency,
        timing,
        consider_shade: lux > WATERING_SHADE_LUX,
    }
}

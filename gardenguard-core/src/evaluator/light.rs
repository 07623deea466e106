//! Light metrics for the BH1750
//!
//! Converts illuminance to footcandles and an approximate sunlight
//! irradiance, and estimates how much of the light plants can put to use.
//!
//! ```text
//! efficiency (%)
//!  95 ┤                          ┌──────
//!  80 ┤                 ┌────────┘
//!  20 ┤        ┌────────┘
//!   0 ┼────────┘
//!     0      1k                30k      50k  lux
//! ```
//!
//! Each segment is linear; the curve saturates at 95%.

use crate::constants::garden::{FOOTCANDLES_PER_LUX, WATTS_PER_M2_PER_LUX};

/// Photosynthetic activity implied by an efficiency estimate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PhotosyntheticActivity {
    /// Below 10%
    Inactive,
    /// 10% to 30%
    Low,
    /// 30% to 60%
    Moderate,
    /// 60% to 80%
    High,
    /// 80% and above
    Optimal,
}

impl PhotosyntheticActivity {
    /// Activity band for an efficiency in percent
    pub fn from_efficiency(efficiency_pct: f32) -> Self {
        if efficiency_pct < 10.0 {
            Self::Inactive
        } else if efficiency_pct < 30.0 {
            Self::Low
        } else if efficiency_pct < 60.0 {
            Self::Moderate
        } else if efficiency_pct < 80.0 {
            Self::High
        } else {
            Self::Optimal
        }
    }
}

/// Derived light quantities
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct LightMetrics {
    /// Illuminance the metrics were derived from (lx)
    pub lux: f32,
    /// Illuminance in footcandles
    pub footcandles: f32,
    /// Approximate irradiance for sunlight (W/m²)
    pub watts_per_m2: f32,
    /// Estimated photosynthetic efficiency (0 to 95%)
    pub efficiency_pct: f32,
    /// Activity band for the efficiency
    pub activity: PhotosyntheticActivity,
}

/// Estimated photosynthetic efficiency in percent
///
/// Zero for darkness, negative or NaN input.
pub fn photosynthetic_efficiency(lux: f32) -> f32 {
    if lux.is_nan() || lux <= 0.0 {
        0.0
    } else if lux < 1000.0 {
        (lux / 1000.0) * 20.0
    } else if lux < 30000.0 {
        20.0 + ((lux - 1000.0) / 29000.0) * 60.0
    } else {
        (80.0 + ((lux - 30000.0) / 20000.0) * 15.0).min(95.0)
    }
}

/// Derive all light metrics from an illuminance in lux
pub fn light_metrics(lux: f32) -> LightMetrics {
    let efficiency_pct = photosynthetic_efficiency(lux);

    LightMetrics {
        lux,
        footcandles: lux * FOOTCANDLES_PER_LUX,
        watts_per_m2: lux * WATTS_PER_M2_PER_LUX,
        efficiency_pct,
        activity: PhotosyntheticActivity::from_efficiency(efficiency_pct),
    }
}

//! Dew point and heat index
//!
//! ```text
//! alpha     = a*T / (b + T) + ln(RH / 100)
//! dew_point = b*alpha / (a - alpha)          (Magnus, a = 17.27, b = 237.7)
//! ```
//!
//! The heat index uses the NWS Rothfusz regression in Fahrenheit and is
//! only meaningful from 80 °F (26.7 °C) up. Below that it is the air
//! temperature itself.

const MAGNUS_A: f32 = 17.27;
const MAGNUS_B_C: f32 = 237.7;

const HEAT_INDEX_MIN_F: f32 = 80.0;

/// Magnus dew point in °C; `None` for non-positive humidity
pub fn dew_point(temp_c: f32, rh_percent: f32) -> Option<f32> {
    if !(rh_percent > 0.0) || !temp_c.is_finite() {
        return None;
    }

    let alpha = (MAGNUS_A * temp_c) / (MAGNUS_B_C + temp_c) + libm::logf(rh_percent / 100.0);
    let dew_point = (MAGNUS_B_C * alpha) / (MAGNUS_A - alpha);

    dew_point.is_finite().then_some(dew_point)
}

/// Apparent temperature in °C
pub fn heat_index(temp_c: f32, rh_percent: f32) -> f32 {
    let t = temp_c * 9.0 / 5.0 + 32.0;
    if !(t >= HEAT_INDEX_MIN_F) {
        return temp_c;
    }

    let rh = rh_percent;
    let hi_f = -42.379 + 2.049_015_2 * t + 10.143_331 * rh
        - 0.224_755_41 * t * rh
        - 0.006_837_83 * t * t
        - 0.054_817_17 * rh * rh
        + 0.001_228_74 * t * t * rh
        + 0.000_852_82 * t * rh * rh
        - 0.000_001_99 * t * t * rh * rh;

    (hi_f - 32.0) * 5.0 / 9.0
}

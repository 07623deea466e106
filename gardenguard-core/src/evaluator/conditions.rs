//! Combined plant-condition rating from temperature and humidity
//!
//! Each band scores from 1 (harmful) to 5 (ideal). The two scores are
//! averaged into an overall rating.

use super::{AirHumidity, AirTemperature};

/// Overall growing conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OverallRating {
    /// Average score of at least 4.5
    Excellent,
    /// At least 3.5
    Good,
    /// At least 2.5
    Fair,
    /// Below 2.5
    Poor,
}

/// Temperature and humidity bands with their combined rating
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PlantConditions {
    /// Temperature band
    pub temperature: AirTemperature,
    /// Humidity band
    pub humidity: AirHumidity,
    /// Average of both band scores
    pub score: f32,
    /// Rating derived from the score
    pub rating: OverallRating,
}

fn temperature_score(band: AirTemperature) -> u8 {
    match band {
        AirTemperature::VeryCold => 1,
        AirTemperature::Cold => 2,
        AirTemperature::Optimal => 5,
        AirTemperature::Warm => 4,
        AirTemperature::Hot => 3,
        AirTemperature::VeryHot => 1,
    }
}

fn humidity_score(band: AirHumidity) -> u8 {
    match band {
        AirHumidity::VeryDry => 2,
        AirHumidity::Dry => 3,
        AirHumidity::Optimal => 5,
        AirHumidity::Humid => 4,
        AirHumidity::VeryHumid => 3,
        AirHumidity::Saturated => 1,
    }
}

impl OverallRating {
    /// Rating for an average band score
    pub fn from_score(score: f32) -> Self {
        if score >= 4.5 {
            Self::Excellent
        } else if score >= 3.5 {
            Self::Good
        } else if score >= 2.5 {
            Self::Fair
        } else {
            Self::Poor
        }
    }
}

/// Rate a compensated temperature/humidity pair with the preset bands
pub fn plant_conditions(temp_c: f32, rh_percent: f32) -> PlantConditions {
    let temperature = AirTemperature::from_celsius(temp_c);
    let humidity = AirHumidity::from_percent(rh_percent);

    let score = (temperature_score(temperature) + humidity_score(humidity)) as f32 / 2.0;

    PlantConditions {
        temperature,
        humidity,
        score,
        rating: OverallRating::from_score(score),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ideal_greenhouse() {
        let c = plant_conditions(22.0, 50.0);
        assert_eq!(c.temperature, AirTemperature::Optimal);
        assert_eq!(c.humidity, AirHumidity::Optimal);
        assert_eq!(c.score, 5.0);
        assert_eq!(c.rating, OverallRating::Excellent);
    }

    #[test]
    fn warm_and_humid_is_good() {
        let c = plant_conditions(27.0, 65.0);
        assert_eq!(c.score, 4.0);
        assert_eq!(c.rating, OverallRating::Good);
    }

    #[test]
    fn hot_and_saturated_is_poor() {
        let c = plant_conditions(40.0, 95.0);
        assert_eq!(c.score, 1.0);
        assert_eq!(c.rating, OverallRating::Poor);
    }

    #[test]
    fn cold_and_dry_is_fair() {
        // Cold scores 2, dry scores 3
        let c = plant_conditions(10.0, 35.0);
        assert_eq!(c.rating, OverallRating::Fair);
    }
}

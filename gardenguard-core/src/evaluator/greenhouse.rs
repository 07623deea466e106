//! Greenhouse climate actions from a DHT22 reading

use heapless::Vec;

use crate::constants::garden::{
    GREENHOUSE_COLD_C, GREENHOUSE_DRY_PCT, GREENHOUSE_HOT_C, GREENHOUSE_HUMID_PCT,
};

/// Most actions one reading can trigger (two per channel)
pub const MAX_GREENHOUSE_ACTIONS: usize = 4;

/// A climate control action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GreenhouseAction {
    /// Turn ventilation on
    VentilationOn,
    /// Deploy shade screens
    DeployShade,
    /// Turn heating on
    HeatingOn,
    /// Close ventilation
    CloseVentilation,
    /// Raise ventilation to shed moisture
    IncreaseVentilation,
    /// Turn the dehumidifier on
    DehumidifierOn,
    /// Turn misting on
    MistingOn,
    /// Run sprinkler irrigation more often
    IncreaseSprinkling,
}

/// Actions for a compensated temperature/humidity pair
///
/// Temperature actions come first. An empty list means conditions are
/// within range. NaN on a channel triggers nothing for that channel.
pub fn greenhouse_actions(
    temp_c: f32,
    rh_percent: f32,
) -> Vec<GreenhouseAction, MAX_GREENHOUSE_ACTIONS> {
    let mut actions = Vec::new();

    let temperature: &[GreenhouseAction] = if temp_c > GREENHOUSE_HOT_C {
        &[GreenhouseAction::VentilationOn, GreenhouseAction::DeployShade]
    } else if temp_c < GREENHOUSE_COLD_C {
        &[GreenhouseAction::HeatingOn, GreenhouseAction::CloseVentilation]
    } else {
        &[]
    };

    let humidity: &[GreenhouseAction] = if rh_percent > GREENHOUSE_HUMID_PCT {
        &[GreenhouseAction::IncreaseVentilation, GreenhouseAction::DehumidifierOn]
    } else if rh_percent < GREENHOUSE_DRY_PCT {
        &[GreenhouseAction::MistingOn, GreenhouseAction::IncreaseSprinkling]
    } else {
        &[]
    };

    for action in temperature.iter().chain(humidity) {
        // At most two per channel
        actions.push(*action).ok();
    }

    if actions.is_empty() {
        log_debug!("Greenhouse conditions in range");
    }
    actions
}

//! Safe sun-exposure time from UV index and skin type.
//!
//! One UV index unit is 25 mW/m² of erythemally weighted irradiance, so each
//! UVI point delivers 0.025 J/m² per second (1.5 J/m² per minute). Safe time is
//! the minimal erythema dose (MED) for the skin type divided by that rate.

use crate::types::SkinType;

/// Erythemal irradiance per UV index unit, W/m²
pub const IRRADIANCE_PER_UVI: f64 = 0.025;

/// Erythemal dose per UV index unit per minute, J/m²
pub const DOSE_PER_UVI_MINUTE: f64 = IRRADIANCE_PER_UVI * 60.0;

/// Minimal erythema dose in J/m²
pub fn minimal_erythema_dose(skin: SkinType) -> f64 {
    match skin {
        SkinType::I => 200.0,
        SkinType::II => 250.0,
        SkinType::III => 300.0,
        SkinType::IV => 450.0,
        SkinType::V => 600.0,
        SkinType::VI => 1000.0,
    }
}

/// Whole minutes until one MED is reached, rounded down.
///
/// Returns 0 for a non-positive or NaN UV index and for an unknown skin type.
pub fn safe_minutes(uvi: f64, skin: Option<SkinType>) -> u32 {
    let Some(skin) = skin else {
        return 0;
    };
    if uvi.is_nan() || uvi <= 0.0 {
        return 0;
    }

    let dose_rate = uvi * DOSE_PER_UVI_MINUTE;
    let minutes = minimal_erythema_dose(skin) / dose_rate;
    // `as` saturates, so a vanishingly small UVI clamps to u32::MAX
    minutes.floor() as u32
}

/// [`safe_minutes`] for a stored skin type code ("1".."6")
pub fn safe_minutes_for_code(uvi: f64, skin_code: &str) -> u32 {
    safe_minutes(uvi, SkinType::from_code(skin_code))
}

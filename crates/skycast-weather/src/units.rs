//! Conversion from canonical metric values to the display unit.
//!
//! Conversions are pure and unrounded; rounding is a display-layer concern
//! (whole degrees for temperature, one decimal for wind speed).

use crate::types::DisplayUnit;

/// Meters-per-second to miles-per-hour factor.
const MPS_TO_MPH: f64 = 2.237;

/// Convert a canonical °C temperature to the display unit.
pub fn display_temperature(celsius: f64, unit: DisplayUnit) -> f64 {
    match unit {
        DisplayUnit::Celsius => celsius,
        DisplayUnit::Fahrenheit => celsius * 9.0 / 5.0 + 32.0,
    }
}

/// Convert a canonical m/s wind speed to the display unit.
pub fn display_wind_speed(meters_per_second: f64, unit: DisplayUnit) -> f64 {
    match unit {
        DisplayUnit::Celsius => meters_per_second,
        DisplayUnit::Fahrenheit => meters_per_second * MPS_TO_MPH,
    }
}

impl DisplayUnit {
    /// Label shown next to temperatures
    pub fn temperature_label(self) -> &'static str {
        match self {
            DisplayUnit::Celsius => "°C",
            DisplayUnit::Fahrenheit => "°F",
        }
    }

    /// Label shown next to wind speeds
    pub fn wind_label(self) -> &'static str {
        match self {
            DisplayUnit::Celsius => "m/s",
            DisplayUnit::Fahrenheit => "mph",
        }
    }
}

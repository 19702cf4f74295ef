use std::f64::consts::PI;

/// Offset between the Celsius and Kelvin scales.
pub const KELVIN_OFFSET: f64 = 273.15;

/// Degrees to radians. Absent readings stay absent.
pub fn deg_to_rad(degrees: Option<f64>) -> Option<f64> {
    degrees.map(|value| value * PI / 180.0)
}

/// Celsius to Kelvin. Absent readings stay absent.
pub fn celsius_to_kelvin(celsius: Option<f64>) -> Option<f64> {
    celsius.map(|value| value + KELVIN_OFFSET)
}

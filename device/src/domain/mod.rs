pub mod readiness;
pub mod snapshot;
pub mod temperature;
pub mod timestamp;

use core::fmt::{Debug, Formatter};
use temperature::*;

pub use readiness::{ReadinessState, ReadinessTracker, SensorKind};
pub use snapshot::SensorSnapshot;
pub use timestamp::Timestamp;

/// Raw reading of the pressure/temperature sensor.
#[derive(Copy, Clone, PartialEq)]
pub struct PressureAcquisition {
    /// Barometric pressure in hectopascals.
    pub pressure: f32,
    pub temperature: Temperature<Celsius>,
}

impl Debug for PressureAcquisition {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PressureAcquisition")
            .field("pressure", &self.pressure)
            .field("temperature", &self.temperature)
            .finish()
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for PressureAcquisition {
    fn format(&self, f: defmt::Formatter<'_>) {
        defmt::write!(
            f,
            "PressureAcquisition(pressure: {}, temperature: {})",
            &self.pressure,
            &self.temperature
        );
    }
}

/// Raw reading of the humidity/temperature sensor.
#[derive(Copy, Clone, PartialEq)]
pub struct HumidityAcquisition {
    pub temperature: Temperature<Celsius>,
    /// Relative humidity in percent.
    pub relative_humidity: f32,
}

impl Debug for HumidityAcquisition {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HumidityAcquisition")
            .field("temperature", &self.temperature)
            .field("relative_humidity", &self.relative_humidity)
            .finish()
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for HumidityAcquisition {
    fn format(&self, f: defmt::Formatter<'_>) {
        defmt::write!(
            f,
            "HumidityAcquisition(temperature: {}, relative_humidity: {})",
            &self.temperature,
            &self.relative_humidity
        );
    }
}

/// Truncate to one decimal digit: `floor(value * 10) / 10`.
///
/// This is not rounding, `12.37` becomes `12.3`. The result never exceeds
/// `value`. The scaling is done in `f64`, where `value * 10` is exact.
pub fn truncate_tenths(value: f32) -> f32 {
    (libm::floor(value as f64 * 10.0) / 10.0) as f32
}

use super::temperature::{Celsius, Temperature};
use super::{truncate_tenths, HumidityAcquisition, PressureAcquisition, Timestamp};
use core::fmt::{Debug, Formatter};
use serde::Serialize;

/// One timestamped bundle of the merged environmental readings.
///
/// Every value is truncated to one decimal digit when the snapshot is built.
/// The snapshot cannot be changed afterwards.
#[derive(Copy, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorSnapshot {
    pressure: f32,
    temperature_from_pressure: Temperature<Celsius>,
    temperature_from_humidity: Temperature<Celsius>,
    humidity: f32,
    timestamp: Timestamp,
}

impl SensorSnapshot {
    pub fn new(
        pressure: &PressureAcquisition,
        humidity: &HumidityAcquisition,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            pressure: truncate_tenths(pressure.pressure),
            temperature_from_pressure: pressure.temperature.truncated(),
            temperature_from_humidity: humidity.temperature.truncated(),
            humidity: truncate_tenths(humidity.relative_humidity),
            timestamp,
        }
    }

    /// Pressure in hectopascals.
    pub fn pressure(&self) -> f32 {
        self.pressure
    }

    pub fn temperature_from_pressure(&self) -> Temperature<Celsius> {
        self.temperature_from_pressure
    }

    pub fn temperature_from_humidity(&self) -> Temperature<Celsius> {
        self.temperature_from_humidity
    }

    /// Relative humidity in percent.
    pub fn humidity(&self) -> f32 {
        self.humidity
    }

    /// Wall-clock time at which both underlying reads had completed.
    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }
}

impl Debug for SensorSnapshot {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SensorSnapshot")
            .field("pressure", &self.pressure)
            .field("temperature_from_pressure", &self.temperature_from_pressure)
            .field("temperature_from_humidity", &self.temperature_from_humidity)
            .field("humidity", &self.humidity)
            .field("timestamp", &self.timestamp)
            .finish()
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for SensorSnapshot {
    fn format(&self, f: defmt::Formatter<'_>) {
        defmt::write!(
            f,
            "SensorSnapshot(pressure: {}, temperature_from_pressure: {}, \
             temperature_from_humidity: {}, humidity: {}, timestamp: {})",
            &self.pressure,
            &self.temperature_from_pressure,
            &self.temperature_from_humidity,
            &self.humidity,
            &self.timestamp
        );
    }
}

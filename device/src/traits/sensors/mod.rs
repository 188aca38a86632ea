//! The capability the aggregator consumes from each sensor driver.

use crate::domain::{HumidityAcquisition, PressureAcquisition};
use core::future::Future;

/// An asynchronous sensor driver.
///
/// A driver is initialized once during its lifetime. Completing
/// [`initialize`](SensorDriver::initialize) successfully is the driver's
/// one-shot ready signal. Reading before that point is allowed and yields
/// whatever the driver does in that situation, usually an error.
pub trait SensorDriver {
    type Reading;
    type Error;

    /// Bring the hardware up.
    fn initialize(&mut self) -> impl Future<Output = Result<(), Self::Error>>;

    /// Take one fresh reading. Nothing is cached between calls.
    fn read_data(&mut self) -> impl Future<Output = Result<Self::Reading, Self::Error>>;
}

/// A driver producing pressure and temperature.
pub trait PressureSensor: SensorDriver<Reading = PressureAcquisition> {}

impl<T> PressureSensor for T where T: SensorDriver<Reading = PressureAcquisition> {}

/// A driver producing relative humidity and temperature.
pub trait HumiditySensor: SensorDriver<Reading = HumidityAcquisition> {}

impl<T> HumiditySensor for T where T: SensorDriver<Reading = HumidityAcquisition> {}

//! Raspberry Pi Sense HAT: an LPS25H and an HTS221 sharing one I2C bus.

use crate::aggregator::{AggregatorConfig, SensorAggregator};
use crate::bsp::Board;
use crate::clock::{Clock, DefaultClock};
use crate::drivers::sensors::hts221::{Hts221, Hts221Config};
use crate::drivers::sensors::lps25h::{Lps25h, Lps25hConfig};
use embassy_embedded_hal::shared_bus::asynch::i2c::I2cDevice;
use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::mutex::Mutex;
use embedded_hal_async::i2c::I2c;

pub type SenseHatPressure<'a, M, BUS> = Lps25h<I2cDevice<'a, M, BUS>>;
pub type SenseHatHumidity<'a, M, BUS> = Hts221<I2cDevice<'a, M, BUS>>;

pub type SenseHatSensors<'a, M, BUS, C = DefaultClock> =
    SensorAggregator<M, SenseHatPressure<'a, M, BUS>, SenseHatHumidity<'a, M, BUS>, C>;

#[derive(Copy, Clone, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SenseHatConfig {
    pub pressure: Lps25hConfig,
    pub humidity: Hts221Config,
    pub aggregator: AggregatorConfig,
}

pub struct SenseHat<'a, M, BUS, C = DefaultClock>
where
    M: RawMutex + 'static,
    BUS: I2c + 'static,
{
    pub sensors: SenseHatSensors<'a, M, BUS, C>,
}

impl<'a, M, BUS> SenseHat<'a, M, BUS, DefaultClock>
where
    M: RawMutex + 'static,
    BUS: I2c + 'static,
{
    /// Put both sensors on `bus`. Each driver gets its own device handle and
    /// holds the bus only for the duration of a single transaction.
    pub fn with_config(bus: &'a Mutex<M, BUS>, config: SenseHatConfig) -> Self {
        Self::with_clock(bus, config, DefaultClock::default())
    }
}

impl<'a, M, BUS, C> SenseHat<'a, M, BUS, C>
where
    M: RawMutex + 'static,
    BUS: I2c + 'static,
    C: Clock,
{
    /// Like [`with_config`](SenseHat::with_config), stamping snapshots with
    /// `clock`. The Pi itself has no battery-backed RTC; pass a clock that has
    /// been set from the network on bare metal.
    pub fn with_clock(bus: &'a Mutex<M, BUS>, config: SenseHatConfig, clock: C) -> Self {
        let pressure = Lps25h::with_config(I2cDevice::new(bus), config.pressure);
        let humidity = Hts221::with_config(I2cDevice::new(bus), config.humidity);
        Self {
            sensors: SensorAggregator::with_clock(pressure, humidity, config.aggregator, clock),
        }
    }
}

impl<'a, M, BUS> Board for SenseHat<'a, M, BUS, DefaultClock>
where
    M: RawMutex + 'static,
    BUS: I2c + 'static,
{
    type Peripherals = &'a Mutex<M, BUS>;

    fn new(bus: Self::Peripherals) -> Self {
        Self::with_config(bus, SenseHatConfig::default())
    }
}

//! Driver for the ST LPS25H pressure and temperature sensor.

mod register;

use crate::domain::PressureAcquisition;
use crate::traits::i2c::I2cAddress;
use crate::traits::sensors::SensorDriver;
use embedded_hal_async::i2c::*;
use register::ctrl1::Ctrl1;
use register::ctrl2::Ctrl2;
use register::p_out::Pout;
use register::status::Status;
use register::t_out::Tout;
use register::who_am_i::{WhoAmI, DEVICE_ID};

pub use register::ctrl1::OutputDataRate;

/// Address with SA0 low, as wired on the Sense HAT.
pub const ADDR: u8 = 0x5C;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Lps25hError<E> {
    I2c(E),
    /// The device answered with an unexpected WHO_AM_I value.
    UnknownDevice(u8),
    NotInitialized,
}

impl<E> From<E> for Lps25hError<E> {
    fn from(e: E) -> Lps25hError<E> {
        Lps25hError::I2c(e)
    }
}

#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Lps25hConfig {
    pub address: I2cAddress,
    pub output_data_rate: OutputDataRate,
}

impl Default for Lps25hConfig {
    fn default() -> Self {
        Self {
            address: I2cAddress::new(ADDR),
            output_data_rate: OutputDataRate::Hz1,
        }
    }
}

pub struct Lps25h<I> {
    i2c: I,
    config: Lps25hConfig,
    initialized: bool,
}

impl<I: I2c> Lps25h<I> {
    pub fn new(i2c: I) -> Self {
        Self::with_config(i2c, Lps25hConfig::default())
    }

    pub fn with_config(i2c: I, config: Lps25hConfig) -> Self {
        Self {
            i2c,
            config,
            initialized: false,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Release the underlying I2C device
    pub fn release(self) -> I {
        self.i2c
    }

    pub async fn initialize(&mut self) -> Result<(), Lps25hError<I::Error>> {
        let address = self.config.address;
        let i2c = &mut self.i2c;

        let id = WhoAmI::read(address, i2c).await?;
        if id != DEVICE_ID {
            warn!("[lps25h] unexpected WHO_AM_I {:x} at {:x}", id, u8::from(address));
            return Err(Lps25hError::UnknownDevice(id));
        }

        Ctrl2::modify(address, i2c, |reg| {
            reg.boot();
        })
        .await?;

        // BOOT clears itself once the reload is done
        while Ctrl2::read(address, i2c).await?.is_booting() {}

        let odr = self.config.output_data_rate;
        Ctrl1::modify(address, i2c, |reg| {
            reg.power_active().output_data_rate(odr).block_data_update(true);
        })
        .await?;

        loop {
            // Drop samples latched before power up
            let status = Status::read(address, i2c).await?;
            if !status.any_available() {
                break;
            }
            Pout::read(address, i2c).await?;
            Tout::read(address, i2c).await?;
        }

        self.initialized = true;
        debug!("[lps25h] powered up");
        Ok(())
    }

    pub async fn read(&mut self) -> Result<PressureAcquisition, Lps25hError<I::Error>> {
        if !self.initialized {
            return Err(Lps25hError::NotInitialized);
        }

        let p_out = Pout::read(self.config.address, &mut self.i2c).await?;
        let t_out = Tout::read(self.config.address, &mut self.i2c).await?;

        Ok(PressureAcquisition {
            pressure: Pout::to_hpa(p_out),
            temperature: Tout::to_celsius(t_out),
        })
    }
}

impl<I: I2c> SensorDriver for Lps25h<I> {
    type Reading = PressureAcquisition;
    type Error = Lps25hError<I::Error>;

    async fn initialize(&mut self) -> Result<(), Self::Error> {
        Lps25h::initialize(self).await
    }

    async fn read_data(&mut self) -> Result<PressureAcquisition, Self::Error> {
        self.read().await
    }
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;
    use crate::testutil::*;
    use futures::executor::block_on;

    fn bus() -> TestI2c {
        let mut bus = TestI2c::new();
        sense_hat_lps25h(&mut bus, ADDR);
        bus
    }

    #[test]
    fn test_initialize_powers_up() {
        let mut bus = bus();
        let mut sensor = Lps25h::new(&mut bus);
        block_on(sensor.initialize()).unwrap();
        assert!(sensor.is_initialized());
        drop(sensor);

        // the device drops CTRL_REG1 writes until BOOT has cleared
        assert_eq!(0b0000_0000, bus.register(ADDR, 0x21));
        // PD | ODR 1Hz | BDU
        assert_eq!(0b1001_0100, bus.register(ADDR, 0x20));
    }

    #[test]
    fn test_custom_output_data_rate() {
        let mut bus = bus();
        let mut sensor = Lps25h::with_config(
            &mut bus,
            Lps25hConfig {
                output_data_rate: OutputDataRate::Hz25,
                ..Default::default()
            },
        );
        block_on(sensor.initialize()).unwrap();
        drop(sensor);
        assert_eq!(0b1100_0100, bus.register(ADDR, 0x20));
    }

    #[test]
    fn test_read_converts_raw_values() {
        let mut bus = bus();
        let mut sensor = Lps25h::new(&mut bus);
        block_on(sensor.initialize()).unwrap();

        let data = block_on(sensor.read_data()).unwrap();
        assert!((data.pressure - 1013.26).abs() < 0.001);
        assert!((data.temperature.raw_value() - 21.9396).abs() < 0.001);
    }

    #[test]
    fn test_read_before_initialize_fails() {
        let mut bus = bus();
        let mut sensor = Lps25h::new(&mut bus);
        assert_eq!(
            Err(Lps25hError::NotInitialized),
            block_on(sensor.read_data()).map(|_| ())
        );
    }

    #[test]
    fn test_rejects_unknown_device() {
        let mut bus = bus();
        bus.set_register(ADDR, 0x0F, &[0xBC]);
        let mut sensor = Lps25h::new(&mut bus);
        assert_eq!(
            Err(Lps25hError::UnknownDevice(0xBC)),
            block_on(sensor.initialize())
        );
    }
}

//! Driver for the ST HTS221 humidity and temperature sensor.

mod register;

use crate::domain::HumidityAcquisition;
use crate::traits::i2c::I2cAddress;
use crate::traits::sensors::SensorDriver;
use embedded_hal_async::i2c::*;
use register::calibration::*;
use register::ctrl1::{BlockDataUpdate, Ctrl1};
use register::ctrl2::Ctrl2;
use register::h_out::Hout;
use register::status::Status;
use register::t_out::Tout;
use register::who_am_i::{WhoAmI, DEVICE_ID};

pub use register::ctrl1::OutputDataRate;

pub const ADDR: u8 = 0x5F;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Hts221Error<E> {
    I2c(E),
    /// The device answered with an unexpected WHO_AM_I value.
    UnknownDevice(u8),
    NotCalibrated,
}

impl<E> From<E> for Hts221Error<E> {
    fn from(e: E) -> Hts221Error<E> {
        Hts221Error::I2c(e)
    }
}

#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Hts221Config {
    pub address: I2cAddress,
    pub output_data_rate: OutputDataRate,
}

impl Default for Hts221Config {
    fn default() -> Self {
        Self {
            address: I2cAddress::new(ADDR),
            output_data_rate: OutputDataRate::Hz1,
        }
    }
}

pub struct Hts221<I> {
    i2c: I,
    config: Hts221Config,
    calibration: Option<Calibration>,
}

impl<I: I2c> Hts221<I> {
    pub fn new(i2c: I) -> Self {
        Self::with_config(i2c, Hts221Config::default())
    }

    pub fn with_config(i2c: I, config: Hts221Config) -> Self {
        Self {
            i2c,
            config,
            calibration: None,
        }
    }

    pub fn is_calibrated(&self) -> bool {
        self.calibration.is_some()
    }

    /// Release the underlying I2C device
    pub fn release(self) -> I {
        self.i2c
    }

    pub async fn initialize(&mut self) -> Result<(), Hts221Error<I::Error>> {
        let address = self.config.address;
        let i2c = &mut self.i2c;

        let id = WhoAmI::read(address, i2c).await?;
        if id != DEVICE_ID {
            warn!("[hts221] unexpected WHO_AM_I {:x} at {:x}", id, u8::from(address));
            return Err(Hts221Error::UnknownDevice(id));
        }

        Ctrl2::modify(address, i2c, |reg| {
            reg.boot();
        })
        .await?;

        // BOOT clears itself once the reload is done
        while Ctrl2::read(address, i2c).await?.is_booting() {}

        let odr = self.config.output_data_rate;
        Ctrl1::modify(address, i2c, |reg| {
            reg.power_active()
                .output_data_rate(odr)
                .block_data_update(BlockDataUpdate::MsbLsbReading);
        })
        .await?;

        loop {
            // Ensure status is emptied
            let status = Status::read(address, i2c).await?;
            if !status.any_available() {
                break;
            }
            Hout::read(address, i2c).await?;
            Tout::read(address, i2c).await?;
        }

        self.calibration.replace(Calibration::read(address, i2c).await?);
        debug!("[hts221] calibrated");
        Ok(())
    }

    pub async fn read(&mut self) -> Result<HumidityAcquisition, Hts221Error<I::Error>> {
        if let Some(calibration) = &self.calibration {
            let t_out = Tout::read(self.config.address, &mut self.i2c).await?;
            let temperature = calibration.calibrated_temperature(t_out);

            let h_out = Hout::read(self.config.address, &mut self.i2c).await?;
            let relative_humidity = calibration.calibrated_humidity(h_out);

            Ok(HumidityAcquisition {
                temperature,
                relative_humidity,
            })
        } else {
            Err(Hts221Error::NotCalibrated)
        }
    }
}

impl<I: I2c> SensorDriver for Hts221<I> {
    type Reading = HumidityAcquisition;
    type Error = Hts221Error<I::Error>;

    async fn initialize(&mut self) -> Result<(), Self::Error> {
        Hts221::initialize(self).await
    }

    async fn read_data(&mut self) -> Result<HumidityAcquisition, Self::Error> {
        self.read().await
    }
}

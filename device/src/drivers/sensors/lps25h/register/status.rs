use crate::traits::i2c::I2cAddress;
use embedded_hal_async::i2c::*;

const STATUS_REG: u8 = 0x27;

pub struct Status {
    temperature_available: bool,
    pressure_available: bool,
}

impl Status {
    pub async fn read<I: I2c>(address: I2cAddress, i2c: &mut I) -> Result<Status, I::Error> {
        let mut buf = [0; 1];
        i2c.write_read(address.into(), &[STATUS_REG], &mut buf).await?;
        Ok(buf[0].into())
    }

    pub fn any_available(&self) -> bool {
        self.temperature_available || self.pressure_available
    }
}

impl From<u8> for Status {
    fn from(reg: u8) -> Self {
        Status {
            temperature_available: (reg & 0b01) != 0,
            pressure_available: (reg & 0b10) != 0,
        }
    }
}

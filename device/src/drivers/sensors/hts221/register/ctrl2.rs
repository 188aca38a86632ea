use crate::traits::i2c::I2cAddress;
use embedded_hal_async::i2c::*;

const CTRL_REG2: u8 = 0x21;

#[derive(Debug, Copy, Clone)]
pub struct Ctrl2 {
    boot: bool,
    heater: bool,
    one_shot: bool,
}

impl Ctrl2 {
    pub async fn read<I: I2c>(address: I2cAddress, i2c: &mut I) -> Result<Ctrl2, I::Error> {
        let mut buf = [0; 1];
        i2c.write_read(address.into(), &[CTRL_REG2], &mut buf).await?;
        Ok(buf[0].into())
    }

    pub async fn write<I: I2c>(
        address: I2cAddress,
        i2c: &mut I,
        reg: Ctrl2,
    ) -> Result<(), I::Error> {
        i2c.write(address.into(), &[CTRL_REG2, reg.into()]).await
    }

    pub async fn modify<I: I2c, F: FnOnce(&mut Ctrl2)>(
        address: I2cAddress,
        i2c: &mut I,
        modify: F,
    ) -> Result<(), I::Error> {
        let mut reg = Self::read(address, i2c).await?;
        modify(&mut reg);
        Self::write(address, i2c, reg).await
    }

    /// Reload the calibration memory content.
    pub fn boot(&mut self) -> &mut Self {
        self.boot = true;
        self
    }

    /// The reload started by [`boot`](Ctrl2::boot) is still running.
    pub fn is_booting(&self) -> bool {
        self.boot
    }
}

impl From<u8> for Ctrl2 {
    fn from(reg: u8) -> Self {
        Ctrl2 {
            boot: (reg & 0b1000_0000) != 0,
            heater: (reg & 0b0000_0010) != 0,
            one_shot: (reg & 0b0000_0001) != 0,
        }
    }
}

impl From<Ctrl2> for u8 {
    fn from(reg: Ctrl2) -> Self {
        let mut value = 0;
        if reg.boot {
            value |= 0b1000_0000;
        }
        if reg.heater {
            value |= 0b0000_0010;
        }
        if reg.one_shot {
            value |= 0b0000_0001;
        }
        value
    }
}

use crate::traits::i2c::I2cAddress;
use embedded_hal_async::i2c::*;

const CTRL_REG2: u8 = 0x21;

const BOOT: u8 = 0b1000_0000;

#[derive(Debug, Copy, Clone)]
pub struct Ctrl2 {
    value: u8,
}

impl Ctrl2 {
    pub async fn read<I: I2c>(address: I2cAddress, i2c: &mut I) -> Result<Ctrl2, I::Error> {
        let mut buf = [0; 1];
        i2c.write_read(address.into(), &[CTRL_REG2], &mut buf).await?;
        Ok(Ctrl2 { value: buf[0] })
    }

    pub async fn write<I: I2c>(
        address: I2cAddress,
        i2c: &mut I,
        reg: Ctrl2,
    ) -> Result<(), I::Error> {
        i2c.write(address.into(), &[CTRL_REG2, reg.value]).await
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

    /// Reload the trimming parameters from internal memory.
    pub fn boot(&mut self) -> &mut Self {
        self.value |= BOOT;
        self
    }

    pub fn is_booting(&self) -> bool {
        self.value & BOOT != 0
    }
}

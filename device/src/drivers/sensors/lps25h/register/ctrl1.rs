use crate::traits::i2c::I2cAddress;
use embedded_hal_async::i2c::*;

const CTRL_REG1: u8 = 0x20;

const PD: u8 = 0b1000_0000;
const BDU: u8 = 0b0000_0100;
const ODR_MASK: u8 = 0b0111_0000;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OutputDataRate {
    OneShot,
    Hz1,
    Hz7,
    Hz12p5,
    Hz25,
}

#[derive(Debug, Copy, Clone)]
pub struct Ctrl1 {
    active: bool,
    block_data_update: bool,
    output_data_rate: OutputDataRate,
    // DIFF_EN, RESET_AZ and SIM are kept as read
    other: u8,
}

impl Ctrl1 {
    pub async fn read<I: I2c>(address: I2cAddress, i2c: &mut I) -> Result<Ctrl1, I::Error> {
        let mut buf = [0; 1];
        i2c.write_read(address.into(), &[CTRL_REG1], &mut buf).await?;
        Ok(buf[0].into())
    }

    pub async fn write<I: I2c>(
        address: I2cAddress,
        i2c: &mut I,
        reg: Ctrl1,
    ) -> Result<(), I::Error> {
        i2c.write(address.into(), &[CTRL_REG1, reg.into()]).await
    }

    pub async fn modify<I: I2c, F: FnOnce(&mut Ctrl1)>(
        address: I2cAddress,
        i2c: &mut I,
        modify: F,
    ) -> Result<(), I::Error> {
        let mut reg = Self::read(address, i2c).await?;
        modify(&mut reg);
        Self::write(address, i2c, reg).await
    }

    pub fn power_active(&mut self) -> &mut Self {
        self.active = true;
        self
    }

    pub fn output_data_rate(&mut self, odr: OutputDataRate) -> &mut Self {
        self.output_data_rate = odr;
        self
    }

    pub fn block_data_update(&mut self, enable: bool) -> &mut Self {
        self.block_data_update = enable;
        self
    }
}

impl From<u8> for OutputDataRate {
    fn from(reg: u8) -> Self {
        match (reg & ODR_MASK) >> 4 {
            0b001 => OutputDataRate::Hz1,
            0b010 => OutputDataRate::Hz7,
            0b011 => OutputDataRate::Hz12p5,
            0b100 => OutputDataRate::Hz25,
            _ => OutputDataRate::OneShot,
        }
    }
}

impl From<OutputDataRate> for u8 {
    fn from(odr: OutputDataRate) -> Self {
        let bits = match odr {
            OutputDataRate::OneShot => 0b000,
            OutputDataRate::Hz1 => 0b001,
            OutputDataRate::Hz7 => 0b010,
            OutputDataRate::Hz12p5 => 0b011,
            OutputDataRate::Hz25 => 0b100,
        };
        bits << 4
    }
}

impl From<u8> for Ctrl1 {
    fn from(reg: u8) -> Self {
        Ctrl1 {
            active: (reg & PD) != 0,
            block_data_update: (reg & BDU) != 0,
            output_data_rate: reg.into(),
            other: reg & !(PD | BDU | ODR_MASK),
        }
    }
}

impl From<Ctrl1> for u8 {
    fn from(reg: Ctrl1) -> Self {
        let mut value = reg.other | u8::from(reg.output_data_rate);
        if reg.active {
            value |= PD;
        }
        if reg.block_data_update {
            value |= BDU;
        }
        value
    }
}

use crate::traits::i2c::I2cAddress;
use embedded_hal_async::i2c::*;

const CTRL_REG1: u8 = 0x20;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Power {
    PowerDown,
    Active,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BlockDataUpdate {
    Continuous,
    MsbLsbReading,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OutputDataRate {
    OneShot,
    Hz1,
    Hz7,
    Hz12p5,
}

#[derive(Debug, Copy, Clone)]
pub struct Ctrl1 {
    power_down: Power,
    block_data_update: BlockDataUpdate,
    output_data_rate: OutputDataRate,
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
        self.power_down = Power::Active;
        self
    }

    pub fn output_data_rate(&mut self, odr: OutputDataRate) -> &mut Self {
        self.output_data_rate = odr;
        self
    }

    pub fn block_data_update(&mut self, bdu: BlockDataUpdate) -> &mut Self {
        self.block_data_update = bdu;
        self
    }
}

impl From<u8> for Power {
    fn from(reg: u8) -> Self {
        if (reg & 0x80) != 0 {
            Power::Active
        } else {
            Power::PowerDown
        }
    }
}

impl From<Power> for u8 {
    fn from(p: Power) -> Self {
        match p {
            Power::PowerDown => 0b00000000,
            Power::Active => 0b10000000,
        }
    }
}

impl From<u8> for BlockDataUpdate {
    fn from(reg: u8) -> Self {
        if (reg & 0b100) != 0 {
            BlockDataUpdate::MsbLsbReading
        } else {
            BlockDataUpdate::Continuous
        }
    }
}

impl From<BlockDataUpdate> for u8 {
    fn from(bdu: BlockDataUpdate) -> u8 {
        match bdu {
            BlockDataUpdate::Continuous => 0b000,
            BlockDataUpdate::MsbLsbReading => 0b100,
        }
    }
}

impl From<u8> for OutputDataRate {
    fn from(reg: u8) -> Self {
        match reg & 0b11 {
            0b01 => OutputDataRate::Hz1,
            0b10 => OutputDataRate::Hz7,
            0b11 => OutputDataRate::Hz12p5,
            _ => OutputDataRate::OneShot,
        }
    }
}

impl From<OutputDataRate> for u8 {
    fn from(odr: OutputDataRate) -> Self {
        match odr {
            OutputDataRate::OneShot => 0b00,
            OutputDataRate::Hz1 => 0b01,
            OutputDataRate::Hz7 => 0b10,
            OutputDataRate::Hz12p5 => 0b11,
        }
    }
}

impl From<u8> for Ctrl1 {
    fn from(reg: u8) -> Self {
        Ctrl1 {
            power_down: reg.into(),
            output_data_rate: reg.into(),
            block_data_update: reg.into(),
        }
    }
}

impl From<Ctrl1> for u8 {
    fn from(reg: Ctrl1) -> Self {
        u8::from(reg.power_down) | u8::from(reg.output_data_rate) | u8::from(reg.block_data_update)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_bdu_1hz() {
        let mut reg: Ctrl1 = 0u8.into();
        reg.power_active()
            .output_data_rate(OutputDataRate::Hz1)
            .block_data_update(BlockDataUpdate::MsbLsbReading);
        assert_eq!(0b1000_0101, u8::from(reg));
    }

    #[test]
    fn test_decode_keeps_fields() {
        let reg: Ctrl1 = 0b1000_0111.into();
        assert_eq!(Power::Active, reg.power_down);
        assert_eq!(OutputDataRate::Hz12p5, reg.output_data_rate);
        assert_eq!(BlockDataUpdate::MsbLsbReading, reg.block_data_update);
    }
}

use crate::domain::temperature::{Celsius, Temperature};
use crate::traits::i2c::I2cAddress;
use embedded_hal_async::i2c::*;

// auto-increment variant of TEMP_OUT_L, 2 bytes
const TEMP_OUT: u8 = 0xAB;

const OFFSET_DEGC: f32 = 42.5;
const LSB_PER_DEGC: f32 = 480.0;

pub struct Tout;

impl Tout {
    pub async fn read<I: I2c>(address: I2cAddress, i2c: &mut I) -> Result<i16, I::Error> {
        let mut buf = [0; 2];
        i2c.write_read(address.into(), &[TEMP_OUT], &mut buf).await?;
        Ok(i16::from_le_bytes(buf))
    }

    pub fn to_celsius(t_out: i16) -> Temperature<Celsius> {
        Temperature::new(OFFSET_DEGC + t_out as f32 / LSB_PER_DEGC)
    }
}

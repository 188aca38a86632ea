use crate::traits::i2c::I2cAddress;
use embedded_hal_async::i2c::*;

// auto-increment variant of PRESS_OUT_XL, 3 bytes
const PRESS_OUT: u8 = 0xA8;

/// Pressure sensitivity, LSB per hPa.
const LSB_PER_HPA: f32 = 4096.0;

pub struct Pout;

impl Pout {
    pub async fn read<I: I2c>(address: I2cAddress, i2c: &mut I) -> Result<i32, I::Error> {
        let mut buf = [0; 3];
        i2c.write_read(address.into(), &[PRESS_OUT], &mut buf).await?;
        Ok(to_i32(buf))
    }

    pub fn to_hpa(p_out: i32) -> f32 {
        p_out as f32 / LSB_PER_HPA
    }
}

// 24-bit two's complement, little endian
fn to_i32(buf: [u8; 3]) -> i32 {
    let sign = if buf[2] & 0x80 != 0 { 0xFF } else { 0x00 };
    i32::from_le_bytes([buf[0], buf[1], buf[2], sign])
}

use crate::traits::i2c::I2cAddress;
use embedded_hal_async::i2c::*;

const WHO_AM_I: u8 = 0x0F;

/// Identification value of the HTS221.
pub const DEVICE_ID: u8 = 0xBC;

pub struct WhoAmI;

impl WhoAmI {
    pub async fn read<I: I2c>(address: I2cAddress, i2c: &mut I) -> Result<u8, I::Error> {
        let mut buf = [0; 1];
        i2c.write_read(address.into(), &[WHO_AM_I], &mut buf).await?;
        Ok(buf[0])
    }
}

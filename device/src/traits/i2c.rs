/// Seven-bit address of a device on the I2C bus.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct I2cAddress(u8);

impl I2cAddress {
    pub const fn new(val: u8) -> Self {
        Self(val)
    }
}

impl From<I2cAddress> for u8 {
    fn from(address: I2cAddress) -> Self {
        address.0
    }
}

impl From<u8> for I2cAddress {
    fn from(val: u8) -> Self {
        I2cAddress::new(val)
    }
}

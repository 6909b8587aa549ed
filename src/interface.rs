//! Bus interface implementation for the DRV8214
//!
//! The DRV8214 is I2C only. Every register is one byte wide and addressed by a single
//! register-address byte.

use device_driver::RegisterInterface;

use crate::DeviceAddress;

/// Longest payload written in a single transfer
const MAX_WRITE_LEN: usize = 4;

/// I2C interface for the DRV8214
pub struct I2cInterface<I2C> {
    i2c: I2C,
    address: DeviceAddress,
}

impl<I2C> I2cInterface<I2C> {
    /// Create a new I2C interface for a strap-selected address
    ///
    /// # Example
    /// ```ignore
    /// let interface = I2cInterface::new(i2c, DeviceAddress::LowLow);
    /// let mut motor = Drv8214Driver::new(interface, params);
    /// ```
    pub const fn new(i2c: I2C, address: DeviceAddress) -> Self {
        Self { i2c, address }
    }

    /// Address this interface talks to
    pub const fn address(&self) -> DeviceAddress {
        self.address
    }

    /// Consume the interface and return the I2C peripheral
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C, E> RegisterInterface for I2cInterface<I2C>
where
    I2C: embedded_hal::i2c::I2c<Error = E>,
{
    type Error = E;
    type AddressType = u8;

    fn read_register(
        &mut self,
        address: Self::AddressType,
        size_bits: u32,
        read_data: &mut [u8],
    ) -> Result<(), Self::Error> {
        let _ = size_bits; // Size is implicit in read_data.len() for I2C
        self.i2c
            .write_read(self.address.addr(), &[address], read_data)
    }

    fn write_register(
        &mut self,
        address: Self::AddressType,
        size_bits: u32,
        write_data: &[u8],
    ) -> Result<(), Self::Error> {
        let _ = size_bits; // Size is implicit in write_data.len() for I2C
        let mut buffer = [0u8; 1 + MAX_WRITE_LEN];
        buffer[0] = address;
        let len = write_data.len().min(MAX_WRITE_LEN);
        buffer[1..=len].copy_from_slice(&write_data[..len]);

        self.i2c.write(self.address.addr(), &buffer[..=len])
    }
}

//! Register read/write primitives
//!
//! Thin layer over a [`RegisterInterface`] that reads and writes single registers and performs
//! read-modify-write on fields. Nothing is cached: every call reaches the device, in order,
//! exactly once. Transport errors are returned untouched.
//!
//! Self-clearing bits (see [`Register::self_clearing_mask`]) are always masked out of the value
//! read back before a modify is written, so a stale echo of a previous pulse is never
//! re-asserted. Use [`RegisterAccess::pulse`] to assert them.

use device_driver::RegisterInterface;

use crate::registers::{Field, Register};

/// Byte-level access to the DRV8214 register file
pub struct RegisterAccess<I> {
    pub(crate) interface: I,
}

impl<I> RegisterAccess<I>
where
    I: RegisterInterface<AddressType = u8>,
{
    /// Wrap a register interface
    pub const fn new(interface: I) -> Self {
        Self { interface }
    }

    /// Read one register
    ///
    /// # Errors
    ///
    /// Returns the transport error if the read fails.
    pub fn read(&mut self, register: Register) -> Result<u8, I::Error> {
        let mut buffer = [0u8; 1];
        self.interface
            .read_register(register.address(), 8, &mut buffer)?;
        Ok(buffer[0])
    }

    /// Overwrite a whole register
    ///
    /// Only for registers whose every bit belongs to the value being written. Status registers
    /// are read-only and must not be passed here.
    ///
    /// # Errors
    ///
    /// Returns the transport error if the write fails.
    pub fn write(&mut self, register: Register, value: u8) -> Result<(), I::Error> {
        debug_assert!(!register.is_read_only(), "{register:?} is read-only");
        self.interface
            .write_register(register.address(), 8, &[value])
    }

    /// Set or clear the bit(s) of `field`, preserving the rest of the register
    ///
    /// # Errors
    ///
    /// Returns the transport error if the read or the write fails.
    pub fn modify_bit(&mut self, field: Field, enabled: bool) -> Result<(), I::Error> {
        let current = self.read_for_modify(field.register)?;
        let updated = if enabled {
            current | field.mask
        } else {
            current & !field.mask
        };
        self.write(field.register, updated)
    }

    /// Replace a multi-bit field with a right-aligned `value`
    ///
    /// Bits outside the field's mask are left as read; bits of `value` that do not fit the
    /// field are dropped.
    ///
    /// # Errors
    ///
    /// Returns the transport error if the read or the write fails.
    pub fn modify_field(&mut self, field: Field, value: u8) -> Result<(), I::Error> {
        let current = self.read_for_modify(field.register)?;
        let updated = (current & !field.mask) | field.encode(value);
        self.write(field.register, updated)
    }

    /// Read a right-aligned field value
    ///
    /// # Errors
    ///
    /// Returns the transport error if the read fails.
    pub fn read_field(&mut self, field: Field) -> Result<u8, I::Error> {
        let raw = self.read(field.register)?;
        Ok(field.decode(raw))
    }

    /// Assert a self-clearing bit once
    ///
    /// The device resets the bit after acting on it, so nothing about it is remembered here.
    ///
    /// # Errors
    ///
    /// Returns the transport error if the read or the write fails.
    pub fn pulse(&mut self, field: Field) -> Result<(), I::Error> {
        self.modify_bit(field, true)
    }

    fn read_for_modify(&mut self, register: Register) -> Result<u8, I::Error> {
        let raw = self.read(register)?;
        Ok(raw & !register.self_clearing_mask())
    }

    /// Consume the access layer and return the interface
    pub fn release(self) -> I {
        self.interface
    }
}

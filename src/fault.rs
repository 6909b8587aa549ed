//! Fault register decoding
//!
//! The FAULT register (0x00) carries one flag per condition. It is read fresh every time:
//! stall, count-done and the protection flags are set by the device at any moment.
//!
//! Faults are only reported here. Reacting to them (braking, clearing with
//! [`Drv8214Driver::clear_faults`](crate::Drv8214Driver::clear_faults)) is up to the caller.

use crate::registers::field;

/// Decoded FAULT register
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FaultStatus {
    /// General fault; nFAULT is pulled low
    pub fault: bool,
    /// Stall detected
    pub stall: bool,
    /// Overcurrent protection tripped
    pub overcurrent: bool,
    /// Overvoltage protection tripped
    pub overvoltage: bool,
    /// Thermal shutdown
    pub thermal_shutdown: bool,
    /// Power-on reset occurred
    pub power_on_reset: bool,
    /// Ripple count reached the threshold
    pub count_done: bool,
}

impl FaultStatus {
    /// Decode a raw FAULT register value
    #[must_use]
    pub const fn from_raw(raw: u8) -> Self {
        Self {
            fault: raw & field::FAULT.mask != 0,
            stall: raw & field::STALL.mask != 0,
            overcurrent: raw & field::OCP.mask != 0,
            overvoltage: raw & field::OVP.mask != 0,
            thermal_shutdown: raw & field::TSD.mask != 0,
            power_on_reset: raw & field::NPOR.mask != 0,
            count_done: raw & field::CNT_DONE.mask != 0,
        }
    }

    /// Whether any protection condition (stall, OCP, OVP, TSD) is active
    #[must_use]
    pub const fn any_protection(&self) -> bool {
        self.stall || self.overcurrent || self.overvoltage || self.thermal_shutdown
    }

    /// Human-readable lines for every flag that is set
    pub fn descriptions(&self) -> impl Iterator<Item = &'static str> {
        [
            (self.stall, "STALL: motor stall detected"),
            (self.overcurrent, "OCP: overcurrent protection event"),
            (self.overvoltage, "OVP: overvoltage protection event"),
            (self.thermal_shutdown, "TSD: thermal shutdown event"),
            (self.power_on_reset, "NPOR: power-on reset occurred"),
            (self.count_done, "CNT_DONE: ripple count threshold reached"),
        ]
        .into_iter()
        .filter_map(|(set, text)| set.then_some(text))
    }
}

#![no_std]
#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod access;
pub mod config;
pub mod device;
pub mod diagnostics;
pub mod fault;
pub mod interface;
pub mod motion;
pub mod registers;
pub mod scaling;
pub mod state;

// Re-export main types
pub use access::RegisterAccess;
pub use config::{
    ControlMode, DriverParams, Drv8214Config, PwmFrequency, RegulationMode, StallBehavior,
    ThresholdBehavior, VoltageReference,
};
pub use device::Drv8214Driver;
pub use diagnostics::{DiagnosticSink, NoDiagnostics};
pub use fault::FaultStatus;
pub use interface::I2cInterface;
pub use motion::{Direction, MotionState};
pub use registers::{Field, Register};
pub use scaling::{CurrentSenseGain, InverseResistance, QuantizedValue, VoltageRange};
pub use state::{ConfigState, RippleTuning};

/// 7-bit I2C address, selected by the A1 and A0 pin straps (low, Hi-Z or high)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceAddress {
    /// A1 low, A0 low
    LowLow = 0x60,
    /// A1 low, A0 Hi-Z
    LowHiZ = 0x62,
    /// A1 low, A0 high
    LowHigh = 0x64,
    /// A1 Hi-Z, A0 low
    HiZLow = 0x66,
    /// A1 Hi-Z, A0 Hi-Z
    HiZHiZ = 0x68,
    /// A1 Hi-Z, A0 high
    HiZHigh = 0x6A,
    /// A1 high, A0 low
    HighLow = 0x6C,
    /// A1 high, A0 Hi-Z
    HighHiZ = 0x6E,
    /// A1 high, A0 high
    HighHigh = 0x70,
}

impl DeviceAddress {
    /// Every strap combination, in address order
    pub const ALL: [Self; 9] = [
        Self::LowLow,
        Self::LowHiZ,
        Self::LowHigh,
        Self::HiZLow,
        Self::HiZHiZ,
        Self::HiZHigh,
        Self::HighLow,
        Self::HighHiZ,
        Self::HighHigh,
    ];

    /// Address byte used on the bus
    #[must_use]
    pub const fn addr(self) -> u8 {
        self as u8
    }

    /// Look up the strap combination for a raw address
    #[must_use]
    pub const fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            0x60 => Some(Self::LowLow),
            0x62 => Some(Self::LowHiZ),
            0x64 => Some(Self::LowHigh),
            0x66 => Some(Self::HiZLow),
            0x68 => Some(Self::HiZHiZ),
            0x6A => Some(Self::HiZHigh),
            0x6C => Some(Self::HighLow),
            0x6E => Some(Self::HighHiZ),
            0x70 => Some(Self::HighHigh),
            _ => None,
        }
    }
}

/// Driver errors
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// Communication error with the device
    Bus(E),
}

impl<E> From<E> for Error<E> {
    fn from(error: E) -> Self {
        Self::Bus(error)
    }
}

//! Terminal-voltage targets
//!
//! In voltage regulation the 8-bit WSET_VSET register is a linear fraction of the range
//! selected by VM_GAIN_SEL. Above the 15.7 V range the request is pulled back to 11 V to stay
//! clear of the overvoltage protection threshold.

/// Motor voltage range (VM_GAIN_SEL)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum VoltageRange {
    /// 0 V to 3.92 V (VM_GAIN_SEL = 1)
    Low,
    /// 0 V to 15.7 V (VM_GAIN_SEL = 0)
    High,
}

/// Full scale of the low range
pub const LOW_RANGE_MAX_V: f32 = 3.92;
/// Full scale of the high range
pub const HIGH_RANGE_MAX_V: f32 = 15.7;
/// Target used when a high-range request exceeds the full scale
pub const HIGH_RANGE_PROTECTED_V: f32 = 11.0;

impl VoltageRange {
    /// VM_GAIN_SEL bit value
    #[must_use]
    pub const fn gain_select(self) -> bool {
        matches!(self, Self::Low)
    }

    /// Full-scale voltage
    #[must_use]
    pub const fn max_voltage(self) -> f32 {
        match self {
            Self::Low => LOW_RANGE_MAX_V,
            Self::High => HIGH_RANGE_MAX_V,
        }
    }

    /// Clamp a request into the range
    #[must_use]
    pub fn clamp(self, volts: f32) -> f32 {
        if volts.is_nan() || volts <= 0.0 {
            return 0.0;
        }
        match self {
            Self::Low => volts.min(LOW_RANGE_MAX_V),
            Self::High if volts > HIGH_RANGE_MAX_V => HIGH_RANGE_PROTECTED_V,
            Self::High => volts,
        }
    }

    /// WSET_VSET code for a voltage target, rounded to nearest
    #[must_use]
    pub fn encode(self, volts: f32) -> u8 {
        let scaled = self.clamp(volts) * (255.0 / self.max_voltage());
        libm::roundf(scaled).min(255.0) as u8
    }

    /// Voltage represented by a WSET_VSET code
    #[must_use]
    pub fn decode(self, code: u8) -> f32 {
        f32::from(code) * self.max_voltage() / 255.0
    }
}

/// Convert a REG_STATUS1 reading (0xB0 = 11 V) into volts
#[must_use]
pub fn terminal_voltage(raw: u8) -> f32 {
    f32::from(raw) / 176.0 * 11.0
}

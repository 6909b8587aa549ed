//! Current-sense gain selection
//!
//! The IPROPI current mirror has six usable gain settings (datasheet table "CS_GAIN_SEL
//! Settings"). Each trades full-scale range for resolution. A requested trip current selects
//! the most sensitive setting whose full-scale current still covers it; the trip current the
//! device actually regulates to then follows from the reference voltage and the IPROPI
//! resistor: `I_trip = V_ref / (R_ipropi * A_ipropi)`.

/// CS_GAIN_SEL setting, named after its full-scale current
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CurrentSenseGain {
    /// 5560 uA/A, 0.125 A full scale
    Max0A125,
    /// 5560 uA/A, 0.25 A full scale
    Max0A25,
    /// 1125 uA/A, 0.5 A full scale
    Max0A5,
    /// 1125 uA/A, 1 A full scale
    Max1A,
    /// 225 uA/A, 2 A full scale
    Max2A,
    /// 225 uA/A, 4 A full scale
    Max4A,
}

impl CurrentSenseGain {
    /// All settings, most sensitive first
    pub const BY_SENSITIVITY: [Self; 6] = [
        Self::Max0A125,
        Self::Max0A25,
        Self::Max0A5,
        Self::Max1A,
        Self::Max2A,
        Self::Max4A,
    ];

    /// Pick the most sensitive setting whose full-scale current covers `requested_a`
    ///
    /// Requests above 4 A fall back to the 4 A setting; zero, negative and NaN requests get
    /// the most sensitive one.
    #[must_use]
    pub fn select(requested_a: f32) -> Self {
        if requested_a.is_nan() {
            return Self::Max0A125;
        }
        Self::BY_SENSITIVITY
            .into_iter()
            .find(|gain| gain.max_current() >= requested_a)
            .unwrap_or(Self::Max4A)
    }

    /// CS_GAIN_SEL field value
    #[must_use]
    pub const fn bits(self) -> u8 {
        match self {
            Self::Max4A => 0b000,
            Self::Max2A => 0b001,
            Self::Max1A => 0b010,
            Self::Max0A5 => 0b011,
            Self::Max0A25 => 0b110,
            Self::Max0A125 => 0b111,
        }
    }

    /// Decode a CS_GAIN_SEL field value; bit 1 is ignored when bit 2 is set
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0b111 {
            0b000 => Self::Max4A,
            0b001 => Self::Max2A,
            0b010 => Self::Max1A,
            0b011 => Self::Max0A5,
            0b100 | 0b110 => Self::Max0A25,
            _ => Self::Max0A125,
        }
    }

    /// Current mirror gain in uA/A
    #[must_use]
    pub const fn gain_ua_per_a(self) -> u16 {
        match self {
            Self::Max4A | Self::Max2A => 225,
            Self::Max1A | Self::Max0A5 => 1125,
            Self::Max0A25 | Self::Max0A125 => 5560,
        }
    }

    /// Current mirror gain in A/A
    #[must_use]
    pub fn gain_a_per_a(self) -> f32 {
        f32::from(self.gain_ua_per_a()) * 1e-6
    }

    /// Full-scale current in amperes
    #[must_use]
    pub const fn max_current(self) -> f32 {
        match self {
            Self::Max4A => 4.0,
            Self::Max2A => 2.0,
            Self::Max1A => 1.0,
            Self::Max0A5 => 0.5,
            Self::Max0A25 => 0.25,
            Self::Max0A125 => 0.125,
        }
    }

    /// Trip current for a reference voltage and IPROPI resistor
    #[must_use]
    pub fn trip_current(self, reference_v: f32, sense_resistor_ohms: f32) -> f32 {
        reference_v / (sense_resistor_ohms * self.gain_a_per_a())
    }

    /// Convert a REG_STATUS2 reading (0xC0 = full scale) into amperes
    #[must_use]
    pub fn reading_to_amps(self, raw: u8) -> f32 {
        f32::from(raw) / 192.0 * self.max_current()
    }
}

//! Unit scaling between physical quantities and register encodings
//!
//! Several DRV8214 targets are stored as a bounded mantissa plus a small selector that picks
//! one of four multipliers. [`ScaleTable`] captures one such encoding and converts in both
//! directions. Quantities with a different transfer function live in their own modules:
//! - [`current`]: current-sense gain selection and trip current
//! - [`voltage`]: terminal-voltage target codes
//! - [`resistance`]: inverse motor resistance
//!
//! All conversions clamp out-of-range requests instead of failing.

pub mod current;
pub mod resistance;
pub mod voltage;

pub use current::CurrentSenseGain;
pub use resistance::InverseResistance;
pub use voltage::VoltageRange;

/// One multiplier of a [`ScaleTable`] and the selector bits that activate it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScaleOption {
    /// Multiplier applied to the mantissa
    pub factor: u16,
    /// Selector field value
    pub selector: u8,
}

impl ScaleOption {
    /// Create a scale option
    #[must_use]
    pub const fn new(factor: u16, selector: u8) -> Self {
        Self { factor, selector }
    }
}

/// A mantissa field width together with its multipliers, ordered by ascending factor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScaleTable {
    mantissa_bits: u32,
    options: &'static [ScaleOption],
}

/// Target speed: 8-bit WSET_VSET with the 2-bit W_SCALE selector
pub const SPEED_SCALE: ScaleTable = ScaleTable::new(
    8,
    &[
        ScaleOption::new(16, 0b00),
        ScaleOption::new(32, 0b01),
        ScaleOption::new(64, 0b10),
        ScaleOption::new(128, 0b11),
    ],
);

/// Ripple threshold: 10-bit RC_THR with the 2-bit RC_THR_SCALE selector
pub const RIPPLE_THRESHOLD_SCALE: ScaleTable = ScaleTable::new(
    10,
    &[
        ScaleOption::new(2, 0b00),
        ScaleOption::new(8, 0b01),
        ScaleOption::new(16, 0b10),
        ScaleOption::new(64, 0b11),
    ],
);

impl ScaleTable {
    /// Create a table; `options` must be sorted by ascending factor
    #[must_use]
    pub const fn new(mantissa_bits: u32, options: &'static [ScaleOption]) -> Self {
        Self {
            mantissa_bits,
            options,
        }
    }

    /// Scale options, smallest factor first
    #[must_use]
    pub const fn options(&self) -> &'static [ScaleOption] {
        self.options
    }

    /// Width of the mantissa field in bits
    #[must_use]
    pub const fn mantissa_bits(&self) -> u32 {
        self.mantissa_bits
    }

    /// First mantissa value that no longer fits the field
    #[must_use]
    pub const fn mantissa_limit(&self) -> u32 {
        1 << self.mantissa_bits
    }

    /// Largest multiplier of the table
    #[must_use]
    pub fn max_factor(&self) -> u16 {
        self.options.last().map_or(0, |option| option.factor)
    }

    /// Largest representable value, `(2^W - 1) * max factor`
    #[must_use]
    pub fn ceiling(&self) -> u32 {
        (self.mantissa_limit() - 1) * u32::from(self.max_factor())
    }

    /// Bring a request into `0..=ceiling`; NaN and negative requests become zero
    #[must_use]
    pub fn clamp(&self, value: f32) -> f32 {
        if value.is_nan() || value <= 0.0 {
            0.0
        } else {
            value.min(self.ceiling() as f32)
        }
    }

    /// Encode a physical value
    ///
    /// The smallest factor whose mantissa still fits the field wins, giving the finest
    /// resolution available. Values below every factor encode as mantissa 0 on the smallest
    /// factor.
    #[must_use]
    pub fn quantize(&self, value: f32) -> QuantizedValue {
        let value = self.clamp(value);
        let limit = self.mantissa_limit();

        for option in self.options {
            let factor = f32::from(option.factor);
            if value >= factor {
                let mantissa = libm::floorf(value / factor) as u32;
                if mantissa < limit {
                    return QuantizedValue {
                        mantissa: mantissa as u16,
                        selector: option.selector,
                        factor: option.factor,
                    };
                }
            }
        }

        let smallest = self.options.first().copied().unwrap_or(ScaleOption::new(0, 0));
        QuantizedValue {
            mantissa: 0,
            selector: smallest.selector,
            factor: smallest.factor,
        }
    }

    /// Multiplier activated by `selector`, if the table has one
    #[must_use]
    pub fn factor_for(&self, selector: u8) -> Option<u16> {
        self.options
            .iter()
            .find(|option| option.selector == selector)
            .map(|option| option.factor)
    }

    /// Decode a register reading back into the physical value
    #[must_use]
    pub fn dequantize(&self, mantissa: u16, selector: u8) -> Option<u32> {
        self.factor_for(selector)
            .map(|factor| u32::from(mantissa) * u32::from(factor))
    }
}

/// A value encoded against a [`ScaleTable`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct QuantizedValue {
    /// Right-aligned mantissa, always below the table's mantissa limit
    pub mantissa: u16,
    /// Selector bits of the chosen factor
    pub selector: u8,
    /// Chosen factor
    pub factor: u16,
}

impl QuantizedValue {
    /// Physical value the device will actually use
    #[must_use]
    pub const fn value(&self) -> u32 {
        self.mantissa as u32 * self.factor as u32
    }

    /// Low 8 bits of the mantissa
    #[must_use]
    pub const fn low_byte(&self) -> u8 {
        (self.mantissa & 0xFF) as u8
    }

    /// Mantissa bits above the low byte
    #[must_use]
    pub const fn high_bits(&self) -> u8 {
        (self.mantissa >> 8) as u8
    }
}

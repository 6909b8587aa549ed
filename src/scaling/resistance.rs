//! Inverse motor resistance
//!
//! The ripple counter needs the motor's armature resistance as `INV_R = INV_R_SCALE / R`,
//! stored in an 8-bit register with a 2-bit scale selector. Unlike speed and threshold, the
//! search runs from the largest scale down: the largest scale that keeps `INV_R` within 255
//! gives the finest resolution.

use super::{ScaleOption, ScaleTable};

/// INV_R_SCALE options, ascending
pub const INV_R_SCALE: ScaleTable = ScaleTable::new(
    8,
    &[
        ScaleOption::new(2, 0b00),
        ScaleOption::new(64, 0b01),
        ScaleOption::new(1024, 0b10),
        ScaleOption::new(8192, 0b11),
    ],
);

/// Encoded INV_R and INV_R_SCALE pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InverseResistance {
    /// INV_R register value, never 0
    pub inv_r: u8,
    /// INV_R_SCALE selector bits
    pub selector: u8,
    /// Scale factor selected by `selector`
    pub factor: u16,
}

impl InverseResistance {
    /// Encode a motor resistance in ohms
    ///
    /// Resistances too small for `INV_R <= 255` even on the smallest scale (and non-positive or
    /// NaN inputs) saturate at `INV_R = 255` on the smallest scale.
    #[must_use]
    pub fn from_ohms(ohms: f32) -> Self {
        let options = INV_R_SCALE.options();
        let smallest = options[0];
        let saturated = Self {
            inv_r: u8::MAX,
            selector: smallest.selector,
            factor: smallest.factor,
        };

        if ohms.is_nan() || ohms <= 0.0 {
            return saturated;
        }

        for option in options.iter().rev() {
            let candidate = libm::roundf(f32::from(option.factor) / ohms).max(1.0);
            if candidate <= 255.0 {
                return Self {
                    inv_r: candidate as u8,
                    selector: option.selector,
                    factor: option.factor,
                };
            }
        }

        saturated
    }

    /// Resistance represented by this encoding
    #[must_use]
    pub fn ohms(&self) -> f32 {
        f32::from(self.factor) / f32::from(self.inv_r)
    }
}

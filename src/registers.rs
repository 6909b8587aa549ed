//! Register map for the DRV8214
//!
//! The DRV8214 exposes a flat space of 8-bit registers. Status registers (0x00-0x06) are
//! read-only; configuration and control registers (0x09-0x19) are read/write.
//!
//! Bit-fields are described by [`Field`] descriptors rather than raw masks so the scaling
//! code can pack values generically. Shift and width are derived from the mask, which must be
//! a single contiguous run of set bits.

/// DRV8214 register addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Register {
    /// FAULT - Fault status (read-only)
    Fault = 0x00,
    /// RC_STATUS1 - Motor speed estimated by ripple counting
    RcStatus1 = 0x01,
    /// RC_STATUS2 - Ripple counter, low byte
    RcStatus2 = 0x02,
    /// RC_STATUS3 - Ripple counter, high byte
    RcStatus3 = 0x03,
    /// REG_STATUS1 - Voltage across the motor terminals (0xB0 = 11 V)
    RegStatus1 = 0x04,
    /// REG_STATUS2 - Motor current (0xC0 = full scale of the selected current-sense gain)
    RegStatus2 = 0x05,
    /// REG_STATUS3 - Bridge duty cycle produced by the regulation loop
    RegStatus3 = 0x06,
    /// CONFIG0 - Output enable, protections, counter/fault clear
    Config0 = 0x09,
    /// CONFIG1 - Inrush time, low byte
    Config1 = 0x0A,
    /// CONFIG2 - Inrush time, high byte
    Config2 = 0x0B,
    /// CONFIG3 - Current regulation, stall mode, reference selection
    Config3 = 0x0C,
    /// CONFIG4 - Reporting, control interface and I2C bridge inputs
    Config4 = 0x0D,
    /// REG_CTRL0 - Soft start, regulation mode, PWM frequency, speed scale
    RegCtrl0 = 0x0E,
    /// REG_CTRL1 - Speed or voltage target (WSET_VSET)
    RegCtrl1 = 0x0F,
    /// REG_CTRL2 - Output filter and external duty cycle
    RegCtrl2 = 0x10,
    /// RC_CTRL0 - Ripple counting enable, bridge-on-threshold, current-sense gain
    RcCtrl0 = 0x11,
    /// RC_CTRL1 - Ripple count threshold, low byte
    RcCtrl1 = 0x12,
    /// RC_CTRL2 - Inverse resistance scale, KMC scale, threshold scale and high bits
    RcCtrl2 = 0x13,
    /// RC_CTRL3 - Inverse motor resistance (INV_R)
    RcCtrl3 = 0x14,
    /// RC_CTRL4 - Motor constant (KMC)
    RcCtrl4 = 0x15,
    /// RC_CTRL5 - Ripple filter coefficient
    RcCtrl5 = 0x16,
    /// RC_CTRL6 - Error correction and mechanical fault timing
    RcCtrl6 = 0x17,
    /// RC_CTRL7 - Speed loop proportional gain
    RcCtrl7 = 0x18,
    /// RC_CTRL8 - Speed loop integral gain
    RcCtrl8 = 0x19,
}

impl Register {
    /// Bus address of the register
    #[must_use]
    pub const fn address(self) -> u8 {
        self as u8
    }

    /// Bits the device clears on its own after acting on them.
    ///
    /// Read-modify-write must never write these back from a read.
    #[must_use]
    pub const fn self_clearing_mask(self) -> u8 {
        match self {
            Self::Config0 => field::CLR_CNT.mask | field::CLR_FLT.mask,
            _ => 0x00,
        }
    }

    /// Whether the register is a read-only status register
    #[must_use]
    pub const fn is_read_only(self) -> bool {
        (self as u8) <= 0x06
    }
}

/// A contiguous bit range inside one register
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Field {
    /// Register holding the field
    pub register: Register,
    /// In-place mask of the field
    pub mask: u8,
}

impl Field {
    /// Create a field descriptor
    #[must_use]
    pub const fn new(register: Register, mask: u8) -> Self {
        Self { register, mask }
    }

    /// Bit position of the field's least significant bit
    #[must_use]
    pub const fn shift(self) -> u32 {
        self.mask.trailing_zeros()
    }

    /// Number of bits in the field
    #[must_use]
    pub const fn width(self) -> u32 {
        self.mask.count_ones()
    }

    /// Largest value that fits the field
    #[must_use]
    pub const fn max_value(self) -> u8 {
        ((1u16 << self.width()) - 1) as u8
    }

    /// Shift a right-aligned value into place, dropping bits that do not fit
    #[must_use]
    pub const fn encode(self, value: u8) -> u8 {
        (value << self.shift()) & self.mask
    }

    /// Extract the field from a register byte, right-aligned
    #[must_use]
    pub const fn decode(self, raw: u8) -> u8 {
        (raw & self.mask) >> self.shift()
    }
}

/// Field descriptors, named after the datasheet
pub mod field {
    use super::{Field, Register};

    // FAULT
    /// General fault, mirrors nFAULT
    pub const FAULT: Field = Field::new(Register::Fault, 0x80);
    /// Stall detected
    pub const STALL: Field = Field::new(Register::Fault, 0x20);
    /// Overcurrent protection tripped
    pub const OCP: Field = Field::new(Register::Fault, 0x10);
    /// Overvoltage protection tripped
    pub const OVP: Field = Field::new(Register::Fault, 0x08);
    /// Thermal shutdown
    pub const TSD: Field = Field::new(Register::Fault, 0x04);
    /// Power-on reset occurred
    pub const NPOR: Field = Field::new(Register::Fault, 0x02);
    /// Ripple count exceeded the threshold
    pub const CNT_DONE: Field = Field::new(Register::Fault, 0x01);

    // REG_STATUS3
    /// Bridge duty cycle (0 = 0%, 0x3F = 100%)
    pub const IN_DUTY: Field = Field::new(Register::RegStatus3, 0x3F);

    // CONFIG0
    /// Driver outputs enabled (0 = all FETs Hi-Z)
    pub const EN_OUT: Field = Field::new(Register::Config0, 0x80);
    /// Overvoltage protection enable
    pub const EN_OVP: Field = Field::new(Register::Config0, 0x40);
    /// Stall detection enable
    pub const EN_STALL: Field = Field::new(Register::Config0, 0x20);
    /// Voltage sensing selection
    pub const VSNS_SEL: Field = Field::new(Register::Config0, 0x10);
    /// Motor voltage gain (1 = 0-3.92 V, 0 = 0-15.7 V)
    pub const VM_GAIN_SEL: Field = Field::new(Register::Config0, 0x08);
    /// Clear ripple counter and CNT_DONE (self-clearing)
    pub const CLR_CNT: Field = Field::new(Register::Config0, 0x04);
    /// Clear fault flags (self-clearing)
    pub const CLR_FLT: Field = Field::new(Register::Config0, 0x02);
    /// Duty cycle control mode
    pub const DUTY_CTRL: Field = Field::new(Register::Config0, 0x01);

    // CONFIG1 / CONFIG2
    /// Inrush time, low byte
    pub const TINRUSH_LOW: Field = Field::new(Register::Config1, 0xFF);
    /// Inrush time, high byte
    pub const TINRUSH_HIGH: Field = Field::new(Register::Config2, 0xFF);

    // CONFIG3
    /// Current regulation mode
    pub const IMODE: Field = Field::new(Register::Config3, 0xC0);
    /// Stall response (0 = disable outputs, 1 = keep driving)
    pub const SMODE: Field = Field::new(Register::Config3, 0x20);
    /// Internal 500 mV reference
    pub const INT_VREF: Field = Field::new(Register::Config3, 0x10);
    /// Current blanking time
    pub const TBLANK: Field = Field::new(Register::Config3, 0x08);
    /// Deglitch time
    pub const TDEG: Field = Field::new(Register::Config3, 0x04);
    /// Overcurrent response (0 = latch off, 1 = auto-retry)
    pub const OCP_MODE: Field = Field::new(Register::Config3, 0x02);
    /// Thermal shutdown response
    pub const TSD_MODE: Field = Field::new(Register::Config3, 0x01);

    // CONFIG4
    /// Ripple count reporting on nFAULT
    pub const RC_REP: Field = Field::new(Register::Config4, 0xC0);
    /// Stall reporting on nFAULT
    pub const STALL_REP: Field = Field::new(Register::Config4, 0x20);
    /// Cycle-by-cycle current regulation reporting
    pub const CBC_REP: Field = Field::new(Register::Config4, 0x10);
    /// Control interface (1 = PWM, 0 = PH/EN)
    pub const PMODE: Field = Field::new(Register::Config4, 0x08);
    /// Bridge controlled by I2C bits instead of INx pins
    pub const I2C_BC: Field = Field::new(Register::Config4, 0x04);
    /// I2C EN/IN1
    pub const I2C_EN_IN1: Field = Field::new(Register::Config4, 0x02);
    /// I2C PH/IN2
    pub const I2C_PH_IN2: Field = Field::new(Register::Config4, 0x01);
    /// Both I2C bridge inputs, IN1 in bit 1 and IN2 in bit 0
    pub const I2C_INPUTS: Field = Field::new(Register::Config4, 0x03);

    // REG_CTRL0
    /// Soft start/stop enable
    pub const EN_SS: Field = Field::new(Register::RegCtrl0, 0x20);
    /// Regulation mode
    pub const REG_CTRL: Field = Field::new(Register::RegCtrl0, 0x18);
    /// PWM frequency (0 = 50 kHz, 1 = 25 kHz)
    pub const PWM_FREQ: Field = Field::new(Register::RegCtrl0, 0x04);
    /// Speed scale selector
    pub const W_SCALE: Field = Field::new(Register::RegCtrl0, 0x03);

    // REG_CTRL1
    /// Speed or voltage target
    pub const WSET_VSET: Field = Field::new(Register::RegCtrl1, 0xFF);

    // REG_CTRL2
    /// Output filter mode
    pub const OUT_FLT: Field = Field::new(Register::RegCtrl2, 0xC0);
    /// External duty cycle
    pub const EXT_DUTY: Field = Field::new(Register::RegCtrl2, 0x3F);

    // RC_CTRL0
    /// Ripple counting enable
    pub const EN_RC: Field = Field::new(Register::RcCtrl0, 0x80);
    /// Disable error correction
    pub const DIS_EC: Field = Field::new(Register::RcCtrl0, 0x40);
    /// Bridge goes Hi-Z when the ripple threshold is reached
    pub const RC_HIZ: Field = Field::new(Register::RcCtrl0, 0x20);
    /// Filter gain selection
    pub const FLT_GAIN_SEL: Field = Field::new(Register::RcCtrl0, 0x18);
    /// Current-sense gain selection
    pub const CS_GAIN_SEL: Field = Field::new(Register::RcCtrl0, 0x07);

    // RC_CTRL1
    /// Ripple threshold bits 7:0
    pub const RC_THR_LOW: Field = Field::new(Register::RcCtrl1, 0xFF);

    // RC_CTRL2
    /// Inverse resistance scale selector
    pub const INV_R_SCALE: Field = Field::new(Register::RcCtrl2, 0xC0);
    /// KMC scale selector
    pub const KMC_SCALE: Field = Field::new(Register::RcCtrl2, 0x30);
    /// Ripple threshold scale selector
    pub const RC_THR_SCALE: Field = Field::new(Register::RcCtrl2, 0x0C);
    /// Ripple threshold bits 9:8
    pub const RC_THR_HIGH: Field = Field::new(Register::RcCtrl2, 0x03);

    // RC_CTRL3 / RC_CTRL4
    /// Inverse motor resistance
    pub const INV_R: Field = Field::new(Register::RcCtrl3, 0xFF);
    /// Motor back-EMF constant
    pub const KMC: Field = Field::new(Register::RcCtrl4, 0xFF);

    // RC_CTRL5
    /// Ripple filter coefficient
    pub const FLT_K: Field = Field::new(Register::RcCtrl5, 0xF0);

    // RC_CTRL7 / RC_CTRL8
    /// Proportional gain divisor
    pub const KP_DIV: Field = Field::new(Register::RcCtrl7, 0xE0);
    /// Proportional gain
    pub const KP: Field = Field::new(Register::RcCtrl7, 0x1F);
    /// Integral gain divisor
    pub const KI_DIV: Field = Field::new(Register::RcCtrl8, 0xE0);
    /// Integral gain
    pub const KI: Field = Field::new(Register::RcCtrl8, 0x1F);
}

//! Driver configuration
//!
//! [`Drv8214Config`] collects the options applied by [`Drv8214Driver::init`](crate::Drv8214Driver::init).
//! [`DriverParams`] describes the board the driver is attached to and never changes for the
//! lifetime of a driver instance.

use crate::DeviceAddress;
use crate::scaling::VoltageRange;

/// Bridge control interface (PMODE)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ControlMode {
    /// PWM interface: IN1/IN2 drive each half-bridge
    Pwm,
    /// Phase/enable interface: EN gates the bridge, PH picks the direction
    PhEn,
}

/// Regulation loop selection (REG_CTRL)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegulationMode {
    /// Fixed off-time current regulation
    CurrentFixed = 0b00,
    /// Cycle-by-cycle current regulation
    CurrentCycles = 0b01,
    /// Speed regulation from the ripple counter
    Speed = 0b10,
    /// Terminal voltage regulation
    Voltage = 0b11,
}

impl RegulationMode {
    /// REG_CTRL field value
    #[must_use]
    pub const fn bits(self) -> u8 {
        self as u8
    }

    /// Whether the setpoint of this mode is a current
    #[must_use]
    pub const fn is_current(self) -> bool {
        matches!(self, Self::CurrentFixed | Self::CurrentCycles)
    }
}

/// Response to a detected stall (SMODE)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StallBehavior {
    /// Outputs are disabled when STALL is set
    DisableOutputs,
    /// Outputs keep driving current when STALL is set
    KeepDriving,
}

/// Bridge state once the ripple count reaches its threshold (RC_HIZ)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ThresholdBehavior {
    /// The H-bridge stays enabled
    StayEnabled,
    /// The H-bridge goes Hi-Z
    DisableBridge,
}

/// Reference for current regulation (INT_VREF)
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum VoltageReference {
    /// Fixed 500 mV internal reference
    Internal,
    /// Voltage applied on the VREF pin, in volts
    ///
    /// Must stay at least 1.25 V below VM; 3.3 V maximum recommended.
    External(f32),
}

/// Internal reference voltage
pub const INTERNAL_VREF_V: f32 = 0.5;

/// Highest recommended external reference voltage
pub const MAX_EXTERNAL_VREF_V: f32 = 3.3;

impl VoltageReference {
    /// Reference voltage in volts
    #[must_use]
    pub const fn volts(self) -> f32 {
        match self {
            Self::Internal => INTERNAL_VREF_V,
            Self::External(volts) => volts,
        }
    }

    /// Bring an external reference into the usable range
    ///
    /// A non-positive or NaN voltage falls back to the internal reference; anything above
    /// [`MAX_EXTERNAL_VREF_V`] is capped.
    #[must_use]
    pub fn clamped(self) -> Self {
        match self {
            Self::Internal => Self::Internal,
            Self::External(volts) if volts.is_nan() || volts <= 0.0 => Self::Internal,
            Self::External(volts) => Self::External(volts.min(MAX_EXTERNAL_VREF_V)),
        }
    }
}

/// PWM switching frequency (PWM_FREQ)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PwmFrequency {
    /// 50 kHz
    Khz50,
    /// 25 kHz
    Khz25,
}

/// Highest IMODE value
pub const MAX_CURRENT_REGULATION_MODE: u8 = 3;

/// Options applied during initialization
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Drv8214Config {
    /// Bridge driven through I2C_EN_IN1/I2C_PH_IN2 instead of the INx pins
    pub i2c_controlled: bool,
    /// Control interface
    pub control_mode: ControlMode,
    /// Regulation loop
    pub regulation_mode: RegulationMode,
    /// Expected motor supply range
    pub voltage_range: VoltageRange,
    /// Current regulation reference
    pub reference: VoltageReference,
    /// Stall detection enable
    pub stall_detection: bool,
    /// Overvoltage protection enable
    pub overvoltage_protection: bool,
    /// Response to a stall
    pub stall_behavior: StallBehavior,
    /// Bridge state when the ripple threshold is reached
    pub threshold_behavior: ThresholdBehavior,
    /// IMODE current regulation mode (0-3)
    ///
    /// - 0: no current regulation
    /// - 1: regulation during inrush when stall detection is enabled, always otherwise
    /// - 2, 3: regulation at all times
    pub current_regulation_mode: u8,
    /// Time the stall detector ignores inrush current (TINRUSH, raw)
    pub inrush_duration: u16,
    /// Motor armature resistance for the ripple counter, in ohms
    pub motor_resistance_ohms: f32,
    /// Emit human-readable status lines on the diagnostic sink
    pub verbose: bool,
}

impl Default for Drv8214Config {
    fn default() -> Self {
        Self {
            i2c_controlled: true,
            control_mode: ControlMode::Pwm,
            regulation_mode: RegulationMode::Speed,
            voltage_range: VoltageRange::Low,
            reference: VoltageReference::Internal,
            stall_detection: true,
            overvoltage_protection: true,
            stall_behavior: StallBehavior::DisableOutputs,
            threshold_behavior: ThresholdBehavior::StayEnabled,
            current_regulation_mode: 0,
            inrush_duration: 200,
            motor_resistance_ohms: 20.0,
            verbose: false,
        }
    }
}

/// Board-level parameters fixed at construction
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DriverParams {
    /// Strap-selected bus address
    pub address: DeviceAddress,
    /// Application-level identifier, used in diagnostics
    pub id: u8,
    /// Resistor on the IPROPI pin, in ohms
    pub sense_resistor_ohms: f32,
    /// Current ripples per motor output revolution
    pub ripples_per_revolution: u16,
}

impl DriverParams {
    /// Create driver parameters
    #[must_use]
    pub const fn new(
        address: DeviceAddress,
        id: u8,
        sense_resistor_ohms: f32,
        ripples_per_revolution: u16,
    ) -> Self {
        Self {
            address,
            id,
            sense_resistor_ohms,
            ripples_per_revolution,
        }
    }
}

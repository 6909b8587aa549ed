//! In-memory mirror of the device configuration
//!
//! The driver never reads configuration back from the chip to decide anything. Every setter
//! writes the register(s) first and updates this mirror only once the write succeeded, so the
//! mirror always describes what was last written. Derived values (trip current, active speed
//! scale) are computed from it.

use crate::config::{
    ControlMode, Drv8214Config, PwmFrequency, RegulationMode, StallBehavior, ThresholdBehavior,
    VoltageReference,
};
use crate::motion::MotionState;
use crate::scaling::{
    CurrentSenseGain, InverseResistance, QuantizedValue, SPEED_SCALE, VoltageRange,
};

/// W_SCALE after device reset, a factor of 16
const RESET_SPEED_SCALE_SELECTOR: u8 = 0b00;

/// Speed scale factor after device reset
const RESET_SPEED_SCALE: u16 = 16;

/// Current-sense gain after device reset (CS_GAIN_SEL = 000b)
const RESET_CURRENT_GAIN: CurrentSenseGain = CurrentSenseGain::Max4A;

/// Ripple-counter loop tuning, `None` until written
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RippleTuning {
    /// KMC back-EMF constant
    pub kmc: Option<u8>,
    /// KMC_SCALE selector
    pub kmc_scale: Option<u8>,
    /// FLT_K filter coefficient
    pub filter_damping: Option<u8>,
    /// Proportional gain as (KP_DIV, KP)
    pub proportional: Option<(u8, u8)>,
    /// Integral gain as (KI_DIV, KI)
    pub integral: Option<(u8, u8)>,
}

impl RippleTuning {
    const UNSET: Self = Self {
        kmc: None,
        kmc_scale: None,
        filter_damping: None,
        proportional: None,
        integral: None,
    };
}

/// Logical configuration last written to the device
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConfigState {
    /// Bridge controlled over I2C
    pub i2c_controlled: bool,
    /// Control interface
    pub control_mode: ControlMode,
    /// Regulation loop
    pub regulation_mode: RegulationMode,
    /// Motor voltage range
    pub voltage_range: VoltageRange,
    /// Current regulation reference
    pub reference: VoltageReference,
    /// Stall detection enabled
    pub stall_detection: bool,
    /// Overvoltage protection enabled
    pub overvoltage_protection: bool,
    /// Stall response
    pub stall_behavior: StallBehavior,
    /// Bridge state at the ripple threshold
    pub threshold_behavior: ThresholdBehavior,
    /// IMODE value
    pub current_regulation_mode: u8,
    /// TINRUSH value
    pub inrush_duration: u16,
    /// Output bridge enabled (EN_OUT)
    pub bridge_enabled: bool,
    /// Ripple counting enabled (EN_RC)
    pub ripple_counting: bool,
    /// Duty-cycle control (DUTY_CTRL)
    pub duty_cycle_control: bool,
    /// nFAULT asserted on stall (STALL_REP)
    pub stall_reporting: bool,
    /// nFAULT asserted at the ripple threshold (RC_REP)
    pub count_threshold_reporting: bool,
    /// Soft start/stop (EN_SS)
    pub soft_start: bool,
    /// PWM frequency
    pub pwm_frequency: PwmFrequency,
    /// Current-sense gain, once a current target was set
    pub current_gain: Option<CurrentSenseGain>,
    /// Trip current derived from gain, reference and sense resistor
    pub trip_current: Option<f32>,
    /// Last speed target
    pub speed_target: Option<QuantizedValue>,
    /// W_SCALE selector last written; voltage targets leave it in place
    pub speed_scale_selector: u8,
    /// Last voltage target code
    pub voltage_target: Option<u8>,
    /// Last ripple threshold
    pub ripple_threshold: Option<QuantizedValue>,
    /// Motor resistance encoding
    pub inverse_resistance: Option<InverseResistance>,
    /// Ripple-counter loop tuning
    pub tuning: RippleTuning,
    /// Motion sequencer state
    pub motion: MotionState,
    /// Verbose diagnostics
    pub verbose: bool,
}

impl ConfigState {
    /// Mirror state for a configuration that is about to be applied
    #[must_use]
    pub const fn from_config(config: &Drv8214Config) -> Self {
        Self {
            i2c_controlled: config.i2c_controlled,
            control_mode: config.control_mode,
            regulation_mode: config.regulation_mode,
            voltage_range: config.voltage_range,
            reference: config.reference,
            stall_detection: config.stall_detection,
            overvoltage_protection: config.overvoltage_protection,
            stall_behavior: config.stall_behavior,
            threshold_behavior: config.threshold_behavior,
            current_regulation_mode: config.current_regulation_mode,
            inrush_duration: config.inrush_duration,
            bridge_enabled: false,
            ripple_counting: false,
            duty_cycle_control: false,
            stall_reporting: false,
            count_threshold_reporting: false,
            soft_start: false,
            pwm_frequency: PwmFrequency::Khz50,
            current_gain: None,
            trip_current: None,
            speed_target: None,
            speed_scale_selector: RESET_SPEED_SCALE_SELECTOR,
            voltage_target: None,
            ripple_threshold: None,
            inverse_resistance: None,
            tuning: RippleTuning::UNSET,
            motion: MotionState::Brake,
            verbose: config.verbose,
        }
    }

    /// Scale factor the device applies to speed values
    #[must_use]
    pub fn speed_scale(&self) -> u16 {
        SPEED_SCALE
            .factor_for(self.speed_scale_selector)
            .unwrap_or(RESET_SPEED_SCALE)
    }

    /// Convert an RC_STATUS1 reading to rad/s with the W_SCALE in effect
    #[must_use]
    pub fn speed_from_raw(&self, raw: u8) -> u32 {
        SPEED_SCALE
            .dequantize(u16::from(raw), self.speed_scale_selector)
            .unwrap_or(u32::from(raw) * u32::from(RESET_SPEED_SCALE))
    }

    /// Full-scale current of the active gain, if one was selected
    #[must_use]
    pub fn max_current(&self) -> Option<f32> {
        self.current_gain.map(CurrentSenseGain::max_current)
    }

    /// Current-sense gain in effect, the reset value until one is selected
    #[must_use]
    pub fn active_current_gain(&self) -> CurrentSenseGain {
        self.current_gain.unwrap_or(RESET_CURRENT_GAIN)
    }

    /// Recompute the trip current for a gain and sense resistor
    pub(crate) fn update_trip_current(&mut self, sense_resistor_ohms: f32) {
        let reference = self.reference.volts();
        self.trip_current = self
            .current_gain
            .map(|gain| gain.trip_current(reference, sense_resistor_ohms));
    }
}

impl Default for ConfigState {
    fn default() -> Self {
        Self::from_config(&Drv8214Config::default())
    }
}

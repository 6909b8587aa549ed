//! Motion sequencing
//!
//! Drives the bridge through I2C_EN_IN1/I2C_PH_IN2 once the device is I2C controlled. Every
//! command that moves the motor follows the same order: program the setpoint for the active
//! regulation mode, enable the bridge, then write both direction bits in one
//! read-modify-write so the bridge never sees a half-updated direction.
//!
//! Counted moves additionally reset the ripple counter and arm the threshold before the
//! motor starts.

use device_driver::RegisterInterface;

use crate::Error;
use crate::config::{ControlMode, RegulationMode, ThresholdBehavior};
use crate::device::Drv8214Driver;
use crate::diagnostics::DiagnosticSink;
use crate::registers::field;

/// Direction of rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// OUT1 high, OUT2 low
    Forward,
    /// OUT1 low, OUT2 high
    Reverse,
}

/// Last motion command issued to the bridge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotionState {
    /// Both low-side FETs on
    Brake,
    /// All FETs off
    Coast,
    /// Driving forward
    Forward,
    /// Driving in reverse
    Reverse,
    /// Driving until the ripple counter reaches `threshold`
    CountedMove {
        /// Direction of the move
        direction: Direction,
        /// Threshold the device actually armed, in ripples
        threshold: u32,
        /// Bridge state once the threshold is reached
        on_threshold: ThresholdBehavior,
    },
}

/// Bridge command, before it is mapped to input bits for a control mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BridgeCommand {
    Drive(Direction),
    Brake,
    Coast,
}

/// I2C_EN_IN1 (bit 1) and I2C_PH_IN2 (bit 0) for a command
///
/// PH/EN has no coast state, so `None` is returned for it.
const fn bridge_inputs(mode: ControlMode, command: BridgeCommand) -> Option<u8> {
    match (mode, command) {
        (ControlMode::Pwm, BridgeCommand::Drive(Direction::Forward)) => Some(0b10),
        (ControlMode::Pwm, BridgeCommand::Drive(Direction::Reverse)) => Some(0b01),
        (ControlMode::Pwm, BridgeCommand::Brake) => Some(0b11),
        (ControlMode::Pwm, BridgeCommand::Coast) => Some(0b00),
        (ControlMode::PhEn, BridgeCommand::Drive(Direction::Forward)) => Some(0b11),
        (ControlMode::PhEn, BridgeCommand::Drive(Direction::Reverse)) => Some(0b10),
        (ControlMode::PhEn, BridgeCommand::Brake) => Some(0b00),
        (ControlMode::PhEn, BridgeCommand::Coast) => None,
    }
}

impl<I, S> Drv8214Driver<I, S>
where
    I: RegisterInterface<AddressType = u8>,
    S: DiagnosticSink,
{
    /// Switch between PWM and PH/EN control and choose who drives the bridge inputs
    ///
    /// The bridge is disabled while the interface changes and re-enabled afterwards only if it
    /// was enabled before.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_control_mode(
        &mut self,
        mode: ControlMode,
        i2c_controlled: bool,
    ) -> Result<(), Error<I::Error>> {
        let was_enabled = self.state.bridge_enabled;
        self.set_bridge_enabled(false)?;

        self.set_i2c_control(i2c_controlled)?;
        self.regs.modify_bit(field::PMODE, mode == ControlMode::Pwm)?;
        self.state.control_mode = mode;

        if was_enabled {
            self.set_bridge_enabled(true)?;
        }
        Ok(())
    }

    /// Select the regulation loop
    ///
    /// Speed regulation needs the ripple counter, so it is enabled first.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_regulation_mode(&mut self, mode: RegulationMode) -> Result<(), Error<I::Error>> {
        if mode == RegulationMode::Speed {
            self.set_ripple_counting(true)?;
        }
        self.regs.modify_field(field::REG_CTRL, mode.bits())?;
        self.state.regulation_mode = mode;
        Ok(())
    }

    /// Drive forward at `setpoint`
    ///
    /// The setpoint is amperes, rad/s or volts depending on the regulation mode.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn turn_forward(&mut self, setpoint: f32) -> Result<(), Error<I::Error>> {
        self.drive(Direction::Forward, setpoint)?;
        self.state.motion = MotionState::Forward;
        Ok(())
    }

    /// Drive in reverse at `setpoint`
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn turn_reverse(&mut self, setpoint: f32) -> Result<(), Error<I::Error>> {
        self.drive(Direction::Reverse, setpoint)?;
        self.state.motion = MotionState::Reverse;
        Ok(())
    }

    /// Short the motor through the low-side FETs
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn brake(&mut self) -> Result<(), Error<I::Error>> {
        self.apply_bridge(BridgeCommand::Brake)?;
        self.state.motion = MotionState::Brake;
        self.verbose(format_args!("Braking"));
        Ok(())
    }

    /// Let the motor spin freely
    ///
    /// Not available in PH/EN mode: the request is reported on the diagnostic sink and nothing
    /// is written.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn coast(&mut self) -> Result<(), Error<I::Error>> {
        if bridge_inputs(self.state.control_mode, BridgeCommand::Coast).is_none() {
            #[cfg(feature = "defmt")]
            defmt::warn!("Coast is not available in PH/EN mode");
            let id = self.params.id;
            self.sink.write_line(format_args!(
                "DRV8214 driver {id}: coast is not available in PH/EN mode, command ignored"
            ));
            return Ok(());
        }
        self.apply_bridge(BridgeCommand::Coast)?;
        self.state.motion = MotionState::Coast;
        self.verbose(format_args!("Coasting"));
        Ok(())
    }

    /// Drive for a number of current ripples
    ///
    /// The ripple counter is cleared and the threshold armed before the motor starts. The
    /// threshold is quantized, so the move may stop slightly before `ripples`; the armed
    /// value is kept in [`MotionState::CountedMove`]. RC_HIZ is only rewritten when
    /// `on_threshold` differs from the current policy.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn turn_ripples(
        &mut self,
        ripples: u32,
        direction: Direction,
        setpoint: f32,
        on_threshold: ThresholdBehavior,
    ) -> Result<(), Error<I::Error>> {
        self.reset_ripple_counter()?;
        let threshold = self.set_ripple_threshold(ripples)?;
        if self.state.threshold_behavior != on_threshold {
            self.set_threshold_behavior(on_threshold)?;
        }

        self.drive(direction, setpoint)?;
        self.state.motion = MotionState::CountedMove {
            direction,
            threshold: threshold.value(),
            on_threshold,
        };
        Ok(())
    }

    /// Drive for a number of output revolutions
    ///
    /// Converted with the configured ripples per revolution, saturating on overflow.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn turn_revolutions(
        &mut self,
        revolutions: u32,
        direction: Direction,
        setpoint: f32,
        on_threshold: ThresholdBehavior,
    ) -> Result<(), Error<I::Error>> {
        let ripples = revolutions.saturating_mul(u32::from(self.params.ripples_per_revolution));
        self.turn_ripples(ripples, direction, setpoint, on_threshold)
    }

    /// Last motion command issued
    pub fn motion_state(&self) -> MotionState {
        self.state.motion
    }

    fn drive(&mut self, direction: Direction, setpoint: f32) -> Result<(), Error<I::Error>> {
        self.apply_setpoint(setpoint)?;
        self.apply_bridge(BridgeCommand::Drive(direction))?;

        #[cfg(feature = "defmt")]
        defmt::debug!("Driving {} at {}", direction, setpoint);
        self.verbose(format_args!("Turning {direction:?} at {setpoint}"));
        Ok(())
    }

    fn apply_setpoint(&mut self, setpoint: f32) -> Result<(), Error<I::Error>> {
        let mode = self.state.regulation_mode;
        if mode.is_current() {
            self.set_trip_current(setpoint)?;
        } else if mode == RegulationMode::Speed {
            self.set_speed(setpoint)?;
        } else {
            self.set_voltage(setpoint)?;
        }
        Ok(())
    }

    fn apply_bridge(&mut self, command: BridgeCommand) -> Result<(), Error<I::Error>> {
        let Some(inputs) = bridge_inputs(self.state.control_mode, command) else {
            return Ok(());
        };
        self.set_bridge_enabled(true)?;
        self.regs.modify_field(field::I2C_INPUTS, inputs)?;
        Ok(())
    }
}

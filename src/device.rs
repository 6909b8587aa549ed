//! High-level driver API for the DRV8214
//!
//! This module turns engineering-unit requests into register writes and keeps the
//! [`ConfigState`] mirror in step with them. Motion sequencing (forward, reverse, brake,
//! coast, counted moves) lives in [`crate::motion`].
//!
//! Out-of-range requests are clamped to the nearest value the device can represent. Clamps
//! and scale choices are reported on the diagnostic sink when verbose output is enabled, and
//! never surface as errors.

use core::f32::consts::PI;
use core::fmt;

use device_driver::RegisterInterface;

use crate::access::RegisterAccess;
use crate::config::{
    DriverParams, Drv8214Config, MAX_CURRENT_REGULATION_MODE, PwmFrequency, StallBehavior,
    ThresholdBehavior, VoltageReference,
};
use crate::diagnostics::{DiagnosticSink, NoDiagnostics};
use crate::fault::FaultStatus;
use crate::interface::I2cInterface;
use crate::registers::{Field, Register, field};
use crate::scaling::{
    self, CurrentSenseGain, InverseResistance, QuantizedValue, RIPPLE_THRESHOLD_SCALE,
    SPEED_SCALE, VoltageRange,
};
use crate::state::ConfigState;
use crate::{DeviceAddress, Error};

/// Time the bridge is left disabled during initialization before it is reconfigured
pub const INIT_SETTLE_MS: u32 = 50;

/// Main driver for the DRV8214
pub struct Drv8214Driver<I, S = NoDiagnostics> {
    pub(crate) regs: RegisterAccess<I>,
    pub(crate) params: DriverParams,
    pub(crate) state: ConfigState,
    pub(crate) sink: S,
}

impl<I2C> Drv8214Driver<I2cInterface<I2C>, NoDiagnostics>
where
    I2C: embedded_hal::i2c::I2c,
{
    /// Create a driver on an I2C bus, addressed by `params.address`
    ///
    /// No bus traffic happens until [`init`](Self::init) or another operation is called.
    pub fn new_i2c(i2c: I2C, params: DriverParams) -> Self {
        Self::new(I2cInterface::new(i2c, params.address), params)
    }
}

impl<I> Drv8214Driver<I, NoDiagnostics>
where
    I: RegisterInterface<AddressType = u8>,
{
    /// Create a driver over any register interface, without diagnostic output
    pub fn new(interface: I, params: DriverParams) -> Self {
        Self::with_diagnostics(interface, params, NoDiagnostics)
    }
}

impl<I, S> Drv8214Driver<I, S>
where
    I: RegisterInterface<AddressType = u8>,
    S: DiagnosticSink,
{
    /// Create a driver that reports to `sink`
    pub fn with_diagnostics(interface: I, params: DriverParams, sink: S) -> Self {
        Self {
            regs: RegisterAccess::new(interface),
            params,
            state: ConfigState::default(),
            sink,
        }
    }

    /// Apply a configuration and leave the motor braked
    ///
    /// The bridge is disabled first and left to settle for [`INIT_SETTLE_MS`] before any mode
    /// is changed.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails. Settings applied before the
    /// failure stay applied and mirrored.
    ///
    /// # Example
    ///
    /// ```ignore
    /// use drv8214::{DeviceAddress, DriverParams, Drv8214Config, Drv8214Driver};
    ///
    /// let params = DriverParams::new(DeviceAddress::LowLow, 0, 1500.0, 6);
    /// let mut motor = Drv8214Driver::new_i2c(i2c, params);
    /// motor.init(&Drv8214Config::default(), &mut delay)?;
    /// motor.turn_forward(1200.0)?;
    /// ```
    pub fn init<D>(&mut self, config: &Drv8214Config, delay: &mut D) -> Result<(), Error<I::Error>>
    where
        D: embedded_hal::delay::DelayNs,
    {
        self.state.verbose = config.verbose;

        self.set_bridge_enabled(false)?;
        delay.delay_ms(INIT_SETTLE_MS);

        self.set_control_mode(config.control_mode, config.i2c_controlled)?;
        self.set_regulation_mode(config.regulation_mode)?;
        self.set_voltage_range(config.voltage_range)?;
        self.set_overvoltage_protection(config.overvoltage_protection)?;
        self.set_current_regulation_mode(config.current_regulation_mode)?;
        self.set_stall_detection(config.stall_detection)?;
        self.set_stall_behavior(config.stall_behavior)?;
        self.set_threshold_behavior(config.threshold_behavior)?;
        self.set_voltage_reference(config.reference)?;
        self.set_inrush_duration(config.inrush_duration)?;
        self.set_motor_resistance(config.motor_resistance_ohms)?;

        self.brake()?;

        #[cfg(feature = "defmt")]
        defmt::info!("DRV8214 driver {} initialized", self.params.id);

        if self.state.verbose {
            self.report_config();
        }
        Ok(())
    }

    /// Strap-selected bus address
    pub const fn address(&self) -> DeviceAddress {
        self.params.address
    }

    /// Application-level driver identifier
    pub const fn id(&self) -> u8 {
        self.params.id
    }

    /// IPROPI resistor in ohms
    pub const fn sense_resistor_ohms(&self) -> f32 {
        self.params.sense_resistor_ohms
    }

    /// Ripples per output revolution
    pub const fn ripples_per_revolution(&self) -> u16 {
        self.params.ripples_per_revolution
    }

    /// Construction parameters
    pub const fn params(&self) -> &DriverParams {
        &self.params
    }

    /// Configuration last written to the device
    pub const fn state(&self) -> &ConfigState {
        &self.state
    }

    /// Trip current the device regulates to, once a current target was set
    pub fn trip_current(&self) -> Option<f32> {
        self.state.trip_current
    }

    /// Turn verbose diagnostics on or off
    pub fn set_verbose(&mut self, verbose: bool) {
        self.state.verbose = verbose;
    }

    /// Consume the driver and return the underlying interface
    pub fn release(self) -> I {
        self.regs.release()
    }

    /// Read and decode the FAULT register
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn read_fault_status(&mut self) -> Result<FaultStatus, Error<I::Error>> {
        let raw = self.regs.read(Register::Fault)?;
        Ok(FaultStatus::from_raw(raw))
    }

    /// Raw speed estimate from the ripple counter (RC_STATUS1)
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn read_speed_raw(&mut self) -> Result<u8, Error<I::Error>> {
        Ok(self.regs.read(Register::RcStatus1)?)
    }

    /// Speed estimate in rad/s, scaled by the active W_SCALE
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn read_speed_rad_s(&mut self) -> Result<u32, Error<I::Error>> {
        let raw = self.read_speed_raw()?;
        Ok(self.state.speed_from_raw(raw))
    }

    /// Speed estimate in revolutions per minute
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn read_speed_rpm(&mut self) -> Result<f32, Error<I::Error>> {
        let rad_s = self.read_speed_rad_s()?;
        Ok(rad_s as f32 * 60.0 / (2.0 * PI))
    }

    /// 16-bit ripple counter (RC_STATUS3:RC_STATUS2)
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn read_ripple_count(&mut self) -> Result<u16, Error<I::Error>> {
        let low = self.regs.read(Register::RcStatus2)?;
        let high = self.regs.read(Register::RcStatus3)?;
        Ok(u16::from_le_bytes([low, high]))
    }

    /// Raw motor terminal voltage (REG_STATUS1)
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn read_voltage_raw(&mut self) -> Result<u8, Error<I::Error>> {
        Ok(self.regs.read(Register::RegStatus1)?)
    }

    /// Motor terminal voltage in volts
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn read_voltage(&mut self) -> Result<f32, Error<I::Error>> {
        let raw = self.read_voltage_raw()?;
        Ok(scaling::voltage::terminal_voltage(raw))
    }

    /// Raw motor current (REG_STATUS2)
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn read_current_raw(&mut self) -> Result<u8, Error<I::Error>> {
        Ok(self.regs.read(Register::RegStatus2)?)
    }

    /// Motor current in amperes, relative to the active current-sense gain
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn read_current(&mut self) -> Result<f32, Error<I::Error>> {
        let raw = self.read_current_raw()?;
        Ok(self.state.active_current_gain().reading_to_amps(raw))
    }

    /// Bridge duty cycle from the regulation loop (0 = 0%, 63 = 100%)
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn read_duty_cycle(&mut self) -> Result<u8, Error<I::Error>> {
        Ok(self.regs.read_field(field::IN_DUTY)?)
    }

    /// Read any register as-is
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn read_register_raw(&mut self, register: Register) -> Result<u8, Error<I::Error>> {
        Ok(self.regs.read(register)?)
    }

    /// Enable or disable the output bridge (EN_OUT)
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_bridge_enabled(&mut self, enabled: bool) -> Result<(), Error<I::Error>> {
        self.regs.modify_bit(field::EN_OUT, enabled)?;
        self.state.bridge_enabled = enabled;
        Ok(())
    }

    /// Enable the output bridge
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn enable_bridge(&mut self) -> Result<(), Error<I::Error>> {
        self.set_bridge_enabled(true)
    }

    /// Put every bridge FET in Hi-Z
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn disable_bridge(&mut self) -> Result<(), Error<I::Error>> {
        self.set_bridge_enabled(false)
    }

    /// Enable or disable stall detection
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_stall_detection(&mut self, enabled: bool) -> Result<(), Error<I::Error>> {
        self.regs.modify_bit(field::EN_STALL, enabled)?;
        self.state.stall_detection = enabled;
        Ok(())
    }

    /// Select the motor voltage range
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_voltage_range(&mut self, range: VoltageRange) -> Result<(), Error<I::Error>> {
        self.regs.modify_bit(field::VM_GAIN_SEL, range.gain_select())?;
        self.state.voltage_range = range;
        Ok(())
    }

    /// Enable or disable overvoltage protection
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_overvoltage_protection(&mut self, enabled: bool) -> Result<(), Error<I::Error>> {
        self.regs.modify_bit(field::EN_OVP, enabled)?;
        self.state.overvoltage_protection = enabled;
        Ok(())
    }

    /// Reset the ripple counter and CNT_DONE
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn reset_ripple_counter(&mut self) -> Result<(), Error<I::Error>> {
        self.regs.pulse(field::CLR_CNT)?;
        Ok(())
    }

    /// Clear all fault flags
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn clear_faults(&mut self) -> Result<(), Error<I::Error>> {
        self.regs.pulse(field::CLR_FLT)?;
        Ok(())
    }

    /// Enable or disable duty-cycle control mode
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_duty_cycle_control(&mut self, enabled: bool) -> Result<(), Error<I::Error>> {
        self.regs.modify_bit(field::DUTY_CTRL, enabled)?;
        self.state.duty_cycle_control = enabled;
        Ok(())
    }

    /// Set how long stall detection ignores inrush current
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_inrush_duration(&mut self, duration: u16) -> Result<(), Error<I::Error>> {
        let [low, high] = duration.to_le_bytes();
        self.regs.write(field::TINRUSH_LOW.register, low)?;
        self.regs.write(field::TINRUSH_HIGH.register, high)?;
        self.state.inrush_duration = duration;
        Ok(())
    }

    /// Set the IMODE current regulation mode; values above 3 are clamped
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_current_regulation_mode(&mut self, mode: u8) -> Result<(), Error<I::Error>> {
        let mode = self.clamp_field_value(field::IMODE, mode);
        debug_assert!(mode <= MAX_CURRENT_REGULATION_MODE);
        self.regs.modify_field(field::IMODE, mode)?;
        self.state.current_regulation_mode = mode;
        Ok(())
    }

    /// Choose what happens when a stall is detected
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_stall_behavior(&mut self, behavior: StallBehavior) -> Result<(), Error<I::Error>> {
        self.regs
            .modify_bit(field::SMODE, behavior == StallBehavior::KeepDriving)?;
        self.state.stall_behavior = behavior;
        Ok(())
    }

    /// Select the current regulation reference
    ///
    /// External references are clamped with [`VoltageReference::clamped`]: a non-positive or
    /// NaN voltage selects the internal reference, anything above 3.3 V is capped. The trip
    /// current is recomputed when a current-sense gain has already been chosen.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_voltage_reference(
        &mut self,
        reference: VoltageReference,
    ) -> Result<(), Error<I::Error>> {
        let clamped = reference.clamped();
        if clamped != reference {
            #[cfg(feature = "defmt")]
            defmt::warn!("VREF {} clamped to {}", reference.volts(), clamped.volts());
            self.verbose(format_args!(
                "Requested VREF {} V clamped to {clamped:?}",
                reference.volts()
            ));
        }

        self.regs
            .modify_bit(field::INT_VREF, clamped == VoltageReference::Internal)?;
        self.state.reference = clamped;
        self.state.update_trip_current(self.params.sense_resistor_ohms);
        Ok(())
    }

    /// Let the I2C_EN_IN1/I2C_PH_IN2 bits drive the bridge instead of the INx pins
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_i2c_control(&mut self, enabled: bool) -> Result<(), Error<I::Error>> {
        self.regs.modify_bit(field::I2C_BC, enabled)?;
        self.state.i2c_controlled = enabled;
        Ok(())
    }

    /// Pull nFAULT low on stall
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_stall_reporting(&mut self, enabled: bool) -> Result<(), Error<I::Error>> {
        self.regs.modify_bit(field::STALL_REP, enabled)?;
        self.state.stall_reporting = enabled;
        Ok(())
    }

    /// Report the ripple count threshold on nFAULT (RC_REP all ones) or not at all
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_count_threshold_reporting(
        &mut self,
        enabled: bool,
    ) -> Result<(), Error<I::Error>> {
        self.regs.modify_bit(field::RC_REP, enabled)?;
        self.state.count_threshold_reporting = enabled;
        Ok(())
    }

    /// Enable or disable soft start/stop
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_soft_start(&mut self, enabled: bool) -> Result<(), Error<I::Error>> {
        self.regs.modify_bit(field::EN_SS, enabled)?;
        self.state.soft_start = enabled;
        Ok(())
    }

    /// Select the PWM frequency
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_pwm_frequency(&mut self, frequency: PwmFrequency) -> Result<(), Error<I::Error>> {
        self.regs
            .modify_bit(field::PWM_FREQ, frequency == PwmFrequency::Khz25)?;
        self.state.pwm_frequency = frequency;
        Ok(())
    }

    /// Program the speed target in rad/s
    ///
    /// Speeds above 32640 rad/s are clamped. Returns the encoding actually written; its
    /// [`value`](QuantizedValue::value) is the speed the device will regulate to.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_speed(&mut self, rad_s: f32) -> Result<QuantizedValue, Error<I::Error>> {
        if SPEED_SCALE.clamp(rad_s) != rad_s {
            self.verbose(format_args!(
                "Requested speed {rad_s} rad/s clamped to 0..={}",
                SPEED_SCALE.ceiling()
            ));
        }
        let target = SPEED_SCALE.quantize(rad_s);

        self.regs.write(field::WSET_VSET.register, target.low_byte())?;
        self.regs.modify_field(field::W_SCALE, target.selector)?;
        self.state.speed_target = Some(target);
        self.state.speed_scale_selector = target.selector;
        self.state.voltage_target = None;

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "WSET_VSET={} W_SCALE={} effective speed {} rad/s",
            target.mantissa,
            target.selector,
            target.value()
        );
        self.verbose(format_args!(
            "WSET_VSET: {} | W_SCALE: {} | Effective target speed: {} rad/s",
            target.mantissa,
            target.selector,
            target.value()
        ));
        Ok(target)
    }

    /// Program the terminal-voltage target in volts
    ///
    /// The request is clamped to the active range; in the 15.7 V range anything above
    /// full scale becomes 11 V. Returns the WSET_VSET code written.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_voltage(&mut self, volts: f32) -> Result<u8, Error<I::Error>> {
        let range = self.state.voltage_range;
        let clamped = range.clamp(volts);
        if clamped != volts {
            self.verbose(format_args!(
                "Requested voltage {volts} V clamped to {clamped} V"
            ));
        }
        let code = range.encode(volts);

        self.regs.write(field::WSET_VSET.register, code)?;
        self.state.voltage_target = Some(code);
        self.state.speed_target = None;

        #[cfg(feature = "defmt")]
        defmt::debug!("WSET_VSET={} for {} V", code, clamped);
        self.verbose(format_args!(
            "WSET_VSET: {code} | Effective target voltage: {} V",
            range.decode(code)
        ));
        Ok(code)
    }

    /// Enable or disable ripple counting
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_ripple_counting(&mut self, enabled: bool) -> Result<(), Error<I::Error>> {
        self.regs.modify_bit(field::EN_RC, enabled)?;
        self.state.ripple_counting = enabled;
        Ok(())
    }

    /// Choose whether the bridge goes Hi-Z when the ripple threshold is reached
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_threshold_behavior(
        &mut self,
        behavior: ThresholdBehavior,
    ) -> Result<(), Error<I::Error>> {
        self.regs
            .modify_bit(field::RC_HIZ, behavior == ThresholdBehavior::DisableBridge)?;
        self.state.threshold_behavior = behavior;
        Ok(())
    }

    /// Program the current regulation / stall trip current in amperes
    ///
    /// Picks the most sensitive current-sense gain that covers the request. Returns the trip
    /// current the device will actually use, which depends on the reference voltage and the
    /// IPROPI resistor rather than on the request itself.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_trip_current(&mut self, requested_a: f32) -> Result<f32, Error<I::Error>> {
        let gain = CurrentSenseGain::select(requested_a);
        if requested_a > gain.max_current() {
            self.verbose(format_args!(
                "Requested current {requested_a} A clamped to {} A",
                gain.max_current()
            ));
        }

        self.regs.modify_field(field::CS_GAIN_SEL, gain.bits())?;
        self.state.current_gain = Some(gain);
        self.state.update_trip_current(self.params.sense_resistor_ohms);
        let trip = self.state.trip_current.unwrap_or_default();

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "CS_GAIN_SEL={=u8:b} gain={} uA/A trip={} A",
            gain.bits(),
            gain.gain_ua_per_a(),
            trip
        );
        self.verbose(format_args!(
            "Requested I = {requested_a:.3} A => CS_GAIN_SEL: {:#05b} => A_IPROPI = {} uA/A => Actual I_trip = {trip:.3} A",
            gain.bits(),
            gain.gain_ua_per_a()
        ));
        Ok(trip)
    }

    /// Program the ripple count threshold
    ///
    /// The 10-bit mantissa is split across RC_CTRL1 (bits 7:0) and RC_CTRL2 (bits 9:8), with
    /// the scale selector in RC_CTRL2. Thresholds above 65535 are clamped. Returns the
    /// encoding actually written.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_ripple_threshold(&mut self, ripples: u32) -> Result<QuantizedValue, Error<I::Error>> {
        let requested = ripples as f32;
        if requested > RIPPLE_THRESHOLD_SCALE.ceiling() as f32 {
            self.verbose(format_args!(
                "Requested ripple threshold {ripples} clamped to {}",
                RIPPLE_THRESHOLD_SCALE.ceiling()
            ));
        }
        let threshold = RIPPLE_THRESHOLD_SCALE.quantize(requested);

        self.regs.write(field::RC_THR_LOW.register, threshold.low_byte())?;
        self.regs
            .modify_field(field::RC_THR_HIGH, threshold.high_bits())?;
        self.regs
            .modify_field(field::RC_THR_SCALE, threshold.selector)?;
        self.state.ripple_threshold = Some(threshold);

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "RC_THR={} RC_THR_SCALE={} effective threshold {}",
            threshold.mantissa,
            threshold.selector,
            threshold.value()
        );
        self.verbose(format_args!(
            "RC_THR: {} | RC_THR_SCALE: {} | Effective threshold: {} ripples",
            threshold.mantissa,
            threshold.selector,
            threshold.value()
        ));
        Ok(threshold)
    }

    /// Program the motor armature resistance used by the ripple counter
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_motor_resistance(
        &mut self,
        ohms: f32,
    ) -> Result<InverseResistance, Error<I::Error>> {
        let encoding = InverseResistance::from_ohms(ohms);

        self.regs.modify_field(field::INV_R_SCALE, encoding.selector)?;
        self.regs.write(field::INV_R.register, encoding.inv_r)?;
        self.state.inverse_resistance = Some(encoding);

        self.verbose(format_args!(
            "INV_R: {} | INV_R_SCALE: {} | Represented resistance: {} ohm",
            encoding.inv_r,
            encoding.selector,
            encoding.ohms()
        ));
        Ok(encoding)
    }

    /// Program the motor back-EMF constant (KMC)
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_kmc(&mut self, kmc: u8) -> Result<(), Error<I::Error>> {
        self.regs.write(field::KMC.register, kmc)?;
        self.state.tuning.kmc = Some(kmc);
        Ok(())
    }

    /// Program the KMC scale selector (0-3)
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_kmc_scale(&mut self, selector: u8) -> Result<(), Error<I::Error>> {
        let selector = self.clamp_field_value(field::KMC_SCALE, selector);
        self.regs.modify_field(field::KMC_SCALE, selector)?;
        self.state.tuning.kmc_scale = Some(selector);
        Ok(())
    }

    /// Program the ripple filter coefficient FLT_K (0-15)
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_filter_damping(&mut self, damping: u8) -> Result<(), Error<I::Error>> {
        let damping = self.clamp_field_value(field::FLT_K, damping);
        self.regs.modify_field(field::FLT_K, damping)?;
        self.state.tuning.filter_damping = Some(damping);
        Ok(())
    }

    /// Program the speed loop proportional gain: divisor selector (0-7) and gain (0-31)
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_proportional_gain(&mut self, divisor: u8, gain: u8) -> Result<(), Error<I::Error>> {
        let divisor = self.clamp_field_value(field::KP_DIV, divisor);
        let gain = self.clamp_field_value(field::KP, gain);
        self.regs
            .write(Register::RcCtrl7, field::KP_DIV.encode(divisor) | field::KP.encode(gain))?;
        self.state.tuning.proportional = Some((divisor, gain));
        Ok(())
    }

    /// Program the speed loop integral gain: divisor selector (0-7) and gain (0-31)
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_integral_gain(&mut self, divisor: u8, gain: u8) -> Result<(), Error<I::Error>> {
        let divisor = self.clamp_field_value(field::KI_DIV, divisor);
        let gain = self.clamp_field_value(field::KI, gain);
        self.regs
            .write(Register::RcCtrl8, field::KI_DIV.encode(divisor) | field::KI.encode(gain))?;
        self.state.tuning.integral = Some((divisor, gain));
        Ok(())
    }

    /// Read the FAULT register and describe it on the diagnostic sink
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn report_faults(&mut self) -> Result<FaultStatus, Error<I::Error>> {
        let status = self.read_fault_status()?;
        let id = self.params.id;

        self.sink
            .write_line(format_args!("DRV8214 driver {id} - FAULT register status:"));
        if status.fault {
            self.sink
                .write_line(format_args!(" - FAULT: general fault detected"));
        } else {
            self.sink.write_line(format_args!(" - FAULT: no faults detected"));
        }
        for description in status.descriptions() {
            self.sink.write_line(format_args!(" - {description}"));
        }
        Ok(status)
    }

    /// Describe the mirrored configuration on the diagnostic sink
    pub fn report_config(&mut self) {
        let params = self.params;
        let state = self.state;
        let enabled = |flag: bool| if flag { "Enabled" } else { "Disabled" };

        self.sink.write_line(format_args!(
            "DRV8214 driver {} | Address: {:#04X} | Sense resistor: {} ohm | Ripples per revolution: {}",
            params.id,
            params.address.addr(),
            params.sense_resistor_ohms,
            params.ripples_per_revolution
        ));
        self.sink.write_line(format_args!(
            "OVP: {} | Stall detection: {} | I2C controlled: {} | Mode: {:?} | Regulation: {:?}",
            enabled(state.overvoltage_protection),
            enabled(state.stall_detection),
            if state.i2c_controlled { "Yes" } else { "No" },
            state.control_mode,
            state.regulation_mode
        ));
        self.sink.write_line(format_args!(
            "Vref: {:.3} V | Current reg. mode: {} | Stall behavior: {} | Bridge at threshold: {} | VRange: {}",
            state.reference.volts(),
            state.current_regulation_mode,
            match state.stall_behavior {
                StallBehavior::DisableOutputs => "Disable outputs",
                StallBehavior::KeepDriving => "Drive current",
            },
            match state.threshold_behavior {
                ThresholdBehavior::StayEnabled => "H-bridge stays enabled",
                ThresholdBehavior::DisableBridge => "H-bridge disabled",
            },
            match state.voltage_range {
                VoltageRange::Low => "0V-3.92V",
                VoltageRange::High => "0V-15.7V",
            }
        ));
    }

    pub(crate) fn verbose(&mut self, line: fmt::Arguments<'_>) {
        if self.state.verbose {
            self.sink.write_line(line);
        }
    }

    /// Clamp `value` to what `field` can hold, noting the clamp when verbose
    fn clamp_field_value(&mut self, field: Field, value: u8) -> u8 {
        let max = field.max_value();
        if value > max {
            #[cfg(feature = "defmt")]
            defmt::warn!("Value {} clamped to {} for {}", value, max, field);
            self.verbose(format_args!(
                "Value {value} does not fit register {:#04X} mask {:#04X}, clamped to {max}",
                field.register.address(),
                field.mask
            ));
            max
        } else {
            value
        }
    }
}

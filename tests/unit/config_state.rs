//! Unit tests for the configuration mirror and diagnostics

use crate::common::{MockDelay, create_mock_driver, create_recording_driver};
use drv8214::{
    ControlMode, DeviceAddress, Drv8214Config, PwmFrequency, Register, RegulationMode,
    StallBehavior, VoltageRange, VoltageReference,
};

#[test]
fn test_identity_getters() {
    let (driver, _interface) = create_mock_driver();

    assert_eq!(driver.address(), DeviceAddress::LowLow);
    assert_eq!(driver.id(), 1);
    assert_eq!(driver.sense_resistor_ohms(), 1500.0);
    assert_eq!(driver.ripples_per_revolution(), 6);
}

#[test]
fn test_mirror_tracks_init() {
    let (mut driver, _interface) = create_mock_driver();
    let config = Drv8214Config {
        control_mode: ControlMode::PhEn,
        regulation_mode: RegulationMode::CurrentCycles,
        voltage_range: VoltageRange::High,
        reference: VoltageReference::External(1.2),
        stall_behavior: StallBehavior::KeepDriving,
        current_regulation_mode: 2,
        inrush_duration: 500,
        ..Drv8214Config::default()
    };

    driver.init(&config, &mut MockDelay::default()).unwrap();

    let state = driver.state();
    assert_eq!(state.control_mode, ControlMode::PhEn);
    assert_eq!(state.regulation_mode, RegulationMode::CurrentCycles);
    assert_eq!(state.voltage_range, VoltageRange::High);
    assert_eq!(state.reference, VoltageReference::External(1.2));
    assert_eq!(state.stall_behavior, StallBehavior::KeepDriving);
    assert_eq!(state.current_regulation_mode, 2);
    assert_eq!(state.inrush_duration, 500);
    assert!(state.bridge_enabled);
    assert!(state.inverse_resistance.is_some());
}

#[test]
fn test_mirror_tracks_setters() {
    let (mut driver, interface) = create_mock_driver();

    driver.set_soft_start(true).unwrap();
    driver.set_pwm_frequency(PwmFrequency::Khz25).unwrap();
    driver.set_duty_cycle_control(true).unwrap();
    driver.set_stall_reporting(true).unwrap();
    driver.set_kmc(0x42).unwrap();

    let state = driver.state();
    assert!(state.soft_start);
    assert_eq!(state.pwm_frequency, PwmFrequency::Khz25);
    assert!(state.duty_cycle_control);
    assert!(state.stall_reporting);
    assert_eq!(state.tuning.kmc, Some(0x42));

    assert_eq!(interface.get_register(Register::RegCtrl0), 0x24);
    assert_eq!(interface.get_register(Register::Config0), 0x01);
    assert_eq!(interface.get_register(Register::Config4), 0x20);
    assert_eq!(interface.get_register(Register::RcCtrl4), 0x42);
}

#[test]
fn test_overvoltage_flag_is_honored() {
    let (mut driver, interface) = create_mock_driver();
    let config = Drv8214Config {
        overvoltage_protection: false,
        stall_detection: false,
        ..Drv8214Config::default()
    };

    driver.init(&config, &mut MockDelay::default()).unwrap();

    // EN_OUT | VM_GAIN_SEL only
    assert_eq!(interface.get_register(Register::Config0), 0x88);
    assert_eq!(interface.get_register(Register::Config3) & 0x20, 0x00);
}

#[test]
fn test_quiet_by_default() {
    let (mut driver, _interface, sink) = create_recording_driver();

    driver
        .init(&Drv8214Config::default(), &mut MockDelay::default())
        .unwrap();
    driver.set_speed(100_000.0).unwrap();

    assert!(sink.lines().is_empty());
}

#[test]
fn test_verbose_init_reports_config() {
    let (mut driver, _interface, sink) = create_recording_driver();
    let config = Drv8214Config {
        verbose: true,
        ..Drv8214Config::default()
    };

    driver.init(&config, &mut MockDelay::default()).unwrap();

    assert!(sink.contains("INV_R: 51 | INV_R_SCALE: 2"));
    assert!(sink.contains("DRV8214 driver 1 | Address: 0x60"));
    assert!(sink.contains("Regulation: Speed"));
    assert!(sink.contains("VRange: 0V-3.92V"));
}

#[test]
fn test_verbose_reports_clamp() {
    let (mut driver, _interface, sink) = create_recording_driver();
    driver.set_verbose(true);

    driver.set_speed(100_000.0).unwrap();

    assert!(sink.contains("clamped to 0..=32640"));
    assert!(sink.contains("Effective target speed: 32640 rad/s"));
}

#[test]
fn test_verbose_reports_reference_clamp() {
    let (mut driver, _interface, sink) = create_recording_driver();
    driver.set_verbose(true);

    driver
        .set_voltage_reference(VoltageReference::External(-1.0))
        .unwrap();

    assert!(sink.contains("Requested VREF -1 V clamped to Internal"));
}

#[test]
fn test_release_returns_interface() {
    let (mut driver, interface) = create_mock_driver();
    driver.set_kmc(7).unwrap();

    let released = driver.release();

    assert_eq!(released.get_register(Register::RcCtrl4), 7);
    assert_eq!(interface.get_register(Register::RcCtrl4), 7);
}

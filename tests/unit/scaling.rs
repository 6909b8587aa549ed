//! Unit tests for setpoint encoding through the driver

use crate::common::{MockDelay, assert_float_eq, create_mock_driver};
use drv8214::{CurrentSenseGain, Drv8214Config, Register, VoltageRange, VoltageReference};

fn initialized() -> (
    drv8214::Drv8214Driver<crate::common::MockInterface>,
    crate::common::MockInterface,
) {
    let (mut driver, interface) = create_mock_driver();
    driver
        .init(&Drv8214Config::default(), &mut MockDelay::default())
        .unwrap();
    interface.clear_operations();
    (driver, interface)
}

#[test]
fn test_speed_smallest_scale() {
    let (mut driver, interface) = initialized();

    let target = driver.set_speed(1000.0).unwrap();

    assert_eq!(target.mantissa, 62);
    assert_eq!(target.value(), 992);
    assert_eq!(interface.get_register(Register::RegCtrl1), 62);
    assert_eq!(interface.get_register(Register::RegCtrl0), 0x10);
}

#[test]
fn test_speed_scale_boundary() {
    let (mut driver, interface) = initialized();

    let target = driver.set_speed(4096.0).unwrap();

    assert_eq!(target.mantissa, 128);
    assert_eq!(target.factor, 32);
    assert_eq!(interface.get_register(Register::RegCtrl1), 128);
    // REG_CTRL = speed, W_SCALE = 01
    assert_eq!(interface.get_register(Register::RegCtrl0), 0x11);
    assert_eq!(driver.state().speed_scale(), 32);
}

#[test]
fn test_speed_clamped_to_ceiling() {
    let (mut driver, interface) = initialized();

    let target = driver.set_speed(100_000.0).unwrap();

    assert_eq!(target.value(), 32640);
    assert_eq!(interface.get_register(Register::RegCtrl1), 255);
    assert_eq!(interface.get_register(Register::RegCtrl0), 0x13);
}

#[test]
fn test_speed_write_order() {
    let (mut driver, interface) = initialized();

    driver.set_speed(2000.0).unwrap();

    assert_eq!(interface.written_addresses(), vec![0x0F, 0x0E]);
}

#[test]
fn test_ripple_threshold_split() {
    let (mut driver, interface) = initialized();

    let threshold = driver.set_ripple_threshold(2000).unwrap();

    assert_eq!(threshold.mantissa, 1000);
    assert_eq!(threshold.factor, 2);
    assert_eq!(interface.get_register(Register::RcCtrl1), 0xE8);
    // INV_R_SCALE from init is preserved
    assert_eq!(interface.get_register(Register::RcCtrl2), 0x83);
}

#[test]
fn test_ripple_threshold_ceiling() {
    let (mut driver, interface) = initialized();

    let threshold = driver.set_ripple_threshold(1_000_000).unwrap();

    assert_eq!(threshold.value(), 65472);
    assert_eq!(interface.get_register(Register::RcCtrl1), 0xFF);
    assert_eq!(interface.get_register(Register::RcCtrl2), 0x8F);
}

#[test]
fn test_trip_current_selects_covering_gain() {
    let (mut driver, interface) = initialized();

    let trip = driver.set_trip_current(0.3).unwrap();

    assert_eq!(driver.state().current_gain, Some(CurrentSenseGain::Max0A5));
    // EN_RC kept, CS_GAIN_SEL = 011
    assert_eq!(interface.get_register(Register::RcCtrl0), 0x83);
    // 0.5 V / (1500 ohm * 1125 uA/A)
    assert_float_eq(trip, 0.296_296, 1e-4);
    assert_eq!(driver.trip_current(), Some(trip));
}

#[test]
fn test_trip_current_above_range() {
    let (mut driver, interface) = initialized();

    let trip = driver.set_trip_current(10.0).unwrap();

    assert_eq!(driver.state().current_gain, Some(CurrentSenseGain::Max4A));
    assert_eq!(interface.get_register(Register::RcCtrl0), 0x80);
    assert_float_eq(trip, 1.481_48, 1e-3);
}

#[test]
fn test_reference_change_recomputes_trip() {
    let (mut driver, _interface) = initialized();
    driver.set_trip_current(0.3).unwrap();

    driver
        .set_voltage_reference(drv8214::VoltageReference::External(1.0))
        .unwrap();

    assert_float_eq(driver.trip_current().unwrap(), 0.592_593, 1e-4);
}

#[test]
fn test_invalid_external_reference_falls_back_to_internal() {
    for volts in [-1.0_f32, 0.0, f32::NAN] {
        let (mut driver, interface) = initialized();
        driver.set_trip_current(0.3).unwrap();

        driver
            .set_voltage_reference(VoltageReference::External(volts))
            .unwrap();

        assert_eq!(driver.state().reference, VoltageReference::Internal);
        assert_eq!(interface.get_register(Register::Config3) & 0x10, 0x10);
        // 0.5 / (1500 * 1125e-6)
        assert_float_eq(driver.trip_current().unwrap(), 0.296_296, 1e-4);
    }
}

#[test]
fn test_external_reference_capped() {
    let (mut driver, interface) = initialized();
    driver.set_trip_current(0.3).unwrap();

    driver
        .set_voltage_reference(VoltageReference::External(5.0))
        .unwrap();

    assert_eq!(driver.state().reference, VoltageReference::External(3.3));
    assert_eq!(interface.get_register(Register::Config3) & 0x10, 0);
    assert_float_eq(driver.trip_current().unwrap(), 1.955_56, 1e-3);
}

#[test]
fn test_voltage_low_range() {
    let (mut driver, interface) = initialized();

    assert_eq!(driver.set_voltage(2.0).unwrap(), 130);
    assert_eq!(interface.get_register(Register::RegCtrl1), 130);
    // Above the 3.92 V range
    assert_eq!(driver.set_voltage(5.0).unwrap(), 255);
    assert_eq!(driver.state().voltage_target, Some(255));
    assert_eq!(driver.state().speed_target, None);
}

#[test]
fn test_voltage_target_keeps_speed_scale() {
    let (mut driver, interface) = initialized();
    let target = driver.set_speed(20_000.0).unwrap();
    assert_eq!(target.factor, 128);

    driver.set_voltage(1.0).unwrap();
    interface.set_register(Register::RcStatus1, 100);

    // W_SCALE still 11 on the device
    assert_eq!(interface.get_register(Register::RegCtrl0) & 0x03, 0b11);
    assert_eq!(driver.state().speed_scale(), 128);
    assert_eq!(driver.read_speed_rad_s().unwrap(), 12_800);
}

#[test]
fn test_voltage_high_range_protection() {
    let (mut driver, _interface) = initialized();
    driver.set_voltage_range(VoltageRange::High).unwrap();

    assert_eq!(driver.set_voltage(12.0).unwrap(), 195);
    // Above 15.7 V falls back to 11 V
    assert_eq!(driver.set_voltage(20.0).unwrap(), 179);
}

#[test]
fn test_motor_resistance() {
    let (mut driver, interface) = initialized();

    let encoding = driver.set_motor_resistance(100.0).unwrap();

    assert_eq!(encoding.inv_r, 82);
    assert_eq!(encoding.factor, 8192);
    assert_eq!(interface.get_register(Register::RcCtrl3), 82);
    assert_eq!(interface.get_register(Register::RcCtrl2), 0xC0);
}

#[test]
fn test_motor_resistance_fallback() {
    let (mut driver, interface) = initialized();

    let encoding = driver.set_motor_resistance(0.0).unwrap();

    assert_eq!(encoding.inv_r, 255);
    assert_eq!(encoding.factor, 2);
    assert_eq!(interface.get_register(Register::RcCtrl2), 0x00);
}

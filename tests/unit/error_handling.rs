//! Unit tests for error handling and recovery

use crate::common::{MockDelay, MockError, create_mock_driver};
use drv8214::{Drv8214Config, Error, Register, ThresholdBehavior};

#[test]
fn test_read_failure_propagates() {
    let (mut driver, interface) = create_mock_driver();
    interface.fail_next_read();

    let result = driver.read_fault_status();

    assert!(matches!(result, Err(Error::Bus(MockError::Communication))));
}

#[test]
fn test_read_failure_recovery() {
    let (mut driver, interface) = create_mock_driver();
    interface.fail_next_read();

    assert!(driver.read_ripple_count().is_err());

    // Only one operation fails
    interface.set_ripple_count(42);
    assert_eq!(driver.read_ripple_count().unwrap(), 42);
}

#[test]
fn test_failed_write_leaves_mirror_unchanged() {
    let (mut driver, interface) = create_mock_driver();
    driver
        .init(&Drv8214Config::default(), &mut MockDelay::default())
        .unwrap();
    interface.fail_next_write();

    let result = driver.disable_bridge();

    assert!(matches!(result, Err(Error::Bus(MockError::Communication))));
    assert!(driver.state().bridge_enabled);
    assert_eq!(interface.get_register(Register::Config0) & 0x80, 0x80);
}

#[test]
fn test_failed_modify_read_skips_write() {
    let (mut driver, interface) = create_mock_driver();
    driver
        .init(&Drv8214Config::default(), &mut MockDelay::default())
        .unwrap();
    interface.clear_operations();
    interface.fail_next_read();

    assert!(driver.set_stall_detection(false).is_err());

    assert_eq!(interface.write_count(), 0);
    assert!(driver.state().stall_detection);
}

#[test]
fn test_failed_speed_write_keeps_previous_target() {
    let (mut driver, interface) = create_mock_driver();
    let previous = driver.set_speed(1000.0).unwrap();
    interface.fail_next_write();

    assert!(driver.set_speed(4096.0).is_err());

    assert_eq!(driver.state().speed_target, Some(previous));
    assert_eq!(interface.get_register(Register::RegCtrl1), 62);
}

#[test]
fn test_failed_threshold_policy_write() {
    let (mut driver, interface) = create_mock_driver();
    driver
        .init(&Drv8214Config::default(), &mut MockDelay::default())
        .unwrap();
    interface.fail_next_write();

    assert!(
        driver
            .set_threshold_behavior(ThresholdBehavior::DisableBridge)
            .is_err()
    );
    assert_eq!(
        driver.state().threshold_behavior,
        ThresholdBehavior::StayEnabled
    );

    // A retry goes through
    driver
        .set_threshold_behavior(ThresholdBehavior::DisableBridge)
        .unwrap();
    assert_eq!(interface.get_register(Register::RcCtrl0), 0xA0);
}

#[test]
fn test_init_aborts_on_first_failure() {
    let (mut driver, interface) = create_mock_driver();
    interface.fail_next_write();

    let result = driver.init(&Drv8214Config::default(), &mut MockDelay::default());

    assert!(result.is_err());
    assert_eq!(interface.write_count(), 0);
}

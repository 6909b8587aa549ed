//! Integration tests for basic workflow scenarios

use crate::common::{MockDelay, assert_float_eq, create_mock_driver, create_recording_driver};
use drv8214::{
    Direction, Drv8214Config, MotionState, Register, RegulationMode, ThresholdBehavior,
};

#[test]
fn test_complete_speed_workflow() {
    let (mut driver, interface) = create_mock_driver();

    driver
        .init(&Drv8214Config::default(), &mut MockDelay::default())
        .unwrap();
    driver.clear_faults().unwrap();
    assert!(!driver.read_fault_status().unwrap().any_protection());

    driver.turn_forward(1200.0).unwrap();
    assert_eq!(driver.motion_state(), MotionState::Forward);

    // Device reports speed 75 * 16
    interface.set_register(Register::RcStatus1, 75);
    assert_eq!(driver.read_speed_rad_s().unwrap(), 1200);

    driver.brake().unwrap();
    assert_eq!(interface.get_register(Register::Config4) & 0x03, 0b11);
}

#[test]
fn test_counted_move_until_done() {
    let (mut driver, interface) = create_mock_driver();
    driver
        .init(&Drv8214Config::default(), &mut MockDelay::default())
        .unwrap();

    driver
        .turn_revolutions(5, Direction::Reverse, 800.0, ThresholdBehavior::DisableBridge)
        .unwrap();
    assert_eq!(interface.get_register(Register::RcCtrl1), 15);

    // Device counts up to the threshold and flags CNT_DONE
    interface.set_ripple_count(30);
    interface.set_register(Register::Fault, 0x01);

    assert_eq!(driver.read_ripple_count().unwrap(), 30);
    assert!(driver.read_fault_status().unwrap().count_done);

    driver.reset_ripple_counter().unwrap();
    assert_eq!(driver.read_ripple_count().unwrap(), 0);
    assert!(!driver.read_fault_status().unwrap().count_done);
}

#[test]
fn test_current_regulated_workflow() {
    let (mut driver, interface) = create_mock_driver();
    let config = Drv8214Config {
        regulation_mode: RegulationMode::CurrentFixed,
        current_regulation_mode: 3,
        ..Drv8214Config::default()
    };
    driver.init(&config, &mut MockDelay::default()).unwrap();

    driver.turn_forward(0.9).unwrap();

    let trip = driver.trip_current().unwrap();
    // 1 A gain: 0.5 V / (1500 ohm * 1125 uA/A)
    assert_float_eq(trip, 0.296_296, 1e-4);

    interface.set_register(Register::RegStatus2, 96);
    assert_float_eq(driver.read_current().unwrap(), 0.5, 1e-4);
}

#[test]
fn test_stall_recovery() {
    let (mut driver, interface, sink) = create_recording_driver();
    driver
        .init(&Drv8214Config::default(), &mut MockDelay::default())
        .unwrap();
    driver.turn_forward(1000.0).unwrap();

    interface.set_register(Register::Fault, 0xA0);
    let status = driver.report_faults().unwrap();
    assert!(status.stall);
    assert!(sink.contains("STALL: motor stall detected"));

    driver.brake().unwrap();
    driver.clear_faults().unwrap();
    assert!(!driver.read_fault_status().unwrap().fault);

    driver.turn_reverse(500.0).unwrap();
    assert_eq!(driver.motion_state(), MotionState::Reverse);
}

#[test]
fn test_reinit_after_power_loss() {
    let (mut driver, interface) = create_mock_driver();
    let config = Drv8214Config::default();
    driver.init(&config, &mut MockDelay::default()).unwrap();
    driver.turn_forward(1000.0).unwrap();

    // Device reset: registers back to zero, NPOR set
    for register in [Register::Config0, Register::Config3, Register::Config4, Register::RcCtrl0] {
        interface.set_register(register, 0x00);
    }
    interface.set_register(Register::Fault, 0x02);

    assert!(driver.read_fault_status().unwrap().power_on_reset);
    driver.init(&config, &mut MockDelay::default()).unwrap();
    driver.clear_faults().unwrap();

    assert_eq!(interface.get_register(Register::Config0), 0xE8);
    assert_eq!(driver.motion_state(), MotionState::Brake);
    assert!(!driver.read_fault_status().unwrap().power_on_reset);
}

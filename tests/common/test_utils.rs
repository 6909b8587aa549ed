//! Test utilities and helper functions

use crate::common::mock_interface::MockInterface;
use drv8214::{DeviceAddress, DiagnosticSink, DriverParams, Drv8214Driver};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// IPROPI resistor used by the test board
#[allow(dead_code)]
pub const SENSE_RESISTOR_OHMS: f32 = 1500.0;

/// Ripples per revolution used by the test board
#[allow(dead_code)]
pub const RIPPLES_PER_REVOLUTION: u16 = 6;

/// Mock delay implementation for testing
///
/// Records the total requested delay instead of sleeping.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockDelay {
    /// Total delay requested, in nanoseconds
    pub total_ns: u64,
}

impl embedded_hal::delay::DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += u64::from(ns);
    }
}

/// Diagnostic sink that keeps every line
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    lines: Rc<RefCell<Vec<String>>>,
}

impl RecordingSink {
    /// Lines written so far
    #[allow(dead_code)]
    pub fn lines(&self) -> Vec<String> {
        self.lines.borrow().clone()
    }

    /// Whether any line contains `needle`
    #[allow(dead_code)]
    pub fn contains(&self, needle: &str) -> bool {
        self.lines.borrow().iter().any(|line| line.contains(needle))
    }
}

impl DiagnosticSink for RecordingSink {
    fn write_line(&mut self, line: fmt::Arguments<'_>) {
        self.lines.borrow_mut().push(line.to_string());
    }
}

/// Parameters of the test board
#[allow(dead_code)]
pub fn test_params() -> DriverParams {
    DriverParams::new(
        DeviceAddress::LowLow,
        1,
        SENSE_RESISTOR_OHMS,
        RIPPLES_PER_REVOLUTION,
    )
}

/// Create a mock driver for testing
/// Returns (driver, interface) where interface is a clone that shares state with the driver
#[allow(dead_code)]
pub fn create_mock_driver() -> (Drv8214Driver<MockInterface>, MockInterface) {
    let interface = MockInterface::new();
    let interface_clone = interface.clone();
    let driver = Drv8214Driver::new(interface, test_params());
    (driver, interface_clone)
}

/// Create a mock driver that records diagnostics
/// Returns (driver, interface, sink); interface and sink share state with the driver
#[allow(dead_code)]
pub fn create_recording_driver() -> (
    Drv8214Driver<MockInterface, RecordingSink>,
    MockInterface,
    RecordingSink,
) {
    let interface = MockInterface::new();
    let sink = RecordingSink::default();
    let driver = Drv8214Driver::with_diagnostics(interface.clone(), test_params(), sink.clone());
    (driver, interface, sink)
}

/// Assert that two floating point values are approximately equal
#[allow(dead_code)]
pub fn assert_float_eq(a: f32, b: f32, epsilon: f32) {
    let diff = (a - b).abs();
    assert!(
        diff < epsilon,
        "Values not equal within epsilon: {} vs {} (diff: {}, epsilon: {})",
        a,
        b,
        diff,
        epsilon
    );
}

//! Human-readable diagnostic output
//!
//! The driver reports scale choices, clamped requests and refused operations as text lines
//! through a [`DiagnosticSink`]. Routine lines are only produced when
//! [`Drv8214Config::verbose`](crate::config::Drv8214Config::verbose) is set; refused operations
//! are always reported.
//!
//! # Example
//!
//! ```ignore
//! struct Uart<'a>(&'a mut MyUart);
//!
//! impl DiagnosticSink for Uart<'_> {
//!     fn write_line(&mut self, line: core::fmt::Arguments<'_>) {
//!         let _ = writeln!(self.0, "{line}");
//!     }
//! }
//! ```

use core::fmt;

/// Destination for diagnostic lines
pub trait DiagnosticSink {
    /// Consume one line of text (without trailing newline)
    fn write_line(&mut self, line: fmt::Arguments<'_>);
}

/// Sink that drops everything
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NoDiagnostics;

impl DiagnosticSink for NoDiagnostics {
    fn write_line(&mut self, _line: fmt::Arguments<'_>) {}
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for &mut S {
    fn write_line(&mut self, line: fmt::Arguments<'_>) {
        (**self).write_line(line);
    }
}

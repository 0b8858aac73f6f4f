//! PWM register primitives
//!
//! A PWM *slice* owns one counter with a shared clock divider and wrap
//! (period) register. Each slice drives two outputs, A and B, which only
//! own their own compare level.

/// Number of PWM slices (RP2040)
pub const PWM_SLICE_COUNT: usize = 8;

/// Slice output (channel) a pin is wired to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PwmOutput {
    A,
    B,
}

/// Register-level PWM operations
pub trait PwmBackend {
    /// Frequency of the clock feeding the PWM counters, in Hz
    fn source_clock_hz(&self) -> u32;

    /// Slice driving `pin` (fixed, device-specific mapping)
    fn slice_for_pin(&self, pin: u8) -> u8;

    /// Output of the slice that `pin` is wired to
    fn output_for_pin(&self, pin: u8) -> PwmOutput;

    /// Start or stop the slice counter
    fn set_slice_enabled(&mut self, slice: u8, enabled: bool);

    /// Write the clock divider as 8 integer bits + 4 fractional bits
    fn set_clock_divider(&mut self, slice: u8, integer: u8, fraction: u8);

    /// Write the counter top value
    fn set_wrap(&mut self, slice: u8, wrap: u16);

    /// Write the compare level of one output
    fn set_compare(&mut self, slice: u8, output: PwmOutput, level: u16);
}

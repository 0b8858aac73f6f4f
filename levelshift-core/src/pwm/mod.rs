//! PWM channels
//!
//! A [`PwmChannel`] exposes frequency and duty cycle as independent
//! parameters and translates them into the slice's clock divider, wrap
//! and compare registers (see [`PwmTiming`]).
//!
//! Both outputs of a hardware slice share one divider and wrap register,
//! so retuning one would silently change the period of the other. A
//! [`SliceAllocator`] hands out each slice at most once to prevent that.

pub mod channel;
pub mod slice;
pub mod timing;

pub use channel::{PwmChannel, DEFAULT_DUTY_CYCLE, DEFAULT_FREQUENCY_HZ};
pub use slice::{SliceAllocator, SliceClaim};
pub use timing::PwmTiming;

/// Errors that can occur with PWM operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PwmError {
    /// Pin number out of range
    InvalidPin,
    /// The pin's slice is already owned by another channel
    SliceInUse,
    /// Frequency cannot be represented by the divider/wrap registers
    FrequencyOutOfRange,
}

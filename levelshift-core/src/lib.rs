//! Board-agnostic core of the level shifter firmware
//!
//! This crate contains everything between the raw pin primitives of
//! `levelshift-hal` and the firmware glue:
//!
//! - Pin registry and interrupt dispatch
//! - Digital pins with active-low polarity and edge callbacks
//! - PWM channels (frequency/duty to divider/wrap/compare translation)
//! - Board configuration and validation
//! - Pin diagnostics for the overview dump

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod config;
pub mod diagnostics;
pub mod pin;
pub mod pwm;
pub mod registry;

#[cfg(test)]
pub(crate) mod mock;

pub use config::{BoardConfig, ConfigError, PinConfig};
pub use diagnostics::PinStatus;
pub use pin::DigitalPin;
pub use pwm::{PwmChannel, PwmError, PwmTiming, SliceAllocator, SliceClaim};
pub use registry::{PinCallback, PinError, PinRegistry, RegistryEntry, SharedRegistry};

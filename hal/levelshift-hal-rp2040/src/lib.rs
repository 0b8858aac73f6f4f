//! RP2040 backend for the level shifter firmware
//!
//! This crate implements the `levelshift-hal` traits on top of the raw
//! RP2040 registers, plus RP2040-specific plumbing:
//!
//! - GPIO function, direction, pull and level access (SIO, IO_BANK0, PADS_BANK0)
//! - PWM slice programming
//! - Edge delivery from pin interrupts into the pin registry
//! - Pin bank for config-driven pin assignment
//! - ADC channel lookup by GPIO

#![no_std]

pub mod adc;
pub mod edge;
pub mod gpio;
pub mod pins;
pub mod pwm;

/// Register-level access to the RP2040 GPIO and PWM blocks
///
/// Zero-sized; every copy talks to the same registers. Callers are
/// responsible for not driving one pin from two places, which the pin
/// registry and slice allocator in `levelshift-core` take care of.
#[derive(Debug, Clone, Copy, Default)]
pub struct Rp2040Hardware;

impl Rp2040Hardware {
    pub const fn new() -> Self {
        Self
    }
}

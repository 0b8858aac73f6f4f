//! levelshift Hardware Abstraction Layer
//!
//! This crate defines the raw, register-level primitives that the
//! pin registry and PWM channels in `levelshift-core` are built on. A
//! chip-specific HAL implements them once; the core never touches
//! registers itself.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  levelshift-firmware                    │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  levelshift-core (registry, pins, PWM)  │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  levelshift-hal (this crate - traits)   │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!             ┌───────────────┐
//!             │ levelshift-   │
//!             │  hal-rp2040   │
//!             └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::GpioBackend`] - pin function, direction, pulls, level, edge interrupts
//! - [`pwm::PwmBackend`] - slice/channel mapping, divider, wrap and compare registers

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
pub mod pwm;

// Re-export key types at crate root for convenience
pub use gpio::{
    Direction, DriveStrength, EventMask, GpioBackend, PinFunction, Pull, TriggerMode, GPIO_COUNT,
};
pub use pwm::{PwmBackend, PwmOutput, PWM_SLICE_COUNT};

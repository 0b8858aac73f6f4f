//! Serial console for the level shifter board
//!
//! Transport-agnostic pieces of the interactive console: a line editor
//! that turns raw bytes into lines, and a parser that turns lines into
//! [`Command`]s.
//!
//! ```text
//! >> 0on          set OUT0 on
//! >> i            show inputs
//! >> p0 f25000    PWM0 at 25 kHz
//! >> ADC1         poll ADC1 until a key is pressed
//! ```

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod command;
pub mod line;

pub use command::{help_text, Command, CommandError, PwmCommand, ADC_CHANNELS, OUTPUTS, PWM_OUTPUTS};
pub use line::{LineBuffer, LineEvent, LINE_CAPACITY};

//! Pin overview
//!
//! Snapshot of a pin's routing and level, formatted as one fixed-width line
//! per pin:
//!
//! ```text
//! Pin: [06], Value: [true ], Mode: [SIO ], Pull: [    ], Dir: [out], Strength: [ 4 mA], Slew: [slow]
//! ```

use core::fmt;

use levelshift_hal::{Direction, DriveStrength, GpioBackend, PinFunction, Pull};

/// Pins listed by the overview (GPIO23/24 are board-internal)
pub fn overview_pins() -> impl Iterator<Item = u8> {
    (0..=22).chain(25..=28)
}

/// State of one pin as read back from the hardware
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinStatus {
    pub pin: u8,
    pub level: bool,
    pub function: PinFunction,
    pub direction: Direction,
    pub pull: Pull,
    pub drive: DriveStrength,
    pub slew_fast: bool,
}

impl PinStatus {
    pub fn read<B: GpioBackend>(hw: &B, pin: u8) -> Self {
        Self {
            pin,
            level: hw.read(pin),
            function: hw.function(pin),
            direction: hw.direction(pin),
            pull: hw.pull(pin),
            drive: hw.drive_strength(pin),
            slew_fast: hw.slew_fast(pin),
        }
    }
}

impl fmt::Display for PinStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = if self.level { "true " } else { "false" };
        let pull = match self.pull {
            Pull::Up => " up ",
            Pull::Down => "down",
            Pull::None => "    ",
        };
        let dir = match self.direction {
            Direction::Output => "out",
            Direction::Input => "in ",
        };
        let slew = if self.slew_fast { "fast" } else { "slow" };
        write!(
            f,
            "Pin: [{:02}], Value: [{}], Mode: [{}], Pull: [{}], Dir: [{}], Strength: [{}], Slew: [{}]",
            self.pin,
            value,
            self.function.label(),
            pull,
            dir,
            self.drive.label(),
            slew
        )
    }
}

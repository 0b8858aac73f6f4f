//! GPIO pin primitives
//!
//! Raw pin operations keyed by physical pin number. Implementations do the
//! register manipulation for a specific chip; everything above this layer
//! talks in terms of these primitives only.

use core::ops::{BitAnd, BitOr, BitOrAssign};

/// Number of user GPIO pins addressable through [`GpioBackend`]
///
/// Pin identifiers are `0..GPIO_COUNT`. Passing a larger identifier to a
/// backend is a contract violation; the core validates identifiers before
/// they get here.
pub const GPIO_COUNT: usize = 30;

/// Pin direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    Input,
    Output,
}

/// Pull resistor configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Pull {
    /// Both pulls disabled
    #[default]
    None,
    Up,
    Down,
}

/// Pad output drive strength
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DriveStrength {
    Ma2,
    /// Reset value on RP2040
    #[default]
    Ma4,
    Ma8,
    Ma12,
}

impl DriveStrength {
    /// Decode the 2-bit pad `DRIVE` field
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0x3 {
            0 => DriveStrength::Ma2,
            1 => DriveStrength::Ma4,
            2 => DriveStrength::Ma8,
            _ => DriveStrength::Ma12,
        }
    }

    /// Fixed-width label used by the pin overview
    pub fn label(self) -> &'static str {
        match self {
            DriveStrength::Ma2 => " 2 mA",
            DriveStrength::Ma4 => " 4 mA",
            DriveStrength::Ma8 => " 8 mA",
            DriveStrength::Ma12 => "12 mA",
        }
    }
}

/// Peripheral function routed to a pin
///
/// The firmware only ever selects [`PinFunction::Sio`] (plain digital I/O)
/// or [`PinFunction::Pwm`]; the remaining variants exist so that the pin
/// overview can report what other peripherals have claimed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinFunction {
    Xip,
    Spi,
    Uart,
    I2c,
    Pwm,
    /// Software-controlled digital I/O
    Sio,
    Pio0,
    Pio1,
    Clock,
    Usb,
    /// No function selected
    Null,
}

impl PinFunction {
    /// Fixed-width label used by the pin overview
    pub fn label(self) -> &'static str {
        match self {
            PinFunction::Xip => "XIP ",
            PinFunction::Spi => "SPI ",
            PinFunction::Uart => "UART",
            PinFunction::I2c => "I2C ",
            PinFunction::Pwm => "PWM ",
            PinFunction::Sio => "SIO ",
            PinFunction::Pio0 => "PIO0",
            PinFunction::Pio1 => "PIO1",
            PinFunction::Clock => "GPCK",
            PinFunction::Usb => "USB ",
            PinFunction::Null => "NULL",
        }
    }
}

/// Interrupt event bitmask
///
/// Bit layout matches the RP2040 `INTR`/`INTE` registers so that backends
/// can pass hardware values through unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EventMask(u8);

impl EventMask {
    pub const NONE: Self = Self(0);
    pub const LEVEL_LOW: Self = Self(0x1);
    pub const LEVEL_HIGH: Self = Self(0x2);
    pub const EDGE_FALL: Self = Self(0x4);
    pub const EDGE_RISE: Self = Self(0x8);
    /// Both edge conditions
    pub const EDGES: Self = Self(0x4 | 0x8);

    const ALL: u8 = 0xF;

    /// Build a mask from raw bits, dropping undefined ones
    pub const fn from_bits_truncate(bits: u8) -> Self {
        Self(bits & Self::ALL)
    }

    /// Raw bit value
    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// True if every bit of `other` is set in `self`
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// True if `self` and `other` share at least one bit
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// Events of `pin` in a raw IO bank interrupt word
    ///
    /// Each 32-bit `INTR`/`INTE`/`INTS` word covers eight pins, four bits
    /// per pin, in the same order as the mask bits.
    pub const fn from_bank_word(word: u32, pin: u8) -> Self {
        let shift = (pin % 8) * 4;
        Self::from_bits_truncate((word >> shift) as u8)
    }

    /// Bits of `self` placed at `pin`'s position in a bank word
    pub const fn to_bank_word(self, pin: u8) -> u32 {
        (self.0 as u32) << ((pin % 8) * 4)
    }
}

impl BitOr for EventMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for EventMask {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for EventMask {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

/// Trigger condition selected when an input pin is constructed
///
/// `BOTH` is `FALLING | RISING`; the level conditions are independent flags
/// that may be combined with the edge ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TriggerMode(u8);

impl TriggerMode {
    pub const NONE: Self = Self(0x00);
    pub const FALLING: Self = Self(0x01);
    pub const RISING: Self = Self(0x02);
    pub const BOTH: Self = Self(0x03);
    pub const HIGH: Self = Self(0x04);
    pub const LOW: Self = Self(0x08);

    /// Raw selector value
    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn is_none(self) -> bool {
        self.0 == 0
    }

    /// Combine two trigger conditions
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Hardware events to arm for this trigger
    pub const fn events(self) -> EventMask {
        let mut bits = 0;
        if self.0 & Self::FALLING.0 != 0 {
            bits |= EventMask::EDGE_FALL.0;
        }
        if self.0 & Self::RISING.0 != 0 {
            bits |= EventMask::EDGE_RISE.0;
        }
        if self.0 & Self::HIGH.0 != 0 {
            bits |= EventMask::LEVEL_HIGH.0;
        }
        if self.0 & Self::LOW.0 != 0 {
            bits |= EventMask::LEVEL_LOW.0;
        }
        EventMask(bits)
    }
}

impl BitOr for TriggerMode {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

/// Register-level GPIO operations
///
/// All methods are keyed by physical pin number and must be callable for
/// any pin in `0..GPIO_COUNT`. Implementations are expected to be cheap
/// handles (zero-sized register accessors on real hardware) so that each
/// pin wrapper can own one.
pub trait GpioBackend {
    /// Route a peripheral function to the pin
    fn set_function(&mut self, pin: u8, function: PinFunction);

    /// Set the pin direction
    fn set_direction(&mut self, pin: u8, direction: Direction);

    /// Configure the pull resistors
    fn set_pull(&mut self, pin: u8, pull: Pull);

    /// Read the raw logic level (true = high)
    fn read(&self, pin: u8) -> bool;

    /// Drive the raw logic level (true = high)
    fn write(&mut self, pin: u8, high: bool);

    /// Enable interrupt delivery for exactly `events` on this pin
    fn arm_interrupt(&mut self, pin: u8, events: EventMask);

    /// Disable all interrupt delivery for this pin
    fn disarm_interrupt(&mut self, pin: u8);

    /// Currently selected function
    fn function(&self, pin: u8) -> PinFunction;

    /// Currently configured direction
    fn direction(&self, pin: u8) -> Direction;

    /// Currently configured pulls
    fn pull(&self, pin: u8) -> Pull;

    /// Pad drive strength
    fn drive_strength(&self, pin: u8) -> DriveStrength;

    /// True if the pad uses the fast slew rate
    fn slew_fast(&self, pin: u8) -> bool;

    /// Configure function, direction and pulls in one go
    fn configure(&mut self, pin: u8, function: PinFunction, direction: Direction, pull: Pull) {
        self.set_function(pin, function);
        self.set_direction(pin, direction);
        self.set_pull(pin, pull);
    }
}

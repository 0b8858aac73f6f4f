//! Pin bank for config-driven pin assignment
//!
//! Pin numbers come from the board configuration, not from code, so the
//! firmware moves the GPIO singletons it does not need for fixed-function
//! peripherals into a [`PinBank`] and takes them back out by number.

use embassy_rp::gpio::AnyPin;
use embassy_rp::Peri;
use levelshift_hal::GPIO_COUNT;

/// Move GPIO singletons into a [`PinBank`] by number
///
/// ```ignore
/// let mut bank = PinBank::new();
/// bank_pins!(bank, p, 5 => PIN_5, 6 => PIN_6, 7 => PIN_7);
/// ```
#[macro_export]
macro_rules! bank_pins {
    ($bank:expr, $p:expr, $($num:literal => $name:ident),* $(,)?) => {
        $(
            $bank.insert(
                $num,
                embassy_rp::Peri::<embassy_rp::gpio::AnyPin>::from($p.$name),
            );
        )*
    };
}

/// Error when taking a pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TakeError {
    /// Pin number out of range (0-29 valid)
    InvalidPin,
    /// Pin already taken, or never put into the bank
    Unavailable,
}

/// GPIO singletons addressable by pin number
pub struct PinBank {
    pins: [Option<Peri<'static, AnyPin>>; GPIO_COUNT],
}

impl Default for PinBank {
    fn default() -> Self {
        Self::new()
    }
}

impl PinBank {
    pub fn new() -> Self {
        Self {
            pins: [const { None }; GPIO_COUNT],
        }
    }

    /// Put a pin into the bank
    ///
    /// `pin` must be the number of the GPIO that `peri` refers to.
    pub fn insert(&mut self, pin: u8, peri: Peri<'static, AnyPin>) {
        if let Some(slot) = self.pins.get_mut(pin as usize) {
            *slot = Some(peri);
        }
    }

    /// Take a pin by number
    pub fn take(&mut self, pin: u8) -> Result<Peri<'static, AnyPin>, TakeError> {
        self.pins
            .get_mut(pin as usize)
            .ok_or(TakeError::InvalidPin)?
            .take()
            .ok_or(TakeError::Unavailable)
    }

    pub fn is_available(&self, pin: u8) -> bool {
        matches!(self.pins.get(pin as usize), Some(Some(_)))
    }
}

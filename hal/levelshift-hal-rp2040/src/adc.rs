//! ADC channel lookup
//!
//! RP2040 has a single ADC whose external inputs sit on fixed pins:
//! - ADC0: GPIO26
//! - ADC1: GPIO27
//! - ADC2: GPIO28

use embassy_rp::adc::Channel;
use embassy_rp::gpio::Pull;
use embassy_rp::peripherals::{PIN_26, PIN_27, PIN_28};
use embassy_rp::Peri;

/// ADC-capable pins not yet turned into channels
pub struct AdcPins {
    pub pin26: Option<Peri<'static, PIN_26>>,
    pub pin27: Option<Peri<'static, PIN_27>>,
    pub pin28: Option<Peri<'static, PIN_28>>,
}

impl AdcPins {
    pub fn new(
        pin26: Peri<'static, PIN_26>,
        pin27: Peri<'static, PIN_27>,
        pin28: Peri<'static, PIN_28>,
    ) -> Self {
        Self {
            pin26: Some(pin26),
            pin27: Some(pin27),
            pin28: Some(pin28),
        }
    }

    /// Take the ADC channel on `gpio`, with pulls disabled
    ///
    /// Returns `None` for pins without an ADC input and for channels that
    /// were already taken.
    pub fn take(&mut self, gpio: u8) -> Option<Channel<'static>> {
        match gpio {
            26 => self.pin26.take().map(|p| Channel::new_pin(p, Pull::None)),
            27 => self.pin27.take().map(|p| Channel::new_pin(p, Pull::None)),
            28 => self.pin28.take().map(|p| Channel::new_pin(p, Pull::None)),
            _ => None,
        }
    }
}

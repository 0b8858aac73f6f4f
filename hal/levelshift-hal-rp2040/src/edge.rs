//! Event delivery into the pin registry
//!
//! One [`EdgeWatcher`] per input pin. The bank interrupt (owned by
//! embassy-rp) only wakes the watcher; which events fired is read back
//! from the pin's raw `INTR` bits, where the hardware latches every edge
//! until it is cleared. A short pulse therefore reports both of its edges,
//! and edges that arrive while a callback runs are picked up before the
//! next wait.
//!
//! Level events are not latched. While an armed level condition holds it
//! is reported again each time the watcher gets to run, like a level
//! interrupt that stays asserted.

use embassy_futures::yield_now;
use embassy_rp::gpio::{AnyPin, Input, Pull};
use embassy_rp::{pac, Peri};
use levelshift_core::SharedRegistry;
use levelshift_hal::EventMask;

use crate::gpio::armed_events;

pub struct EdgeWatcher {
    input: Input<'static>,
    pin: u8,
}

impl EdgeWatcher {
    /// Watch `pin`, which must be the GPIO number of `peri`
    pub fn new(peri: Peri<'static, AnyPin>, pin: u8) -> Self {
        let watcher = Self {
            input: Input::new(peri, Pull::None),
            pin,
        };
        // Drop edges latched before the pin was handed over
        watcher.take_raw_events();
        watcher
    }

    pub fn pin(&self) -> u8 {
        self.pin
    }

    /// Raw events of this pin, clearing the latched edges that are returned
    fn take_raw_events(&self) -> EventMask {
        let intr = pac::IO_BANK0.intr(self.pin as usize / 8);
        let events = EventMask::from_bank_word(intr.read().0, self.pin);

        let edges = events & EventMask::EDGES;
        if !edges.is_empty() {
            // Write-1-to-clear; level bits are read-only
            intr.write(|w| w.0 = edges.to_bank_word(self.pin));
        }
        events
    }

    /// Wait for the next armed events
    ///
    /// Every event in the returned mask is armed for this pin.
    pub async fn next(&mut self) -> EventMask {
        loop {
            let events = self.take_raw_events() & armed_events(self.pin);
            if !events.is_empty() {
                return events;
            }

            // Nothing pending, so any armed level condition is inactive and
            // can only become active through an edge
            self.input.wait_for_any_edge().await;
        }
    }

    /// Forward events to `registry` forever
    pub async fn run(mut self, registry: &SharedRegistry) -> ! {
        loop {
            let events = self.next().await;
            if !registry.dispatch(self.pin, events) {
                #[cfg(feature = "defmt")]
                defmt::trace!("event on unregistered pin {}", self.pin);
            }
            // A held level would otherwise starve the executor
            yield_now().await;
        }
    }
}

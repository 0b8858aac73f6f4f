//! Digital input/output pins
//!
//! A [`DigitalPin`] is a plain on/off pin with active-high or active-low
//! polarity. Input pins may carry an edge callback, delivered through the
//! [`SharedRegistry`] the pin was registered in.
//!
//! ```ignore
//! static PINS: SharedRegistry = SharedRegistry::new();
//!
//! fn on_edge(pin: u8, events: EventMask) { /* ... */ }
//!
//! let mut out0 = DigitalPin::output(hw, &PINS, 6, false)?;
//! let in0 = DigitalPin::input(hw, &PINS, 10, Some(on_edge), TriggerMode::BOTH, true)?;
//! out0.set(true);
//! ```

use levelshift_hal::{Direction, EventMask, GpioBackend, PinFunction, Pull, TriggerMode};

use crate::registry::{PinCallback, PinError, RegistryEntry, SharedRegistry};

/// Digital pin registered in a [`SharedRegistry`]
///
/// The pin stays registered for its whole lifetime. Dropping it removes the
/// registry entry and disarms its interrupt, after which no further events
/// are dispatched for its pin number.
pub struct DigitalPin<'r, B: GpioBackend> {
    hw: B,
    registry: &'r SharedRegistry,
    id: u8,
    active_low: bool,
    /// Events armed on the hardware at construction
    armed: EventMask,
}

impl<'r, B: GpioBackend> DigitalPin<'r, B> {
    /// Create an output pin
    ///
    /// Configures the pin as a plain digital output with pulls disabled.
    /// Fails if `id` is out of range or already registered, in which case
    /// the hardware is left untouched.
    pub fn output(
        mut hw: B,
        registry: &'r SharedRegistry,
        id: u8,
        active_low: bool,
    ) -> Result<Self, PinError> {
        registry.register(id, RegistryEntry::output(active_low))?;
        hw.configure(id, PinFunction::Sio, Direction::Output, Pull::None);

        Ok(Self {
            hw,
            registry,
            id,
            active_low,
            armed: EventMask::NONE,
        })
    }

    /// Create an input pin
    ///
    /// Configures the pin as a plain digital input with pulls disabled. If
    /// a callback is given, the hardware interrupt is armed for exactly the
    /// events selected by `trigger`; the trigger is fixed for the life of
    /// the pin. Without a callback nothing is armed.
    pub fn input(
        mut hw: B,
        registry: &'r SharedRegistry,
        id: u8,
        callback: Option<PinCallback>,
        trigger: TriggerMode,
        active_low: bool,
    ) -> Result<Self, PinError> {
        let events = match callback {
            Some(_) => trigger.events(),
            None => EventMask::NONE,
        };

        registry.register(id, RegistryEntry::input(active_low, events, callback))?;
        hw.configure(id, PinFunction::Sio, Direction::Input, Pull::None);

        if !events.is_empty() {
            hw.arm_interrupt(id, events);
        }

        Ok(Self {
            hw,
            registry,
            id,
            active_low,
            armed: events,
        })
    }

    /// Physical pin number
    pub fn id(&self) -> u8 {
        self.id
    }

    pub fn is_active_low(&self) -> bool {
        self.active_low
    }

    /// Events armed for this pin (empty for outputs)
    pub fn armed_events(&self) -> EventMask {
        self.armed
    }

    /// Read the logical state (true = active)
    pub fn get(&self) -> bool {
        self.hw.read(self.id) != self.active_low
    }

    /// Drive the logical state (true = active)
    ///
    /// Active-high pins go high for `true`, active-low pins go low.
    pub fn set(&mut self, enabled: bool) {
        self.hw.write(self.id, enabled != self.active_low);
    }
}

impl<B: GpioBackend> Drop for DigitalPin<'_, B> {
    fn drop(&mut self) {
        self.registry.unregister(self.id);
        if !self.armed.is_empty() {
            self.hw.disarm_interrupt(self.id);
        }
    }
}

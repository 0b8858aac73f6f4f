//! Pin registry and interrupt dispatch
//!
//! Every live [`DigitalPin`](crate::DigitalPin) has an entry here, keyed by
//! its physical pin number. The interrupt layer resolves a pin number to
//! its callback through [`SharedRegistry::dispatch`].
//!
//! Entries live in an array indexed by pin number, so dispatch is a
//! constant-time lookup with no allocation. A separate vector keeps the
//! order in which pins were registered for enumeration.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use heapless::Vec;
use levelshift_hal::{EventMask, GPIO_COUNT};

/// Callback invoked for an interrupt event on a registered pin
///
/// Receives the physical pin number and the hardware event mask. Runs in
/// the interrupt delivery context: it must not block and should return
/// quickly.
pub type PinCallback = fn(pin: u8, events: EventMask);

/// Errors when registering a pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinError {
    /// Pin number out of range (0-29 valid)
    InvalidPin,
    /// Another live pin already uses this number
    AlreadyRegistered,
}

/// Registry record for one pin
#[derive(Debug, Clone, Copy)]
pub struct RegistryEntry {
    /// Pin is active-low (inverted)
    pub active_low: bool,
    /// Events armed on the hardware for this pin
    pub events: EventMask,
    /// Edge callback, if any
    pub callback: Option<PinCallback>,
}

impl RegistryEntry {
    /// Entry for an output pin (no callback, nothing armed)
    pub const fn output(active_low: bool) -> Self {
        Self {
            active_low,
            events: EventMask::NONE,
            callback: None,
        }
    }

    /// Entry for an input pin
    pub const fn input(active_low: bool, events: EventMask, callback: Option<PinCallback>) -> Self {
        Self {
            active_low,
            events,
            callback,
        }
    }
}

/// Collection of all registered pins
///
/// Not synchronized; see [`SharedRegistry`] for the process-wide instance
/// that is read from interrupt context.
#[derive(Debug, Clone)]
pub struct PinRegistry {
    slots: [Option<RegistryEntry>; GPIO_COUNT],
    /// Registered pin numbers in insertion order
    order: Vec<u8, GPIO_COUNT>,
}

impl Default for PinRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl PinRegistry {
    /// Create an empty registry
    pub const fn new() -> Self {
        Self {
            slots: [None; GPIO_COUNT],
            order: Vec::new(),
        }
    }

    /// Register a pin
    ///
    /// Fails if the pin number is out of range or already registered. On
    /// failure the registry is unchanged.
    pub fn register(&mut self, pin: u8, entry: RegistryEntry) -> Result<(), PinError> {
        let slot = self
            .slots
            .get_mut(pin as usize)
            .ok_or(PinError::InvalidPin)?;
        if slot.is_some() {
            return Err(PinError::AlreadyRegistered);
        }
        // At most GPIO_COUNT distinct pins can be live, so this cannot fill up
        self.order.push(pin).map_err(|_| PinError::InvalidPin)?;
        *slot = Some(entry);
        Ok(())
    }

    /// Remove a pin, returning its entry if it was registered
    ///
    /// The relative order of the remaining pins is preserved.
    pub fn unregister(&mut self, pin: u8) -> Option<RegistryEntry> {
        let entry = self.slots.get_mut(pin as usize)?.take()?;
        if let Some(pos) = self.order.iter().position(|&p| p == pin) {
            self.order.remove(pos);
        }
        Some(entry)
    }

    /// Look up the entry for a pin
    pub fn entry(&self, pin: u8) -> Option<RegistryEntry> {
        self.slots.get(pin as usize).copied().flatten()
    }

    /// Callback bound to a pin, if the pin is registered and has one
    pub fn callback(&self, pin: u8) -> Option<PinCallback> {
        self.entry(pin).and_then(|entry| entry.callback)
    }

    /// Deliver an event to a pin's callback
    ///
    /// Returns `true` if a callback ran. Events for unregistered pins, or
    /// for pins without a callback, are dropped.
    pub fn dispatch(&self, pin: u8, events: EventMask) -> bool {
        match self.callback(pin) {
            Some(callback) => {
                callback(pin, events);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, pin: u8) -> bool {
        self.entry(pin).is_some()
    }

    /// Registered pin numbers in insertion order
    pub fn ids(&self) -> impl Iterator<Item = u8> + '_ {
        self.order.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Process-wide registry shared between the main line and interrupts
///
/// Lookups and mutations run inside a critical section. Callbacks are
/// copied out of the lock before they run, so a callback may itself query
/// the registry.
///
/// ```ignore
/// static PINS: SharedRegistry = SharedRegistry::new();
///
/// // From the interrupt delivery path:
/// PINS.dispatch(pin, EventMask::EDGE_RISE);
/// ```
pub struct SharedRegistry {
    inner: Mutex<CriticalSectionRawMutex, RefCell<PinRegistry>>,
}

impl Default for SharedRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SharedRegistry {
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(PinRegistry::new())),
        }
    }

    pub fn register(&self, pin: u8, entry: RegistryEntry) -> Result<(), PinError> {
        self.inner
            .lock(|registry| registry.borrow_mut().register(pin, entry))
    }

    pub fn unregister(&self, pin: u8) -> Option<RegistryEntry> {
        self.inner.lock(|registry| registry.borrow_mut().unregister(pin))
    }

    /// Deliver an event to a pin's callback (see [`PinRegistry::dispatch`])
    pub fn dispatch(&self, pin: u8, events: EventMask) -> bool {
        let callback = self.inner.lock(|registry| registry.borrow().callback(pin));
        match callback {
            Some(callback) => {
                callback(pin, events);
                true
            }
            None => false,
        }
    }

    pub fn entry(&self, pin: u8) -> Option<RegistryEntry> {
        self.inner.lock(|registry| registry.borrow().entry(pin))
    }

    pub fn contains(&self, pin: u8) -> bool {
        self.entry(pin).is_some()
    }

    pub fn len(&self) -> usize {
        self.inner.lock(|registry| registry.borrow().len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run `f` against a consistent view of the registry
    ///
    /// `f` runs inside the critical section; keep it short.
    pub fn with<R>(&self, f: impl FnOnce(&PinRegistry) -> R) -> R {
        self.inner.lock(|registry| f(&registry.borrow()))
    }
}

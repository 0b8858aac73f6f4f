//! Inter-task communication channels
//!
//! Defines the static channels used for communication between Embassy tasks.
//! Uses embassy-sync primitives for safe async communication.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use levelshift_hal::EventMask;

/// Channel capacity for pin events
const PIN_EVENT_CHANNEL_SIZE: usize = 8;

/// An edge reported by an input pin callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub struct PinEvent {
    pub pin: u8,
    pub events: EventMask,
}

/// Input edges waiting to be reported on the console
pub static PIN_EVENTS: Channel<CriticalSectionRawMutex, PinEvent, PIN_EVENT_CHANNEL_SIZE> =
    Channel::new();

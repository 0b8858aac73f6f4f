//! Input edge delivery
//!
//! One task per input pin; each forwards armed edges to the pin registry,
//! which calls [`on_input_edge`].

use defmt::*;
use levelshift_hal::EventMask;
use levelshift_hal_rp2040::edge::EdgeWatcher;

use crate::board::PINS;
use crate::channels::{PinEvent, PIN_EVENTS};

#[embassy_executor::task(pool_size = 4)]
pub async fn edge_watch_task(watcher: EdgeWatcher) {
    info!("Edge watch task started for GPIO{}", watcher.pin());
    watcher.run(&PINS).await
}

/// Registry callback for every input pin
///
/// Runs outside the registry lock and must not block.
pub fn on_input_edge(pin: u8, events: EventMask) {
    trace!("GPIO{} edge {:?}", pin, events);
    if PIN_EVENTS.try_send(PinEvent { pin, events }).is_err() {
        warn!("Pin event channel full, dropping GPIO{} edge", pin);
    }
}

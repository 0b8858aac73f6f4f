//! Embassy async tasks
//!
//! Input edges reach the console through [`crate::channels::PIN_EVENTS`].

pub mod console;
pub mod edge_watch;

pub use console::console_task;
pub use edge_watch::{edge_watch_task, on_input_edge};

//! Board configuration
//!
//! Which GPIO plays which role on the level shifter board. The firmware
//! generates a const [`BoardConfig`] from its `board.toml` at build time
//! and validates it again at boot.

pub mod board;

pub use board::*;

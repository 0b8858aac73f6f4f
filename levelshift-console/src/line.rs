//! Line editing
//!
//! Bytes arrive one at a time from the terminal. Printable characters are
//! collected and echoed back, backspace removes the last one, and CR or LF
//! hands the finished line to the caller.

use heapless::Vec;

/// Line length of the board console
pub const LINE_CAPACITY: usize = 64;

const BACKSPACE: u8 = 0x08;
const DELETE: u8 = 0x7F;

/// Result of feeding one byte to a [`LineBuffer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineEvent {
    /// Byte was stored; echo it
    Echo(u8),
    /// Last byte was removed; erase it on the terminal
    Erase,
    /// A line is complete; read it with [`LineBuffer::line`]
    Line,
    /// Enter pressed with nothing typed
    Empty,
    /// Byte dropped (buffer full or unsupported control character)
    Ignored,
}

/// Byte-at-a-time line editor
#[derive(Debug, Clone, Default)]
pub struct LineBuffer<const N: usize = LINE_CAPACITY> {
    buffer: Vec<u8, N>,
    complete: bool,
}

impl<const N: usize> LineBuffer<N> {
    pub const fn new() -> Self {
        Self {
            buffer: Vec::new(),
            complete: false,
        }
    }

    /// Feed a single byte
    ///
    /// After [`LineEvent::Line`] the line stays readable until the next
    /// byte is fed, which starts a fresh one.
    pub fn feed(&mut self, byte: u8) -> LineEvent {
        if self.complete {
            self.clear();
        }

        match byte {
            b'\r' | b'\n' if self.buffer.is_empty() => LineEvent::Empty,
            b'\r' | b'\n' => {
                self.complete = true;
                LineEvent::Line
            }
            BACKSPACE | DELETE => match self.buffer.pop() {
                Some(_) => LineEvent::Erase,
                None => LineEvent::Ignored,
            },
            b' '..=b'~' => match self.buffer.push(byte) {
                Ok(()) => LineEvent::Echo(byte),
                Err(_) => LineEvent::Ignored,
            },
            _ => LineEvent::Ignored,
        }
    }

    /// Completed line, if any
    ///
    /// Only printable ASCII is ever stored, so the contents are valid UTF-8.
    pub fn line(&self) -> Option<&str> {
        if !self.complete {
            return None;
        }
        core::str::from_utf8(&self.buffer).ok()
    }

    /// Bytes typed so far
    pub fn pending(&self) -> &[u8] {
        &self.buffer
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.complete = false;
    }
}

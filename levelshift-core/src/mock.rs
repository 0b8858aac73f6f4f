//! In-memory hardware backend for host tests
//!
//! Clones share state, so a test can hand one clone to a pin wrapper and
//! inspect the "registers" through another.

use std::cell::RefCell;
use std::rc::Rc;
use std::vec::Vec;

use levelshift_hal::{
    Direction, DriveStrength, EventMask, GpioBackend, PinFunction, Pull, PwmBackend, PwmOutput, GPIO_COUNT,
    PWM_SLICE_COUNT,
};

/// Source clock of the reference board (125 MHz)
pub const CLOCK_HZ: u32 = 125_000_000;

/// Register writes, in the order they happened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Function(u8, PinFunction),
    Write(u8, bool),
    Arm(u8, EventMask),
    Disarm(u8),
    SliceEnabled(u8, bool),
    ClockDivider(u8, u8, u8),
    Wrap(u8, u16),
    Compare(u8, PwmOutput, u16),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SliceState {
    pub enabled: bool,
    pub div_int: u8,
    pub div_frac: u8,
    pub wrap: u16,
    pub compare_a: u16,
    pub compare_b: u16,
}

#[derive(Debug)]
pub struct MockState {
    pub levels: [bool; GPIO_COUNT],
    pub functions: [PinFunction; GPIO_COUNT],
    pub directions: [Direction; GPIO_COUNT],
    pub pulls: [Pull; GPIO_COUNT],
    pub drive: [DriveStrength; GPIO_COUNT],
    pub slew_fast: [bool; GPIO_COUNT],
    pub armed: [EventMask; GPIO_COUNT],
    pub slices: [SliceState; PWM_SLICE_COUNT],
    pub ops: Vec<Op>,
}

#[derive(Debug, Clone)]
pub struct MockHardware {
    state: Rc<RefCell<MockState>>,
    clock_hz: u32,
}

impl MockHardware {
    pub fn new() -> Self {
        Self::with_clock(CLOCK_HZ)
    }

    pub fn with_clock(clock_hz: u32) -> Self {
        Self {
            state: Rc::new(RefCell::new(MockState {
                levels: [false; GPIO_COUNT],
                functions: [PinFunction::Null; GPIO_COUNT],
                directions: [Direction::Input; GPIO_COUNT],
                // Reset state of RP2040 pads
                pulls: [Pull::Down; GPIO_COUNT],
                drive: [DriveStrength::Ma4; GPIO_COUNT],
                slew_fast: [false; GPIO_COUNT],
                armed: [EventMask::NONE; GPIO_COUNT],
                slices: [SliceState::default(); PWM_SLICE_COUNT],
                ops: Vec::new(),
            })),
            clock_hz,
        }
    }

    /// Simulate an external signal on an input pin
    pub fn drive_input(&self, pin: u8, high: bool) {
        self.state.borrow_mut().levels[pin as usize] = high;
    }

    /// Set pad drive and slew as another peripheral driver would
    pub fn set_pad(&self, pin: u8, drive: DriveStrength, slew_fast: bool) {
        let mut state = self.state.borrow_mut();
        state.drive[pin as usize] = drive;
        state.slew_fast[pin as usize] = slew_fast;
    }

    pub fn level(&self, pin: u8) -> bool {
        self.state.borrow().levels[pin as usize]
    }

    pub fn armed(&self, pin: u8) -> EventMask {
        self.state.borrow().armed[pin as usize]
    }

    pub fn slice(&self, slice: u8) -> SliceState {
        self.state.borrow().slices[slice as usize]
    }

    pub fn ops(&self) -> Vec<Op> {
        self.state.borrow().ops.clone()
    }

    pub fn clear_ops(&self) {
        self.state.borrow_mut().ops.clear();
    }
}

impl GpioBackend for MockHardware {
    fn set_function(&mut self, pin: u8, function: PinFunction) {
        let mut state = self.state.borrow_mut();
        state.functions[pin as usize] = function;
        state.ops.push(Op::Function(pin, function));
    }

    fn set_direction(&mut self, pin: u8, direction: Direction) {
        self.state.borrow_mut().directions[pin as usize] = direction;
    }

    fn set_pull(&mut self, pin: u8, pull: Pull) {
        self.state.borrow_mut().pulls[pin as usize] = pull;
    }

    fn read(&self, pin: u8) -> bool {
        self.level(pin)
    }

    fn write(&mut self, pin: u8, high: bool) {
        let mut state = self.state.borrow_mut();
        state.levels[pin as usize] = high;
        state.ops.push(Op::Write(pin, high));
    }

    fn arm_interrupt(&mut self, pin: u8, events: EventMask) {
        let mut state = self.state.borrow_mut();
        state.armed[pin as usize] = events;
        state.ops.push(Op::Arm(pin, events));
    }

    fn disarm_interrupt(&mut self, pin: u8) {
        let mut state = self.state.borrow_mut();
        state.armed[pin as usize] = EventMask::NONE;
        state.ops.push(Op::Disarm(pin));
    }

    fn function(&self, pin: u8) -> PinFunction {
        self.state.borrow().functions[pin as usize]
    }

    fn direction(&self, pin: u8) -> Direction {
        self.state.borrow().directions[pin as usize]
    }

    fn pull(&self, pin: u8) -> Pull {
        self.state.borrow().pulls[pin as usize]
    }

    fn drive_strength(&self, pin: u8) -> DriveStrength {
        self.state.borrow().drive[pin as usize]
    }

    fn slew_fast(&self, pin: u8) -> bool {
        self.state.borrow().slew_fast[pin as usize]
    }
}

impl PwmBackend for MockHardware {
    fn source_clock_hz(&self) -> u32 {
        self.clock_hz
    }

    fn slice_for_pin(&self, pin: u8) -> u8 {
        (pin >> 1) & 0x7
    }

    fn output_for_pin(&self, pin: u8) -> PwmOutput {
        if pin & 1 == 0 {
            PwmOutput::A
        } else {
            PwmOutput::B
        }
    }

    fn set_slice_enabled(&mut self, slice: u8, enabled: bool) {
        let mut state = self.state.borrow_mut();
        state.slices[slice as usize].enabled = enabled;
        state.ops.push(Op::SliceEnabled(slice, enabled));
    }

    fn set_clock_divider(&mut self, slice: u8, integer: u8, fraction: u8) {
        let mut state = self.state.borrow_mut();
        state.slices[slice as usize].div_int = integer;
        state.slices[slice as usize].div_frac = fraction;
        state.ops.push(Op::ClockDivider(slice, integer, fraction));
    }

    fn set_wrap(&mut self, slice: u8, wrap: u16) {
        let mut state = self.state.borrow_mut();
        state.slices[slice as usize].wrap = wrap;
        state.ops.push(Op::Wrap(slice, wrap));
    }

    fn set_compare(&mut self, slice: u8, output: PwmOutput, level: u16) {
        let mut state = self.state.borrow_mut();
        match output {
            PwmOutput::A => state.slices[slice as usize].compare_a = level,
            PwmOutput::B => state.slices[slice as usize].compare_b = level,
        }
        state.ops.push(Op::Compare(slice, output, level));
    }
}

//! GPIO register access
//!
//! Function select lives in IO_BANK0, pulls in PADS_BANK0, and level and
//! output enable in SIO.
//!
//! The bank interrupt vector belongs to embassy-rp, which uses it to wake
//! `Input::wait_for_*` futures. Arming a pin here therefore only records
//! which events the registry wants; [`crate::edge`] filters the pin's raw
//! interrupt bits through that record.

use embassy_rp::pac;
use levelshift_hal::{
    Direction, DriveStrength, EventMask, GpioBackend, PinFunction, Pull, GPIO_COUNT,
};
use portable_atomic::{AtomicU8, Ordering};

use crate::Rp2040Hardware;

/// IO_BANK0 function select values
mod funcsel {
    pub const XIP: u8 = 0;
    pub const SPI: u8 = 1;
    pub const UART: u8 = 2;
    pub const I2C: u8 = 3;
    pub const PWM: u8 = 4;
    pub const SIO: u8 = 5;
    pub const PIO0: u8 = 6;
    pub const PIO1: u8 = 7;
    pub const CLOCK: u8 = 8;
    pub const USB: u8 = 9;
    pub const NULL: u8 = 0x1f;
}

#[allow(clippy::declare_interior_mutable_const)]
const DISARMED: AtomicU8 = AtomicU8::new(0);

/// Events armed per pin
static ARMED: [AtomicU8; GPIO_COUNT] = [DISARMED; GPIO_COUNT];

/// Events the registry asked for on `pin`
pub fn armed_events(pin: u8) -> EventMask {
    match ARMED.get(pin as usize) {
        Some(slot) => EventMask::from_bits_truncate(slot.load(Ordering::Acquire)),
        None => EventMask::NONE,
    }
}

fn funcsel_of(function: PinFunction) -> u8 {
    match function {
        PinFunction::Xip => funcsel::XIP,
        PinFunction::Spi => funcsel::SPI,
        PinFunction::Uart => funcsel::UART,
        PinFunction::I2c => funcsel::I2C,
        PinFunction::Pwm => funcsel::PWM,
        PinFunction::Sio => funcsel::SIO,
        PinFunction::Pio0 => funcsel::PIO0,
        PinFunction::Pio1 => funcsel::PIO1,
        PinFunction::Clock => funcsel::CLOCK,
        PinFunction::Usb => funcsel::USB,
        PinFunction::Null => funcsel::NULL,
    }
}

fn function_of(value: u8) -> PinFunction {
    match value {
        funcsel::XIP => PinFunction::Xip,
        funcsel::SPI => PinFunction::Spi,
        funcsel::UART => PinFunction::Uart,
        funcsel::I2C => PinFunction::I2c,
        funcsel::PWM => PinFunction::Pwm,
        funcsel::SIO => PinFunction::Sio,
        funcsel::PIO0 => PinFunction::Pio0,
        funcsel::PIO1 => PinFunction::Pio1,
        funcsel::CLOCK => PinFunction::Clock,
        funcsel::USB => PinFunction::Usb,
        _ => PinFunction::Null,
    }
}

#[inline]
fn bit(pin: u8) -> u32 {
    1 << pin
}

impl GpioBackend for Rp2040Hardware {
    fn set_function(&mut self, pin: u8, function: PinFunction) {
        // Input enable on, output disable off, so the pad follows the function
        pac::PADS_BANK0.gpio(pin as usize).modify(|w| {
            w.set_ie(true);
            w.set_od(false);
        });
        pac::IO_BANK0
            .gpio(pin as usize)
            .ctrl()
            .write(|w| w.set_funcsel(funcsel_of(function)));
    }

    fn set_direction(&mut self, pin: u8, direction: Direction) {
        let oe = pac::SIO.gpio_oe(0);
        match direction {
            Direction::Output => oe.value_set().write_value(bit(pin)),
            Direction::Input => oe.value_clr().write_value(bit(pin)),
        }
    }

    fn set_pull(&mut self, pin: u8, pull: Pull) {
        pac::PADS_BANK0.gpio(pin as usize).modify(|w| {
            w.set_pue(pull == Pull::Up);
            w.set_pde(pull == Pull::Down);
        });
    }

    fn read(&self, pin: u8) -> bool {
        pac::SIO.gpio_in(0).read() & bit(pin) != 0
    }

    fn write(&mut self, pin: u8, high: bool) {
        let out = pac::SIO.gpio_out(0);
        if high {
            out.value_set().write_value(bit(pin));
        } else {
            out.value_clr().write_value(bit(pin));
        }
    }

    fn arm_interrupt(&mut self, pin: u8, events: EventMask) {
        if let Some(slot) = ARMED.get(pin as usize) {
            slot.store(events.bits(), Ordering::Release);
        }
    }

    fn disarm_interrupt(&mut self, pin: u8) {
        if let Some(slot) = ARMED.get(pin as usize) {
            slot.store(0, Ordering::Release);
        }
    }

    fn function(&self, pin: u8) -> PinFunction {
        function_of(pac::IO_BANK0.gpio(pin as usize).ctrl().read().funcsel())
    }

    fn direction(&self, pin: u8) -> Direction {
        if pac::SIO.gpio_oe(0).value().read() & bit(pin) != 0 {
            Direction::Output
        } else {
            Direction::Input
        }
    }

    fn pull(&self, pin: u8) -> Pull {
        let pad = pac::PADS_BANK0.gpio(pin as usize).read();
        match (pad.pue(), pad.pde()) {
            (true, false) => Pull::Up,
            (false, true) => Pull::Down,
            // Both set is the bus keeper; report it as neither
            _ => Pull::None,
        }
    }

    fn drive_strength(&self, pin: u8) -> DriveStrength {
        let pad = pac::PADS_BANK0.gpio(pin as usize).read();
        DriveStrength::from_bits(pad.drive().to_bits())
    }

    fn slew_fast(&self, pin: u8) -> bool {
        pac::PADS_BANK0.gpio(pin as usize).read().slewfast()
    }
}

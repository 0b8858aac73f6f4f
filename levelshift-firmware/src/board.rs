//! Board bring-up
//!
//! Turns the generated [`BOARD`] assignment into live pins, PWM channels
//! and ADC channels.

use embassy_rp::adc::Channel;
use levelshift_core::config::{BoardConfig, ConfigError, PinConfig};
use levelshift_core::{
    DigitalPin, PinCallback, PinError, PwmChannel, PwmError, SharedRegistry, SliceAllocator,
};
use levelshift_hal::{PwmBackend, TriggerMode};
use levelshift_hal_rp2040::adc::AdcPins;
use levelshift_hal_rp2040::edge::EdgeWatcher;
use levelshift_hal_rp2040::pins::{PinBank, TakeError};
use levelshift_hal_rp2040::Rp2040Hardware;

include!(concat!(env!("OUT_DIR"), "/board.rs"));

/// Frequency PWM0 is parked at during boot
const PWM0_BOOT_FREQUENCY_HZ: u32 = 25_000;

/// Every live digital pin, keyed by GPIO number
pub static PINS: SharedRegistry = SharedRegistry::new();

pub type Pin = DigitalPin<'static, Rp2040Hardware>;
pub type Pwm = PwmChannel<Rp2040Hardware>;

/// Bring-up failures
#[derive(Debug, Clone, Copy, defmt::Format)]
pub enum BoardError {
    Config(ConfigError),
    Pin(PinError),
    Pwm(PwmError),
    Take(TakeError),
    /// ADC channel unavailable on this GPIO
    Adc(u8),
}

impl From<ConfigError> for BoardError {
    fn from(e: ConfigError) -> Self {
        BoardError::Config(e)
    }
}

impl From<PinError> for BoardError {
    fn from(e: PinError) -> Self {
        BoardError::Pin(e)
    }
}

impl From<PwmError> for BoardError {
    fn from(e: PwmError) -> Self {
        BoardError::Pwm(e)
    }
}

impl From<TakeError> for BoardError {
    fn from(e: TakeError) -> Self {
        BoardError::Take(e)
    }
}

/// Everything the console drives
pub struct Board {
    pub outputs: [Pin; 4],
    pub inputs: [Pin; 4],
    pub controls: [Pin; 2],
    pub pwm: [Pwm; 2],
    pub adc_channels: [Channel<'static>; 3],
}

/// Build all pins of `config`
///
/// Inputs report both edges to `on_edge`; the returned watchers must be
/// run for edges to be delivered.
pub fn init(
    config: &BoardConfig,
    bank: &mut PinBank,
    adc_pins: &mut AdcPins,
    on_edge: PinCallback,
) -> Result<(Board, [EdgeWatcher; 4]), BoardError> {
    let hw = Rp2040Hardware::new();
    config.validate(|pin| hw.slice_for_pin(pin))?;

    let outputs = [
        output(bank, config.outputs[0])?,
        output(bank, config.outputs[1])?,
        output(bank, config.outputs[2])?,
        output(bank, config.outputs[3])?,
    ];

    let (in0, watch0) = input(bank, config.inputs[0], on_edge)?;
    let (in1, watch1) = input(bank, config.inputs[1], on_edge)?;
    let (in2, watch2) = input(bank, config.inputs[2], on_edge)?;
    let (in3, watch3) = input(bank, config.inputs[3], on_edge)?;

    let controls = [
        output(bank, PinConfig::new(config.controls[0]))?,
        output(bank, PinConfig::new(config.controls[1]))?,
    ];

    let mut slices = SliceAllocator::new();
    let mut pwm0 = pwm(bank, &mut slices, config.pwm[0])?;
    let pwm1 = pwm(bank, &mut slices, config.pwm[1])?;
    pwm0.set_frequency(PWM0_BOOT_FREQUENCY_HZ)?;

    let adc_channels = [
        adc_channel(adc_pins, config.adc[0])?,
        adc_channel(adc_pins, config.adc[1])?,
        adc_channel(adc_pins, config.adc[2])?,
    ];

    let board = Board {
        outputs,
        inputs: [in0, in1, in2, in3],
        controls,
        pwm: [pwm0, pwm1],
        adc_channels,
    };
    Ok((board, [watch0, watch1, watch2, watch3]))
}

fn output(bank: &mut PinBank, config: PinConfig) -> Result<Pin, BoardError> {
    // Driven through registers; taking the singleton reserves the pin
    bank.take(config.pin)?;
    let pin = DigitalPin::output(Rp2040Hardware::new(), &PINS, config.pin, config.inverted)?;
    defmt::debug!("GPIO{} output (active-low: {})", config.pin, config.inverted);
    Ok(pin)
}

fn input(
    bank: &mut PinBank,
    config: PinConfig,
    on_edge: PinCallback,
) -> Result<(Pin, EdgeWatcher), BoardError> {
    let peri = bank.take(config.pin)?;
    let pin = DigitalPin::input(
        Rp2040Hardware::new(),
        &PINS,
        config.pin,
        Some(on_edge),
        TriggerMode::BOTH,
        config.inverted,
    )?;
    defmt::debug!("GPIO{} input (active-low: {})", config.pin, config.inverted);
    Ok((pin, EdgeWatcher::new(peri, config.pin)))
}

fn pwm(bank: &mut PinBank, slices: &mut SliceAllocator, pin: u8) -> Result<Pwm, BoardError> {
    bank.take(pin)?;
    let hw = Rp2040Hardware::new();
    let claim = slices.claim_for_pin(&hw, pin)?;
    let channel = PwmChannel::new(hw, claim, pin)?;
    defmt::debug!(
        "GPIO{} PWM slice {} channel {}",
        pin,
        channel.slice(),
        channel.channel()
    );
    Ok(channel)
}

fn adc_channel(adc_pins: &mut AdcPins, pin: u8) -> Result<Channel<'static>, BoardError> {
    adc_pins.take(pin).ok_or(BoardError::Adc(pin))
}

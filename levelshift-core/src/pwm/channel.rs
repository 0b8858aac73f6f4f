//! PWM channel driver

use levelshift_hal::{Direction, GpioBackend, PinFunction, PwmBackend, PwmOutput, GPIO_COUNT};

use super::slice::SliceClaim;
use super::timing::{compare_level, PwmTiming};
use super::PwmError;

/// Frequency of a channel built without explicit settings
pub const DEFAULT_FREQUENCY_HZ: u32 = 10_000;

/// Duty cycle of a channel built without explicit settings
pub const DEFAULT_DUTY_CYCLE: u8 = 50;

/// Backend handle that stops its slice when dropped
struct SliceGuard<B: PwmBackend> {
    hw: B,
    slice: u8,
}

impl<B: PwmBackend> Drop for SliceGuard<B> {
    fn drop(&mut self) {
        self.hw.set_slice_enabled(self.slice, false);
    }
}

/// A pin driven by one output of a PWM slice
///
/// Frequency, duty cycle and the enabled flag are independent: changing one
/// never alters the others. Every frequency or duty change reprograms the
/// slice with the counter stopped, then restores the enabled state.
pub struct PwmChannel<B: GpioBackend + PwmBackend> {
    guard: SliceGuard<B>,
    claim: SliceClaim,
    pin: u8,
    output: PwmOutput,
    frequency_hz: u32,
    duty: u8,
    timing: PwmTiming,
    enabled: bool,
    /// Forced level while overridden by [`stuck`](Self::stuck)
    stuck: Option<bool>,
}

impl<B: GpioBackend + PwmBackend> PwmChannel<B> {
    /// Create a disabled channel at the default 10 kHz / 50 %
    pub fn new(hw: B, claim: SliceClaim, pin: u8) -> Result<Self, PwmError> {
        Self::build(hw, claim, pin, DEFAULT_FREQUENCY_HZ, DEFAULT_DUTY_CYCLE, false)
    }

    /// Create an enabled channel with the given frequency and duty cycle
    pub fn with_settings(
        hw: B,
        claim: SliceClaim,
        pin: u8,
        frequency_hz: u32,
        duty: u8,
    ) -> Result<Self, PwmError> {
        Self::build(hw, claim, pin, frequency_hz, duty, true)
    }

    fn build(
        mut hw: B,
        claim: SliceClaim,
        pin: u8,
        frequency_hz: u32,
        duty: u8,
        enabled: bool,
    ) -> Result<Self, PwmError> {
        if pin as usize >= GPIO_COUNT || hw.slice_for_pin(pin) != claim.slice() {
            return Err(PwmError::InvalidPin);
        }
        let timing = PwmTiming::compute(hw.source_clock_hz(), frequency_hz, duty)?;

        hw.set_function(pin, PinFunction::Pwm);

        let mut channel = Self {
            output: hw.output_for_pin(pin),
            guard: SliceGuard {
                hw,
                slice: claim.slice(),
            },
            claim,
            pin,
            frequency_hz,
            duty: duty.min(100),
            timing,
            enabled,
            stuck: None,
        };
        channel.program();
        Ok(channel)
    }

    /// Write divider, wrap and compare with the counter stopped
    fn program(&mut self) {
        let slice = self.guard.slice;
        let hw = &mut self.guard.hw;

        hw.set_slice_enabled(slice, false);
        hw.set_clock_divider(
            slice,
            self.timing.divider_integer(),
            self.timing.divider_fraction(),
        );
        hw.set_wrap(slice, self.timing.wrap);
        hw.set_compare(slice, self.output, self.timing.level);
        if self.enabled {
            hw.set_slice_enabled(slice, true);
        }
    }

    /// Set the output frequency in Hz
    ///
    /// The duty cycle is kept. On error nothing changes.
    pub fn set_frequency(&mut self, frequency_hz: u32) -> Result<(), PwmError> {
        let clock = self.guard.hw.source_clock_hz();
        self.timing = PwmTiming::compute(clock, frequency_hz, self.duty)?;
        self.frequency_hz = frequency_hz;
        self.program();
        Ok(())
    }

    pub fn frequency(&self) -> u32 {
        self.frequency_hz
    }

    /// Set the duty cycle in percent, clamped to 100
    pub fn set_duty_cycle(&mut self, duty: u8) {
        self.duty = duty.min(100);
        self.timing.level = compare_level(self.timing.wrap, self.duty);
        self.program();
    }

    pub fn duty_cycle(&self) -> u8 {
        self.duty
    }

    /// Start or stop the slice counter
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        self.guard.hw.set_slice_enabled(self.guard.slice, enabled);
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Override the output with a fixed level
    ///
    /// The pin is switched to plain digital output. Frequency and duty
    /// changes made while stuck are still programmed into the slice and
    /// take effect on [`release`](Self::release).
    pub fn stuck(&mut self, high: bool) {
        let hw = &mut self.guard.hw;
        hw.set_function(self.pin, PinFunction::Sio);
        hw.set_direction(self.pin, Direction::Output);
        hw.write(self.pin, high);
        self.stuck = Some(high);
    }

    /// Return the pin to PWM and reprogram the last settings
    pub fn release(&mut self) {
        self.guard.hw.set_function(self.pin, PinFunction::Pwm);
        self.stuck = None;
        self.program();
    }

    /// Forced level, if the output is stuck
    pub fn stuck_level(&self) -> Option<bool> {
        self.stuck
    }

    pub fn is_stuck(&self) -> bool {
        self.stuck.is_some()
    }

    pub fn pin(&self) -> u8 {
        self.pin
    }

    pub fn slice(&self) -> u8 {
        self.guard.slice
    }

    /// Slice output this pin is wired to
    pub fn channel(&self) -> PwmOutput {
        self.output
    }

    /// Last programmed register values
    pub fn timing(&self) -> PwmTiming {
        self.timing
    }

    /// Stop the slice and give back its claim
    pub fn into_claim(self) -> SliceClaim {
        self.claim
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockHardware, Op, CLOCK_HZ};
    use crate::pwm::SliceAllocator;

    fn channel(hw: &MockHardware, pin: u8) -> PwmChannel<MockHardware> {
        let mut slices = SliceAllocator::new();
        let claim = slices.claim_for_pin(hw, pin).unwrap();
        PwmChannel::new(hw.clone(), claim, pin).unwrap()
    }

    #[test]
    fn test_defaults() {
        let hw = MockHardware::new();
        let pwm = channel(&hw, 17);

        assert_eq!(pwm.frequency(), DEFAULT_FREQUENCY_HZ);
        assert_eq!(pwm.duty_cycle(), DEFAULT_DUTY_CYCLE);
        assert!(!pwm.is_enabled());
        assert!(!pwm.is_stuck());
        assert_eq!(hw.function(17), PinFunction::Pwm);

        // GPIO17 -> slice 0, output B
        assert_eq!(pwm.slice(), 0);
        assert_eq!(pwm.channel(), PwmOutput::B);
        let slice = hw.slice(0);
        assert!(!slice.enabled);
        assert_eq!(slice.wrap, 12_499);
        assert_eq!(slice.compare_b, 6249);
    }

    #[test]
    fn test_with_settings_25khz() {
        let hw = MockHardware::new();
        let mut slices = SliceAllocator::new();
        let claim = slices.claim_for_pin(&hw, 18).unwrap();

        let pwm = PwmChannel::with_settings(hw.clone(), claim, 18, 25_000, 50).unwrap();

        assert!(pwm.is_enabled());
        assert_eq!(pwm.timing().divider16, 16);

        // GPIO18 -> slice 1, output A
        let slice = hw.slice(1);
        assert!(slice.enabled);
        assert_eq!((slice.div_int, slice.div_frac), (1, 0));
        assert_eq!(slice.wrap, 4999);
        assert_eq!(slice.compare_a, 2499);
    }

    #[test]
    fn test_reprogram_sequence() {
        let hw = MockHardware::new();
        let mut pwm = channel(&hw, 18);
        pwm.set_enabled(true);
        hw.clear_ops();

        pwm.set_frequency(25_000).unwrap();

        assert_eq!(
            hw.ops(),
            [
                Op::SliceEnabled(1, false),
                Op::ClockDivider(1, 1, 0),
                Op::Wrap(1, 4999),
                Op::Compare(1, PwmOutput::A, 2499),
                Op::SliceEnabled(1, true),
            ]
        );
    }

    #[test]
    fn test_disabled_channel_stays_disabled() {
        let hw = MockHardware::new();
        let mut pwm = channel(&hw, 18);
        hw.clear_ops();

        pwm.set_duty_cycle(20);

        assert_eq!(hw.ops().last(), Some(&Op::Compare(1, PwmOutput::A, 2499)));
        assert!(!hw.slice(1).enabled);
        assert!(!pwm.is_enabled());
    }

    #[test]
    fn test_enable_independent_of_settings() {
        let hw = MockHardware::new();
        let mut pwm = channel(&hw, 18);

        pwm.set_enabled(true);
        pwm.set_frequency(1000).unwrap();
        pwm.set_duty_cycle(25);
        pwm.set_enabled(false);
        pwm.set_enabled(true);

        assert_eq!(pwm.frequency(), 1000);
        assert_eq!(pwm.duty_cycle(), 25);
        assert!(pwm.is_enabled());
        assert_eq!(hw.slice(1).compare_a, 16_128);
    }

    #[test]
    fn test_duty_clamped() {
        let hw = MockHardware::new();
        let mut pwm = channel(&hw, 18);

        pwm.set_duty_cycle(150);

        assert_eq!(pwm.duty_cycle(), 100);
        assert_eq!(hw.slice(1).compare_a, hw.slice(1).wrap);
    }

    #[test]
    fn test_setters_idempotent() {
        let hw = MockHardware::new();
        let mut pwm = channel(&hw, 18);

        pwm.set_frequency(25_000).unwrap();
        let first = hw.slice(1);
        pwm.set_frequency(25_000).unwrap();
        pwm.set_duty_cycle(50);

        assert_eq!(hw.slice(1), first);
    }

    #[test]
    fn test_rejected_frequency_keeps_state() {
        let hw = MockHardware::new();
        let mut pwm = channel(&hw, 18);
        pwm.set_frequency(25_000).unwrap();
        hw.clear_ops();

        assert_eq!(pwm.set_frequency(0), Err(PwmError::FrequencyOutOfRange));
        assert_eq!(pwm.set_frequency(5), Err(PwmError::FrequencyOutOfRange));
        assert_eq!(
            pwm.set_frequency(CLOCK_HZ + 1),
            Err(PwmError::FrequencyOutOfRange)
        );

        assert_eq!(pwm.frequency(), 25_000);
        assert_eq!(pwm.timing().wrap, 4999);
        assert!(hw.ops().is_empty());
    }

    #[test]
    fn test_stuck_and_release() {
        let hw = MockHardware::new();
        let mut pwm = channel(&hw, 18);
        pwm.set_enabled(true);

        pwm.stuck(true);
        assert_eq!(pwm.stuck_level(), Some(true));
        assert_eq!(hw.function(18), PinFunction::Sio);
        assert_eq!(hw.direction(18), Direction::Output);
        assert!(hw.level(18));

        // Settings still tracked while stuck
        pwm.set_frequency(25_000).unwrap();
        pwm.set_duty_cycle(10);
        assert_eq!(hw.function(18), PinFunction::Sio);

        hw.clear_ops();
        pwm.release();

        assert!(!pwm.is_stuck());
        assert_eq!(hw.function(18), PinFunction::Pwm);
        assert_eq!(
            hw.ops(),
            [
                Op::Function(18, PinFunction::Pwm),
                Op::SliceEnabled(1, false),
                Op::ClockDivider(1, 1, 0),
                Op::Wrap(1, 4999),
                Op::Compare(1, PwmOutput::A, 499),
                Op::SliceEnabled(1, true),
            ]
        );
    }

    #[test]
    fn test_stuck_low() {
        let hw = MockHardware::new();
        let mut pwm = channel(&hw, 17);
        hw.drive_input(17, true);

        pwm.stuck(false);

        assert!(!hw.level(17));
        assert_eq!(pwm.stuck_level(), Some(false));
    }

    #[test]
    fn test_drop_disables_slice() {
        let hw = MockHardware::new();
        let mut pwm = channel(&hw, 18);
        pwm.set_enabled(true);
        assert!(hw.slice(1).enabled);

        drop(pwm);

        assert!(!hw.slice(1).enabled);
    }

    #[test]
    fn test_into_claim_disables_and_frees_slice() {
        let hw = MockHardware::new();
        let mut slices = SliceAllocator::new();
        let claim = slices.claim_for_pin(&hw, 18).unwrap();
        let pwm = PwmChannel::with_settings(hw.clone(), claim, 18, 25_000, 50).unwrap();

        // GPIO19 shares slice 1
        assert!(slices.claim_for_pin(&hw, 19).is_err());

        let claim = pwm.into_claim();
        assert!(!hw.slice(1).enabled);

        slices.release(claim);
        assert!(slices.claim_for_pin(&hw, 19).is_ok());
    }

    #[test]
    fn test_claim_must_match_pin() {
        let hw = MockHardware::new();
        let mut slices = SliceAllocator::new();
        let claim = slices.claim_for_pin(&hw, 18).unwrap();

        // GPIO4 is on slice 2, not 1
        let result = PwmChannel::new(hw.clone(), claim, 4);
        assert!(matches!(result, Err(PwmError::InvalidPin)));
        assert!(hw.ops().is_empty());
    }

    #[test]
    fn test_invalid_settings_touch_nothing() {
        let hw = MockHardware::new();
        let mut slices = SliceAllocator::new();
        let claim = slices.claim_for_pin(&hw, 18).unwrap();

        let result = PwmChannel::with_settings(hw.clone(), claim, 18, 0, 50);
        assert!(matches!(result, Err(PwmError::FrequencyOutOfRange)));
        assert!(hw.ops().is_empty());
    }
}

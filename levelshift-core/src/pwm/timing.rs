//! Frequency/duty to register translation
//!
//! The PWM counter runs at `clock / divider` and counts from 0 to `wrap`,
//! so one period lasts `wrap + 1` ticks. The divider has 8 integer and 4
//! fractional bits; it is handled here in sixteenths (`divider16`).
//!
//! For a target frequency `f`:
//!
//! ```text
//! divider16 = ceil(clock / (f * 4096))      // smallest divider keeping wrap <= 0xFFFF
//! divider16 = max(divider16, 16)            // integer part must be at least 1
//! wrap      = clock * 16 / divider16 / f - 1
//! level     = wrap * duty / 100
//! ```
//!
//! Rounding the divider up is required: truncating it would push `wrap`
//! past the 16-bit counter for low frequencies.

use super::PwmError;

/// Smallest divider in sixteenths (1.0)
pub const MIN_DIVIDER16: u32 = 16;

/// Largest divider in sixteenths (255 + 15/16)
pub const MAX_DIVIDER16: u32 = 0xFFF;

/// Register values for one frequency/duty setting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PwmTiming {
    /// Clock divider in sixteenths
    pub divider16: u32,
    /// Counter top value
    pub wrap: u16,
    /// Compare level for the requested duty
    pub level: u16,
}

impl PwmTiming {
    /// Compute register values
    ///
    /// `duty` is a percentage; values above 100 are treated as 100. Duty
    /// resolution is `wrap + 1` steps, finer requests round down.
    ///
    /// Fails with [`PwmError::FrequencyOutOfRange`] if `frequency_hz` is 0,
    /// faster than the source clock, or too slow for the largest divider.
    pub fn compute(clock_hz: u32, frequency_hz: u32, duty: u8) -> Result<Self, PwmError> {
        if frequency_hz == 0 || frequency_hz > clock_hz {
            return Err(PwmError::FrequencyOutOfRange);
        }

        let clock = clock_hz as u64;
        let frequency = frequency_hz as u64;

        let mut divider16 = clock.div_ceil(frequency * 4096);
        if divider16 / 16 == 0 {
            divider16 = MIN_DIVIDER16 as u64;
        }
        if divider16 > MAX_DIVIDER16 as u64 {
            return Err(PwmError::FrequencyOutOfRange);
        }

        let wrap = (clock * 16 / divider16 / frequency)
            .checked_sub(1)
            .ok_or(PwmError::FrequencyOutOfRange)?;
        let wrap = u16::try_from(wrap).map_err(|_| PwmError::FrequencyOutOfRange)?;

        Ok(Self {
            divider16: divider16 as u32,
            wrap,
            level: compare_level(wrap, duty),
        })
    }

    /// Integer part of the divider
    pub fn divider_integer(&self) -> u8 {
        (self.divider16 / 16) as u8
    }

    /// Fractional part of the divider, in sixteenths
    pub fn divider_fraction(&self) -> u8 {
        (self.divider16 & 0xF) as u8
    }

    /// Frequency actually produced by these registers, in Hz
    pub fn actual_frequency_hz(&self, clock_hz: u32) -> u32 {
        let ticks = self.divider16 as u64 * (self.wrap as u64 + 1);
        (clock_hz as u64 * 16 / ticks) as u32
    }
}

/// Compare level for `duty` percent of a `wrap` period
pub fn compare_level(wrap: u16, duty: u8) -> u16 {
    (wrap as u32 * duty.min(100) as u32 / 100) as u16
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const CLOCK: u32 = 125_000_000;

    #[test]
    fn test_25khz_half_duty() {
        let timing = PwmTiming::compute(CLOCK, 25_000, 50).unwrap();

        assert_eq!(timing.divider16, 16);
        assert_eq!(timing.divider_integer(), 1);
        assert_eq!(timing.divider_fraction(), 0);
        assert_eq!(timing.wrap, 4999);
        assert_eq!(timing.level, 2499);
        assert_eq!(timing.actual_frequency_hz(CLOCK), 25_000);
    }

    #[test]
    fn test_default_10khz() {
        let timing = PwmTiming::compute(CLOCK, 10_000, 50).unwrap();

        assert_eq!(timing.divider16, 16);
        assert_eq!(timing.wrap, 12_499);
        assert_eq!(timing.level, 6249);
    }

    #[test]
    fn test_low_frequency_uses_fractional_divider() {
        // 125 MHz / (1000 * 4096) = 30.5 -> rounded up to 31 sixteenths
        let timing = PwmTiming::compute(CLOCK, 1000, 25).unwrap();

        assert_eq!(timing.divider16, 31);
        assert_eq!(timing.divider_integer(), 1);
        assert_eq!(timing.divider_fraction(), 15);
        assert_eq!(timing.wrap, 64_515);
        assert_eq!(timing.level, 16_128);
    }

    #[test]
    fn test_divider_floor() {
        // Fast enough that divider16 computes to 1, below the 1.0 minimum
        let timing = PwmTiming::compute(CLOCK, 1_000_000, 50).unwrap();

        assert_eq!(timing.divider16, 16);
        assert_eq!(timing.divider_integer(), 1);
        assert_eq!(timing.divider_fraction(), 0);
        assert_eq!(timing.wrap, 124);
    }

    #[test]
    fn test_duty_extremes() {
        let off = PwmTiming::compute(CLOCK, 25_000, 0).unwrap();
        assert_eq!(off.level, 0);

        let full = PwmTiming::compute(CLOCK, 25_000, 100).unwrap();
        assert_eq!(full.level, full.wrap);

        // Out-of-range duty is clamped
        let clamped = PwmTiming::compute(CLOCK, 25_000, 200).unwrap();
        assert_eq!(clamped.level, full.level);
    }

    #[test]
    fn test_coarse_resolution_rounds_down() {
        // wrap = 9, so 1% steps collapse
        let timing = PwmTiming::compute(CLOCK, 12_500_000, 15).unwrap();
        assert_eq!(timing.wrap, 9);
        assert_eq!(timing.level, 1);
    }

    #[test]
    fn test_one_tick_period() {
        let timing = PwmTiming::compute(CLOCK, CLOCK, 50).unwrap();
        assert_eq!(timing.wrap, 0);
        assert_eq!(timing.level, 0);
    }

    #[test]
    fn test_out_of_range_frequencies() {
        assert_eq!(
            PwmTiming::compute(CLOCK, 0, 50),
            Err(PwmError::FrequencyOutOfRange)
        );
        assert_eq!(
            PwmTiming::compute(CLOCK, CLOCK + 1, 50),
            Err(PwmError::FrequencyOutOfRange)
        );
        // Needs a divider above 255 15/16
        assert_eq!(
            PwmTiming::compute(CLOCK, 7, 50),
            Err(PwmError::FrequencyOutOfRange)
        );
    }

    #[test]
    fn test_slowest_supported_frequency() {
        let timing = PwmTiming::compute(CLOCK, 8, 50).unwrap();
        assert!(timing.divider16 <= MAX_DIVIDER16);
        assert_eq!(timing.divider16, 3815);
    }

    proptest! {
        #[test]
        fn prop_registers_in_range(frequency in 8u32..=CLOCK, duty in 0u8..=100) {
            let timing = PwmTiming::compute(CLOCK, frequency, duty).unwrap();

            prop_assert!(timing.divider16 >= MIN_DIVIDER16);
            prop_assert!(timing.divider16 <= MAX_DIVIDER16);
            prop_assert!(timing.level <= timing.wrap);
        }

        #[test]
        fn prop_duty_monotonic(frequency in 8u32..=1_000_000, a in 0u8..=100, b in 0u8..=100) {
            let (low, high) = if a <= b { (a, b) } else { (b, a) };
            let t_low = PwmTiming::compute(CLOCK, frequency, low).unwrap();
            let t_high = PwmTiming::compute(CLOCK, frequency, high).unwrap();

            prop_assert_eq!(t_low.wrap, t_high.wrap);
            prop_assert!(t_low.level <= t_high.level);
        }
    }
}

//! Board pin assignment and validation

use levelshift_hal::GPIO_COUNT;

/// Number of digital outputs
pub const OUTPUT_COUNT: usize = 4;

/// Number of digital inputs
pub const INPUT_COUNT: usize = 4;

/// Number of PWM outputs
pub const PWM_COUNT: usize = 2;

/// Number of control outputs
pub const CONTROL_COUNT: usize = 2;

/// Number of analog inputs
pub const ADC_COUNT: usize = 3;

/// GPIOs wired to the ADC (RP2040)
pub const ADC_PINS: core::ops::RangeInclusive<u8> = 26..=28;

/// Pin configuration with optional inversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinConfig {
    /// GPIO pin number (0-29 for RP2040)
    pub pin: u8,
    /// Pin is active-low (inverted)
    pub inverted: bool,
}

impl PinConfig {
    pub const fn new(pin: u8) -> Self {
        Self {
            pin,
            inverted: false,
        }
    }

    /// Create an inverted (active-low) pin
    pub const fn inverted(pin: u8) -> Self {
        Self {
            pin,
            inverted: true,
        }
    }
}

/// Parse a pin string from config
///
/// Supports formats:
/// - "gpio6" -> pin 6, active-high
/// - "!gpio10" -> pin 10, active-low
pub fn parse_pin_string(s: &str) -> Option<PinConfig> {
    let s = s.trim();

    let (s, inverted) = match s.strip_prefix('!') {
        Some(rest) => (rest, true),
        None => (s, false),
    };

    let number = s.strip_prefix("gpio")?;
    if number.is_empty() || !number.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let pin: u8 = number.parse().ok()?;
    if pin as usize >= GPIO_COUNT {
        return None;
    }

    Some(PinConfig { pin, inverted })
}

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Pin number out of range
    InvalidPin(u8),
    /// Pin assigned to more than one role
    DuplicatePin(u8),
    /// ADC role on a pin without an ADC input
    InvalidAdcPin(u8),
    /// Both PWM outputs on the same slice
    SharedPwmSlice(u8),
}

/// Role assignment of every pin on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BoardConfig {
    /// Digital outputs, addressed as 0-3 from the console
    pub outputs: [PinConfig; OUTPUT_COUNT],
    /// Edge-triggered digital inputs
    pub inputs: [PinConfig; INPUT_COUNT],
    /// PWM outputs, addressed as p0/p1
    pub pwm: [u8; PWM_COUNT],
    /// Control outputs
    pub controls: [u8; CONTROL_COUNT],
    /// ADC inputs, addressed as ADC0-2
    pub adc: [u8; ADC_COUNT],
}

impl BoardConfig {
    /// Every assigned pin, in role order
    pub fn pins(&self) -> impl Iterator<Item = u8> + '_ {
        self.outputs
            .iter()
            .chain(self.inputs.iter())
            .map(|p| p.pin)
            .chain(self.pwm.iter().copied())
            .chain(self.controls.iter().copied())
            .chain(self.adc.iter().copied())
    }

    /// Check the assignment
    ///
    /// `slice_for_pin` is the device's pin to PWM slice mapping.
    pub fn validate(&self, slice_for_pin: impl Fn(u8) -> u8) -> Result<(), ConfigError> {
        let mut used = [false; GPIO_COUNT];
        for pin in self.pins() {
            let slot = used
                .get_mut(pin as usize)
                .ok_or(ConfigError::InvalidPin(pin))?;
            if *slot {
                return Err(ConfigError::DuplicatePin(pin));
            }
            *slot = true;
        }

        if let Some(&pin) = self.adc.iter().find(|p| !ADC_PINS.contains(p)) {
            return Err(ConfigError::InvalidAdcPin(pin));
        }

        for (i, &a) in self.pwm.iter().enumerate() {
            for &b in &self.pwm[i + 1..] {
                let slice = slice_for_pin(a);
                if slice == slice_for_pin(b) {
                    return Err(ConfigError::SharedPwmSlice(slice));
                }
            }
        }

        Ok(())
    }
}

//! PWM slice ownership
//!
//! Outputs A and B of a slice share the divider and wrap registers. Rather
//! than let two channels fight over them, each slice can be claimed once.

use levelshift_hal::{PwmBackend, GPIO_COUNT, PWM_SLICE_COUNT};

use super::PwmError;

/// Exclusive ownership of one PWM slice
///
/// Only obtainable from a [`SliceAllocator`]. Not `Clone`, so a slice is
/// driven by at most one [`PwmChannel`](super::PwmChannel) at a time.
#[derive(Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SliceClaim {
    slice: u8,
}

impl SliceClaim {
    pub fn slice(&self) -> u8 {
        self.slice
    }
}

/// Tracks which slices have been handed out
#[derive(Debug, Default)]
pub struct SliceAllocator {
    claimed: [bool; PWM_SLICE_COUNT],
}

impl SliceAllocator {
    pub const fn new() -> Self {
        Self {
            claimed: [false; PWM_SLICE_COUNT],
        }
    }

    /// Claim the slice driving `pin`
    pub fn claim_for_pin<P: PwmBackend>(
        &mut self,
        pwm: &P,
        pin: u8,
    ) -> Result<SliceClaim, PwmError> {
        if pin as usize >= GPIO_COUNT {
            return Err(PwmError::InvalidPin);
        }
        self.claim(pwm.slice_for_pin(pin))
    }

    /// Claim a slice by number
    pub fn claim(&mut self, slice: u8) -> Result<SliceClaim, PwmError> {
        let claimed = self
            .claimed
            .get_mut(slice as usize)
            .ok_or(PwmError::InvalidPin)?;
        if *claimed {
            return Err(PwmError::SliceInUse);
        }
        *claimed = true;
        Ok(SliceClaim { slice })
    }

    /// Return a slice so it can be claimed again
    pub fn release(&mut self, claim: SliceClaim) {
        self.claimed[claim.slice as usize] = false;
    }

    pub fn is_claimed(&self, slice: u8) -> bool {
        self.claimed.get(slice as usize).copied().unwrap_or(false)
    }

    /// Number of unclaimed slices
    pub fn available(&self) -> usize {
        self.claimed.iter().filter(|c| !**c).count()
    }
}

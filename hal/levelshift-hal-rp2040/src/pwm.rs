//! PWM slice registers

use embassy_rp::pac;
use levelshift_hal::{PwmBackend, PwmOutput};

use crate::Rp2040Hardware;

impl PwmBackend for Rp2040Hardware {
    fn source_clock_hz(&self) -> u32 {
        embassy_rp::clocks::clk_sys_freq()
    }

    /// GPIO0..15 map to slices 0..7, GPIO16..29 wrap around again
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
        pac::PWM
            .ch(slice as usize)
            .csr()
            .modify(|w| w.set_en(enabled));
    }

    fn set_clock_divider(&mut self, slice: u8, integer: u8, fraction: u8) {
        pac::PWM.ch(slice as usize).div().write(|w| {
            w.set_int(integer);
            w.set_frac(fraction);
        });
    }

    fn set_wrap(&mut self, slice: u8, wrap: u16) {
        pac::PWM.ch(slice as usize).top().write(|w| w.set_top(wrap));
    }

    fn set_compare(&mut self, slice: u8, output: PwmOutput, level: u16) {
        pac::PWM.ch(slice as usize).cc().modify(|w| match output {
            PwmOutput::A => w.set_a(level),
            PwmOutput::B => w.set_b(level),
        });
    }
}

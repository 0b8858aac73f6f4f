//! Levelshift - Level Shifter I/O Firmware
//!
//! Firmware binary for RP2040-based level shifter boards: four digital
//! outputs, four edge-triggered inputs, two PWM outputs and three analog
//! inputs, driven from a serial console on UART0 (GPIO0/GPIO1).
//!
//! The pin assignment comes from board.toml, validated and compiled in by
//! the build script.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::adc::{Adc, InterruptHandler as AdcInterruptHandler};
use embassy_rp::bind_interrupts;
use embassy_rp::peripherals::UART0;
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use levelshift_hal_rp2040::adc::AdcPins;
use levelshift_hal_rp2040::bank_pins;
use levelshift_hal_rp2040::pins::PinBank;

mod board;
mod channels;
mod tasks;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
    ADC_IRQ_FIFO => AdcInterruptHandler;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Levelshift firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    // GPIO0/1 go to the UART and GPIO26-28 to the ADC; everything else is
    // assigned by board.toml
    let mut bank = PinBank::new();
    bank_pins!(bank, p,
        2 => PIN_2, 3 => PIN_3, 4 => PIN_4, 5 => PIN_5, 6 => PIN_6, 7 => PIN_7,
        8 => PIN_8, 9 => PIN_9, 10 => PIN_10, 11 => PIN_11, 12 => PIN_12,
        13 => PIN_13, 14 => PIN_14, 15 => PIN_15, 16 => PIN_16, 17 => PIN_17,
        18 => PIN_18, 19 => PIN_19, 20 => PIN_20, 21 => PIN_21, 22 => PIN_22,
        23 => PIN_23, 24 => PIN_24, 25 => PIN_25, 29 => PIN_29,
    );
    let mut adc_pins = AdcPins::new(p.PIN_26, p.PIN_27, p.PIN_28);

    let (board, watchers) = match board::init(
        &board::BOARD,
        &mut bank,
        &mut adc_pins,
        tasks::on_input_edge,
    ) {
        Ok(built) => built,
        Err(e) => defmt::panic!("Board bring-up failed: {:?}", e),
    };
    info!("Board initialized: {} pins registered", board::PINS.len());

    let adc = Adc::new(p.ADC, Irqs, embassy_rp::adc::Config::default());

    // Console on UART0, 115200 baud default
    let tx_buf = TX_BUF.init([0u8; 256]);
    let rx_buf = RX_BUF.init([0u8; 256]);
    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, UartConfig::default());
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    info!("UART initialized for console");

    for watcher in watchers {
        spawner.spawn(tasks::edge_watch_task(watcher)).unwrap();
    }
    spawner
        .spawn(tasks::console_task(uart, adc, board))
        .unwrap();

    info!("All tasks spawned, firmware running");

    // Main task has nothing else to do - all work happens in spawned tasks
    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}

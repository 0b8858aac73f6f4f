//! Serial console task
//!
//! Line-oriented command interface on UART0. Edges on the input pins are
//! reported between commands as `Triggered pin [n]`.

use core::fmt::{self, Write as _};

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_rp::adc::{Adc, Async};
use embassy_rp::clocks::clk_sys_freq;
use embassy_rp::uart::BufferedUart;
use embassy_time::{Duration, Timer};
use embedded_io_async::{Read, Write};
use heapless::String;

use levelshift_console::{
    help_text, Command, CommandError, LineBuffer, LineEvent, PwmCommand, LINE_CAPACITY,
};
use levelshift_core::diagnostics::overview_pins;
use levelshift_core::PinStatus;
use levelshift_hal_rp2040::Rp2040Hardware;

use crate::board::Board;
use crate::channels::PIN_EVENTS;

/// Buffer size for UART receive
const RX_BUF_SIZE: usize = 32;

/// Longest formatted line
const PRINT_BUF_SIZE: usize = 128;

/// ADC sample period while polling
const ADC_POLL_INTERVAL: Duration = Duration::from_millis(500);

const PROMPT: &[u8] = b">>";

/// Console task - owns the UART, the ADC and every board pin
#[embassy_executor::task]
pub async fn console_task(uart: BufferedUart, adc: Adc<'static, Async>, board: Board) {
    info!("Console task started");

    let mut console = Console {
        uart,
        adc,
        board,
        line: LineBuffer::new(),
    };
    console.run().await
}

struct Console {
    uart: BufferedUart,
    adc: Adc<'static, Async>,
    board: Board,
    line: LineBuffer<LINE_CAPACITY>,
}

impl Console {
    async fn run(&mut self) -> ! {
        write(&mut self.uart, b"Level shifter console ready, ? for help\n").await;
        write(&mut self.uart, PROMPT).await;

        let mut buf = [0u8; RX_BUF_SIZE];
        loop {
            match select(self.uart.read(&mut buf), PIN_EVENTS.receive()).await {
                Either::First(Ok(n)) => {
                    trace!("RX: {} bytes", n);
                    for &byte in &buf[..n] {
                        self.handle_byte(byte).await;
                    }
                }
                Either::First(Err(e)) => {
                    warn!("UART read error: {:?}", e);
                }
                Either::Second(event) => {
                    debug!("Pin event: GPIO{} {:?}", event.pin, event.events);
                    print(
                        &mut self.uart,
                        format_args!("Triggered pin [{}]\n", event.pin),
                    )
                    .await;
                }
            }
        }
    }

    async fn handle_byte(&mut self, byte: u8) {
        match self.line.feed(byte) {
            LineEvent::Echo(b) => write(&mut self.uart, &[b]).await,
            LineEvent::Erase => write(&mut self.uart, b"\x08 \x08").await,
            LineEvent::Empty => {
                write(&mut self.uart, b"\nThere is no data to process\n").await;
                write(&mut self.uart, PROMPT).await;
            }
            LineEvent::Line => {
                // Copy out so the buffer is free while the command runs
                let mut text: String<LINE_CAPACITY> = String::new();
                if let Some(line) = self.line.line() {
                    let _ = text.push_str(line);
                }
                write(&mut self.uart, b"\n").await;

                match Command::parse(&text) {
                    Ok(command) => {
                        debug!("Command: {:?}", command);
                        self.execute(command).await;
                    }
                    Err(CommandError::InvalidArgument) => {
                        print(&mut self.uart, format_args!("Invalid argument: [{}]\n", text))
                            .await;
                    }
                    Err(_) => {
                        print(
                            &mut self.uart,
                            format_args!("Unrecognized command: [{}]\n", text),
                        )
                        .await;
                    }
                }
                write(&mut self.uart, PROMPT).await;
            }
            LineEvent::Ignored => {}
        }
    }

    async fn execute(&mut self, command: Command) {
        match command {
            Command::SetOutput { index, on } => {
                self.board.outputs[index as usize].set(on);
                print(
                    &mut self.uart,
                    format_args!("Set OUT{}: {}\n", index, on_off(on)),
                )
                .await;
            }
            Command::ShowInputs => {
                for (index, input) in self.board.inputs.iter().enumerate() {
                    print(
                        &mut self.uart,
                        format_args!("IN{} = {}\n", index, on_off(input.get())),
                    )
                    .await;
                }
            }
            Command::Help => write(&mut self.uart, help_text().as_bytes()).await,
            Command::PollAdc(index) => self.poll_adc(index).await,
            Command::PinOverview => {
                let hw = Rp2040Hardware::new();
                for pin in overview_pins() {
                    let status = PinStatus::read(&hw, pin);
                    print(&mut self.uart, format_args!("{}\n", status)).await;
                }
            }
            Command::Pwm { index, command } => self.execute_pwm(index, command).await,
        }
    }

    async fn execute_pwm(&mut self, index: u8, command: PwmCommand) {
        let pwm = &mut self.board.pwm[index as usize];
        let uart = &mut self.uart;

        match command {
            PwmCommand::Frequency(hz) => match pwm.set_frequency(hz) {
                Ok(()) => {
                    let actual = pwm.timing().actual_frequency_hz(clk_sys_freq());
                    print(
                        uart,
                        format_args!("PWM{}: {} Hz (actual {} Hz)\n", index, hz, actual),
                    )
                    .await;
                }
                Err(e) => {
                    warn!("PWM{} frequency {} rejected: {:?}", index, hz, e);
                    print(
                        uart,
                        format_args!("PWM{}: frequency {} Hz out of range\n", index, hz),
                    )
                    .await;
                }
            },
            PwmCommand::DutyCycle(duty) => {
                pwm.set_duty_cycle(duty);
                print(
                    uart,
                    format_args!("PWM{}: duty {}%\n", index, pwm.duty_cycle()),
                )
                .await;
            }
            PwmCommand::Enable(on) => {
                pwm.set_enabled(on);
                print(uart, format_args!("PWM{}: {}\n", index, on_off(on))).await;
            }
            PwmCommand::Stuck(high) => {
                pwm.stuck(high);
                let level = if high { "high" } else { "low" };
                print(uart, format_args!("PWM{}: stuck {}\n", index, level)).await;
            }
            PwmCommand::Release => {
                pwm.release();
                print(uart, format_args!("PWM{}: released\n", index)).await;
            }
        }
    }

    /// Print ADC samples until any byte arrives
    async fn poll_adc(&mut self, index: u8) {
        print(
            &mut self.uart,
            format_args!(
                "Polling ADC{} every {} ms, any key stops\n",
                index,
                ADC_POLL_INTERVAL.as_millis()
            ),
        )
        .await;

        let mut key = [0u8; 1];
        loop {
            match select(Timer::after(ADC_POLL_INTERVAL), self.uart.read(&mut key)).await {
                Either::First(()) => {
                    let channel = &mut self.board.adc_channels[index as usize];
                    match self.adc.read(channel).await {
                        Ok(value) => {
                            print(&mut self.uart, format_args!("Value: {}\n", value)).await;
                        }
                        Err(e) => {
                            warn!("ADC{} read error: {:?}", index, e);
                        }
                    }
                }
                // The stop key is consumed, not treated as input
                Either::Second(_) => break,
            }
        }

        print(&mut self.uart, format_args!("Stopped reading ADC{}\n", index)).await;
    }
}

fn on_off(on: bool) -> &'static str {
    if on {
        "On"
    } else {
        "Off"
    }
}

/// Format into a line buffer and write it
///
/// Output longer than the buffer is truncated.
async fn print(uart: &mut BufferedUart, args: fmt::Arguments<'_>) {
    let mut text: String<PRINT_BUF_SIZE> = String::new();
    let _ = text.write_fmt(args);
    write(uart, text.as_bytes()).await;
}

/// Write bytes, expanding `\n` to `\r\n` for the terminal
async fn write(uart: &mut BufferedUart, bytes: &[u8]) {
    for chunk in bytes.split_inclusive(|&b| b == b'\n') {
        let (body, newline) = match chunk.split_last() {
            Some((&b'\n', body)) => (body, true),
            _ => (chunk, false),
        };

        let mut result = uart.write_all(body).await;
        if newline && result.is_ok() {
            result = uart.write_all(b"\r\n").await;
        }
        if let Err(e) = result {
            warn!("UART write error: {:?}", e);
            return;
        }
    }
}

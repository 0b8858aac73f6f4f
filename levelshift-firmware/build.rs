//! Build script for levelshift-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates board.toml at compile time
//! - Generates the `BOARD` constant the firmware boots with

use std::env;
use std::fmt::Write as _;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use levelshift_core::config::{
    parse_pin_string, BoardConfig, ConfigError, PinConfig, ADC_COUNT, CONTROL_COUNT, INPUT_COUNT,
    OUTPUT_COUNT, PWM_COUNT,
};
use serde::Deserialize;

/// GPIOs reserved for the console UART
const UART_PINS: [u8; 2] = [0, 1];

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct BoardFile {
    outputs: Section,
    inputs: Section,
    pwm: Section,
    control: Section,
    adc: Section,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct Section {
    pins: Vec<String>,
}

fn main() {
    setup_linker();
    let board = load_board();
    let config = validate_board(&board);
    generate_board(&config);
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Read and parse board.toml
fn load_board() -> BoardFile {
    println!("cargo:rerun-if-changed=board.toml");

    let config_path = Path::new("board.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: board.toml not found!                                    ║\n\
            ║                                                                  ║\n\
            ║  The firmware requires a board.toml pin assignment file.         ║\n\
            ║  Please create one in the levelshift-firmware directory.         ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read board.toml                                ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    // Syntax errors and missing sections both surface here
    match toml::from_str(&content) {
        Ok(board) => board,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid board.toml                                       ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&e.to_string())
            );
        }
    }
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parsed pins per role, in board.toml order
struct BoardPins {
    outputs: Vec<PinConfig>,
    inputs: Vec<PinConfig>,
    pwm: Vec<PinConfig>,
    control: Vec<PinConfig>,
    adc: Vec<PinConfig>,
}

/// Parse one section, collecting errors
fn parse_section(
    name: &str,
    section: &Section,
    count: usize,
    allow_inverted: bool,
    errors: &mut Vec<String>,
) -> Vec<PinConfig> {
    if section.pins.len() != count {
        errors.push(format!(
            "[{}] needs exactly {} pins, found {}",
            name,
            count,
            section.pins.len()
        ));
    }

    let mut pins = Vec::new();
    for entry in &section.pins {
        match parse_pin_string(entry) {
            Some(pin) if pin.inverted && !allow_inverted => {
                errors.push(format!("[{}] '{}' cannot be active-low", name, entry));
            }
            Some(pin) => pins.push(pin),
            None => errors.push(format!("[{}] invalid pin '{}'", name, entry)),
        }
    }
    pins
}

/// Copy a parsed section into a fixed-size role array
fn role<const N: usize>(pins: &[PinConfig]) -> Option<[PinConfig; N]> {
    pins.try_into().ok()
}

fn numbers<const N: usize>(pins: [PinConfig; N]) -> [u8; N] {
    pins.map(|p| p.pin)
}

fn config_error(e: ConfigError) -> String {
    match e {
        ConfigError::InvalidPin(pin) => format!("gpio{} does not exist", pin),
        ConfigError::DuplicatePin(pin) => format!("gpio{} is assigned more than once", pin),
        ConfigError::InvalidAdcPin(pin) => format!("[adc] gpio{} has no ADC input (26-28)", pin),
        ConfigError::SharedPwmSlice(slice) => {
            format!("[pwm] both pins share PWM slice {}", slice)
        }
    }
}

/// Validate pin syntax and counts here, then the assignment itself with
/// the same checks the firmware runs at boot
fn validate_board(board: &BoardFile) -> BoardConfig {
    let mut errors = Vec::new();

    let pins = BoardPins {
        outputs: parse_section("outputs", &board.outputs, OUTPUT_COUNT, true, &mut errors),
        inputs: parse_section("inputs", &board.inputs, INPUT_COUNT, true, &mut errors),
        pwm: parse_section("pwm", &board.pwm, PWM_COUNT, false, &mut errors),
        control: parse_section("control", &board.control, CONTROL_COUNT, false, &mut errors),
        adc: parse_section("adc", &board.adc, ADC_COUNT, false, &mut errors),
    };

    for pin in pins
        .outputs
        .iter()
        .chain(&pins.inputs)
        .chain(&pins.pwm)
        .chain(&pins.control)
        .chain(&pins.adc)
    {
        if UART_PINS.contains(&pin.pin) {
            errors.push(format!("gpio{} is reserved for the console UART", pin.pin));
        }
    }

    let config = match (
        role(&pins.outputs),
        role(&pins.inputs),
        role(&pins.pwm),
        role(&pins.control),
        role(&pins.adc),
    ) {
        (Some(outputs), Some(inputs), Some(pwm), Some(controls), Some(adc)) => Some(BoardConfig {
            outputs,
            inputs,
            pwm: numbers(pwm),
            controls: numbers(controls),
            adc: numbers(adc),
        }),
        _ => None,
    };

    if let Some(config) = &config {
        if let Err(e) = config.validate(slice_for_pin) {
            errors.push(config_error(e));
        }
    }

    match config {
        Some(config) if errors.is_empty() => {
            println!("cargo:warning=board.toml validated successfully");
            config
        }
        _ => panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid board configuration                              ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        ),
    }
}

/// RP2040 pin to PWM slice mapping
fn slice_for_pin(pin: u8) -> u8 {
    (pin >> 1) & 0x7
}

/// `PinConfig` literals for a generated array
fn pin_configs(list: &[PinConfig]) -> String {
    list.iter()
        .map(|p| format!("PinConfig {{ pin: {}, inverted: {} }}", p.pin, p.inverted))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Bare pin numbers for a generated array
fn pin_numbers(list: &[u8]) -> String {
    list.iter()
        .map(|p| p.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Write `$OUT_DIR/board.rs` with the `BOARD` constant
fn generate_board(config: &BoardConfig) {
    let mut code = String::new();
    writeln!(code, "/// Pin assignment generated from board.toml").unwrap();
    writeln!(code, "pub const BOARD: BoardConfig = BoardConfig {{").unwrap();
    writeln!(code, "    outputs: [{}],", pin_configs(&config.outputs)).unwrap();
    writeln!(code, "    inputs: [{}],", pin_configs(&config.inputs)).unwrap();
    writeln!(code, "    pwm: [{}],", pin_numbers(&config.pwm)).unwrap();
    writeln!(code, "    controls: [{}],", pin_numbers(&config.controls)).unwrap();
    writeln!(code, "    adc: [{}],", pin_numbers(&config.adc)).unwrap();
    writeln!(code, "}};").unwrap();

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    fs::write(out_dir.join("board.rs"), code).unwrap();
}

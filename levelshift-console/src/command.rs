//! Console commands
//!
//! | Line              | Command                                |
//! |-------------------|----------------------------------------|
//! | `0on` .. `3off`   | set an output (`on`/`off` any case)    |
//! | `i`               | show the inputs                        |
//! | `?`               | help                                   |
//! | `ADC0` .. `ADC2`  | poll an analog input                   |
//! | `Pins`            | pin overview                           |
//! | `p0 f25000`       | PWM frequency in Hz                    |
//! | `p0 d50`          | PWM duty cycle in percent              |
//! | `p0 on` / `off`   | start or stop PWM                      |
//! | `p0 stuck hi`     | force PWM pin high (`lo` for low)      |
//! | `p0 release`      | resume PWM                             |

/// Number of digital outputs addressable from the console
pub const OUTPUTS: u8 = 4;

/// Number of PWM outputs addressable from the console
pub const PWM_OUTPUTS: u8 = 2;

/// Number of analog inputs addressable from the console
pub const ADC_CHANNELS: u8 = 3;

/// Errors from [`Command::parse`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandError {
    /// Line was blank
    Empty,
    /// Line does not start with a known command
    Unrecognized,
    /// Known command with a missing or out-of-range argument
    InvalidArgument,
}

/// Operation on one PWM output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PwmCommand {
    Frequency(u32),
    DutyCycle(u8),
    Enable(bool),
    /// Force the pin to a fixed level
    Stuck(bool),
    Release,
}

/// A parsed console line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    SetOutput { index: u8, on: bool },
    ShowInputs,
    Help,
    /// Poll an analog input until a key is pressed
    PollAdc(u8),
    PinOverview,
    Pwm { index: u8, command: PwmCommand },
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let line = line.trim();
        if line.is_empty() {
            return Err(CommandError::Empty);
        }

        match line {
            "i" => return Ok(Command::ShowInputs),
            "?" => return Ok(Command::Help),
            "Pins" => return Ok(Command::PinOverview),
            _ => {}
        }

        if let Some(channel) = line.strip_prefix("ADC") {
            let channel = parse_index(channel, ADC_CHANNELS)?;
            return Ok(Command::PollAdc(channel));
        }

        if let Some(rest) = line.strip_prefix('p') {
            if rest.as_bytes().first().is_some_and(u8::is_ascii_digit) {
                return parse_pwm(rest);
            }
        }

        let first = line.as_bytes()[0];
        if first.is_ascii_digit() {
            let index = parse_index(&line[..1], OUTPUTS)?;
            let on = parse_on_off(&line[1..]).ok_or(CommandError::InvalidArgument)?;
            return Ok(Command::SetOutput { index, on });
        }

        Err(CommandError::Unrecognized)
    }
}

/// `p<n> <op>`
fn parse_pwm(rest: &str) -> Result<Command, CommandError> {
    let mut words = rest.split_ascii_whitespace();
    let index = words.next().ok_or(CommandError::InvalidArgument)?;
    let index = parse_index(index, PWM_OUTPUTS)?;
    let op = words.next().ok_or(CommandError::InvalidArgument)?;
    let arg = words.next();
    if words.next().is_some() {
        return Err(CommandError::InvalidArgument);
    }

    let command = match (op, arg) {
        ("release", None) => PwmCommand::Release,
        ("stuck", Some(level)) => match level {
            "hi" => PwmCommand::Stuck(true),
            "lo" => PwmCommand::Stuck(false),
            _ => return Err(CommandError::InvalidArgument),
        },
        (op, None) => {
            if let Some(on) = parse_on_off(op) {
                PwmCommand::Enable(on)
            } else if let Some(hz) = op.strip_prefix('f') {
                PwmCommand::Frequency(hz.parse().map_err(|_| CommandError::InvalidArgument)?)
            } else if let Some(pct) = op.strip_prefix('d') {
                let duty: u8 = pct.parse().map_err(|_| CommandError::InvalidArgument)?;
                if duty > 100 {
                    return Err(CommandError::InvalidArgument);
                }
                PwmCommand::DutyCycle(duty)
            } else {
                return Err(CommandError::InvalidArgument);
            }
        }
        _ => return Err(CommandError::InvalidArgument),
    };

    Ok(Command::Pwm { index, command })
}

/// Single decimal digit below `count`
fn parse_index(s: &str, count: u8) -> Result<u8, CommandError> {
    match s.as_bytes() {
        [d @ b'0'..=b'9'] if d - b'0' < count => Ok(d - b'0'),
        _ => Err(CommandError::InvalidArgument),
    }
}

fn parse_on_off(s: &str) -> Option<bool> {
    if s.eq_ignore_ascii_case("on") {
        Some(true)
    } else if s.eq_ignore_ascii_case("off") {
        Some(false)
    } else {
        None
    }
}

/// Help listing printed for `?`
pub fn help_text() -> &'static str {
    "Options for the software:\n\
     {0-3}<on|off>       Set OUT0-OUT3 on or off\n\
     i                   Show status of IN0-IN3\n\
     ADC{0-2}            Poll an analog input, any key stops\n\
     Pins                Show pin overview\n\
     p{0-1} f<hz>        Set PWM frequency\n\
     p{0-1} d<percent>   Set PWM duty cycle\n\
     p{0-1} <on|off>     Start or stop PWM\n\
     p{0-1} stuck <hi|lo> Force PWM pin to a level\n\
     p{0-1} release      Resume PWM\n\
     ?                   Show this help\n"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_output() {
        assert_eq!(
            Command::parse("0on"),
            Ok(Command::SetOutput { index: 0, on: true })
        );
        assert_eq!(
            Command::parse("3off"),
            Ok(Command::SetOutput { index: 3, on: false })
        );
    }

    #[test]
    fn test_set_output_case_insensitive() {
        assert_eq!(
            Command::parse("1ON"),
            Ok(Command::SetOutput { index: 1, on: true })
        );
        assert_eq!(
            Command::parse("2oFf"),
            Ok(Command::SetOutput { index: 2, on: false })
        );
    }

    #[test]
    fn test_set_output_errors() {
        assert_eq!(Command::parse("4on"), Err(CommandError::InvalidArgument));
        assert_eq!(Command::parse("0"), Err(CommandError::InvalidArgument));
        assert_eq!(Command::parse("0of"), Err(CommandError::InvalidArgument));
        assert_eq!(Command::parse("12on"), Err(CommandError::InvalidArgument));
    }

    #[test]
    fn test_simple_commands() {
        assert_eq!(Command::parse("i"), Ok(Command::ShowInputs));
        assert_eq!(Command::parse("?"), Ok(Command::Help));
        assert_eq!(Command::parse("Pins"), Ok(Command::PinOverview));
        assert_eq!(Command::parse("  i  "), Ok(Command::ShowInputs));
    }

    #[test]
    fn test_adc() {
        assert_eq!(Command::parse("ADC0"), Ok(Command::PollAdc(0)));
        assert_eq!(Command::parse("ADC2"), Ok(Command::PollAdc(2)));
        assert_eq!(Command::parse("ADC3"), Err(CommandError::InvalidArgument));
        assert_eq!(Command::parse("ADC"), Err(CommandError::InvalidArgument));
    }

    #[test]
    fn test_pwm_commands() {
        assert_eq!(
            Command::parse("p0 f25000"),
            Ok(Command::Pwm {
                index: 0,
                command: PwmCommand::Frequency(25_000)
            })
        );
        assert_eq!(
            Command::parse("p1 d75"),
            Ok(Command::Pwm {
                index: 1,
                command: PwmCommand::DutyCycle(75)
            })
        );
        assert_eq!(
            Command::parse("p0 On"),
            Ok(Command::Pwm {
                index: 0,
                command: PwmCommand::Enable(true)
            })
        );
        assert_eq!(
            Command::parse("p1 stuck lo"),
            Ok(Command::Pwm {
                index: 1,
                command: PwmCommand::Stuck(false)
            })
        );
        assert_eq!(
            Command::parse("p1   release"),
            Ok(Command::Pwm {
                index: 1,
                command: PwmCommand::Release
            })
        );
    }

    #[test]
    fn test_pwm_errors() {
        assert_eq!(Command::parse("p2 on"), Err(CommandError::InvalidArgument));
        assert_eq!(Command::parse("p0"), Err(CommandError::InvalidArgument));
        assert_eq!(Command::parse("p0 d101"), Err(CommandError::InvalidArgument));
        assert_eq!(Command::parse("p0 fast"), Err(CommandError::InvalidArgument));
        assert_eq!(Command::parse("p0 stuck"), Err(CommandError::InvalidArgument));
        assert_eq!(
            Command::parse("p0 stuck hi now"),
            Err(CommandError::InvalidArgument)
        );
        assert_eq!(Command::parse("p0 release x"), Err(CommandError::InvalidArgument));
    }

    #[test]
    fn test_unrecognized() {
        assert_eq!(Command::parse(""), Err(CommandError::Empty));
        assert_eq!(Command::parse("   "), Err(CommandError::Empty));
        assert_eq!(Command::parse("hello"), Err(CommandError::Unrecognized));
        assert_eq!(Command::parse("pins"), Err(CommandError::Unrecognized));
    }

    #[test]
    fn test_help_lists_every_command() {
        let help = help_text();
        for word in ["on|off", "IN0", "ADC", "Pins", "f<hz>", "stuck", "release", "?"] {
            assert!(help.contains(word), "missing {}", word);
        }
    }
}

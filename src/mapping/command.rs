//! Output protocol
//! One command per line on standard output: `move <speed> <direction>`,
//! `snapturn left` or `snapturn right`.

use std::fmt;
use std::io::{self, Write};

/// Significant digits of a default-formatted stream float.
const SIGNIFICANT_DIGITS: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Turn {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Move { speed: f32, direction: f32 },
    SnapTurn(Turn),
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Move { speed, direction } => {
                write!(f, "move {} {}", StreamFloat(*speed), StreamFloat(*direction))
            }
            Command::SnapTurn(Turn::Left) => f.write_str("snapturn left"),
            Command::SnapTurn(Turn::Right) => f.write_str("snapturn right"),
        }
    }
}

/// Renders a float like `%g`: six significant digits, no trailing zeros,
/// scientific notation for very small or large magnitudes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StreamFloat(pub f32);

fn trim_fraction(digits: &str) -> &str {
    if digits.contains('.') {
        digits.trim_end_matches('0').trim_end_matches('.')
    } else {
        digits
    }
}

impl fmt::Display for StreamFloat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = self.0;
        if value.is_nan() {
            return f.write_str("nan");
        }
        if value.is_infinite() {
            return f.write_str(if value < 0.0 { "-inf" } else { "inf" });
        }
        if value == 0.0 {
            return f.write_str(if value.is_sign_negative() { "-0" } else { "0" });
        }

        // The exponent after rounding to the target precision decides the notation.
        let scientific = format!("{:.*e}", SIGNIFICANT_DIGITS - 1, value);
        let (mantissa, exponent) = scientific.split_once('e').unwrap_or((&scientific, "0"));
        let exponent: i32 = exponent.parse().unwrap_or(0);

        if exponent < -4 || exponent >= SIGNIFICANT_DIGITS as i32 {
            let sign = if exponent < 0 { '-' } else { '+' };
            write!(f, "{}e{}{:02}", trim_fraction(mantissa), sign, exponent.abs())
        } else {
            let decimals = (SIGNIFICANT_DIGITS as i32 - 1 - exponent) as usize;
            let fixed = format!("{:.*}", decimals, value);
            f.write_str(trim_fraction(&fixed))
        }
    }
}

/// Writes commands line by line, flushing after each one so the consumer sees
/// them immediately.
pub struct CommandWriter<W: Write> {
    inner: W,
}

impl<W: Write> CommandWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn write_command(&mut self, command: &Command) -> io::Result<()> {
        writeln!(self.inner, "{}", command)?;
        self.inner.flush()
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

//! Operator intents and the parsing of operator-typed values

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

use super::state::MAX_LASER_POWER;

/// Machine axis addressed by a move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            Axis::X => "X",
            Axis::Y => "Y",
            Axis::Z => "Z",
        };
        f.write_str(letter)
    }
}

impl FromStr for Axis {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "X" => Ok(Axis::X),
            "Y" => Ok(Axis::Y),
            "Z" => Ok(Axis::Z),
            _ => Err(Error::RangeError {
                what: "axis",
                value: s.to_string(),
                expected: "one of X, Y, Z",
            }),
        }
    }
}

/// Jog direction as pressed on the arrow keys / buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    ZUp,
    ZDown,
}

impl Direction {
    /// Axis and sign of a move in this direction
    pub fn axis_sign(self) -> (Axis, f64) {
        match self {
            Direction::Up => (Axis::Y, 1.0),
            Direction::Down => (Axis::Y, -1.0),
            Direction::Left => (Axis::X, -1.0),
            Direction::Right => (Axis::X, 1.0),
            Direction::ZUp => (Axis::Z, 1.0),
            Direction::ZDown => (Axis::Z, -1.0),
        }
    }
}

impl FromStr for Direction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" | "y+" => Ok(Direction::Up),
            "down" | "y-" => Ok(Direction::Down),
            "left" | "x-" => Ok(Direction::Left),
            "right" | "x+" => Ok(Direction::Right),
            "zup" | "z+" => Ok(Direction::ZUp),
            "zdown" | "z-" => Ok(Direction::ZDown),
            _ => Err(Error::RangeError {
                what: "direction",
                value: s.to_string(),
                expected: "up, down, left, right, zup or zdown",
            }),
        }
    }
}

/// Something the operator asked the sender to do
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    /// Step along one axis; `None` falls back to the state's step size / speed
    Jog {
        direction: Direction,
        step: Option<f64>,
        speed: Option<u32>,
    },
    Home,
    ToggleMode,
    Abort,
    SetLaserPower(u16),
    /// Scroll-wheel / page-key nudge, clamped to the valid range
    AdjustLaserPower(i32),
    SetSpeed(u32),
    SetStepSize(f64),
    /// Laser-on cut of `length` along `axis`; nothing is sent unless confirmed
    PredefinedCut {
        axis: Axis,
        length: f64,
        confirmed: bool,
    },
    /// Laser move to an absolute point at the current power
    MoveTo { x: f64, y: f64 },
    LaserOn,
    LaserOff,
    SendRaw(String),
}

/// Parse a laser power value typed by the operator
pub fn parse_laser_power(input: &str) -> Result<u16> {
    let value: i64 = parse_number("laser power", input)?;
    if !(0..=i64::from(MAX_LASER_POWER)).contains(&value) {
        return Err(Error::RangeError {
            what: "laser power",
            value: value.to_string(),
            expected: "0 to 1000",
        });
    }
    Ok(value as u16)
}

/// Parse a feed rate typed by the operator
pub fn parse_speed(input: &str) -> Result<u32> {
    let value: i64 = parse_number("speed", input)?;
    if value <= 0 || value > i64::from(u32::MAX) {
        return Err(Error::RangeError {
            what: "speed",
            value: value.to_string(),
            expected: "a positive integer",
        });
    }
    Ok(value as u32)
}

/// Parse a cut length typed by the operator
pub fn parse_length(input: &str) -> Result<f64> {
    let value: f64 = parse_number("length", input)?;
    if !value.is_finite() || value < 0.0 {
        return Err(Error::RangeError {
            what: "length",
            value: input.trim().to_string(),
            expected: "zero or more",
        });
    }
    Ok(value)
}

/// Parse a jog step size typed by the operator
pub fn parse_step_size(input: &str) -> Result<f64> {
    let value: f64 = parse_number("step size", input)?;
    if !value.is_finite() || value <= 0.0 {
        return Err(Error::RangeError {
            what: "step size",
            value: input.trim().to_string(),
            expected: "greater than zero",
        });
    }
    Ok(value)
}

/// Parse a bed or material dimension; sign checks happen in the layout model
pub fn parse_dimension(what: &'static str, input: &str) -> Result<i64> {
    parse_number(what, input)
}

fn parse_number<T: FromStr>(what: &'static str, input: &str) -> Result<T> {
    input.trim().parse().map_err(|_| Error::InvalidNumeric {
        what,
        input: input.to_string(),
    })
}

//! Console command language
//!
//! One operator action per line, standing in for the jog buttons and key
//! bindings of a graphical front end:
//!
//! ```text
//! up | down | left | right | zup | zdown [STEP]
//! home | abort | resume | mode | on | off
//! power VALUE | power+ | power- | speed VALUE | step VALUE
//! cut X|Y LENGTH | move X Y | send GCODE... | status | help | quit
//! ```

use crate::command::intent::{parse_laser_power, parse_length, parse_speed, parse_step_size};
use crate::command::{Axis, Direction, Intent};
use crate::error::{Error, Result};

/// Laser power change for `power+` / `power-`
pub const POWER_NUDGE: i32 = 10;

pub const HELP: &str = "\
up|down|left|right|zup|zdown [STEP]  jog one step
home                                 home axes (G28)
abort                                emergency stop (M112)
resume                               accept commands again after abort
mode                                 toggle relative/absolute mode
on | off                             laser on (M3) / off (M5)
power VALUE | power+ | power-        set or nudge laser power (0-1000)
speed VALUE                          set feed rate (units/min)
step VALUE                           set jog step size (mm)
cut X|Y LENGTH                       laser cut along an axis (asks first)
move X Y                             laser move to X,Y at current power
send GCODE...                        send a raw line
status | help | quit";

#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleCommand {
    Intent(Intent),
    /// Needs operator confirmation before it becomes an intent
    Cut { axis: Axis, length: f64 },
    Resume,
    Status,
    Help,
    Quit,
}

/// Parse one console line; blank lines yield `None`
pub fn parse_console_line(line: &str) -> Result<Option<ConsoleCommand>> {
    let mut words = line.split_whitespace();
    let Some(keyword) = words.next() else {
        return Ok(None);
    };
    let rest: Vec<&str> = words.collect();
    let keyword = keyword.to_ascii_lowercase();

    let command = match keyword.as_str() {
        "up" | "down" | "left" | "right" | "zup" | "zdown" => {
            let direction: Direction = keyword.parse()?;
            let step = rest.first().map(|s| parse_step_size(s)).transpose()?;
            ConsoleCommand::Intent(Intent::Jog {
                direction,
                step,
                speed: None,
            })
        }
        "home" => ConsoleCommand::Intent(Intent::Home),
        "abort" | "stop" => ConsoleCommand::Intent(Intent::Abort),
        "resume" => ConsoleCommand::Resume,
        "mode" => ConsoleCommand::Intent(Intent::ToggleMode),
        "on" => ConsoleCommand::Intent(Intent::LaserOn),
        "off" => ConsoleCommand::Intent(Intent::LaserOff),
        "power" => ConsoleCommand::Intent(Intent::SetLaserPower(parse_laser_power(
            argument(&rest, 0, "laser power")?,
        )?)),
        "power+" => ConsoleCommand::Intent(Intent::AdjustLaserPower(POWER_NUDGE)),
        "power-" => ConsoleCommand::Intent(Intent::AdjustLaserPower(-POWER_NUDGE)),
        "speed" => ConsoleCommand::Intent(Intent::SetSpeed(parse_speed(argument(
            &rest, 0, "speed",
        )?)?)),
        "step" => ConsoleCommand::Intent(Intent::SetStepSize(parse_step_size(argument(
            &rest, 0, "step size",
        )?)?)),
        "cut" => {
            let axis: Axis = argument(&rest, 0, "cut axis")?.parse()?;
            let length = parse_length(argument(&rest, 1, "length")?)?;
            ConsoleCommand::Cut { axis, length }
        }
        "move" => {
            let x = parse_coordinate(argument(&rest, 0, "x")?)?;
            let y = parse_coordinate(argument(&rest, 1, "y")?)?;
            ConsoleCommand::Intent(Intent::MoveTo { x, y })
        }
        "send" => ConsoleCommand::Intent(Intent::SendRaw(rest.join(" "))),
        "status" => ConsoleCommand::Status,
        "help" | "?" => ConsoleCommand::Help,
        "quit" | "exit" => ConsoleCommand::Quit,
        _ => {
            return Err(Error::RangeError {
                what: "console command",
                value: keyword,
                expected: "see 'help'",
            });
        }
    };

    Ok(Some(command))
}

fn argument<'a>(rest: &[&'a str], idx: usize, what: &'static str) -> Result<&'a str> {
    rest.get(idx).copied().ok_or(Error::InvalidNumeric {
        what,
        input: String::new(),
    })
}

fn parse_coordinate(input: &str) -> Result<f64> {
    match input.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(Error::InvalidNumeric {
            what: "coordinate",
            input: input.to_string(),
        }),
    }
}

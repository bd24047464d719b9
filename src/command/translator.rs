//! G-code Command Translator
//!
//! Turns an [`Intent`] plus the current [`MachineState`] into the exact
//! payloads to hand to the transport, one payload per transport write.
//! Validation always runs before formatting, so a rejected intent produces
//! no payload and leaves the state untouched.

use serde::Deserialize;

use crate::error::{Error, Result};

use super::intent::{Axis, Intent};
use super::state::{MAX_LASER_POWER, MachineState};

/// Which payloads get the relative-mode `G91`/`G90` wrapper
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WrapPolicy {
    /// Wrap every payload while relative mode is on, homing and e-stop included
    #[default]
    Always,
    /// Send `G28` and `M112` bare; wrap everything else
    MotionOnly,
}

/// Wrap a command for relative mode: `G91\n<command>\nG90\n`
pub fn wrap_relative(command: &str) -> String {
    format!("G91\n{command}\nG90\n")
}

/// Format a coordinate the short way: `5`, `2.5`, `-5`
pub fn format_number(value: f64) -> String {
    format!("{value}")
}

/// Stateless formatter; all state lives in [`MachineState`]
#[derive(Debug, Clone, Copy, Default)]
pub struct Translator {
    policy: WrapPolicy,
}

impl Translator {
    pub fn new(policy: WrapPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> WrapPolicy {
        self.policy
    }

    /// Translate `intent`, applying its state mutation on success
    pub fn translate(&self, state: &mut MachineState, intent: &Intent) -> Result<Vec<String>> {
        let commands = match intent {
            Intent::Jog {
                direction,
                step,
                speed,
            } => {
                let step = step.unwrap_or(state.step_size);
                check_positive("step size", step)?;
                let speed = speed.unwrap_or(state.speed);
                check_speed(speed)?;
                let (axis, sign) = direction.axis_sign();
                vec![format!(
                    "G1 {axis}{} F{speed}",
                    format_number(sign * step)
                )]
            }
            Intent::Home => {
                state.current_x = 0.0;
                state.current_y = 0.0;
                return Ok(vec![self.wrap_modal(state, "G28")]);
            }
            Intent::ToggleMode => {
                state.relative_mode = !state.relative_mode;
                vec![]
            }
            Intent::Abort => return Ok(vec![self.wrap_modal(state, "M112")]),
            Intent::SetLaserPower(value) => {
                if *value > MAX_LASER_POWER {
                    return Err(Error::RangeError {
                        what: "laser power",
                        value: value.to_string(),
                        expected: "0 to 1000",
                    });
                }
                state.laser_power = *value;
                vec![format!("S{value}")]
            }
            Intent::AdjustLaserPower(delta) => {
                let power = i32::from(state.laser_power)
                    .saturating_add(*delta)
                    .clamp(0, i32::from(MAX_LASER_POWER));
                state.laser_power = power as u16;
                vec![format!("S{power}")]
            }
            Intent::SetSpeed(value) => {
                check_speed(*value)?;
                state.speed = *value;
                vec![]
            }
            Intent::SetStepSize(value) => {
                check_positive("step size", *value)?;
                state.step_size = *value;
                vec![]
            }
            Intent::PredefinedCut {
                axis,
                length,
                confirmed,
            } => {
                if !length.is_finite() || *length < 0.0 {
                    return Err(Error::RangeError {
                        what: "length",
                        value: length.to_string(),
                        expected: "zero or more",
                    });
                }
                if *axis == Axis::Z {
                    return Err(Error::RangeError {
                        what: "cut axis",
                        value: axis.to_string(),
                        expected: "X or Y",
                    });
                }
                if !confirmed {
                    log::info!("cut along {axis} not confirmed, nothing sent");
                    return Ok(vec![]);
                }
                let power = state.laser_power;
                vec![
                    format!("M3 S{power}"),
                    format!(
                        "G1 {axis}{} F{} S{power}",
                        format_number(*length),
                        state.speed
                    ),
                    "M5".to_string(),
                ]
            }
            Intent::MoveTo { x, y } => {
                if !x.is_finite() || !y.is_finite() {
                    return Err(Error::RangeError {
                        what: "target",
                        value: format!("{x},{y}"),
                        expected: "finite coordinates",
                    });
                }
                vec![format!(
                    "G1 X{} Y{} S{}",
                    format_number(*x),
                    format_number(*y),
                    state.laser_power
                )]
            }
            Intent::LaserOn => vec!["M3".to_string()],
            Intent::LaserOff => vec!["M5".to_string()],
            Intent::SendRaw(line) => {
                let line = line.trim();
                if line.is_empty() {
                    return Err(Error::EmptyCommand);
                }
                vec![line.to_string()]
            }
        };

        Ok(commands
            .into_iter()
            .map(|command| wrap_for(state, &command))
            .collect())
    }

    /// Wrapping for homing and e-stop, which the policy may exempt
    fn wrap_modal(&self, state: &MachineState, command: &str) -> String {
        match self.policy {
            WrapPolicy::Always => wrap_for(state, command),
            WrapPolicy::MotionOnly => command.to_string(),
        }
    }
}

fn wrap_for(state: &MachineState, command: &str) -> String {
    if state.relative_mode {
        wrap_relative(command)
    } else {
        command.to_string()
    }
}

fn check_positive(what: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(Error::RangeError {
            what,
            value: value.to_string(),
            expected: "greater than zero",
        })
    }
}

fn check_speed(speed: u32) -> Result<()> {
    if speed == 0 {
        return Err(Error::RangeError {
            what: "speed",
            value: speed.to_string(),
            expected: "a positive integer",
        });
    }
    Ok(())
}

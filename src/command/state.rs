//! Modal machine state tracked on the host side

use serde::Serialize;

pub const DEFAULT_SPEED: u32 = 150;
pub const DEFAULT_LASER_POWER: u16 = 1000;
pub const MAX_LASER_POWER: u16 = 1000;
pub const DEFAULT_STEP_SIZE: f64 = 1.0;

/// Coordinate mode for transmitted commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Mode {
    Relative,
    Absolute,
}

/// Single source of truth for the sender's modal state.
///
/// Only operator intents mutate it, with one exception: position reports
/// from the device overwrite `current_x`/`current_y` whenever they arrive.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MachineState {
    pub relative_mode: bool,
    /// Feed rate in units/min
    pub speed: u32,
    /// Spindle/laser value, 0..=1000
    pub laser_power: u16,
    /// Jog distance used when an intent does not name one
    pub step_size: f64,
    pub current_x: f64,
    pub current_y: f64,
}

impl Default for MachineState {
    fn default() -> Self {
        Self {
            relative_mode: true,
            speed: DEFAULT_SPEED,
            laser_power: DEFAULT_LASER_POWER,
            step_size: DEFAULT_STEP_SIZE,
            current_x: 0.0,
            current_y: 0.0,
        }
    }
}

impl MachineState {
    pub fn mode(&self) -> Mode {
        if self.relative_mode {
            Mode::Relative
        } else {
            Mode::Absolute
        }
    }

    /// Overwrite the tracked position with a device report
    pub fn apply_position(&mut self, x: f64, y: f64) {
        self.current_x = x;
        self.current_y = y;
    }

    /// One-line status panel text
    pub fn status_line(&self, connected: bool) -> String {
        format!(
            "Connection: {} | Mode: {:?} | Coordinates: X={:.2} Y={:.2} | Speed: {} units/min | Laser Power: {}",
            if connected { "Connected" } else { "Disconnected" },
            self.mode(),
            self.current_x,
            self.current_y,
            self.speed,
            self.laser_power,
        )
    }
}

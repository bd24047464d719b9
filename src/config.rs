//! Configuration management for the laser sender.
//!
//! Handles:
//! - Command-line argument parsing
//! - The TOML machine profile (port, bed size, modal defaults)
//!
//! Command-line flags override the profile; the profile overrides built-in
//! defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Deserialize;

use crate::command::{MachineState, Translator, WrapPolicy};
use crate::command::state::{DEFAULT_LASER_POWER, DEFAULT_SPEED, DEFAULT_STEP_SIZE};
use crate::layout::MachineBed;
use crate::layout::bed::{DEFAULT_BED_HEIGHT, DEFAULT_BED_WIDTH};
use crate::transport::SerialSettings;

/// File name looked up in the working directory
pub const PROFILE_FILE_NAME: &str = "lasersaw.toml";

#[cfg(windows)]
const DEFAULT_PORT: &str = "COM3";
#[cfg(not(windows))]
const DEFAULT_PORT: &str = "/dev/ttyUSB0";

/// Command-line arguments
#[derive(Debug, Parser)]
#[command(name = "lasersaw")]
#[command(about = "Jog, cut and stream G-code to a hobby laser cutter")]
#[command(version)]
pub struct Args {
    /// Machine profile to load instead of the default search
    #[arg(long, global = true, help = "Path to a lasersaw TOML profile")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Serial port (e.g. 'COM3', '/dev/ttyUSB0')")]
    pub port: Option<String>,

    #[arg(long, global = true, help = "Serial baud rate")]
    pub baud: Option<u32>,

    /// Print payloads to stdout instead of opening the serial port
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Start in absolute mode instead of relative mode
    #[arg(long, global = true)]
    pub absolute: bool,

    #[arg(
        long,
        global = true,
        default_value = "info",
        help = "Log level (trace, debug, info, warn, error)"
    )]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Action,
}

/// What to do once configured
#[derive(Debug, Clone, Subcommand)]
pub enum Action {
    /// Jog one step (up, down, left, right, zup, zdown)
    Jog {
        direction: String,
        #[arg(long, help = "Step size in mm")]
        step: Option<String>,
        #[arg(long, help = "Feed rate in units/min")]
        speed: Option<String>,
    },
    /// Home all axes (G28)
    Home,
    /// Emergency stop (M112)
    Abort,
    /// Switch the laser on (M3) or off (M5)
    Laser { switch: LaserSwitch },
    /// Set laser power, 0-1000
    Power { value: String },
    /// Laser cut of a fixed length along X or Y
    Cut {
        axis: String,
        length: String,
        #[arg(long, short = 'y', help = "Skip the confirmation prompt")]
        yes: bool,
    },
    /// Send one raw G-code line
    Send {
        #[arg(required = true, num_args = 1..)]
        line: Vec<String>,
    },
    /// Stream a G-code file line by line
    Stream {
        file: PathBuf,
        #[arg(long, short = 'y', help = "Skip the confirmation prompt")]
        yes: bool,
    },
    /// Interactive jog console; reads operator commands from stdin
    Console,
    /// Lay out bed, material and cut path and print the result
    Layout {
        #[arg(long, help = "Bed size as WIDTHxHEIGHT in mm")]
        bed: Option<String>,
        #[arg(long, help = "Material size as WIDTHxHEIGHT in mm")]
        material: Option<String>,
        /// Polyline as space-separated "x,y" points; repeat for more
        #[arg(long = "path")]
        paths: Vec<String>,
        /// Turn drawing off; points given with --path are ignored
        #[arg(long)]
        no_draw: bool,
        #[arg(long, value_enum, default_value_t = LayoutFormat::Json)]
        format: LayoutFormat,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LaserSwitch {
    On,
    Off,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LayoutFormat {
    /// Scene as JSON for a front end
    Json,
    /// Absolute G-code program for the drawn path
    Gcode,
}

/// Machine profile as stored in TOML
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Profile {
    pub port: String,
    pub baud_rate: u32,
    pub timeout_ms: u64,
    pub bed_width: u32,
    pub bed_height: u32,
    pub speed: u32,
    pub laser_power: u16,
    pub step_size: f64,
    pub relative_mode: bool,
    /// Status refresh period of the console
    pub refresh_ms: u64,
    pub wrap_policy: WrapPolicy,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT.to_string(),
            baud_rate: 115_200,
            timeout_ms: 1000,
            bed_width: DEFAULT_BED_WIDTH,
            bed_height: DEFAULT_BED_HEIGHT,
            speed: DEFAULT_SPEED,
            laser_power: DEFAULT_LASER_POWER,
            step_size: DEFAULT_STEP_SIZE,
            relative_mode: true,
            refresh_ms: 100,
            wrap_policy: WrapPolicy::Always,
        }
    }
}

impl Profile {
    /// Parse and sanity-check a profile file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read profile {}", path.display()))?;
        let profile: Profile = toml::from_str(&text)
            .with_context(|| format!("Failed to parse profile {}", path.display()))?;
        profile.check()?;
        Ok(profile)
    }

    fn check(&self) -> Result<()> {
        anyhow::ensure!(self.bed_width > 0 && self.bed_height > 0, "bed size must be positive");
        anyhow::ensure!(self.speed > 0, "speed must be positive");
        anyhow::ensure!(self.laser_power <= 1000, "laser_power must be 0-1000");
        anyhow::ensure!(
            self.step_size.is_finite() && self.step_size > 0.0,
            "step_size must be positive"
        );
        anyhow::ensure!(self.refresh_ms > 0, "refresh_ms must be positive");
        Ok(())
    }
}

/// Combined configuration from all sources
#[derive(Debug, Clone)]
pub struct Config {
    pub profile: Profile,
    /// Where the profile came from, if a file was found
    pub profile_path: Option<PathBuf>,
    pub dry_run: bool,
    pub log_level: String,
}

impl Config {
    /// Create configuration from command-line arguments
    pub fn from_args_and_env() -> Result<(Self, Action)> {
        let args = Args::parse();
        let action = args.command.clone();
        Ok((Self::from_args(args)?, action))
    }

    /// Create configuration from explicit arguments (useful for testing)
    pub fn from_args(args: Args) -> Result<Self> {
        let profile_path = match args.config {
            Some(path) => Some(path),
            None => find_profile(),
        };

        let mut profile = match &profile_path {
            Some(path) => Profile::load(path)?,
            None => Profile::default(),
        };

        if let Some(port) = args.port {
            profile.port = port;
        }
        if let Some(baud) = args.baud {
            profile.baud_rate = baud;
        }
        if args.absolute {
            profile.relative_mode = false;
        }

        Ok(Config {
            profile,
            profile_path,
            dry_run: args.dry_run,
            log_level: args.log_level,
        })
    }

    pub fn serial_settings(&self) -> SerialSettings {
        SerialSettings {
            port: self.profile.port.clone(),
            baud_rate: self.profile.baud_rate,
            timeout: Duration::from_millis(self.profile.timeout_ms),
        }
    }

    /// Modal state the session starts from
    pub fn initial_state(&self) -> MachineState {
        MachineState {
            relative_mode: self.profile.relative_mode,
            speed: self.profile.speed,
            laser_power: self.profile.laser_power,
            step_size: self.profile.step_size,
            ..Default::default()
        }
    }

    pub fn translator(&self) -> Translator {
        Translator::new(self.profile.wrap_policy)
    }

    pub fn bed(&self) -> MachineBed {
        MachineBed {
            width: self.profile.bed_width,
            height: self.profile.bed_height,
        }
    }

    pub fn refresh_period(&self) -> Duration {
        Duration::from_millis(self.profile.refresh_ms)
    }
}

/// Look for a profile in the working directory, then the user config dir
fn find_profile() -> Option<PathBuf> {
    let local = PathBuf::from(PROFILE_FILE_NAME);
    if local.is_file() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join("lasersaw").join("config.toml"))
        .filter(|path| path.is_file())
}

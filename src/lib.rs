//! Laser cutter sender and bed layout
//!
//! This library provides:
//! - The bed layout model behind the drawing canvas
//! - Translation of jog/cut/power/mode intents into G-code
//! - A serial transport, position feedback and a controller session
//! - Job file loading with preflight checks
//! - Configuration management

pub mod cli;
pub mod command;
pub mod config;
pub mod console;
pub mod error;
pub mod feedback;
pub mod job;
pub mod layout;
pub mod parser;
pub mod poller;
pub mod session;
pub mod transport;

// Re-exports for the public API
pub use command::{Intent, MachineState, Translator, WrapPolicy};
pub use config::Config;
pub use error::{Error, Result};
pub use layout::{BedLayout, MachineBed, MaterialPlacement};
pub use parser::{ParsedLine, parse_line};
pub use session::Controller;

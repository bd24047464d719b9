//! G-code Command Translator
//!
//! Maps operator intents onto G-code text. Pure formatting, no I/O.

pub mod intent;
pub mod state;
pub mod translator;

pub use intent::{Axis, Direction, Intent};
pub use state::{MachineState, Mode};
pub use translator::{Translator, WrapPolicy, format_number, wrap_relative};

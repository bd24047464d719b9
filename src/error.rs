//! Error types
//!
//! Every rejected operator intent maps to one of these variants. A rejected
//! intent is dropped whole: nothing is formatted, sent or mutated.

use thiserror::Error;

/// Result alias used across the library
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Bed or material size that is zero or negative
    #[error("invalid dimension: {what} must be positive, got {value}")]
    InvalidDimension { what: &'static str, value: i64 },

    /// Material larger than the bed it is placed on
    #[error(
        "material {material_width}x{material_height} does not fit bed {bed_width}x{bed_height}"
    )]
    OutOfBounds {
        material_width: u32,
        material_height: u32,
        bed_width: u32,
        bed_height: u32,
    },

    /// Operator input that does not parse as a number
    #[error("invalid {what}: '{input}' is not a valid number")]
    InvalidNumeric { what: &'static str, input: String },

    /// Numeric input outside the accepted range
    #[error("{what} {value} is out of range ({expected})")]
    RangeError {
        what: &'static str,
        value: String,
        expected: &'static str,
    },

    /// Raw line that is blank after trimming
    #[error("refusing to send an empty command")]
    EmptyCommand,

    /// Emergency stop was sent; the controller refuses further commands
    #[error("machine halted by emergency stop; resume before sending more commands")]
    Halted,

    #[error("serial port error: {0}")]
    Serial(#[from] tokio_serial::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True for errors caused by bad operator input rather than the machine link
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::InvalidDimension { .. }
                | Error::OutOfBounds { .. }
                | Error::InvalidNumeric { .. }
                | Error::RangeError { .. }
                | Error::EmptyCommand
        )
    }
}

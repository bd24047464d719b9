//! Preflight checks for G-code jobs
//!
//! Advisory only: diagnostics are shown before the operator confirms a job,
//! they never remove or rewrite lines.

use crate::command::state::MAX_LASER_POWER;
use crate::parser::{Command, ParsedLine};

/// Severity of a diagnostic message
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Severity {
    Error,
    Warning,
}

/// A finding about one job line
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    /// 1-based line number in the source file
    pub line: usize,
    pub message: String,
    pub severity: Severity,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreflightResult {
    pub diagnostics: Vec<Diagnostic>,
}

impl PreflightResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_error(&mut self, line: usize, message: String) {
        self.diagnostics.push(Diagnostic {
            line,
            message,
            severity: Severity::Error,
        });
    }

    pub fn add_warning(&mut self, line: usize, message: String) {
        self.diagnostics.push(Diagnostic {
            line,
            message,
            severity: Severity::Warning,
        });
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }
}

/// Check one parsed line
pub fn check_line(line_num: usize, parsed: &ParsedLine, result: &mut PreflightResult) {
    match parsed {
        ParsedLine::Command(cmd) => check_command(line_num, cmd, result),
        ParsedLine::Unrecognized(text) => {
            result.add_warning(line_num, format!("Line does not start with a command: '{text}'"));
        }
        ParsedLine::Comment(_) | ParsedLine::Empty => {}
    }
}

fn check_command(line_num: usize, cmd: &Command, result: &mut PreflightResult) {
    if cmd.is_emergency_stop() {
        result.add_error(
            line_num,
            "Job contains an emergency stop (M112); the machine will halt here".to_string(),
        );
    }

    for param in &cmd.parameters {
        let Some(value) = param.number() else {
            result.add_error(
                line_num,
                format!(
                    "Parameter '{}' of '{}' is not a number: '{}'",
                    param.letter, cmd.name, param.value
                ),
            );
            continue;
        };

        if param.letter == 'S' && !(0.0..=f64::from(MAX_LASER_POWER)).contains(&value) {
            result.add_warning(
                line_num,
                format!("Laser power S{} outside 0-{MAX_LASER_POWER}", param.value),
            );
        }
        if param.letter == 'F' && value <= 0.0 {
            result.add_warning(line_num, format!("Feed rate F{} is not positive", param.value));
        }
    }

    if cmd.is_motion()
        && !cmd
            .parameters
            .iter()
            .any(|p| matches!(p.letter, 'X' | 'Y' | 'Z'))
    {
        result.add_warning(
            line_num,
            format!("Movement command '{}' has no X, Y or Z coordinate", cmd.name),
        );
    }
}

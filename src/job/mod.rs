//! G-code jobs read from disk
//!
//! A job is the ordered list of non-empty, trimmed lines of a file. Each line
//! is later sent exactly like a raw operator command.

pub mod preflight;

pub use preflight::{Diagnostic, PreflightResult, Severity};

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::parser::{ParsedLine, parse_line};

/// One sendable line and where it came from
#[derive(Debug, Clone, PartialEq)]
pub struct JobLine {
    /// 1-based line number in the source file
    pub number: usize,
    pub text: String,
}

/// What a job will do, for the confirmation prompt
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobSummary {
    pub lines: usize,
    pub commands: usize,
    pub comments: usize,
    pub moves: usize,
    pub laser_on: usize,
    pub laser_off: usize,
}

#[derive(Debug, Clone)]
pub struct Job {
    source: Option<PathBuf>,
    lines: Vec<JobLine>,
}

impl Job {
    /// Read a job file
    pub async fn load(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path).await?;
        let mut job = Self::from_text(&content);
        job.source = Some(path.to_path_buf());
        log::debug!("loaded {} lines from {}", job.lines.len(), path.display());
        Ok(job)
    }

    /// Build a job from in-memory text
    pub fn from_text(content: &str) -> Self {
        let lines = content
            .lines()
            .enumerate()
            .filter_map(|(idx, line)| {
                let text = line.trim();
                (!text.is_empty()).then(|| JobLine {
                    number: idx + 1,
                    text: text.to_string(),
                })
            })
            .collect();

        Self {
            source: None,
            lines,
        }
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn lines(&self) -> &[JobLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn summary(&self) -> JobSummary {
        let mut summary = JobSummary {
            lines: self.lines.len(),
            ..Default::default()
        };

        for line in &self.lines {
            match parse_line(&line.text) {
                ParsedLine::Command(cmd) => {
                    summary.commands += 1;
                    summary.moves += usize::from(cmd.is_motion());
                    summary.laser_on += usize::from(cmd.is_laser_on());
                    summary.laser_off += usize::from(cmd.is_laser_off());
                }
                ParsedLine::Comment(_) => summary.comments += 1,
                ParsedLine::Empty | ParsedLine::Unrecognized(_) => {}
            }
        }

        summary
    }

    pub fn preflight(&self) -> PreflightResult {
        let mut result = PreflightResult::new();
        for line in &self.lines {
            preflight::check_line(line.number, &parse_line(&line.text), &mut result);
        }
        result
    }
}

impl std::fmt::Display for JobSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} lines ({} commands, {} comments), {} moves, laser on x{}, laser off x{}",
            self.lines, self.commands, self.comments, self.moves, self.laser_on, self.laser_off
        )
    }
}

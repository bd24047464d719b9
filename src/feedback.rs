//! Device position feedback
//!
//! The firmware reports its position as text such as `X:10.00 Y:20.00 Z:0.00`.
//! Reports are read by their own task and published on a watch channel; they
//! are not correlated with the command that caused them.

use std::sync::LazyLock;

use regex::Regex;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::watch;

static AXIS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|\s)([XY]):\s*([-+]?\d+(?:\.\d*)?)").expect("valid position regex")
});

/// A position report
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// Parse a position report. Lines without both X and Y yield `None`.
///
/// Only the first occurrence of each axis counts, so Marlin's trailing
/// `Count X:... Y:...` stepper section is ignored.
pub fn parse_position(line: &str) -> Option<Position> {
    let mut x = None;
    let mut y = None;

    for caps in AXIS_RE.captures_iter(line) {
        let value: f64 = caps[2].parse().ok()?;
        match &caps[1] {
            "X" => {
                x.get_or_insert(value);
            }
            _ => {
                y.get_or_insert(value);
            }
        }
    }

    Some(Position { x: x?, y: y? })
}

/// Read device lines until EOF, publishing every position report
pub async fn read_reports<R>(reader: R, positions: watch::Sender<Option<Position>>)
where
    R: AsyncRead + Unpin,
{
    let mut lines = BufReader::new(reader).lines();

    loop {
        match lines.next_line().await {
            Ok(Some(line)) => match parse_position(&line) {
                Some(position) => {
                    log::trace!("position report {position:?}");
                    if positions.send(Some(position)).is_err() {
                        break;
                    }
                }
                None => log::debug!("device: {}", line.trim_end()),
            },
            Ok(None) => break,
            Err(e) => {
                log::warn!("Failed to read from device: {}", e);
                break;
            }
        }
    }

    log::debug!("feedback reader stopped");
}

//! Loading G-code files and streaming them through a controller
use std::io::Write;

use lasersaw::command::{Intent, MachineState, Translator};
use lasersaw::job::{Job, Severity};
use lasersaw::session::Controller;
use lasersaw::transport::Transport;
use lasersaw::Error;

fn job_file(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".gcode")
        .tempfile()
        .expect("create temp job");
    file.write_all(content.as_bytes()).expect("write job");
    file
}

fn controller() -> Controller<Vec<u8>> {
    Controller::new(
        MachineState::default(),
        Translator::default(),
        Transport::new(Vec::new()),
    )
}

#[tokio::test]
async fn test_stream_file_in_order() {
    let file = job_file("; frame\r\nG90\n\n  M3 S500\nG1 X20 Y0 F600\nG1 X20 Y20\nM5\n");
    let job = Job::load(file.path()).await.expect("load job");

    assert_eq!(job.source(), Some(file.path()));
    assert_eq!(job.lines().len(), 6);

    let mut c = controller();
    c.dispatch(Intent::ToggleMode).await.unwrap();
    let sent = c.stream_job(&job).await.expect("stream job");
    assert_eq!(sent, 6);

    let written = String::from_utf8(c.into_transport().into_inner()).unwrap();
    assert_eq!(
        written,
        "; frame\nG90\nM3 S500\nG1 X20 Y0 F600\nG1 X20 Y20\nM5\n"
    );
}

#[tokio::test]
async fn test_stream_in_relative_mode_wraps_every_line() {
    let job = Job::from_text("G1 X1\nG1 Y1\n");
    let mut c = controller();
    c.stream_job(&job).await.unwrap();

    let written = String::from_utf8(c.into_transport().into_inner()).unwrap();
    assert_eq!(written, "G91\nG1 X1\nG90\nG91\nG1 Y1\nG90\n");
}

#[tokio::test]
async fn test_abort_in_job_stops_the_stream() {
    let job = Job::from_text("G1 X1\nM112\nG1 X2\n");
    let mut c = controller();
    c.dispatch(Intent::ToggleMode).await.unwrap();

    assert!(matches!(c.stream_job(&job).await, Err(Error::Halted)));
    assert!(c.is_halted());

    let written = String::from_utf8(c.into_transport().into_inner()).unwrap();
    assert_eq!(written, "G1 X1\nM112\n");
}

#[tokio::test]
async fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = Job::load(&dir.path().join("missing.gcode")).await;
    assert!(matches!(result, Err(Error::Io(_))));
}

#[tokio::test]
async fn test_preflight_and_summary_of_loaded_file() {
    let file = job_file("G0 X0 Y0\nM3 S1200\nG1 X1.2.3\nM5\n");
    let job = Job::load(file.path()).await.unwrap();

    let summary = job.summary();
    assert_eq!(summary.lines, 4);
    assert_eq!(summary.laser_on, 1);
    assert_eq!(summary.laser_off, 1);

    let result = job.preflight();
    assert!(result.has_errors());
    let lines: Vec<(usize, Severity)> = result
        .diagnostics
        .iter()
        .map(|d| (d.line, d.severity))
        .collect();
    assert!(lines.contains(&(2, Severity::Warning)));
    assert!(lines.contains(&(3, Severity::Error)));
}

//! Profile loading and command-line overrides
use std::io::Write;

use clap::Parser;
use lasersaw::config::{Args, Config, Profile};
use lasersaw::WrapPolicy;

fn write_profile(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("create temp profile");
    file.write_all(content.as_bytes()).expect("write profile");
    file
}

#[test]
fn test_profile_file_sets_defaults() {
    let profile = write_profile(
        r#"
port = "COM5"
baud_rate = 250000
bed_width = 600
bed_height = 400
speed = 900
laser_power = 300
relative_mode = false
wrap_policy = "motion-only"
"#,
    );
    let path = profile.path().to_str().expect("utf-8 path");

    let args = Args::parse_from(["lasersaw", "--config", path, "home"]);
    let config = Config::from_args(args).expect("create config");

    assert_eq!(config.profile_path.as_deref(), Some(profile.path()));
    assert_eq!(config.serial_settings().port, "COM5");
    assert_eq!(config.serial_settings().baud_rate, 250_000);
    assert_eq!(config.bed().width, 600);

    let state = config.initial_state();
    assert!(!state.relative_mode);
    assert_eq!(state.speed, 900);
    assert_eq!(state.laser_power, 300);
    assert_eq!(config.translator().policy(), WrapPolicy::MotionOnly);
}

#[test]
fn test_cli_flags_override_profile() {
    let profile = write_profile("port = \"COM5\"\nbaud_rate = 9600\n");
    let path = profile.path().to_str().expect("utf-8 path");

    let args = Args::parse_from([
        "lasersaw", "--config", path, "--port", "/dev/ttyACM0", "--baud", "115200", "--absolute",
        "home",
    ]);
    let config = Config::from_args(args).expect("create config");

    assert_eq!(config.profile.port, "/dev/ttyACM0");
    assert_eq!(config.profile.baud_rate, 115_200);
    assert!(!config.initial_state().relative_mode);
}

#[test]
fn test_invalid_profile_is_rejected() {
    let profile = write_profile("laser_power = 5000\n");
    assert!(Profile::load(profile.path()).is_err());

    let profile = write_profile("speed = \"fast\"\n");
    assert!(Profile::load(profile.path()).is_err());
}

//! Behavior of the command translator and layout model as seen by callers
use lasersaw::command::{Axis, Direction, Intent, MachineState, Translator};
use lasersaw::layout::{BedLayout, MachineBed, MaterialPlacement, Rect};
use lasersaw::Error;

fn relative() -> MachineState {
    MachineState::default()
}

fn absolute() -> MachineState {
    MachineState {
        relative_mode: false,
        ..Default::default()
    }
}

#[test]
fn test_drawable_rect_for_many_beds() {
    for (w, h) in [(1, 1), (5, 5), (410, 860), (1000, 600), (4096, 7)] {
        let bed = MachineBed::new(w, h).expect("positive bed");
        assert_eq!(
            bed.drawable(),
            Rect::new(2.5, 2.5, w as f64 - 2.5, h as f64 - 2.5)
        );
    }
}

#[test]
fn test_material_containment_and_rejection() {
    let bed = MachineBed::new(410, 860).expect("bed");
    for (mw, mh) in [(1, 1), (100, 100), (408, 858), (410, 860), (410, 1), (1, 860)] {
        let placement = MaterialPlacement::place(&bed, mw, mh).expect("fits");
        assert!(bed.bounds().contains_rect(&placement.rect), "{mw}x{mh}");
        assert_eq!(placement.rect.width(), mw as f64);
        assert_eq!(placement.rect.height(), mh as f64);
    }
    for (mw, mh) in [(411, 1), (1, 861), (1000, 1000)] {
        assert!(matches!(
            MaterialPlacement::place(&bed, mw, mh),
            Err(Error::OutOfBounds { .. })
        ));
    }
    assert!(matches!(
        MaterialPlacement::place(&bed, 0, 10),
        Err(Error::InvalidDimension { .. })
    ));
}

#[test]
fn test_jog_up_exact_payloads() {
    let jog = Intent::Jog {
        direction: Direction::Up,
        step: Some(5.0),
        speed: Some(150),
    };
    let t = Translator::default();

    assert_eq!(
        t.translate(&mut relative(), &jog).unwrap(),
        vec!["G91\nG1 Y5 F150\nG90\n"]
    );
    assert_eq!(t.translate(&mut absolute(), &jog).unwrap(), vec!["G1 Y5 F150"]);
}

#[test]
fn test_laser_power_range() {
    let t = Translator::default();
    let mut state = absolute();

    assert_eq!(
        t.translate(&mut state, &Intent::SetLaserPower(500)).unwrap(),
        vec!["S500"]
    );
    assert_eq!(state.laser_power, 500);

    let result = t.translate(&mut state, &Intent::SetLaserPower(1500));
    assert!(matches!(result, Err(Error::RangeError { .. })));
    assert_eq!(state.laser_power, 500);
}

#[test]
fn test_home_resets_position_in_both_modes() {
    let t = Translator::default();

    let mut state = relative();
    state.apply_position(33.0, 44.0);
    assert_eq!(t.translate(&mut state, &Intent::Home).unwrap(), vec!["G91\nG28\nG90\n"]);
    assert_eq!((state.current_x, state.current_y), (0.0, 0.0));

    let mut state = absolute();
    state.apply_position(-1.0, 7.5);
    assert_eq!(t.translate(&mut state, &Intent::Home).unwrap(), vec!["G28"]);
    assert_eq!((state.current_x, state.current_y), (0.0, 0.0));
}

#[test]
fn test_toggle_mode_round_trip() {
    let t = Translator::default();
    for start in [relative(), absolute()] {
        let mut state = start.clone();
        assert!(t.translate(&mut state, &Intent::ToggleMode).unwrap().is_empty());
        assert_ne!(state.relative_mode, start.relative_mode);
        assert!(t.translate(&mut state, &Intent::ToggleMode).unwrap().is_empty());
        assert_eq!(state, start);
    }
}

#[test]
fn test_rejected_cut_emits_nothing() {
    let t = Translator::default();
    let mut state = relative();
    let before = state.clone();
    let result = t.translate(
        &mut state,
        &Intent::PredefinedCut {
            axis: Axis::Y,
            length: -0.5,
            confirmed: true,
        },
    );
    assert!(result.is_err());
    assert_eq!(state, before);
}

#[test]
fn test_layout_session() {
    let mut layout = BedLayout::default();
    layout.set_bed(300, 200).expect("bed");
    let rect = layout.place_material(100, 50).expect("material");
    assert_eq!(rect, Rect::new(2.5, 147.5, 102.5, 197.5));

    assert!(matches!(
        layout.set_bed(0, 200),
        Err(Error::InvalidDimension { .. })
    ));
    assert_eq!(layout.bed().width, 300);
}

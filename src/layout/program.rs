//! Drawn path to G-code program
//!
//! Canvas coordinates grow downward from the top-left corner; the machine's
//! Y axis grows upward from the bottom-left, so every point is flipped
//! against the bed height. The program is absolute (`G90`) throughout.

use crate::command::format_number;

use super::bed::MachineBed;
use super::geometry::Point;
use super::path::CutPath;

/// Convert a canvas point to machine coordinates
pub fn to_machine(bed: &MachineBed, point: Point) -> Point {
    Point::new(point.x, f64::from(bed.height) - point.y)
}

/// One cut per polyline: travel to its start, laser on, trace, laser off
pub fn path_program(bed: &MachineBed, path: &CutPath, speed: u32, power: u16) -> Vec<String> {
    let polylines = path.polylines();
    if polylines.is_empty() {
        return Vec::new();
    }

    let mut program = vec!["G90".to_string()];

    for line in polylines {
        let mut points = line.into_iter().map(|p| to_machine(bed, p));
        let Some(start) = points.next() else {
            continue;
        };

        program.push(format!(
            "G0 X{} Y{}",
            format_number(start.x),
            format_number(start.y)
        ));
        program.push(format!("M3 S{power}"));
        for point in points {
            program.push(format!(
                "G1 X{} Y{} F{speed}",
                format_number(point.x),
                format_number(point.y)
            ));
        }
        program.push("M5".to_string());
    }

    program
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_path_has_no_program() {
        let bed = MachineBed::default();
        assert!(path_program(&bed, &CutPath::new(), 150, 1000).is_empty());
    }

    #[test]
    fn test_single_marker_has_no_program() {
        let bed = MachineBed::default();
        let mut path = CutPath::new();
        path.add_point(Point::new(10.0, 10.0));
        assert!(path_program(&bed, &path, 150, 1000).is_empty());
    }

    #[test]
    fn test_program_flips_y() {
        let bed = MachineBed::new(100, 200).unwrap();
        let mut path = CutPath::new();
        path.add_point(Point::new(10.0, 190.0));
        path.add_point(Point::new(60.0, 190.0));
        path.add_point(Point::new(60.0, 140.5));

        let program = path_program(&bed, &path, 300, 700);
        assert_eq!(
            program,
            vec![
                "G90",
                "G0 X10 Y10",
                "M3 S700",
                "G1 X60 Y10 F300",
                "G1 X60 Y59.5 F300",
                "M5",
            ]
        );
    }

    #[test]
    fn test_each_polyline_is_its_own_cut() {
        let bed = MachineBed::new(100, 100).unwrap();
        let mut path = CutPath::new();
        path.add_point(Point::new(0.0, 0.0));
        path.add_point(Point::new(10.0, 0.0));
        path.break_path();
        path.add_point(Point::new(50.0, 50.0));
        path.add_point(Point::new(50.0, 60.0));

        let program = path_program(&bed, &path, 150, 1000);
        assert_eq!(program.iter().filter(|l| l.starts_with("M3")).count(), 2);
        assert_eq!(program.iter().filter(|l| *l == "M5").count(), 2);
        assert!(program.contains(&"G0 X50 Y50".to_string()));
    }
}

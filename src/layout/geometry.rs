//! Plane geometry shared by the bed layout and the path builder.

use serde::Serialize;

/// A point in canvas millimeters (origin top-left, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Parse "x,y" as entered on the command line
    pub fn parse(text: &str) -> Option<Self> {
        let (x, y) = text.trim().split_once(',')?;
        Some(Self::new(x.trim().parse().ok()?, y.trim().parse().ok()?))
    }
}

/// Axis-aligned rectangle given by two opposite corners
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl Rect {
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }

    /// True when `other` lies entirely inside this rectangle (edges included)
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.x1 >= self.x1 && other.y1 >= self.y1 && other.x2 <= self.x2 && other.y2 <= self.y2
    }
}

/// A drawn line between two consecutive clicks
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Segment {
    pub from: Point,
    pub to: Point,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_point() {
        assert_eq!(Point::parse("10,20.5"), Some(Point::new(10.0, 20.5)));
        assert_eq!(Point::parse(" 3 , 4 "), Some(Point::new(3.0, 4.0)));
        assert_eq!(Point::parse("10"), None);
        assert_eq!(Point::parse("a,b"), None);
    }

    #[test]
    fn test_contains_rect() {
        let outer = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert!(outer.contains_rect(&Rect::new(0.0, 0.0, 100.0, 100.0)));
        assert!(outer.contains_rect(&Rect::new(10.0, 10.0, 20.0, 20.0)));
        assert!(!outer.contains_rect(&Rect::new(-1.0, 10.0, 20.0, 20.0)));
        assert!(!outer.contains_rect(&Rect::new(10.0, 10.0, 20.0, 100.5)));
    }
}

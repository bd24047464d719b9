//! Freehand cut path builder
//!
//! Clicks become polylines: the first click of a polyline drops a start
//! marker, every following click draws a segment from the previous point.

use serde::Serialize;

use super::geometry::{Point, Segment};

/// What the canvas should draw in response to a click
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathEvent {
    /// Floating start marker, no segment yet
    Marker(Point),
    /// New segment from the previous point
    Segment(Segment),
    /// Drawing is disabled; the click was ignored
    Ignored,
}

/// Drawing session state for the cut path
#[derive(Debug, Clone, Serialize)]
pub struct CutPath {
    enabled: bool,
    /// Last point of the polyline being drawn, if any
    pending: Option<Point>,
    /// Start markers of every polyline, in click order
    markers: Vec<Point>,
    segments: Vec<Segment>,
    /// Index into `segments` where each marker's polyline begins
    #[serde(skip)]
    starts: Vec<usize>,
}

impl Default for CutPath {
    fn default() -> Self {
        Self::new()
    }
}

impl CutPath {
    /// New path with drawing enabled
    pub fn new() -> Self {
        Self {
            enabled: true,
            pending: None,
            markers: Vec::new(),
            segments: Vec::new(),
            starts: Vec::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enable or disable drawing. Disabling drops the pending start point.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.pending = None;
        }
    }

    pub fn add_point(&mut self, point: Point) -> PathEvent {
        if !self.enabled {
            return PathEvent::Ignored;
        }

        match self.pending.replace(point) {
            None => {
                self.markers.push(point);
                self.starts.push(self.segments.len());
                PathEvent::Marker(point)
            }
            Some(previous) => {
                let segment = Segment {
                    from: previous,
                    to: point,
                };
                self.segments.push(segment);
                PathEvent::Segment(segment)
            }
        }
    }

    /// End the current polyline; drawn segments stay
    pub fn break_path(&mut self) {
        self.pending = None;
    }

    /// Clear everything drawn so far
    pub fn reset_path(&mut self) {
        self.pending = None;
        self.markers.clear();
        self.segments.clear();
        self.starts.clear();
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn markers(&self) -> &[Point] {
        &self.markers
    }

    pub fn pending(&self) -> Option<Point> {
        self.pending
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// One list of points per drawn polyline, split where the path was broken
    pub fn polylines(&self) -> Vec<Vec<Point>> {
        let ends = self.starts.iter().skip(1).copied().chain([self.segments.len()]);

        self.starts
            .iter()
            .zip(ends)
            .filter_map(|(&start, end)| {
                let segments = &self.segments[start..end];
                let first = segments.first()?;
                let mut line = vec![first.from];
                line.extend(segments.iter().map(|segment| segment.to));
                Some(line)
            })
            .collect()
    }
}

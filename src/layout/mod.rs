//! Bed Layout Model
//!
//! Pure geometry behind the drawing canvas: the machine bed, the material
//! laid on it and the cut path drawn by clicking. No I/O happens here.

pub mod bed;
pub mod geometry;
pub mod path;
pub mod program;

pub use bed::{BED_MARGIN, MachineBed, MaterialPlacement};
pub use geometry::{Point, Rect, Segment};
pub use path::{CutPath, PathEvent};
pub use program::path_program;

use serde::Serialize;

use crate::error::Result;

/// Everything the canvas shows, in one place
#[derive(Debug, Clone, Default)]
pub struct BedLayout {
    bed: MachineBed,
    material: Option<MaterialPlacement>,
    path: CutPath,
}

/// Serializable snapshot of a layout for a front end to render
#[derive(Debug, Clone, Serialize)]
pub struct Scene {
    pub bed: Rect,
    pub drawable: Rect,
    pub material: Option<Rect>,
    pub material_fits: bool,
    pub drawing_enabled: bool,
    pub markers: Vec<Point>,
    pub segments: Vec<Segment>,
}

impl BedLayout {
    pub fn new(bed: MachineBed) -> Self {
        Self {
            bed,
            material: None,
            path: CutPath::new(),
        }
    }

    /// Replace the bed. Material and path are left as they are.
    pub fn set_bed(&mut self, width: i64, height: i64) -> Result<&MachineBed> {
        self.bed = MachineBed::new(width, height)?;
        log::debug!("bed set to {}x{}", self.bed.width, self.bed.height);
        Ok(&self.bed)
    }

    /// Place material on the current bed, replacing any earlier placement.
    /// A rejected placement keeps the previous one.
    pub fn place_material(&mut self, width: i64, height: i64) -> Result<Rect> {
        let placement = MaterialPlacement::place(&self.bed, width, height)?;
        self.material = Some(placement);
        Ok(placement.rect)
    }

    pub fn add_point(&mut self, point: Point) -> PathEvent {
        self.path.add_point(point)
    }

    pub fn break_path(&mut self) {
        self.path.break_path();
    }

    pub fn reset_path(&mut self) {
        self.path.reset_path();
    }

    /// Whether the material still fits after the bed was changed
    pub fn validate(&self) -> bool {
        self.material
            .as_ref()
            .is_none_or(|material| material.fits(&self.bed))
    }

    pub fn bed(&self) -> &MachineBed {
        &self.bed
    }

    pub fn material(&self) -> Option<&MaterialPlacement> {
        self.material.as_ref()
    }

    pub fn path(&self) -> &CutPath {
        &self.path
    }

    /// Enable or disable drawing of the cut path
    pub fn set_drawing(&mut self, enabled: bool) {
        self.path.set_enabled(enabled);
    }

    pub fn scene(&self) -> Scene {
        Scene {
            bed: self.bed.bounds(),
            drawable: self.bed.drawable(),
            material: self.material.map(|m| m.rect),
            material_fits: self.validate(),
            drawing_enabled: self.path.is_enabled(),
            markers: self.path.markers().to_vec(),
            segments: self.path.segments().to_vec(),
        }
    }
}

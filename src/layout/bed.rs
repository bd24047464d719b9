//! Machine bed and material placement

use serde::Serialize;

use super::geometry::Rect;
use crate::error::{Error, Result};

/// Inset between the bed edge and the cuttable area, in millimeters
pub const BED_MARGIN: f64 = 2.5;

pub const DEFAULT_BED_WIDTH: u32 = 410;
pub const DEFAULT_BED_HEIGHT: u32 = 860;

/// The machine's maximum working rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MachineBed {
    pub width: u32,
    pub height: u32,
}

impl Default for MachineBed {
    fn default() -> Self {
        Self {
            width: DEFAULT_BED_WIDTH,
            height: DEFAULT_BED_HEIGHT,
        }
    }
}

impl MachineBed {
    /// Build a bed from operator input; both sides must be positive
    pub fn new(width: i64, height: i64) -> Result<Self> {
        Ok(Self {
            width: positive_dimension("bed width", width)?,
            height: positive_dimension("bed height", height)?,
        })
    }

    /// The full bed rectangle
    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, f64::from(self.width), f64::from(self.height))
    }

    /// The cuttable area, inset by [`BED_MARGIN`] on every side
    pub fn drawable(&self) -> Rect {
        Rect::new(
            BED_MARGIN,
            BED_MARGIN,
            f64::from(self.width) - BED_MARGIN,
            f64::from(self.height) - BED_MARGIN,
        )
    }
}

/// Stock laid on the bed, anchored at its bottom-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MaterialPlacement {
    pub width: u32,
    pub height: u32,
    pub rect: Rect,
}

impl MaterialPlacement {
    /// Place material of the given size on `bed`.
    ///
    /// The rectangle sits at (margin, bed.height - height - margin). Stock that
    /// leaves less than a margin of room slides flush against the left or
    /// bottom edge so that the rectangle always stays on the bed.
    pub fn place(bed: &MachineBed, width: i64, height: i64) -> Result<Self> {
        let width = positive_dimension("material width", width)?;
        let height = positive_dimension("material height", height)?;

        if width > bed.width || height > bed.height {
            return Err(Error::OutOfBounds {
                material_width: width,
                material_height: height,
                bed_width: bed.width,
                bed_height: bed.height,
            });
        }

        let (w, h) = (f64::from(width), f64::from(height));
        let x1 = BED_MARGIN.min(f64::from(bed.width) - w);
        let y1 = (f64::from(bed.height) - h - BED_MARGIN).max(0.0);

        Ok(Self {
            width,
            height,
            rect: Rect::new(x1, y1, x1 + w, y1 + h),
        })
    }

    /// Whether this placement still fits `bed` (beds can change underneath it)
    pub fn fits(&self, bed: &MachineBed) -> bool {
        self.width <= bed.width
            && self.height <= bed.height
            && bed.bounds().contains_rect(&self.rect)
    }
}

fn positive_dimension(what: &'static str, value: i64) -> Result<u32> {
    if value <= 0 {
        return Err(Error::InvalidDimension { what, value });
    }
    u32::try_from(value).map_err(|_| Error::RangeError {
        what,
        value: value.to_string(),
        expected: "at most 4294967295 mm",
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drawable_rect_is_inset() {
        let bed = MachineBed::new(410, 860).unwrap();
        assert_eq!(bed.drawable(), Rect::new(2.5, 2.5, 407.5, 857.5));
    }

    #[test]
    fn test_rejects_non_positive_bed() {
        assert!(matches!(
            MachineBed::new(0, 100),
            Err(Error::InvalidDimension { what: "bed width", value: 0 })
        ));
        assert!(matches!(
            MachineBed::new(100, -5),
            Err(Error::InvalidDimension { what: "bed height", .. })
        ));
    }

    #[test]
    fn test_material_anchored_bottom_left() {
        let bed = MachineBed::new(410, 860).unwrap();
        let material = MaterialPlacement::place(&bed, 300, 200).unwrap();
        assert_eq!(material.rect, Rect::new(2.5, 657.5, 302.5, 857.5));
    }

    #[test]
    fn test_material_larger_than_bed_is_rejected() {
        let bed = MachineBed::new(410, 860).unwrap();
        assert!(matches!(
            MaterialPlacement::place(&bed, 411, 10),
            Err(Error::OutOfBounds { .. })
        ));
        assert!(matches!(
            MaterialPlacement::place(&bed, 10, 861),
            Err(Error::OutOfBounds { .. })
        ));
    }

    #[test]
    fn test_full_size_material_stays_on_bed() {
        let bed = MachineBed::new(100, 50).unwrap();
        let material = MaterialPlacement::place(&bed, 100, 50).unwrap();
        assert_eq!(material.rect, Rect::new(0.0, 0.0, 100.0, 50.0));
        assert!(material.fits(&bed));
    }

    #[test]
    fn test_every_fitting_size_is_contained() {
        let bed = MachineBed::new(40, 30).unwrap();
        for w in 1..=40 {
            for h in 1..=30 {
                let material = MaterialPlacement::place(&bed, w, h).unwrap();
                assert!(bed.bounds().contains_rect(&material.rect), "{w}x{h}");
            }
        }
    }

    #[test]
    fn test_fits_after_bed_shrinks() {
        let bed = MachineBed::new(410, 860).unwrap();
        let material = MaterialPlacement::place(&bed, 300, 200).unwrap();
        let smaller = MachineBed::new(200, 860).unwrap();
        assert!(!material.fits(&smaller));
    }
}

//! Annotation model shared by the codec, validator and pipeline.
//!
//! A bounding box and its label always travel together as a [`LabeledBox`],
//! so dropping a box can never leave its label behind.

use super::bbox::BBoxXYXY;
use super::space::Pixel;

/// A bounding box paired with its category label.
#[derive(Clone, Debug, PartialEq)]
pub struct LabeledBox {
    /// Box geometry in absolute pixel coordinates.
    pub bbox: BBoxXYXY<Pixel>,

    /// Category label (free-form; the taxonomy is external).
    pub label: String,
}

impl LabeledBox {
    /// Creates a new labeled box.
    pub fn new(bbox: BBoxXYXY<Pixel>, label: impl Into<String>) -> Self {
        Self {
            bbox,
            label: label.into(),
        }
    }

    /// Creates a labeled box from explicit XYXY pixel coordinates.
    pub fn from_xyxy(xmin: f64, ymin: f64, xmax: f64, ymax: f64, label: impl Into<String>) -> Self {
        Self::new(BBoxXYXY::from_xyxy(xmin, ymin, xmax, ymax), label)
    }

    /// Returns a copy with the geometry replaced and the label kept.
    pub fn with_bbox(&self, bbox: BBoxXYXY<Pixel>) -> Self {
        Self {
            bbox,
            label: self.label.clone(),
        }
    }
}

/// All boxes of one image, together with the dimensions they refer to.
///
/// Box validity is only meaningful against `width` and `height`, so the
/// two are never passed around separately from the boxes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Annotation {
    /// Image file name as recorded in `<filename>`.
    pub filename: String,

    /// Image width in pixels.
    pub width: u32,

    /// Image height in pixels.
    pub height: u32,

    /// Boxes in document order.
    pub boxes: Vec<LabeledBox>,
}

impl Annotation {
    /// Creates a new annotation.
    pub fn new(filename: impl Into<String>, width: u32, height: u32, boxes: Vec<LabeledBox>) -> Self {
        Self {
            filename: filename.into(),
            width,
            height,
            boxes,
        }
    }
}

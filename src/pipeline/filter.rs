//! Area and visibility filtering of transformed boxes.

use serde::{Deserialize, Serialize};

use crate::ir::LabeledBox;

/// Thresholds below which a transformed box is dropped.
///
/// Both default to zero, which keeps every box that still overlaps the
/// image.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BboxParams {
    /// Minimum clipped area in square pixels.
    #[serde(default)]
    pub min_area: f64,

    /// Minimum fraction of the transformed box that must remain inside the
    /// image, in `[0, 1]`.
    #[serde(default)]
    pub min_visibility: f64,
}

impl BboxParams {
    /// Creates thresholds from explicit values.
    pub fn new(min_area: f64, min_visibility: f64) -> Self {
        Self {
            min_area,
            min_visibility,
        }
    }
}

/// Clips boxes to a `height` x `width` image and drops the ones that no
/// longer qualify.
///
/// A box is dropped when nothing of it is left inside the image, when its
/// clipped area is below `min_area`, or when the clipped area divided by its
/// unclipped area is below `min_visibility`. Surviving boxes are returned
/// clipped, in their original order.
pub fn filter_boxes(
    boxes: Vec<LabeledBox>,
    height: u32,
    width: u32,
    params: &BboxParams,
) -> Vec<LabeledBox> {
    let (w, h) = (width as f64, height as f64);

    boxes
        .into_iter()
        .filter_map(|labeled| {
            let full_area = labeled.bbox.area();
            let clipped = labeled.bbox.clip(w, h);
            let clipped_area = clipped.area();

            if !clipped.is_finite()
                || !clipped.is_ordered()
                || clipped_area <= 0.0
                || clipped_area < params.min_area
            {
                return None;
            }
            if full_area > 0.0 && clipped_area / full_area < params.min_visibility {
                return None;
            }

            Some(LabeledBox {
                bbox: clipped,
                label: labeled.label,
            })
        })
        .collect()
}

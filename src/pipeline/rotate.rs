//! Small-angle rotation about the image centre.

use image::Rgb;
use imageproc::geometric_transformations::{rotate_about_center, Interpolation};
use rand::{Rng, RngExt};

use super::{Sample, Transform};
use crate::ir::{BBoxXYXY, Coord, Pixel};

/// Rotates by an angle drawn uniformly from `[-limit_degrees, limit_degrees]`.
///
/// The output keeps the input size; uncovered pixels are black. Each box is
/// replaced by the axis-aligned hull of its rotated corners, so rotated
/// boxes only ever grow.
#[derive(Clone, Debug, PartialEq)]
pub struct Rotate {
    pub limit_degrees: f64,
}

impl Rotate {
    /// Creates a rotation step.
    pub fn new(limit_degrees: f64) -> Self {
        Self { limit_degrees }
    }

    /// Rotates the image and boxes by exactly `degrees`.
    pub fn rotate_by(&self, sample: Sample, degrees: f64) -> Sample {
        let theta = degrees.to_radians();
        // Same centre as `rotate_about_center`: (w/2, h/2) in pixel-index
        // coordinates, the space box coordinates are written in.
        let (cx, cy) = (
            sample.image.width() as f64 / 2.0,
            sample.image.height() as f64 / 2.0,
        );

        let image = rotate_about_center(
            &sample.image,
            theta as f32,
            Interpolation::Bilinear,
            Rgb([0, 0, 0]),
        );

        let boxes = sample
            .boxes
            .iter()
            .map(|labeled| {
                let corners = labeled.bbox.corners().map(|corner| {
                    let rotated = Coord::<Pixel>::from(corner).rotate_about(cx, cy, theta);
                    (rotated.x, rotated.y)
                });
                let hull = BBoxXYXY::hull(corners).unwrap_or(labeled.bbox);
                labeled.with_bbox(hull)
            })
            .collect();

        Sample { image, boxes }
    }
}

impl Transform for Rotate {
    fn name(&self) -> &'static str {
        "rotate"
    }

    fn apply<R: Rng + ?Sized>(&self, sample: Sample, rng: &mut R) -> Sample {
        let limit = self.limit_degrees.abs();
        if limit == 0.0 {
            return sample;
        }
        let degrees = rng.random_range(-limit..=limit);
        self.rotate_by(sample, degrees)
    }
}

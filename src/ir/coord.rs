//! Points tagged with the coordinate space they live in.

use std::marker::PhantomData;

/// A 2D coordinate with a type-level marker for the coordinate space.
///
/// The `TSpace` parameter should be either [`Pixel`](super::Pixel) or
/// [`Normalized`](super::Normalized), so window-relative values produced
/// inside a transform cannot be written out as pixels by accident.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Coord<TSpace> {
    pub x: f64,
    pub y: f64,
    _space: PhantomData<TSpace>,
}

impl<TSpace> Coord<TSpace> {
    /// Creates a new coordinate with the given x and y values.
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            _space: PhantomData,
        }
    }

    /// Returns true if both coordinates are finite (not NaN or infinite).
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Rotates the point by `theta` radians about (`cx`, `cy`).
    ///
    /// With the y axis pointing down, a positive angle turns the point
    /// clockwise on screen, the same direction images are rotated in.
    #[inline]
    pub fn rotate_about(&self, cx: f64, cy: f64, theta: f64) -> Self {
        let (sin, cos) = theta.sin_cos();
        let (dx, dy) = (self.x - cx, self.y - cy);
        Self::new(cx + cos * dx - sin * dy, cy + sin * dx + cos * dy)
    }
}

impl<TSpace> From<(f64, f64)> for Coord<TSpace> {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

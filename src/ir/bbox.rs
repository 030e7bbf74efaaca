//! Bounding box types in canonical XYXY format.

use super::coord::Coord;
use super::{Normalized, Pixel};

/// An axis-aligned bounding box in XYXY format (xmin, ymin, xmax, ymax).
///
/// The `TSpace` parameter should be either [`Pixel`](super::Pixel) or
/// [`Normalized`](super::Normalized), ensuring type safety across
/// coordinate spaces.
///
/// Note: This type does NOT enforce that min < max in the constructor,
/// allowing "malformed" boxes to exist. The bounds validator rejects them
/// at serialization time.
#[derive(Clone, Copy, PartialEq)]
pub struct BBoxXYXY<TSpace> {
    pub min: Coord<TSpace>,
    pub max: Coord<TSpace>,
}

impl<TSpace> BBoxXYXY<TSpace> {
    /// Creates a new bounding box from explicit coordinates.
    #[inline]
    pub fn from_xyxy(xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> Self {
        Self {
            min: Coord::new(xmin, ymin),
            max: Coord::new(xmax, ymax),
        }
    }

    #[inline]
    pub fn xmin(&self) -> f64 {
        self.min.x
    }

    #[inline]
    pub fn ymin(&self) -> f64 {
        self.min.y
    }

    #[inline]
    pub fn xmax(&self) -> f64 {
        self.max.x
    }

    #[inline]
    pub fn ymax(&self) -> f64 {
        self.max.y
    }

    /// Returns the width of the bounding box.
    ///
    /// May be negative if the box is malformed (xmax < xmin).
    #[inline]
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    /// Returns the height of the bounding box.
    ///
    /// May be negative if the box is malformed (ymax < ymin).
    #[inline]
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// Returns the area; negative when exactly one axis is inverted.
    #[inline]
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Returns true if all coordinates are finite (not NaN or infinite).
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }

    /// Returns true if the box is properly ordered (min <= max for both axes).
    #[inline]
    pub fn is_ordered(&self) -> bool {
        self.min.x <= self.max.x && self.min.y <= self.max.y
    }

    /// Returns the box with every coordinate truncated toward zero.
    ///
    /// This is how coordinates are turned into integers on write: `12.9`
    /// becomes `12` and `-0.5` becomes `0`, never rounded.
    #[inline]
    pub fn truncated(&self) -> Self {
        Self::from_xyxy(
            self.min.x.trunc(),
            self.min.y.trunc(),
            self.max.x.trunc(),
            self.max.y.trunc(),
        )
    }

    /// Clips the box to `[0, max_x] x [0, max_y]`.
    ///
    /// A box lying entirely outside the window collapses to zero area.
    #[inline]
    pub fn clip(&self, max_x: f64, max_y: f64) -> Self {
        Self::from_xyxy(
            self.min.x.clamp(0.0, max_x),
            self.min.y.clamp(0.0, max_y),
            self.max.x.clamp(0.0, max_x),
            self.max.y.clamp(0.0, max_y),
        )
    }

    /// Returns the four corners in clockwise order starting at (xmin, ymin).
    #[inline]
    pub fn corners(&self) -> [(f64, f64); 4] {
        [
            (self.min.x, self.min.y),
            (self.max.x, self.min.y),
            (self.max.x, self.max.y),
            (self.min.x, self.max.y),
        ]
    }

    /// Returns the smallest axis-aligned box containing every point.
    ///
    /// Returns `None` for an empty iterator.
    pub fn hull<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let mut iter = points.into_iter();
        let (x0, y0) = iter.next()?;
        let (mut xmin, mut ymin, mut xmax, mut ymax) = (x0, y0, x0, y0);
        for (x, y) in iter {
            xmin = xmin.min(x);
            ymin = ymin.min(y);
            xmax = xmax.max(x);
            ymax = ymax.max(y);
        }
        Some(Self::from_xyxy(xmin, ymin, xmax, ymax))
    }
}

impl<TSpace> std::fmt::Debug for BBoxXYXY<TSpace> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BBoxXYXY")
            .field("xmin", &self.min.x)
            .field("ymin", &self.min.y)
            .field("xmax", &self.max.x)
            .field("ymax", &self.max.y)
            .finish()
    }
}

impl BBoxXYXY<Pixel> {
    /// Converts pixel coordinates to coordinates normalized against a window.
    ///
    /// The window starts at (`origin_x`, `origin_y`) and spans
    /// `window_width` x `window_height` pixels. Passing a zero origin and the
    /// image dimensions normalizes against the full image.
    pub fn to_normalized_in(
        &self,
        origin_x: f64,
        origin_y: f64,
        window_width: f64,
        window_height: f64,
    ) -> BBoxXYXY<Normalized> {
        BBoxXYXY::from_xyxy(
            (self.min.x - origin_x) / window_width,
            (self.min.y - origin_y) / window_height,
            (self.max.x - origin_x) / window_width,
            (self.max.y - origin_y) / window_height,
        )
    }
}

impl BBoxXYXY<Normalized> {
    /// Scales window-relative coordinates onto a `width` x `height` pixel grid.
    pub fn to_pixel(&self, width: f64, height: f64) -> BBoxXYXY<Pixel> {
        BBoxXYXY::from_xyxy(
            self.min.x * width,
            self.min.y * height,
            self.max.x * width,
            self.max.y * height,
        )
    }
}

//! Coordinate space marker types.
//!
//! Zero-sized types used as type parameters to tell absolute pixel
//! coordinates apart from window-relative ones at compile time.

use std::fmt;

/// Marker type for pixel coordinates (absolute values).
///
/// (0, 0) is the top-left corner of the image and y grows downwards.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pixel {}

/// Marker type for normalized coordinates.
///
/// Values are fractions of a reference window (usually the whole image or a
/// crop region); 0.0 and 1.0 are the window edges. Values outside that range
/// mean the point lies outside the window.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum Normalized {}

impl fmt::Debug for Pixel {
    fn fmt(&self, _: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {}
    }
}

impl fmt::Debug for Normalized {
    fn fmt(&self, _: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {}
    }
}

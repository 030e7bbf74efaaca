//! Pixel-only transforms. Boxes pass through untouched.

use image::imageops;
use imageproc::filter::separable_filter_equal;
use rand::{Rng, RngExt};

use super::{Sample, Transform};

/// Largest `blur_limit` a pipeline config accepts.
pub const MAX_BLUR_LIMIT: u32 = 255;

/// Mean (box) blur with a random odd kernel size.
///
/// The kernel size is drawn uniformly from the odd values in
/// `3..=max(3, blur_limit)`, with `blur_limit` capped at [`MAX_BLUR_LIMIT`].
#[derive(Clone, Debug, PartialEq)]
pub struct Blur {
    pub blur_limit: u32,
}

impl Blur {
    pub fn new(blur_limit: u32) -> Self {
        Self { blur_limit }
    }

    /// Largest odd kernel size this step can pick.
    pub fn max_kernel(&self) -> u32 {
        let limit = self.blur_limit.clamp(3, MAX_BLUR_LIMIT);
        limit - (1 - limit % 2)
    }

    /// Draws an odd kernel size in `3..=max_kernel()`.
    pub fn sample_kernel<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        let choices = (self.max_kernel() - 3) / 2 + 1;
        3 + 2 * rng.random_range(0..choices)
    }

    /// Blurs with a `kernel` x `kernel` mean filter.
    pub fn blur_with(&self, sample: Sample, kernel: u32) -> Sample {
        let weights = vec![1.0f32 / kernel as f32; kernel as usize];
        Sample {
            image: separable_filter_equal(&sample.image, &weights),
            boxes: sample.boxes,
        }
    }
}

impl Transform for Blur {
    fn name(&self) -> &'static str {
        "blur"
    }

    fn apply<R: Rng + ?Sized>(&self, sample: Sample, rng: &mut R) -> Sample {
        let kernel = self.sample_kernel(rng);
        self.blur_with(sample, kernel)
    }
}

/// Additive brightness jitter.
///
/// Every channel is shifted by `beta * 255` with `beta` uniform in
/// `[-limit, limit]`, saturating at 0 and 255.
#[derive(Clone, Debug, PartialEq)]
pub struct Brightness {
    pub limit: f64,
}

impl Brightness {
    pub fn new(limit: f64) -> Self {
        Self { limit }
    }

    /// Shifts every channel by `delta`.
    pub fn shift_by(&self, sample: Sample, delta: i32) -> Sample {
        Sample {
            image: imageops::brighten(&sample.image, delta),
            boxes: sample.boxes,
        }
    }
}

impl Transform for Brightness {
    fn name(&self) -> &'static str {
        "brightness"
    }

    fn apply<R: Rng + ?Sized>(&self, sample: Sample, rng: &mut R) -> Sample {
        let limit = self.limit.abs();
        if limit == 0.0 {
            return sample;
        }
        let beta = rng.random_range(-limit..=limit);
        self.shift_by(sample, (beta * 255.0).round() as i32)
    }
}

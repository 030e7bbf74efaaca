//! Random crop followed by a resize to a fixed output size.

use image::imageops::{self, FilterType};
use rand::{Rng, RngExt};

use super::{Sample, Transform};

/// Crops a random window and resizes it to `height` x `width`.
///
/// The window height is drawn uniformly from `min_height..=max_height`
/// (clamped to the image), its width is `window height * w2h_ratio`
/// (clamped to the image) and its origin is uniform over the positions that
/// keep it inside the image. Boxes are expressed relative to the window and
/// then scaled to the output size; boxes that leave the window are clipped
/// or dropped by the pipeline afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomSizedCrop {
    pub min_height: u32,
    pub max_height: u32,
    pub height: u32,
    pub width: u32,
    pub w2h_ratio: f64,
}

impl RandomSizedCrop {
    /// Creates a crop step from pixel sizes.
    pub fn new(min_height: u32, max_height: u32, height: u32, width: u32, w2h_ratio: f64) -> Self {
        Self {
            min_height,
            max_height,
            height,
            width,
            w2h_ratio,
        }
    }

    /// Picks the crop window `(x, y, width, height)` for an image.
    pub fn sample_window<R: Rng + ?Sized>(
        &self,
        image_height: u32,
        image_width: u32,
        rng: &mut R,
    ) -> (u32, u32, u32, u32) {
        let lo = self.min_height.clamp(1, image_height.max(1));
        let hi = self.max_height.clamp(lo, image_height.max(1));
        let crop_h = rng.random_range(lo..=hi).min(image_height);

        let crop_w = ((crop_h as f64 * self.w2h_ratio) as u32).clamp(1, image_width.max(1));
        let crop_w = crop_w.min(image_width);

        let x = rng.random_range(0..=image_width - crop_w);
        let y = rng.random_range(0..=image_height - crop_h);
        (x, y, crop_w, crop_h)
    }
}

impl Transform for RandomSizedCrop {
    fn name(&self) -> &'static str {
        "random_sized_crop"
    }

    fn apply<R: Rng + ?Sized>(&self, sample: Sample, rng: &mut R) -> Sample {
        let (image_height, image_width) = sample.dimensions();
        if image_height == 0 || image_width == 0 {
            return sample;
        }

        let (x, y, crop_w, crop_h) = self.sample_window(image_height, image_width, rng);
        let out_h = self.height.max(1);
        let out_w = self.width.max(1);

        let window = imageops::crop_imm(&sample.image, x, y, crop_w, crop_h).to_image();
        let image = imageops::resize(&window, out_w, out_h, FilterType::Triangle);

        let boxes = sample
            .boxes
            .iter()
            .map(|labeled| {
                let relative =
                    labeled
                        .bbox
                        .to_normalized_in(x as f64, y as f64, crop_w as f64, crop_h as f64);
                labeled.with_bbox(relative.to_pixel(out_w as f64, out_h as f64))
            })
            .collect();

        Sample { image, boxes }
    }
}

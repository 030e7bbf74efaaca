//! Annotation overlays for manual inspection.
//!
//! Boxes are drawn as hollow rectangles with their label above the top-left
//! corner, and the result is written to an output directory instead of being
//! shown in a window.

use std::fs;
use std::path::{Path, PathBuf};

use ab_glyph::{FontVec, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_text_mut, text_size};
use imageproc::rect::Rect;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::augment::{discover_images, load_sample};
use crate::error::VocAugError;
use crate::ir::LabeledBox;

/// Name of the overlay directory created inside the source directory when no
/// output directory is given.
pub const DEFAULT_OVERLAY_DIR_NAME: &str = "overlays";

/// Colors and sizes used by [`draw_annotations`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DrawStyle {
    pub box_color: [u8; 3],
    pub text_color: [u8; 3],
    /// Rectangle outline width in pixels.
    pub thickness: u32,
    /// Label height in pixels.
    pub text_scale: f32,
}

impl Default for DrawStyle {
    fn default() -> Self {
        Self {
            box_color: [255, 0, 0],
            text_color: [255, 255, 255],
            thickness: 2,
            text_scale: 14.0,
        }
    }
}

/// Loads a TrueType/OpenType font for label rendering.
pub fn load_font(path: &Path) -> Result<FontVec, VocAugError> {
    let bytes = fs::read(path)?;
    FontVec::try_from_vec(bytes).map_err(|_| VocAugError::FontLoad {
        path: path.to_path_buf(),
    })
}

/// Draws every box onto `image`, and its label when a font is given.
///
/// Coordinates are truncated to whole pixels and clipped to the image; boxes
/// with nothing left inside the image are skipped.
pub fn draw_annotations(
    image: &mut RgbImage,
    boxes: &[LabeledBox],
    style: &DrawStyle,
    font: Option<&FontVec>,
) {
    let (width, height) = image.dimensions();
    let box_color = Rgb(style.box_color);
    let text_color = Rgb(style.text_color);
    let scale = PxScale::from(style.text_scale);

    for labeled in boxes {
        let bbox = labeled.bbox.truncated().clip(width as f64, height as f64);
        if !bbox.is_finite() || bbox.width() <= 0.0 || bbox.height() <= 0.0 {
            continue;
        }

        let x = bbox.xmin() as u32;
        let y = bbox.ymin() as u32;
        let w = bbox.width() as u32;
        let h = bbox.height() as u32;

        for t in 0..style.thickness.max(1) {
            let inner_w = w.saturating_sub(2 * t);
            let inner_h = h.saturating_sub(2 * t);
            if inner_w > 0 && inner_h > 0 {
                let rect = Rect::at((x + t) as i32, (y + t) as i32).of_size(inner_w, inner_h);
                draw_hollow_rect_mut(image, rect, box_color);
            }
        }

        if let Some(font) = font {
            if labeled.label.is_empty() {
                continue;
            }
            let (_, text_h) = text_size(scale, font, &labeled.label);
            let text_y = (y as f64 - 1.3 * text_h as f64).max(0.0) as i32;
            draw_text_mut(
                image,
                text_color,
                x as i32,
                text_y,
                scale,
                font,
                &labeled.label,
            );
        }
    }
}

/// Writes an overlay for every image in `dir` into `out_dir`, keeping file
/// names. Returns the number of overlays written.
///
/// Images that cannot be decoded or written are logged and skipped.
pub fn render_dir(
    dir: &Path,
    out_dir: &Path,
    style: &DrawStyle,
    font: Option<&FontVec>,
) -> Result<usize, VocAugError> {
    let images = discover_images(dir)?;
    fs::create_dir_all(out_dir)?;

    let mut written = 0;
    for image_path in &images {
        match render_one(image_path, out_dir, style, font) {
            Ok(path) => {
                info!(overlay = %path.display(), "wrote overlay");
                written += 1;
            }
            Err(err) => error!(image = %image_path.display(), "overlay failed: {err}"),
        }
    }

    if written == 0 && !images.is_empty() {
        warn!(dir = %dir.display(), "no overlays written");
    }
    Ok(written)
}

fn render_one(
    image_path: &Path,
    out_dir: &Path,
    style: &DrawStyle,
    font: Option<&FontVec>,
) -> Result<PathBuf, VocAugError> {
    let file_name = image_path
        .file_name()
        .ok_or_else(|| VocAugError::InvalidInput {
            message: format!("image path {} has no file name", image_path.display()),
        })?;
    let out_path = out_dir.join(file_name);

    let mut sample = load_sample(image_path)?;
    draw_annotations(&mut sample.image, &sample.boxes, style, font);
    sample
        .image
        .save(&out_path)
        .map_err(|source| VocAugError::ImageWrite {
            path: out_path.clone(),
            source,
        })?;
    Ok(out_path)
}

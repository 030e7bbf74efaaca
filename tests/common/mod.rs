#![allow(dead_code)]

use std::fs;
use std::path::Path;

use image::{Rgb, RgbImage};

/// A gradient image, so that transforms visibly change pixels.
pub fn gradient_image(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    })
}

pub fn write_png(path: &Path, width: u32, height: u32) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    gradient_image(width, height)
        .save(path)
        .expect("write png file");
}

/// Writes a minimal VOC XML with one object per `(label, xmin, ymin, xmax, ymax)`.
pub fn write_voc(path: &Path, objects: &[(&str, u32, u32, u32, u32)]) {
    let mut xml = String::from("<annotation>\n");
    for (label, xmin, ymin, xmax, ymax) in objects {
        xml.push_str(&format!(
            "  <object>\n    <name>{label}</name>\n    <bndbox>\n      \
             <xmin>{xmin}</xmin>\n      <ymin>{ymin}</ymin>\n      \
             <xmax>{xmax}</xmax>\n      <ymax>{ymax}</ymax>\n    </bndbox>\n  </object>\n"
        ));
    }
    xml.push_str("</annotation>\n");
    fs::write(path, xml).expect("write xml file");
}

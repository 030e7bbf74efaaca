//! Bounds validation for bounding boxes.
//!
//! A box is valid for an image of `height` x `width` pixels iff
//!
//! - `0 <= xmin < width` and `0 <= xmax < width`, with `xmin < xmax`
//! - `0 <= ymin < height` and `0 <= ymax < height`, with `ymin < ymax`
//!
//! The comparison against the dimension is strict: a box whose `xmax` equals
//! the image width (or `ymax` the height) is rejected, even though it only
//! touches the last pixel boundary. Existing datasets were filtered with this
//! rule, so it is kept exactly.

mod report;

pub use report::{IssueCode, IssueContext, Severity, ValidationIssue, ValidationReport};

use std::path::Path;

use crate::augment::IMAGE_EXTENSIONS;
use crate::error::VocAugError;
use crate::ir::io_voc_xml::read_voc_annotation;
use crate::ir::{BBoxXYXY, LabeledBox, Pixel};

/// Returns true if `bbox` lies inside an image of the given dimensions.
///
/// See the [module documentation](self) for the exact rule.
pub fn is_valid(bbox: &BBoxXYXY<Pixel>, image_height: u32, image_width: u32) -> bool {
    let (w, h) = (image_width as f64, image_height as f64);
    let in_x = |v: f64| v >= 0.0 && v < w;
    let in_y = |v: f64| v >= 0.0 && v < h;

    in_x(bbox.xmin())
        && in_x(bbox.xmax())
        && bbox.xmin() < bbox.xmax()
        && in_y(bbox.ymin())
        && in_y(bbox.ymax())
        && bbox.ymin() < bbox.ymax()
}

/// Lists every bounds violation of a single box.
///
/// The result is empty exactly when [`is_valid`] returns true.
pub fn check_box(
    bbox: &BBoxXYXY<Pixel>,
    image_height: u32,
    image_width: u32,
    context: IssueContext,
) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if !bbox.is_finite() {
        issues.push(ValidationIssue::error(
            IssueCode::BBoxNotFinite,
            format!(
                "Non-finite coordinates ({}, {}, {}, {})",
                bbox.xmin(),
                bbox.ymin(),
                bbox.xmax(),
                bbox.ymax()
            ),
            context,
        ));
        return issues;
    }

    let (w, h) = (image_width as f64, image_height as f64);
    let axis_checks = [
        (bbox.xmin(), w, "xmin", "width", IssueCode::XMinOutOfBounds),
        (bbox.xmax(), w, "xmax", "width", IssueCode::XMaxOutOfBounds),
        (bbox.ymin(), h, "ymin", "height", IssueCode::YMinOutOfBounds),
        (bbox.ymax(), h, "ymax", "height", IssueCode::YMaxOutOfBounds),
    ];
    for (value, limit, name, dim_name, code) in axis_checks {
        if value < 0.0 || value >= limit {
            issues.push(ValidationIssue::error(
                code,
                format!("{name} {value} outside [0, {dim_name} {limit})"),
                context.clone(),
            ));
        }
    }

    if bbox.xmin() >= bbox.xmax() {
        issues.push(ValidationIssue::error(
            IssueCode::DegenerateWidth,
            format!("xmin {} >= xmax {}", bbox.xmin(), bbox.xmax()),
            context.clone(),
        ));
    }
    if bbox.ymin() >= bbox.ymax() {
        issues.push(ValidationIssue::error(
            IssueCode::DegenerateHeight,
            format!("ymin {} >= ymax {}", bbox.ymin(), bbox.ymax()),
            context,
        ));
    }

    issues
}

/// Validates all boxes of one image and returns a report of all issues found.
///
/// Geometry problems are errors (the box will not be written); an empty
/// label is only a warning.
pub fn validate_boxes(boxes: &[LabeledBox], image_height: u32, image_width: u32) -> ValidationReport {
    let mut report = ValidationReport::new();

    if image_height == 0 || image_width == 0 {
        report.add(ValidationIssue::error(
            IssueCode::InvalidImageDimensions,
            format!(
                "Invalid dimensions {}x{} (must be positive)",
                image_width, image_height
            ),
            IssueContext::Image,
        ));
    }

    for (index, labeled) in boxes.iter().enumerate() {
        let context = IssueContext::Box {
            index,
            label: labeled.label.clone(),
        };

        report.extend(check_box(
            &labeled.bbox,
            image_height,
            image_width,
            context.clone(),
        ));

        if labeled.label.trim().is_empty() {
            report.add(ValidationIssue::warning(
                IssueCode::EmptyLabel,
                "Empty label",
                context,
            ));
        }
    }

    report
}

/// Validates one VOC XML file against the size of its image.
///
/// The size comes from `<size>` when present. Otherwise the paired image
/// next to the XML is probed; without one, every box is reported against a
/// zero-sized image.
///
/// # Errors
/// Returns an error if the XML cannot be read or parsed strictly.
pub fn validate_voc_file(xml_path: &Path) -> Result<ValidationReport, VocAugError> {
    let annotation = read_voc_annotation(xml_path)?;
    let (height, width) = if annotation.height > 0 && annotation.width > 0 {
        (annotation.height, annotation.width)
    } else {
        paired_image_dimensions(xml_path).unwrap_or((0, 0))
    };
    Ok(validate_boxes(&annotation.boxes, height, width))
}

/// Returns `(height, width)` of the first image found next to `xml_path`.
fn paired_image_dimensions(xml_path: &Path) -> Option<(u32, u32)> {
    IMAGE_EXTENSIONS
        .iter()
        .flat_map(|ext| [ext.to_string(), ext.to_ascii_uppercase()])
        .map(|ext| xml_path.with_extension(ext))
        .find(|candidate| candidate.is_file())
        .and_then(|image_path| image::image_dimensions(image_path).ok())
        .map(|(width, height)| (height, width))
}

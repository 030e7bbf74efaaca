//! Pascal VOC XML reader and writer.
//!
//! Reading is fail-soft: a document that cannot be parsed yields zero boxes
//! and a logged warning, so callers cannot tell a malformed file from an
//! image without objects. Writing runs every box through the bounds
//! validator against the target image size and silently drops (but logs)
//! the ones that do not fit. A box and its label are always dropped together.
//!
//! The writer produces the layout below, indented with three spaces per
//! level:
//!
//! ```text
//! <?xml version="1.0" ?>
//! <annotation>
//!    <filename>img_0.jpg</filename>
//!    <object>
//!       <name>cat</name>
//!       <pose>Unspecified</pose>
//!       <truncated>0</truncated>
//!       <difficult>0</difficult>
//!       <bndbox>
//!          <xmin>10</xmin>
//!          <ymin>10</ymin>
//!          <xmax>50</xmax>
//!          <ymax>50</ymax>
//!       </bndbox>
//!    </object>
//! </annotation>
//! ```

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use roxmltree::Node;
use tracing::warn;

use super::{Annotation, LabeledBox};
use crate::error::VocAugError;
use crate::validation::{self, IssueContext};

const INDENT: &str = "   ";
const MEMORY_PATH: &str = "<memory>";

/// Outcome of serializing boxes to VOC XML.
#[derive(Clone, Debug, PartialEq)]
pub struct VocDocument {
    /// The rendered XML text.
    pub xml: String,
    /// Number of `<object>` elements written.
    pub written: usize,
    /// Number of boxes rejected by the bounds validator.
    pub dropped: usize,
}

/// Parse the boxes of a VOC document, returning an empty list on failure.
///
/// The label of each `<object>` is the text of its first child element and
/// the geometry comes from its `<bndbox>` (`xmin`, `ymin`, `xmax`, `ymax`).
pub fn parse_voc_boxes(xml: &str) -> Vec<LabeledBox> {
    match parse_voc_annotation(xml, Path::new(MEMORY_PATH)) {
        Ok(annotation) => annotation.boxes,
        Err(err) => {
            warn!("{err}; treating annotation as empty");
            Vec::new()
        }
    }
}

/// Read the boxes of a VOC XML file, returning an empty list on failure.
///
/// Missing, unreadable and malformed files are all logged and reported as
/// "no boxes".
pub fn read_voc_boxes(path: &Path) -> Vec<LabeledBox> {
    match read_voc_annotation(path) {
        Ok(annotation) => annotation.boxes,
        Err(err) => {
            warn!("{err}; treating annotation as empty");
            Vec::new()
        }
    }
}

/// Read a VOC XML file strictly.
pub fn read_voc_annotation(path: &Path) -> Result<Annotation, VocAugError> {
    let xml = fs::read_to_string(path).map_err(|source| VocAugError::VocXmlParse {
        path: path.to_path_buf(),
        message: source.to_string(),
    })?;
    parse_voc_annotation(&xml, path)
}

/// Parse a VOC XML document strictly.
///
/// `<filename>` and `<size>` are optional and default to an empty name and
/// zero dimensions. Every `<object>` must carry a `<bndbox>` with four
/// numeric values; otherwise the whole document is rejected.
pub fn parse_voc_annotation(xml: &str, path: &Path) -> Result<Annotation, VocAugError> {
    let document =
        roxmltree::Document::parse(xml).map_err(|source| VocAugError::VocXmlParse {
            path: path.to_path_buf(),
            message: source.to_string(),
        })?;

    let root = document.root_element();
    let filename = optional_child_text(root, "filename").unwrap_or_default();

    let (width, height) = match child_element(root, "size") {
        Some(size) => (
            parse_optional_u32(size, "width", path)?,
            parse_optional_u32(size, "height", path)?,
        ),
        None => (0, 0),
    };

    let mut boxes = Vec::new();
    for (index, object) in root
        .descendants()
        .filter(|node| node.is_element() && node.tag_name().name() == "object")
        .enumerate()
    {
        let label = object
            .children()
            .find(|child| child.is_element())
            .and_then(|first| first.text())
            .map(str::trim)
            .unwrap_or_default()
            .to_string();

        let context = format!("<object> #{index}");
        let bndbox = child_element(object, "bndbox").ok_or_else(|| VocAugError::VocXmlParse {
            path: path.to_path_buf(),
            message: format!("missing <bndbox> in {context}"),
        })?;

        let xmin = parse_required_f64(bndbox, "xmin", path, &context)?;
        let ymin = parse_required_f64(bndbox, "ymin", path, &context)?;
        let xmax = parse_required_f64(bndbox, "xmax", path, &context)?;
        let ymax = parse_required_f64(bndbox, "ymax", path, &context)?;

        boxes.push(LabeledBox::from_xyxy(xmin, ymin, xmax, ymax, label));
    }

    Ok(Annotation {
        filename,
        width,
        height,
        boxes,
    })
}

/// Parse VOC boxes from bytes, fail-soft.
///
/// Invalid UTF-8 counts as a malformed document. Mostly useful for fuzzing.
pub fn from_voc_xml_slice(bytes: &[u8]) -> Vec<LabeledBox> {
    match std::str::from_utf8(bytes) {
        Ok(xml) => parse_voc_boxes(xml),
        Err(source) => {
            warn!("input is not valid UTF-8: {source}; treating annotation as empty");
            Vec::new()
        }
    }
}

/// Serialize boxes as VOC XML for an image of the given size.
///
/// Coordinates are truncated to integers first and then checked with
/// [`validation::is_valid`]; boxes that fail are left out together with
/// their labels. The returned text may therefore hold fewer objects than
/// `boxes`.
pub fn serialize_voc(
    boxes: &[LabeledBox],
    image_height: u32,
    image_width: u32,
    image_filename: &str,
) -> String {
    render_voc(boxes, image_height, image_width, image_filename).xml
}

/// Serialize boxes like [`serialize_voc`] and report how many were kept.
pub fn render_voc(
    boxes: &[LabeledBox],
    image_height: u32,
    image_width: u32,
    image_filename: &str,
) -> VocDocument {
    let mut xml = String::new();
    let mut written = 0;
    let mut dropped = 0;

    writeln!(xml, "<?xml version=\"1.0\" ?>").expect("write to string");
    writeln!(xml, "<annotation>").expect("write to string");
    writeln!(
        xml,
        "{INDENT}<filename>{}</filename>",
        xml_escape(image_filename)
    )
    .expect("write to string");

    for (index, labeled) in boxes.iter().enumerate() {
        let bbox = labeled.bbox.truncated();
        let issues = validation::check_box(
            &bbox,
            image_height,
            image_width,
            IssueContext::Box {
                index,
                label: labeled.label.clone(),
            },
        );
        if !issues.is_empty() {
            for issue in &issues {
                warn!(
                    image = image_filename,
                    image_height, image_width, "dropping box: {issue}"
                );
            }
            dropped += 1;
            continue;
        }

        let i2 = INDENT.repeat(2);
        let i3 = INDENT.repeat(3);
        writeln!(xml, "{INDENT}<object>").expect("write to string");
        writeln!(xml, "{i2}<name>{}</name>", xml_escape(&labeled.label)).expect("write to string");
        writeln!(xml, "{i2}<pose>Unspecified</pose>").expect("write to string");
        writeln!(xml, "{i2}<truncated>0</truncated>").expect("write to string");
        writeln!(xml, "{i2}<difficult>0</difficult>").expect("write to string");
        writeln!(xml, "{i2}<bndbox>").expect("write to string");
        writeln!(xml, "{i3}<xmin>{}</xmin>", bbox.xmin() as i64).expect("write to string");
        writeln!(xml, "{i3}<ymin>{}</ymin>", bbox.ymin() as i64).expect("write to string");
        writeln!(xml, "{i3}<xmax>{}</xmax>", bbox.xmax() as i64).expect("write to string");
        writeln!(xml, "{i3}<ymax>{}</ymax>", bbox.ymax() as i64).expect("write to string");
        writeln!(xml, "{i2}</bndbox>").expect("write to string");
        writeln!(xml, "{INDENT}</object>").expect("write to string");
        written += 1;
    }

    writeln!(xml, "</annotation>").expect("write to string");

    VocDocument {
        xml,
        written,
        dropped,
    }
}

/// Serialize boxes and write them to `xml_path`, replacing any existing file.
///
/// Returns the rendered document so callers can account for dropped boxes.
pub fn write_voc_file(
    xml_path: &Path,
    boxes: &[LabeledBox],
    image_height: u32,
    image_width: u32,
    image_filename: &str,
) -> Result<VocDocument, VocAugError> {
    let document = render_voc(boxes, image_height, image_width, image_filename);
    fs::write(xml_path, &document.xml).map_err(VocAugError::Io)?;
    Ok(document)
}

/// Returns the annotation path paired with an image path.
///
/// The image extension is replaced by `xml`: `a/b.jpg` becomes `a/b.xml`.
pub fn xml_path_for_image(image_path: &Path) -> PathBuf {
    image_path.with_extension("xml")
}

fn parse_optional_u32(node: Node<'_, '_>, tag: &str, path: &Path) -> Result<u32, VocAugError> {
    match optional_child_text(node, tag) {
        None => Ok(0),
        Some(raw) => raw.parse::<u32>().map_err(|_| VocAugError::VocXmlParse {
            path: path.to_path_buf(),
            message: format!("invalid <{tag}> value '{raw}' in <size>; expected u32"),
        }),
    }
}

fn parse_required_f64(
    node: Node<'_, '_>,
    tag: &str,
    path: &Path,
    context: &str,
) -> Result<f64, VocAugError> {
    let raw = optional_child_text(node, tag).ok_or_else(|| VocAugError::VocXmlParse {
        path: path.to_path_buf(),
        message: format!("missing <{tag}> in {context}"),
    })?;
    raw.parse::<f64>().map_err(|_| VocAugError::VocXmlParse {
        path: path.to_path_buf(),
        message: format!(
            "invalid <{tag}> value '{raw}' in {context}; expected floating-point number"
        ),
    })
}

fn child_element<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|child| child.is_element() && child.tag_name().name() == tag)
}

fn optional_child_text(node: Node<'_, '_>, tag: &str) -> Option<String> {
    child_element(node, tag)
        .and_then(|child| child.text())
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(ToOwned::to_owned)
}

fn xml_escape(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

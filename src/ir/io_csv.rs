//! Flat CSV export of bounding boxes.
//!
//! One line per box, no header:
//!
//! ```text
//! image_path,x_min,y_min,x_max,y_max,label
//! ```
//!
//! Coordinates are truncated to integers. An image without boxes still gets
//! one line, `image_path,,,,,`, so loaders that key rows by image path see
//! every image.
//!
//! Files are opened in append mode. Nothing coordinates concurrent writers
//! to the same path; callers that write in parallel must serialize access.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use serde::Serialize;
use walkdir::WalkDir;

use super::io_voc_xml::read_voc_boxes;
use super::LabeledBox;
use crate::error::VocAugError;

/// Name of the CSV written by [`export_dir_csv`] when no path is given.
pub const DEFAULT_CSV_FILE_NAME: &str = "training.csv";

/// A single CSV row. `None` fields are written as empty strings.
#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    image_path: &'a str,
    xmin: Option<i64>,
    ymin: Option<i64>,
    xmax: Option<i64>,
    ymax: Option<i64>,
    label: Option<&'a str>,
}

impl<'a> CsvRow<'a> {
    fn empty(image_path: &'a str) -> Self {
        Self {
            image_path,
            xmin: None,
            ymin: None,
            xmax: None,
            ymax: None,
            label: None,
        }
    }

    fn from_box(image_path: &'a str, labeled: &'a LabeledBox) -> Self {
        let bbox = labeled.bbox.truncated();
        Self {
            image_path,
            xmin: Some(bbox.xmin() as i64),
            ymin: Some(bbox.ymin() as i64),
            xmax: Some(bbox.xmax() as i64),
            ymax: Some(bbox.ymax() as i64),
            label: Some(&labeled.label),
        }
    }
}

/// Append the rows for one image to `csv_path`, creating the file if needed.
///
/// # Errors
/// Returns an error if the file cannot be opened or written.
pub fn append_csv_rows(
    csv_path: &Path,
    image_path: &str,
    boxes: &[LabeledBox],
) -> Result<(), VocAugError> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(csv_path)
        .map_err(VocAugError::Io)?;

    let writer = write_rows(file, image_path, boxes, csv_path)?;
    writer
        .into_inner()
        .map_err(|e| VocAugError::Io(e.into_error()))?
        .flush()
        .map_err(VocAugError::Io)
}

/// Render the rows for one image as a string.
///
/// Produces exactly the bytes [`append_csv_rows`] would append.
pub fn csv_rows_to_string(image_path: &str, boxes: &[LabeledBox]) -> Result<String, VocAugError> {
    let dummy_path = Path::new("<string>");
    let writer = write_rows(Vec::new(), image_path, boxes, dummy_path)?;
    let bytes = writer
        .into_inner()
        .map_err(|e| VocAugError::Io(e.into_error()))?;

    String::from_utf8(bytes).map_err(|e| VocAugError::InvalidInput {
        message: format!("Invalid UTF-8 in CSV output: {}", e),
    })
}

/// Append rows for every `*.xml` directly inside `dir` to `csv_path`.
///
/// Files are visited in file-name order. The image path of each row is the
/// XML path with its extension replaced by `image_ext`. Malformed XML files
/// contribute a single empty row, like images without boxes.
///
/// Returns the number of annotation files exported.
pub fn export_dir_csv(dir: &Path, csv_path: &Path, image_ext: &str) -> Result<usize, VocAugError> {
    let mut exported = 0;

    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|source| VocAugError::SourceTraversal {
            path: dir.to_path_buf(),
            message: source.to_string(),
        })?;
        let path = entry.path();
        let is_xml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("xml"));
        if !entry.file_type().is_file() || !is_xml {
            continue;
        }

        let boxes = read_voc_boxes(path);
        let image_path = path.with_extension(image_ext);
        append_csv_rows(csv_path, &image_path.to_string_lossy(), &boxes)?;
        exported += 1;
    }

    Ok(exported)
}

fn write_rows<W: Write>(
    sink: W,
    image_path: &str,
    boxes: &[LabeledBox],
    csv_path: &Path,
) -> Result<csv::Writer<W>, VocAugError> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(sink);

    let rows: Vec<CsvRow<'_>> = if boxes.is_empty() {
        vec![CsvRow::empty(image_path)]
    } else {
        boxes
            .iter()
            .map(|labeled| CsvRow::from_box(image_path, labeled))
            .collect()
    };

    for row in rows {
        csv_writer
            .serialize(&row)
            .map_err(|source| VocAugError::CsvWrite {
                path: csv_path.to_path_buf(),
                source,
            })?;
    }

    Ok(csv_writer)
}

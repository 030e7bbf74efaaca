//! Batch augmentation of VOC-annotated images.
//!
//! The unit of work is one (source image, augmentation index) pair. Each unit
//! loads the image and its paired XML, runs a freshly built [`Pipeline`] over
//! them, and writes `<stem>_<index>.<ext>` plus `<stem>_<index>.xml` into the
//! output directory. Units are independent: a unit that fails is logged and
//! counted, and the batch moves on.
//!
//! [`Pipeline`]: crate::pipeline::Pipeline

mod report;

pub use report::{AugmentReport, UnitFailure, UnitOutcome};

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, error, info, warn};
use walkdir::WalkDir;

use crate::error::VocAugError;
use crate::ir::io_voc_xml::{read_voc_boxes, write_voc_file, xml_path_for_image};
use crate::pipeline::{PipelineConfig, Sample, Transform};

/// Name of the output directory created inside the source directory when no
/// output directory is given.
pub const DEFAULT_OUTPUT_DIR_NAME: &str = "augmentations";

/// Number of augmentations produced per source image by default.
pub const DEFAULT_COUNT: usize = 5;

/// Image extensions picked up from the source directory (case-insensitive).
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Options for [`augment_dir`].
#[derive(Clone, Debug)]
pub struct AugmentOptions {
    /// A directory of images, or a single image file.
    pub source: PathBuf,

    /// Where outputs go; defaults to `<source dir>/augmentations`.
    pub output_dir: Option<PathBuf>,

    /// Augmentations per source image.
    pub count: usize,

    /// Base seed. Unit `k` is seeded with `seed + k`. A random base seed is
    /// drawn (and logged) when absent.
    pub seed: Option<u64>,

    pub config: PipelineConfig,
}

impl AugmentOptions {
    /// Options with the default count and pipeline and no fixed seed.
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            output_dir: None,
            count: DEFAULT_COUNT,
            seed: None,
            config: PipelineConfig::default(),
        }
    }

    /// Returns the directory outputs are written to.
    pub fn resolved_output_dir(&self) -> PathBuf {
        if let Some(dir) = &self.output_dir {
            return dir.clone();
        }
        let base = if self.source.is_file() {
            self.source.parent().unwrap_or_else(|| Path::new("."))
        } else {
            self.source.as_path()
        };
        base.join(DEFAULT_OUTPUT_DIR_NAME)
    }
}

/// Returns true if `path` has one of [`IMAGE_EXTENSIONS`].
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .is_some_and(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|supported| ext.eq_ignore_ascii_case(supported))
        })
}

/// Lists the supported images directly inside `source`, sorted by file name.
///
/// A single image file is returned as-is. Subdirectories are not descended.
pub fn discover_images(source: &Path) -> Result<Vec<PathBuf>, VocAugError> {
    if source.is_file() {
        return if is_supported_image(source) {
            Ok(vec![source.to_path_buf()])
        } else {
            Err(VocAugError::InvalidInput {
                message: format!(
                    "{} is not a supported image (expected .jpg, .jpeg or .png)",
                    source.display()
                ),
            })
        };
    }

    let mut images = Vec::new();
    for entry in WalkDir::new(source).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|source_err| VocAugError::SourceTraversal {
            path: source.to_path_buf(),
            message: source_err.to_string(),
        })?;
        if entry.file_type().is_file() && is_supported_image(entry.path()) {
            images.push(entry.into_path());
        }
    }
    Ok(images)
}

/// Returns the output file name for augmentation `index` of `image_path`:
/// `photo.jpg` becomes `photo_3.jpg`.
pub fn augmented_file_name(image_path: &Path, index: usize) -> Option<String> {
    let stem = image_path.file_stem()?.to_str()?;
    match image_path.extension().and_then(OsStr::to_str) {
        Some(ext) => Some(format!("{stem}_{index}.{ext}")),
        None => Some(format!("{stem}_{index}")),
    }
}

/// Runs `count` augmentations for every image of the source.
///
/// The config is validated before any unit runs, so a bad config aborts the
/// whole batch. Unit failures are logged and collected in the report.
///
/// # Errors
/// Returns an error for an invalid config, an unreadable source, or an
/// output directory that cannot be created.
pub fn augment_dir(options: &AugmentOptions) -> Result<AugmentReport, VocAugError> {
    options.config.validate()?;

    let images = discover_images(&options.source)?;
    let output_dir = options.resolved_output_dir();
    fs::create_dir_all(&output_dir)?;

    let base_seed = options.seed.unwrap_or_else(rand::random);
    info!(
        source = %options.source.display(),
        output = %output_dir.display(),
        images = images.len(),
        count = options.count,
        seed = base_seed,
        "starting augmentation"
    );

    let mut report = AugmentReport::new(output_dir.clone());
    report.images = images.len();

    let mut unit = 0u64;
    for image_path in &images {
        for index in 0..options.count {
            let mut rng = StdRng::seed_from_u64(base_seed.wrapping_add(unit));
            unit += 1;

            match augment_image(image_path, &output_dir, index, &options.config, &mut rng) {
                Ok(outcome) => {
                    debug!(
                        image = %outcome.image_path.display(),
                        boxes = outcome.boxes_written,
                        dropped = outcome.boxes_dropped,
                        "wrote augmentation"
                    );
                    report.record_success(&outcome);
                }
                Err(err) => {
                    error!(image = %image_path.display(), index, "augmentation failed: {err}");
                    report.record_failure(UnitFailure {
                        image_path: image_path.clone(),
                        index,
                        message: err.to_string(),
                    });
                }
            }
        }
    }

    info!(
        attempted = report.attempted,
        succeeded = report.succeeded,
        failed = report.failures.len(),
        "augmentation finished"
    );
    Ok(report)
}

/// Produces augmentation `index` of one image with a pipeline built from
/// `config` for that image's size.
///
/// # Errors
/// Returns an error if the image cannot be decoded, the config is invalid,
/// or an output file cannot be written. A missing or malformed XML is not an
/// error: the image is augmented with zero boxes.
pub fn augment_image<R: Rng + ?Sized>(
    image_path: &Path,
    output_dir: &Path,
    index: usize,
    config: &PipelineConfig,
    rng: &mut R,
) -> Result<UnitOutcome, VocAugError> {
    let sample = load_sample(image_path)?;
    let (height, width) = sample.dimensions();
    let pipeline = config.build(height, width)?;
    augment_sample(&pipeline, sample, image_path, output_dir, index, rng)
}

/// Runs any transform over one loaded sample and writes the output pair.
pub fn augment_sample<T: Transform, R: Rng + ?Sized>(
    transform: &T,
    sample: Sample,
    image_path: &Path,
    output_dir: &Path,
    index: usize,
    rng: &mut R,
) -> Result<UnitOutcome, VocAugError> {
    let file_name =
        augmented_file_name(image_path, index).ok_or_else(|| VocAugError::InvalidInput {
            message: format!("image path {} has no usable file name", image_path.display()),
        })?;
    let out_image_path = output_dir.join(&file_name);
    let out_xml_path = xml_path_for_image(&out_image_path);

    let input_boxes = sample.boxes.len();
    let augmented = transform.apply(sample, rng);
    let (height, width) = augmented.dimensions();
    let filtered = input_boxes - augmented.boxes.len().min(input_boxes);

    // Image first: an XML file is only ever written next to its image.
    augmented
        .image
        .save(&out_image_path)
        .map_err(|source| VocAugError::ImageWrite {
            path: out_image_path.clone(),
            source,
        })?;
    let document =
        match write_voc_file(&out_xml_path, &augmented.boxes, height, width, &file_name) {
            Ok(document) => document,
            Err(err) => {
                if let Err(cleanup) = fs::remove_file(&out_image_path) {
                    warn!(
                        path = %out_image_path.display(),
                        error = %cleanup,
                        "failed to remove image after annotation write failed"
                    );
                }
                return Err(err);
            }
        };

    Ok(UnitOutcome {
        image_path: out_image_path,
        xml_path: out_xml_path,
        height,
        width,
        boxes_written: document.written,
        boxes_dropped: document.dropped + filtered,
    })
}

/// Decodes an image as RGB and reads its paired annotation, fail-soft.
pub fn load_sample(image_path: &Path) -> Result<Sample, VocAugError> {
    let image = image::open(image_path)
        .map_err(|source| VocAugError::ImageRead {
            path: image_path.to_path_buf(),
            source,
        })?
        .to_rgb8();
    let boxes = read_voc_boxes(&xml_path_for_image(image_path));
    Ok(Sample::new(image, boxes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn supported_extensions_ignore_case() {
        assert!(is_supported_image(Path::new("a/b.jpg")));
        assert!(is_supported_image(Path::new("a/b.JPEG")));
        assert!(is_supported_image(Path::new("b.Png")));
        assert!(!is_supported_image(Path::new("b.xml")));
        assert!(!is_supported_image(Path::new("jpg")));
    }

    #[test]
    fn output_names_keep_extension() {
        assert_eq!(
            augmented_file_name(Path::new("/data/photo.JPG"), 3).as_deref(),
            Some("photo_3.JPG")
        );
        assert_eq!(
            augmented_file_name(Path::new("a.b.png"), 0).as_deref(),
            Some("a.b_0.png")
        );
    }

    #[test]
    fn default_output_dir_is_inside_source() {
        let options = AugmentOptions::new("/no/such/dir");
        assert_eq!(
            options.resolved_output_dir(),
            PathBuf::from("/no/such/dir/augmentations")
        );

        let mut explicit = AugmentOptions::new("/no/such/dir");
        explicit.output_dir = Some(PathBuf::from("/tmp/out"));
        assert_eq!(explicit.resolved_output_dir(), PathBuf::from("/tmp/out"));
    }

    #[test]
    fn discovery_is_flat_and_sorted() {
        let temp = tempfile::tempdir().expect("create temp dir");
        for name in ["b.png", "a.jpg", "c.txt", "a.xml"] {
            fs::write(temp.path().join(name), b"").expect("write file");
        }
        fs::create_dir(temp.path().join("nested")).expect("create dir");
        fs::write(temp.path().join("nested/d.jpg"), b"").expect("write file");

        let images = discover_images(temp.path()).expect("discover");
        let names: Vec<_> = images
            .iter()
            .map(|p| p.file_name().and_then(OsStr::to_str).unwrap_or_default())
            .collect();
        assert_eq!(names, vec!["a.jpg", "b.png"]);
    }

    #[test]
    fn single_file_source_must_be_an_image() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let xml = temp.path().join("a.xml");
        fs::write(&xml, b"<annotation/>").expect("write file");
        assert!(matches!(
            discover_images(&xml),
            Err(VocAugError::InvalidInput { .. })
        ));
    }

    #[test]
    fn failed_image_write_leaves_no_annotation() {
        let temp = tempfile::tempdir().expect("create temp dir");
        // A directory where the output image should go makes the save fail.
        fs::create_dir(temp.path().join("a_0.png")).expect("create dir");

        let sample = Sample::new(
            image::RgbImage::new(8, 8),
            vec![crate::ir::LabeledBox::from_xyxy(1.0, 1.0, 4.0, 4.0, "a")],
        );
        let err = augment_sample(
            &crate::pipeline::Pipeline::default(),
            sample,
            Path::new("src/a.png"),
            temp.path(),
            0,
            &mut StdRng::seed_from_u64(0),
        )
        .unwrap_err();

        assert!(matches!(err, VocAugError::ImageWrite { .. }));
        assert!(!temp.path().join("a_0.xml").exists());
    }
}

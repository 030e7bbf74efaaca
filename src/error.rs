use std::path::PathBuf;
use thiserror::Error;

/// The main error type for vocaug operations.
#[derive(Debug, Error)]
pub enum VocAugError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse VOC XML {path}: {message}")]
    VocXmlParse { path: PathBuf, message: String },

    #[error("Failed to read image {path}: {source}")]
    ImageRead {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to write image {path}: {source}")]
    ImageWrite {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to write CSV to {path}: {source}")]
    CsvWrite {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Failed to parse pipeline config {path}: {message}")]
    PipelineConfigParse { path: PathBuf, message: String },

    #[error("Failed to write pipeline config {path}: {message}")]
    PipelineConfigWrite { path: PathBuf, message: String },

    #[error("Invalid pipeline config: {message}")]
    PipelineConfigInvalid { message: String },

    #[error("Unsupported pipeline config version {found} (supported: {supported})")]
    UnsupportedConfigVersion { found: u32, supported: u32 },

    #[error("Unsupported pipeline config format for {path} (expected .json, .yaml or .yml)")]
    UnsupportedConfigFormat { path: PathBuf },

    #[error("Failed to load font {path}")]
    FontLoad { path: PathBuf },

    #[error("Failed to list images under {path}: {message}")]
    SourceTraversal { path: PathBuf, message: String },


    #[error("Validation failed: {error_count} error(s), {warning_count} warning(s)")]
    ValidationFailed {
        error_count: usize,
        warning_count: usize,
    },

    #[error("All {attempted} augmentation unit(s) failed")]
    BatchFailed { attempted: usize },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },
}

impl VocAugError {
    /// Returns true for errors that invalidate the whole run rather than a
    /// single (image, index) unit.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            VocAugError::PipelineConfigParse { .. }
                | VocAugError::PipelineConfigInvalid { .. }
                | VocAugError::UnsupportedConfigVersion { .. }
                | VocAugError::UnsupportedConfigFormat { .. }
        )
    }
}

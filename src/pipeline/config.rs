//! Versioned, persisted pipeline configuration.
//!
//! A configuration lists step types and their parameters; it never stores
//! runtime state. Sizes are relative to the image (fractions of its height,
//! scale factors), so one document can be reused across images of different
//! sizes. The document is JSON or YAML depending on the file extension:
//!
//! ```json
//! {
//!   "version": 1,
//!   "bbox_params": { "min_area": 0.0, "min_visibility": 0.0 },
//!   "steps": [
//!     { "type": "random_sized_crop", "min_height_frac": 0.25, "max_height_frac": 0.5,
//!       "output_scale": 0.5, "w2h_ratio": null, "p": 0.5 },
//!     { "type": "rotate", "limit_degrees": 3.0, "p": 0.5 },
//!     { "type": "blur", "blur_limit": 2, "p": 0.5 },
//!     { "type": "brightness", "limit": 0.2, "p": 0.5 }
//!   ]
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{
    BboxParams, Blur, Brightness, Pipeline, RandomSizedCrop, Rotate, ScheduledStep, Step,
    MAX_BLUR_LIMIT,
};
use crate::error::VocAugError;

/// The only configuration version this build reads and writes.
pub const PIPELINE_CONFIG_VERSION: u32 = 1;

/// Serializable description of a [`Pipeline`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub version: u32,
    #[serde(default)]
    pub bbox_params: BboxParams,
    pub steps: Vec<StepConfig>,
}

/// One step of a [`PipelineConfig`], tagged by `type`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StepConfig {
    /// Random window whose height is a fraction of the image height,
    /// resized to `output_scale` times the image size. `w2h_ratio` defaults
    /// to the image aspect ratio.
    RandomSizedCrop {
        min_height_frac: f64,
        max_height_frac: f64,
        output_scale: f64,
        #[serde(default)]
        w2h_ratio: Option<f64>,
        p: f64,
    },
    Rotate {
        limit_degrees: f64,
        p: f64,
    },
    Blur {
        blur_limit: u32,
        p: f64,
    },
    Brightness {
        limit: f64,
        p: f64,
    },
}

impl StepConfig {
    /// Returns the activation probability.
    pub fn probability(&self) -> f64 {
        match self {
            StepConfig::RandomSizedCrop { p, .. }
            | StepConfig::Rotate { p, .. }
            | StepConfig::Blur { p, .. }
            | StepConfig::Brightness { p, .. } => *p,
        }
    }

    /// Replaces the activation probability.
    pub fn set_probability(&mut self, value: f64) {
        match self {
            StepConfig::RandomSizedCrop { p, .. }
            | StepConfig::Rotate { p, .. }
            | StepConfig::Blur { p, .. }
            | StepConfig::Brightness { p, .. } => *p = value,
        }
    }

    /// Returns the `type` tag of the step.
    pub fn type_name(&self) -> &'static str {
        match self {
            StepConfig::RandomSizedCrop { .. } => "random_sized_crop",
            StepConfig::Rotate { .. } => "rotate",
            StepConfig::Blur { .. } => "blur",
            StepConfig::Brightness { .. } => "brightness",
        }
    }

    fn validate(&self, index: usize) -> Result<(), VocAugError> {
        let invalid = |message: String| VocAugError::PipelineConfigInvalid {
            message: format!("step {index} ({}): {message}", self.type_name()),
        };

        let p = self.probability();
        if !(0.0..=1.0).contains(&p) {
            return Err(invalid(format!("p must be in [0, 1], got {p}")));
        }

        match self {
            StepConfig::RandomSizedCrop {
                min_height_frac,
                max_height_frac,
                output_scale,
                w2h_ratio,
                ..
            } => {
                if !(*min_height_frac > 0.0 && min_height_frac <= max_height_frac && *max_height_frac <= 1.0) {
                    return Err(invalid(format!(
                        "height fractions must satisfy 0 < min <= max <= 1, got {min_height_frac}..{max_height_frac}"
                    )));
                }
                if !(output_scale.is_finite() && *output_scale > 0.0) {
                    return Err(invalid(format!(
                        "output_scale must be positive, got {output_scale}"
                    )));
                }
                if let Some(ratio) = w2h_ratio {
                    if !(ratio.is_finite() && *ratio > 0.0) {
                        return Err(invalid(format!("w2h_ratio must be positive, got {ratio}")));
                    }
                }
            }
            StepConfig::Rotate { limit_degrees, .. } => {
                if !(limit_degrees.is_finite() && (0.0..=180.0).contains(limit_degrees)) {
                    return Err(invalid(format!(
                        "limit_degrees must be in [0, 180], got {limit_degrees}"
                    )));
                }
            }
            StepConfig::Blur { blur_limit, .. } => {
                if *blur_limit > MAX_BLUR_LIMIT {
                    return Err(invalid(format!(
                        "blur_limit must be at most {MAX_BLUR_LIMIT}, got {blur_limit}"
                    )));
                }
            }
            StepConfig::Brightness { limit, .. } => {
                if !(0.0..=1.0).contains(limit) {
                    return Err(invalid(format!("limit must be in [0, 1], got {limit}")));
                }
            }
        }

        Ok(())
    }

    fn resolve(&self, height: u32, width: u32) -> ScheduledStep {
        let (h, w) = (height as f64, width as f64);
        let step = match *self {
            StepConfig::RandomSizedCrop {
                min_height_frac,
                max_height_frac,
                output_scale,
                w2h_ratio,
                ..
            } => {
                let aspect = if height == 0 { 1.0 } else { w / h };
                Step::RandomSizedCrop(RandomSizedCrop::new(
                    ((min_height_frac * h) as u32).max(1),
                    ((max_height_frac * h) as u32).max(1),
                    ((output_scale * h) as u32).max(1),
                    ((output_scale * w) as u32).max(1),
                    w2h_ratio.unwrap_or(aspect),
                ))
            }
            StepConfig::Rotate { limit_degrees, .. } => Step::Rotate(Rotate::new(limit_degrees)),
            StepConfig::Blur { blur_limit, .. } => Step::Blur(Blur::new(blur_limit)),
            StepConfig::Brightness { limit, .. } => Step::Brightness(Brightness::new(limit)),
        };

        ScheduledStep {
            p: self.probability(),
            step,
        }
    }
}

impl Default for PipelineConfig {
    /// Crop to a quarter-to-half of the height and halve the output size,
    /// rotate by up to 3 degrees, light blur and brightness jitter; each step
    /// fires with probability 0.5. No area or visibility filtering.
    fn default() -> Self {
        Self {
            version: PIPELINE_CONFIG_VERSION,
            bbox_params: BboxParams::default(),
            steps: vec![
                StepConfig::RandomSizedCrop {
                    min_height_frac: 0.25,
                    max_height_frac: 0.5,
                    output_scale: 0.5,
                    w2h_ratio: None,
                    p: 0.5,
                },
                StepConfig::Rotate {
                    limit_degrees: 3.0,
                    p: 0.5,
                },
                StepConfig::Blur {
                    blur_limit: 2,
                    p: 0.5,
                },
                StepConfig::Brightness {
                    limit: 0.2,
                    p: 0.5,
                },
            ],
        }
    }
}

impl PipelineConfig {
    /// Checks the version, every step and the box thresholds.
    pub fn validate(&self) -> Result<(), VocAugError> {
        if self.version != PIPELINE_CONFIG_VERSION {
            return Err(VocAugError::UnsupportedConfigVersion {
                found: self.version,
                supported: PIPELINE_CONFIG_VERSION,
            });
        }

        let params = &self.bbox_params;
        if !(params.min_area.is_finite() && params.min_area >= 0.0) {
            return Err(VocAugError::PipelineConfigInvalid {
                message: format!("min_area must be >= 0, got {}", params.min_area),
            });
        }
        if !(0.0..=1.0).contains(&params.min_visibility) {
            return Err(VocAugError::PipelineConfigInvalid {
                message: format!(
                    "min_visibility must be in [0, 1], got {}",
                    params.min_visibility
                ),
            });
        }

        for (index, step) in self.steps.iter().enumerate() {
            step.validate(index)?;
        }
        Ok(())
    }

    /// Builds a runnable pipeline for an image of `height` x `width` pixels.
    ///
    /// # Errors
    /// Returns a configuration error if [`validate`](Self::validate) fails.
    pub fn build(&self, height: u32, width: u32) -> Result<Pipeline, VocAugError> {
        self.validate()?;
        Ok(Pipeline::new(
            self.steps
                .iter()
                .map(|step| step.resolve(height, width))
                .collect(),
            self.bbox_params,
        ))
    }

    /// Parses a JSON configuration document.
    pub fn from_json_str(json: &str) -> Result<Self, VocAugError> {
        parse_config(json, ConfigFormat::Json, Path::new("<string>"))
    }

    /// Parses a YAML configuration document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, VocAugError> {
        parse_config(yaml, ConfigFormat::Yaml, Path::new("<string>"))
    }

    /// Renders the configuration as pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String, VocAugError> {
        render_config(self, ConfigFormat::Json, Path::new("<string>"))
    }
}

/// Reads and validates a configuration file (`.json`, `.yaml` or `.yml`).
///
/// # Errors
/// Every failure is a configuration error: unreadable file, unknown
/// extension, malformed document, unsupported version or invalid parameters.
pub fn read_pipeline_config(path: &Path) -> Result<PipelineConfig, VocAugError> {
    let format = ConfigFormat::from_path(path)?;
    let text = fs::read_to_string(path).map_err(|source| VocAugError::PipelineConfigParse {
        path: path.to_path_buf(),
        message: source.to_string(),
    })?;
    parse_config(&text, format, path)
}

/// Writes a configuration file, choosing JSON or YAML from the extension.
pub fn write_pipeline_config(path: &Path, config: &PipelineConfig) -> Result<(), VocAugError> {
    let format = ConfigFormat::from_path(path)?;
    let text = render_config(config, format, path)?;
    fs::write(path, text).map_err(|source| VocAugError::PipelineConfigWrite {
        path: path.to_path_buf(),
        message: source.to_string(),
    })
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ConfigFormat {
    Json,
    Yaml,
}

impl ConfigFormat {
    fn from_path(path: &Path) -> Result<Self, VocAugError> {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("json") => Ok(ConfigFormat::Json),
            Some("yaml") | Some("yml") => Ok(ConfigFormat::Yaml),
            _ => Err(VocAugError::UnsupportedConfigFormat {
                path: path.to_path_buf(),
            }),
        }
    }
}

/// Only the version, read before the rest so that a newer document is
/// reported as a version mismatch rather than as unknown fields.
#[derive(Deserialize)]
struct VersionProbe {
    version: u32,
}

fn parse_config(text: &str, format: ConfigFormat, path: &Path) -> Result<PipelineConfig, VocAugError> {
    let parse_error = |message: String| VocAugError::PipelineConfigParse {
        path: path.to_path_buf(),
        message,
    };

    let probe: VersionProbe = match format {
        ConfigFormat::Json => serde_json::from_str(text).map_err(|e| parse_error(e.to_string()))?,
        ConfigFormat::Yaml => serde_yaml::from_str(text).map_err(|e| parse_error(e.to_string()))?,
    };
    if probe.version != PIPELINE_CONFIG_VERSION {
        return Err(VocAugError::UnsupportedConfigVersion {
            found: probe.version,
            supported: PIPELINE_CONFIG_VERSION,
        });
    }

    let config: PipelineConfig = match format {
        ConfigFormat::Json => serde_json::from_str(text).map_err(|e| parse_error(e.to_string()))?,
        ConfigFormat::Yaml => serde_yaml::from_str(text).map_err(|e| parse_error(e.to_string()))?,
    };
    config.validate()?;
    Ok(config)
}

fn render_config(
    config: &PipelineConfig,
    format: ConfigFormat,
    path: &Path,
) -> Result<String, VocAugError> {
    let write_error = |message: String| VocAugError::PipelineConfigWrite {
        path: path.to_path_buf(),
        message,
    };

    match format {
        ConfigFormat::Json => serde_json::to_string_pretty(config)
            .map(|mut text| {
                text.push('\n');
                text
            })
            .map_err(|e| write_error(e.to_string())),
        ConfigFormat::Yaml => serde_yaml::to_string(config).map_err(|e| write_error(e.to_string())),
    }
}

//! Joint image and bounding-box transforms.
//!
//! A [`Transform`] takes a [`Sample`] (image plus labeled boxes) and returns a
//! new one. Geometric transforms move the boxes along with the pixels;
//! photometric transforms leave the boxes alone.
//!
//! [`Pipeline`] is an ordered list of steps, each with its own activation
//! probability. Steps are rolled independently and applied cumulatively.
//! After every geometric step that fires, and once more at the end of the
//! pipeline, boxes are clipped to the current image and filtered by the
//! pipeline's [`BboxParams`]. That filtering happens here, before (and
//! independently of) the bounds validator that runs when the annotation is
//! written.
//!
//! Pipelines are built from a [`PipelineConfig`], which is the persisted,
//! versioned description of the steps.

mod config;
mod crop;
mod filter;
mod photometric;
mod rotate;

pub use config::{
    read_pipeline_config, write_pipeline_config, PipelineConfig, StepConfig,
    PIPELINE_CONFIG_VERSION,
};
pub use crop::RandomSizedCrop;
pub use filter::{filter_boxes, BboxParams};
pub use photometric::{Blur, Brightness, MAX_BLUR_LIMIT};
pub use rotate::Rotate;

use image::RgbImage;
use rand::{Rng, RngExt};
use tracing::debug;

use crate::ir::LabeledBox;

/// An image together with the boxes annotated on it.
#[derive(Clone, Debug, PartialEq)]
pub struct Sample {
    pub image: RgbImage,
    pub boxes: Vec<LabeledBox>,
}

impl Sample {
    /// Creates a new sample.
    pub fn new(image: RgbImage, boxes: Vec<LabeledBox>) -> Self {
        Self { image, boxes }
    }

    /// Returns `(height, width)` of the image.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.image.height(), self.image.width())
    }
}

/// A transform applied jointly to an image and its boxes.
pub trait Transform {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Applies the transform, drawing any randomness from `rng`.
    fn apply<R: Rng + ?Sized>(&self, sample: Sample, rng: &mut R) -> Sample;
}

/// One concrete transform step.
#[derive(Clone, Debug, PartialEq)]
pub enum Step {
    RandomSizedCrop(RandomSizedCrop),
    Rotate(Rotate),
    Blur(Blur),
    Brightness(Brightness),
}

impl Step {
    /// Returns true if the step moves pixels (and therefore boxes).
    pub fn is_geometric(&self) -> bool {
        matches!(self, Step::RandomSizedCrop(_) | Step::Rotate(_))
    }
}

impl Transform for Step {
    fn name(&self) -> &'static str {
        match self {
            Step::RandomSizedCrop(t) => t.name(),
            Step::Rotate(t) => t.name(),
            Step::Blur(t) => t.name(),
            Step::Brightness(t) => t.name(),
        }
    }

    fn apply<R: Rng + ?Sized>(&self, sample: Sample, rng: &mut R) -> Sample {
        match self {
            Step::RandomSizedCrop(t) => t.apply(sample, rng),
            Step::Rotate(t) => t.apply(sample, rng),
            Step::Blur(t) => t.apply(sample, rng),
            Step::Brightness(t) => t.apply(sample, rng),
        }
    }
}

/// A step together with its activation probability.
#[derive(Clone, Debug, PartialEq)]
pub struct ScheduledStep {
    /// Probability in `[0, 1]` that the step fires on a given call.
    pub p: f64,
    pub step: Step,
}

/// An ordered, probabilistic list of transform steps.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Pipeline {
    pub steps: Vec<ScheduledStep>,
    pub bbox_params: BboxParams,
}

impl Pipeline {
    /// Creates a pipeline from scheduled steps.
    pub fn new(steps: Vec<ScheduledStep>, bbox_params: BboxParams) -> Self {
        Self { steps, bbox_params }
    }

    fn filter(&self, mut sample: Sample, after: &'static str) -> Sample {
        let before = sample.boxes.len();
        let (height, width) = sample.dimensions();
        sample.boxes = filter_boxes(sample.boxes, height, width, &self.bbox_params);
        if sample.boxes.len() != before {
            debug!(
                after,
                dropped = before - sample.boxes.len(),
                "boxes filtered"
            );
        }
        sample
    }
}

impl Transform for Pipeline {
    fn name(&self) -> &'static str {
        "pipeline"
    }

    fn apply<R: Rng + ?Sized>(&self, mut sample: Sample, rng: &mut R) -> Sample {
        for scheduled in &self.steps {
            if !rng.random_bool(scheduled.p) {
                debug!(step = scheduled.step.name(), "skipped");
                continue;
            }

            debug!(step = scheduled.step.name(), "applied");
            sample = scheduled.step.apply(sample, rng);

            if scheduled.step.is_geometric() {
                sample = self.filter(sample, scheduled.step.name());
            }
        }

        // Thresholds hold even when no geometric step fired.
        self.filter(sample, self.name())
    }
}

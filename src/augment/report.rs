//! Batch summary for augmentation runs.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

/// What one successful unit wrote.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct UnitOutcome {
    pub image_path: PathBuf,
    pub xml_path: PathBuf,
    pub height: u32,
    pub width: u32,
    /// Objects present in the written XML.
    pub boxes_written: usize,
    /// Boxes lost to pipeline filtering or bounds validation.
    pub boxes_dropped: usize,
}

/// A unit that failed, with the reason.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct UnitFailure {
    pub image_path: PathBuf,
    pub index: usize,
    pub message: String,
}

/// Summary of an [`augment_dir`](super::augment_dir) run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct AugmentReport {
    pub output_dir: PathBuf,
    /// Source images found.
    pub images: usize,
    /// Units attempted (images x count).
    pub attempted: usize,
    pub succeeded: usize,
    pub boxes_written: usize,
    pub boxes_dropped: usize,
    pub failures: Vec<UnitFailure>,
}

impl AugmentReport {
    /// Create an empty report for a run writing into `output_dir`.
    pub fn new(output_dir: PathBuf) -> Self {
        Self {
            output_dir,
            ..Default::default()
        }
    }

    pub fn record_success(&mut self, outcome: &UnitOutcome) {
        self.attempted += 1;
        self.succeeded += 1;
        self.boxes_written += outcome.boxes_written;
        self.boxes_dropped += outcome.boxes_dropped;
    }

    pub fn record_failure(&mut self, failure: UnitFailure) {
        self.attempted += 1;
        self.failures.push(failure);
    }

    /// Returns true if units were attempted and none succeeded.
    pub fn all_failed(&self) -> bool {
        self.attempted > 0 && self.succeeded == 0
    }
}

impl fmt::Display for AugmentReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Augmented {} image(s) into {}",
            self.images,
            self.output_dir.display()
        )?;
        writeln!(
            f,
            "  {} of {} unit(s) succeeded, {} box(es) written, {} dropped",
            self.succeeded, self.attempted, self.boxes_written, self.boxes_dropped
        )?;

        if !self.failures.is_empty() {
            writeln!(f)?;
            writeln!(f, "Failures ({}):", self.failures.len())?;
            for failure in &self.failures {
                writeln!(
                    f,
                    "  - {} #{}: {}",
                    failure.image_path.display(),
                    failure.index,
                    failure.message
                )?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(written: usize, dropped: usize) -> UnitOutcome {
        UnitOutcome {
            image_path: PathBuf::from("out/a_0.jpg"),
            xml_path: PathBuf::from("out/a_0.xml"),
            height: 10,
            width: 10,
            boxes_written: written,
            boxes_dropped: dropped,
        }
    }

    #[test]
    fn counts_accumulate() {
        let mut report = AugmentReport::new(PathBuf::from("out"));
        report.record_success(&outcome(2, 1));
        report.record_success(&outcome(3, 0));
        report.record_failure(UnitFailure {
            image_path: PathBuf::from("b.jpg"),
            index: 0,
            message: "boom".into(),
        });

        assert_eq!(report.attempted, 3);
        assert_eq!(report.succeeded, 2);
        assert_eq!(report.boxes_written, 5);
        assert_eq!(report.boxes_dropped, 1);
        assert!(!report.all_failed());

        let text = report.to_string();
        assert!(text.contains("2 of 3 unit(s) succeeded"));
        assert!(text.contains("b.jpg #0: boom"));
    }

    #[test]
    fn empty_run_has_not_failed() {
        let report = AugmentReport::new(PathBuf::from("out"));
        assert!(!report.all_failed());
    }
}

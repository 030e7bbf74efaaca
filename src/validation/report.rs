//! Validation report types for structured error reporting.
//!
//! Reports are what the codec logs when it drops a box, so every issue
//! carries enough context (box index and label) to find the box again in the
//! source annotation.

use std::fmt;

/// Every issue found for one image's boxes.
#[derive(Clone, Debug, Default)]
pub struct ValidationReport {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, issue: ValidationIssue) {
        self.issues.push(issue);
    }

    pub fn extend(&mut self, issues: impl IntoIterator<Item = ValidationIssue>) {
        self.issues.extend(issues);
    }

    fn count(&self, severity: Severity) -> usize {
        self.issues.iter().filter(|i| i.severity == severity).count()
    }

    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    /// True when nothing would be dropped; warnings are allowed.
    pub fn is_ok(&self) -> bool {
        self.error_count() == 0
    }

    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// Indices of boxes with at least one error, ascending and unique.
    pub fn rejected_indices(&self) -> Vec<usize> {
        let mut indices: Vec<usize> = self
            .issues
            .iter()
            .filter(|i| i.severity == Severity::Error)
            .filter_map(|i| match &i.context {
                IssueContext::Box { index, .. } => Some(*index),
                IssueContext::Image => None,
            })
            .collect();
        indices.sort_unstable();
        indices.dedup();
        indices
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_clean() {
            return writeln!(f, "Validation passed: no issues found");
        }

        writeln!(
            f,
            "Validation completed with {} error(s) and {} warning(s):",
            self.error_count(),
            self.warning_count()
        )?;
        writeln!(f)?;
        self.issues
            .iter()
            .try_for_each(|issue| writeln!(f, "  {issue}"))
    }
}

/// One problem found with a box or with the image it belongs to.
#[derive(Clone, Debug)]
pub struct ValidationIssue {
    pub severity: Severity,
    pub code: IssueCode,
    pub message: String,
    pub context: IssueContext,
}

impl ValidationIssue {
    /// An issue that causes the box to be dropped.
    pub fn error(code: IssueCode, message: impl Into<String>, context: IssueContext) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
            context,
        }
    }

    /// An issue that is logged but leaves the box in place.
    pub fn warning(code: IssueCode, message: impl Into<String>, context: IssueContext) -> Self {
        Self {
            severity: Severity::Warning,
            ..Self::error(code, message, context)
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let severity = match self.severity {
            Severity::Error => "ERROR",
            Severity::Warning => "WARN ",
        };
        write!(f, "[{severity}] {:?} in {}: {}", self.code, self.context, self.message)
    }
}

/// The severity of a validation issue.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    /// Suspicious but still written out.
    Warning,
    /// The box is rejected.
    Error,
}

/// A stable code identifying the type of validation issue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IssueCode {
    /// A coordinate is NaN or infinite.
    BBoxNotFinite,
    /// xmin is negative or not strictly below the image width.
    XMinOutOfBounds,
    /// xmax is negative or not strictly below the image width.
    XMaxOutOfBounds,
    /// ymin is negative or not strictly below the image height.
    YMinOutOfBounds,
    /// ymax is negative or not strictly below the image height.
    YMaxOutOfBounds,
    /// xmin >= xmax.
    DegenerateWidth,
    /// ymin >= ymax.
    DegenerateHeight,
    /// The label is empty or whitespace.
    EmptyLabel,
    /// The image has a zero dimension, so no box can fit.
    InvalidImageDimensions,
}

/// Where an issue was found.
#[derive(Clone, Debug, PartialEq)]
pub enum IssueContext {
    Image,
    /// Position in document order, plus the label so the box can be found.
    Box { index: usize, label: String },
}

impl fmt::Display for IssueContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueContext::Image => write!(f, "image"),
            IssueContext::Box { index, label } => write!(f, "box {index} ('{label}')"),
        }
    }
}

//! Renderable summary derived from the aggregator state.
//!
//! The view holds no state of its own. It is recomputed from the submission
//! snapshot, the result map and the connection fault every time it is needed.
//! Exactly one of three shapes is produced: nothing yet, an error panel, or a
//! populated result list. Stale rows never appear next to an error.

use std::fmt;

use crate::aggregator::ConnectionFault;
use crate::models::{Status, Submission, TestResult};
use crate::result_map::{ResultMap, ResultTally};

pub mod diff;
pub mod render;

pub use diff::{DiffLine, DiffSpoiler};

#[derive(Debug, Clone, PartialEq)]
pub enum ResultView {
    /// No submission received yet.
    Empty,
    Error(ErrorPanel),
    Populated(PopulatedView),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorPanel {
    pub cause: String,
}

impl ErrorPanel {
    pub const TITLE: &'static str = "Error: Can't get submission results from server";
    pub const HINT: &'static str = "Please try again later.";
}

#[derive(Debug, Clone, PartialEq)]
pub struct PopulatedView {
    pub header: SubmissionHeader,
    pub rows: Vec<ResultRow>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionHeader {
    pub file: FileLabel,
    pub late: bool,
    pub elapsed: ElapsedBadge,
    pub status: Status,
    /// Only present when the caller supplied the exercise maximum grade.
    pub grade: Option<GradeBadge>,
    pub tally: ResultTally,
    pub preview: CodePreview,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileLabel {
    Named(String),
    Missing,
}

impl fmt::Display for FileLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileLabel::Named(name) => write!(f, "{name}"),
            FileLabel::Missing => write!(f, "File missing from server"),
        }
    }
}

/// Time since the submission was made.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElapsedBadge(pub f64);

impl fmt::Display for ElapsedBadge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let seconds = self.0.max(0.0) as u64;
        match seconds {
            0..60 => write!(f, "{seconds} s ago"),
            60..3_600 => write!(f, "{} min ago", seconds / 60),
            3_600..86_400 => write!(f, "{} h ago", seconds / 3_600),
            _ => write!(f, "{} d ago", seconds / 86_400),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradeBadge {
    pub grade: Option<f64>,
    pub total: f64,
}

impl fmt::Display for GradeBadge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.grade {
            Some(grade) => write!(f, "{}/{}", format_decimal(grade), format_decimal(self.total)),
            None => write!(f, "-/{}", format_decimal(self.total)),
        }
    }
}

/// Measured execution time of one test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeBadge(pub f64);

impl fmt::Display for TimeBadge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} s", self.0)
    }
}

/// On-demand action opening the submitted file. Has no effect on the data model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodePreview {
    file: Option<String>,
}

impl CodePreview {
    /// File reference to open, if the file still exists on the server.
    pub fn target(&self) -> Option<&str> {
        self.file.as_deref().filter(|file| !file.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResultRow {
    pub id: i64,
    pub name: String,
    pub time: Option<TimeBadge>,
    pub status: Status,
    pub body: RowBody,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RowBody {
    InProgress,
    Diff(DiffSpoiler),
    /// Captured output, shown verbatim.
    Output(String),
}

impl ResultView {
    /// Computes the view from the aggregator state.
    pub fn compute(
        fault: Option<&ConnectionFault>,
        submission: Option<&Submission>,
        results: &ResultMap,
        exercise_grade: Option<f64>,
    ) -> Self {
        if let Some(fault) = fault {
            return ResultView::Error(ErrorPanel {
                cause: fault.to_string(),
            });
        }
        let Some(submission) = submission else {
            return ResultView::Empty;
        };

        let header = SubmissionHeader {
            file: submission
                .file_name()
                .map(|name| FileLabel::Named(name.to_string()))
                .unwrap_or(FileLabel::Missing),
            late: submission.late,
            elapsed: ElapsedBadge(submission.created),
            status: submission.status,
            grade: exercise_grade
                .filter(|total| *total > 0.0)
                .map(|total| GradeBadge {
                    grade: submission.grade,
                    total,
                }),
            tally: results.tally(),
            preview: CodePreview {
                file: submission.file.clone(),
            },
        };
        let rows = results.iter().map(ResultRow::from_result).collect();

        ResultView::Populated(PopulatedView { header, rows })
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, ResultView::Empty)
    }

    pub fn rows(&self) -> &[ResultRow] {
        match self {
            ResultView::Populated(view) => &view.rows,
            _ => &[],
        }
    }

    /// Reveals the diff of every failed test.
    pub fn reveal_all(&mut self) {
        if let ResultView::Populated(view) = self {
            for row in &mut view.rows {
                if let RowBody::Diff(spoiler) = &mut row.body {
                    spoiler.reveal();
                }
            }
        }
    }
}

impl ResultRow {
    fn from_result(result: &TestResult) -> Self {
        let body = if result.is_in_progress() {
            RowBody::InProgress
        } else if result.status == Status::Failed {
            RowBody::Diff(DiffSpoiler::new(
                result.stdout.clone(),
                result.exercise_test.stdout.clone(),
            ))
        } else {
            RowBody::Output(result.stdout.clone())
        };

        Self {
            id: result.id,
            name: result.exercise_test.name.clone(),
            time: result.measured_time().map(TimeBadge),
            status: result.status,
            body,
        }
    }
}

/// Formats with at most two decimals, dropping trailing zeros.
fn format_decimal(value: f64) -> String {
    let formatted = format!("{value:.2}");
    formatted
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

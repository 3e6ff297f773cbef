//! Projection of channel frames into the locally owned result state.

use std::fmt;

use tracing::{debug, warn};

use crate::models::Submission;
use crate::result_map::ResultMap;
use crate::view::ResultView;
use crate::ws_message::{self, SubmissionUpdate};

/// Why results cannot be shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionFault {
    /// No access token was available, the channel was never opened.
    MissingCredential,
    /// The transport reported an error.
    Transport(String),
}

impl fmt::Display for ConnectionFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionFault::MissingCredential => write!(f, "missing access token"),
            ConnectionFault::Transport(cause) => write!(f, "transport error: {cause}"),
        }
    }
}

/// Submission snapshot and result map for one channel session.
#[derive(Debug, Default)]
pub struct ResultAggregator {
    submission: Option<Submission>,
    results: ResultMap,
    fault: Option<ConnectionFault>,
}

impl ResultAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes a text frame and applies it.
    ///
    /// Malformed frames are logged and dropped without touching the state.
    /// Returns whether anything was applied.
    pub fn apply_frame(&mut self, text: &str) -> bool {
        match ws_message::decode(text) {
            Ok(update) => self.apply(update),
            Err(err) => {
                warn!("Discarding malformed frame - {err}");
                false
            }
        }
    }

    pub fn apply(&mut self, update: SubmissionUpdate) -> bool {
        if update.is_empty() {
            debug!("Received an update without submission or test results");
            return false;
        }
        if let Some(submission) = update.submission {
            debug!("Submission is now {}", submission.status);
            self.submission = Some(submission);
        }
        if let Some(results) = update.test_results {
            for result in results {
                debug!("Test result {} is now {}", result.id, result.status);
                self.results.upsert(result);
            }
        }
        true
    }

    pub fn mark_open(&mut self) {
        self.fault = None;
    }

    pub fn mark_error(&mut self, fault: ConnectionFault) {
        self.fault = Some(fault);
    }

    /// Drops everything received so far.
    pub fn reset(&mut self) {
        self.submission = None;
        self.results.clear();
        self.fault = None;
    }

    pub fn submission(&self) -> Option<&Submission> {
        self.submission.as_ref()
    }

    pub fn results(&self) -> &ResultMap {
        &self.results
    }

    pub fn fault(&self) -> Option<&ConnectionFault> {
        self.fault.as_ref()
    }

    /// True once the submission reached a final status and no test is still running.
    pub fn is_settled(&self) -> bool {
        self.submission
            .as_ref()
            .is_some_and(|submission| submission.status.is_terminal())
            && self.results.is_settled()
    }

    pub fn view(&self, exercise_grade: Option<f64>) -> ResultView {
        ResultView::compute(
            self.fault.as_ref(),
            self.submission.as_ref(),
            &self.results,
            exercise_grade,
        )
    }
}

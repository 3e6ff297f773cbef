//! WebSocket message types for the submission channel.

use serde::{Deserialize, Serialize};

use crate::models::{Submission, TestResult};
use crate::prelude::*;

/// Frame pushed by the server on the submission channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WsServerMessage {
    pub message: SubmissionUpdate,
}

/// Incremental update. Either part may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubmissionUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submission: Option<Submission>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_results: Option<Vec<TestResult>>,
}

impl SubmissionUpdate {
    pub fn is_empty(&self) -> bool {
        self.submission.is_none() && self.test_results.is_none()
    }
}

/// Decodes a text frame into its update.
pub fn decode(text: &str) -> Result<SubmissionUpdate> {
    let frame: WsServerMessage = serde_json::from_str(text)?;
    Ok(frame.message)
}

//! Outcome of a single test case.

use serde::{Deserialize, Serialize};

use super::Status;

/// Test case definition the result refers to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseTest {
    pub name: String,
    /// Expected standard output.
    #[serde(default)]
    pub stdout: String,
}

/// One test run against the current submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    /// Unique per test within an exercise, used as the upsert key.
    pub id: i64,
    pub status: Status,
    #[serde(default)]
    pub running: bool,
    /// Execution time in seconds. Zero or negative means not measured yet.
    #[serde(default = "unmeasured")]
    pub time: f64,
    /// Captured standard output.
    #[serde(default)]
    pub stdout: String,
    pub exercise_test: ExerciseTest,
}

fn unmeasured() -> f64 {
    -1.0
}

impl TestResult {
    pub fn is_in_progress(&self) -> bool {
        self.running || self.status == Status::Running
    }

    /// Execution time, when it has actually been measured.
    pub fn measured_time(&self) -> Option<f64> {
        (self.time > 0.0).then_some(self.time)
    }
}

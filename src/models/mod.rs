//! Entities pushed by the grading service.

pub mod exercise;
pub mod status;
pub mod submission;
pub mod test_result;

pub use exercise::Exercise;
pub use status::Status;
pub use submission::Submission;
pub use test_result::{ExerciseTest, TestResult};

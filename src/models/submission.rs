//! Snapshot of a user's uploaded solution.

use serde::{Deserialize, Serialize};

use super::Status;

/// Latest known state of a submission, replaced wholesale on every push.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    /// Stored file reference. `None` when the file is missing from storage.
    #[serde(default)]
    pub file: Option<String>,
    /// Overall grading status.
    pub status: Status,
    /// Seconds elapsed since the submission, computed by the server.
    #[serde(default)]
    pub created: f64,
    /// Aggregate grade, if the exercise is graded.
    #[serde(default)]
    pub grade: Option<f64>,
    /// Submitted after the session deadline.
    #[serde(default)]
    pub late: bool,
}

impl Submission {
    /// Last path segment of the stored file reference.
    pub fn file_name(&self) -> Option<&str> {
        self.file
            .as_deref()
            .and_then(|file| file.rsplit('/').next())
            .filter(|name| !name.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission(file: Option<&str>) -> Submission {
        Submission {
            file: file.map(String::from),
            status: Status::Running,
            created: 5.0,
            grade: None,
            late: false,
        }
    }

    #[test]
    fn file_name_is_last_segment() {
        assert_eq!(submission(Some("/a/b/sol.py")).file_name(), Some("sol.py"));
        assert_eq!(submission(Some("sol.py")).file_name(), Some("sol.py"));
    }

    #[test]
    fn missing_file_has_no_name() {
        assert_eq!(submission(None).file_name(), None);
        assert_eq!(submission(Some("")).file_name(), None);
        assert_eq!(submission(Some("uploads/")).file_name(), None);
    }

    #[test]
    fn late_flag_defaults_to_false() {
        let parsed: Submission = serde_json::from_str(
            r#"{"file": null, "status": "pending", "created": 1, "grade": null}"#,
        )
        .unwrap();
        assert!(!parsed.late);
        assert_eq!(parsed.file, None);
    }
}

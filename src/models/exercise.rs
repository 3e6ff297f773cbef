//! Exercise entity as served by the REST API.

use serde::{Deserialize, Serialize};

/// The subset of an exercise the results client cares about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    /// Maximum grade. Ungraded exercises have none.
    #[serde(default)]
    pub grade: Option<f64>,
}

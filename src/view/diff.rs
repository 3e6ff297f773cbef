//! Line diff between expected and actual output.

/// One line of a diff between the expected and the actual output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffLine {
    /// Present in both outputs.
    Same(String),
    /// Expected but missing from the actual output.
    Expected(String),
    /// Produced but not expected.
    Actual(String),
}

/// Line-level diff built from the longest common subsequence of both outputs.
pub fn diff_lines(expected: &str, actual: &str) -> Vec<DiffLine> {
    let old: Vec<&str> = expected.lines().collect();
    let new: Vec<&str> = actual.lines().collect();
    let (n, m) = (old.len(), new.len());

    // lcs[i][j] is the common subsequence length of old[i..] and new[j..]
    let mut lcs = vec![vec![0usize; m + 1]; n + 1];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            lcs[i][j] = if old[i] == new[j] {
                lcs[i + 1][j + 1] + 1
            } else {
                lcs[i + 1][j].max(lcs[i][j + 1])
            };
        }
    }

    let mut lines = Vec::with_capacity(n + m);
    let (mut i, mut j) = (0, 0);
    while i < n && j < m {
        if old[i] == new[j] {
            lines.push(DiffLine::Same(old[i].to_string()));
            i += 1;
            j += 1;
        } else if lcs[i + 1][j] >= lcs[i][j + 1] {
            lines.push(DiffLine::Expected(old[i].to_string()));
            i += 1;
        } else {
            lines.push(DiffLine::Actual(new[j].to_string()));
            j += 1;
        }
    }
    lines.extend(old[i..].iter().map(|line| DiffLine::Expected(line.to_string())));
    lines.extend(new[j..].iter().map(|line| DiffLine::Actual(line.to_string())));
    lines
}

/// Actual vs expected output of a failed test, hidden until revealed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffSpoiler {
    actual: String,
    expected: String,
    revealed: bool,
}

impl DiffSpoiler {
    pub fn new(actual: impl Into<String>, expected: impl Into<String>) -> Self {
        Self {
            actual: actual.into(),
            expected: expected.into(),
            revealed: false,
        }
    }

    pub fn actual(&self) -> &str {
        &self.actual
    }

    pub fn expected(&self) -> &str {
        &self.expected
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    pub fn reveal(&mut self) {
        self.revealed = true;
    }

    pub fn toggle(&mut self) {
        self.revealed = !self.revealed;
    }

    pub fn lines(&self) -> Vec<DiffLine> {
        diff_lines(&self.expected, &self.actual)
    }
}

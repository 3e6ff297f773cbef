//! Identifier-keyed store of the latest result per test.

use std::collections::HashMap;

use crate::models::{Status, TestResult};

/// Latest [`TestResult`] per identifier, iterated in first-insertion order.
///
/// Upserting an identifier already present overwrites the stored entry without
/// moving it, so rows keep their position while results stream in.
#[derive(Debug, Clone, Default)]
pub struct ResultMap {
    entries: Vec<TestResult>,
    index: HashMap<i64, usize>,
}

/// Per-status counts over a [`ResultMap`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResultTally {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub errored: usize,
    pub pending: usize,
    pub running: usize,
}

impl ResultMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts the result or overwrites the entry with the same identifier.
    ///
    /// Returns the previous entry, if any.
    pub fn upsert(&mut self, result: TestResult) -> Option<TestResult> {
        match self.index.get(&result.id) {
            Some(&position) => Some(std::mem::replace(&mut self.entries[position], result)),
            None => {
                self.index.insert(result.id, self.entries.len());
                self.entries.push(result);
                None
            }
        }
    }

    pub fn get(&self, id: i64) -> Option<&TestResult> {
        self.index.get(&id).map(|&position| &self.entries[position])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TestResult> {
        self.entries.iter()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
    }

    pub fn tally(&self) -> ResultTally {
        self.entries
            .iter()
            .fold(ResultTally::default(), |mut tally, result| {
                tally.total += 1;
                if result.is_in_progress() {
                    tally.running += 1;
                    return tally;
                }
                match result.status {
                    Status::Success => tally.passed += 1,
                    Status::Failed => tally.failed += 1,
                    Status::Error => tally.errored += 1,
                    Status::Pending => tally.pending += 1,
                    Status::Running => tally.running += 1,
                }
                tally
            })
    }

    /// True when every known test reported a final outcome.
    pub fn is_settled(&self) -> bool {
        let tally = self.tally();
        tally.total > 0 && tally.pending == 0 && tally.running == 0
    }
}

impl<'a> IntoIterator for &'a ResultMap {
    type Item = &'a TestResult;
    type IntoIter = std::slice::Iter<'a, TestResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ExerciseTest;

    fn result(id: i64, status: Status, stdout: &str) -> TestResult {
        TestResult {
            id,
            status,
            running: false,
            time: 0.1,
            stdout: stdout.to_string(),
            exercise_test: ExerciseTest {
                name: format!("t{id}"),
                stdout: "ok".to_string(),
            },
        }
    }

    #[test]
    fn upsert_overwrites_in_place() {
        let mut map = ResultMap::new();
        map.upsert(result(1, Status::Running, ""));
        map.upsert(result(2, Status::Pending, ""));
        let previous = map.upsert(result(1, Status::Failed, "bad"));

        assert_eq!(previous.map(|r| r.status), Some(Status::Running));
        assert_eq!(map.len(), 2);
        let ids: Vec<i64> = map.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(map.get(1).map(|r| r.stdout.as_str()), Some("bad"));
    }

    #[test]
    fn last_write_wins_for_any_sequence() {
        let sequence = [
            result(3, Status::Pending, "a"),
            result(1, Status::Running, "b"),
            result(3, Status::Success, "c"),
            result(2, Status::Error, "d"),
            result(1, Status::Failed, "e"),
            result(3, Status::Failed, "f"),
        ];
        let mut map = ResultMap::new();
        for entry in sequence.iter().cloned() {
            map.upsert(entry);
        }

        assert_eq!(map.len(), 3);
        for id in [1, 2, 3] {
            let last = sequence.iter().rev().find(|r| r.id == id).unwrap();
            assert_eq!(map.get(id), Some(last));
        }
    }

    #[test]
    fn tally_counts_statuses() {
        let mut map = ResultMap::new();
        map.upsert(result(1, Status::Success, ""));
        map.upsert(result(2, Status::Failed, ""));
        map.upsert(result(3, Status::Pending, ""));
        let mut running = result(4, Status::Pending, "");
        running.running = true;
        map.upsert(running);

        let tally = map.tally();
        assert_eq!(tally.total, 4);
        assert_eq!(tally.passed, 1);
        assert_eq!(tally.failed, 1);
        assert_eq!(tally.pending, 1);
        assert_eq!(tally.running, 1);
        assert!(!map.is_settled());
    }

    #[test]
    fn settled_once_all_results_are_final() {
        let mut map = ResultMap::new();
        assert!(!map.is_settled());
        map.upsert(result(1, Status::Success, ""));
        map.upsert(result(2, Status::Error, ""));
        assert!(map.is_settled());
    }

    #[test]
    fn clear_empties_the_index() {
        let mut map = ResultMap::new();
        map.upsert(result(1, Status::Success, ""));
        map.clear();
        assert!(map.is_empty());
        assert!(map.get(1).is_none());
        map.upsert(result(1, Status::Failed, ""));
        assert_eq!(map.len(), 1);
    }
}

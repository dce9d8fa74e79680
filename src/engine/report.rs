//! Trace of a successful run.
//!
//! A report records every committed transition in the order it took
//! effect. Steps of abandoned alternatives are discarded together with
//! the attempt that produced them, so the report describes exactly the
//! accepted path through the grammar.

use crate::core::{Class, StateId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One committed transition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    /// Nesting depth; the table passed to the run is depth 0
    pub depth: usize,
    /// Name of the table the transition belongs to
    pub table: String,
    pub from: StateId,
    /// Target state, `None` when the transition halted the table
    pub to: Option<StateId>,
    /// Absolute input offset where the matched bytes start
    pub offset: usize,
    pub consumed: usize,
    pub class: Class,
    pub label: Option<String>,
}

/// Result of [`Engine::trace`](crate::Engine::trace).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Report {
    /// Total bytes consumed by the run
    pub consumed: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    steps: Vec<Step>,
}

impl Report {
    pub(crate) fn new(
        consumed: usize,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
        steps: Vec<Step>,
    ) -> Self {
        Self {
            consumed,
            started_at,
            finished_at,
            steps,
        }
    }

    /// All committed steps, nested ones before the step that consumed them.
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// States visited by the root table, starting with the initial state.
    ///
    /// A `None` entry marks an explicit halt.
    pub fn path(&self) -> Vec<Option<StateId>> {
        let mut path = vec![Some(0)];
        path.extend(self.steps.iter().filter(|s| s.depth == 0).map(|s| s.to));
        path
    }

    /// Labels of committed steps, in order, skipping unlabelled ones.
    pub fn labels(&self) -> Vec<&str> {
        self.steps
            .iter()
            .filter_map(|s| s.label.as_deref())
            .collect()
    }

    /// Wall-clock time the run took.
    ///
    /// Returns `None` if the clock went backwards during the run.
    pub fn duration(&self) -> Option<Duration> {
        self.finished_at
            .signed_duration_since(self.started_at)
            .to_std()
            .ok()
    }

    /// Pretty-printed JSON rendering of the report.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deepest nesting level reached on the accepted path.
    pub fn max_depth(&self) -> usize {
        self.steps.iter().map(|s| s.depth).max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(depth: usize, from: StateId, to: Option<StateId>, label: Option<&str>) -> Step {
        Step {
            depth,
            table: "t".to_string(),
            from,
            to,
            offset: 0,
            consumed: 1,
            class: Class::Normal,
            label: label.map(str::to_string),
        }
    }

    fn sample() -> Report {
        let now = Utc::now();
        Report::new(
            3,
            now,
            now,
            vec![
                step(1, 0, None, Some("inner")),
                step(0, 0, Some(1), Some("outer")),
                step(0, 1, None, None),
            ],
        )
    }

    #[test]
    fn path_follows_root_steps() {
        assert_eq!(sample().path(), vec![Some(0), Some(1), None]);
    }

    #[test]
    fn labels_skip_unlabelled_steps() {
        assert_eq!(sample().labels(), vec!["inner", "outer"]);
    }

    #[test]
    fn duration_and_depth() {
        let report = sample();
        assert_eq!(report.duration(), Some(Duration::ZERO));
        assert_eq!(report.max_depth(), 1);
    }

    #[test]
    fn report_roundtrips_through_json() {
        let report = sample();
        let json = serde_json::to_string(&report).unwrap();
        let back: Report = serde_json::from_str(&json).unwrap();

        assert_eq!(back.consumed, 3);
        assert_eq!(back.steps(), report.steps());
    }

    #[test]
    fn to_json_is_pretty_printed() {
        let json = sample().to_json().unwrap();
        assert!(json.contains("\n  \"consumed\": 3"));
        assert!(json.contains("\"label\": \"outer\""));
    }
}

//! Final run reports.

use crate::state::{Outcome, StateInfo};
use serde::{Deserialize, Serialize};

/// A report entry for a single distinct state: slot name bindings plus the
/// collector's bookkeeping.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StateReport {
    /// `(name, value)` pairs in slot order, atomic slots first.
    pub bindings: Vec<(String, i32)>,
    #[serde(flatten)]
    pub info: StateInfo,
}

/// A final report of observations coming from a test run.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Report {
    /// Aggregate outcome over all states; `None` when no states were
    /// observed (distinct from a run where every state was allowed).
    pub outcome: Option<Outcome>,
    /// One entry per distinct observed state.
    pub states: Vec<StateReport>,
    /// Total rounds observed.
    pub iterations: usize,
}

impl Report {
    /// Adds a state entry, updating the aggregate outcome.
    pub fn insert(&mut self, state: StateReport) {
        self.outcome = self.outcome.max(Some(state.info.outcome));
        self.states.push(state);
    }
}

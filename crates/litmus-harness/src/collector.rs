//! Deduplicating state collector.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use litmus_core::{Environment, Manifest, ObservedState, Outcome, Report, StateInfo, StateReport, TestModule};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::debug;

/// Snapshots every slot of the environment, atomic slots first.
pub fn snapshot(env: &Environment) -> ObservedState {
    let atomics = (0..env.n_atomic()).map(|i| env.get_atomic(i));
    let plains = (0..env.n_plain()).map(|i| env.get_plain(i));
    ObservedState::new(atomics.chain(plains))
}

/// What one round's observation produced, handed to the halt rules.
#[derive(Copy, Clone, Debug)]
pub struct Summary {
    /// The (1-based) index of the round just observed.
    pub iterations: usize,
    /// Bookkeeping for the state the round produced.
    pub info: StateInfo,
}

/// Accumulates observed states across rounds, deduplicating by value.
///
/// The postcondition runs once per distinct state, at first sighting;
/// repeats only bump an occurrence counter.
#[derive(Default)]
pub struct Collector {
    states: DashMap<ObservedState, StateInfo>,
    iterations: AtomicUsize,
}

impl Collector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the environment's current state as one completed round.
    ///
    /// Must only be called from a round's leader, after all workers have
    /// synchronised and before any starts the next round.
    pub fn observe(&self, env: &Environment, module: &dyn TestModule) -> Summary {
        let iterations = self.iterations.fetch_add(1, Ordering::Relaxed) + 1;
        let state = snapshot(env);
        let info = match self.states.entry(state) {
            Entry::Occupied(mut entry) => {
                entry.get_mut().inc();
                *entry.get()
            }
            Entry::Vacant(entry) => {
                let outcome = Outcome::from_check(module.check(env));
                let inserted = entry.insert(StateInfo::new(outcome, iterations));
                debug!(iteration = iterations, %outcome, state = ?inserted.key().values(), "new state");
                *inserted
            }
        };
        Summary { iterations, info }
    }

    /// Total rounds observed so far.
    pub fn iterations(&self) -> usize {
        self.iterations.load(Ordering::Relaxed)
    }

    /// Number of distinct states seen so far.
    pub fn distinct_states(&self) -> usize {
        self.states.len()
    }

    /// Drains the collector into a final report, binding slot values to the
    /// manifest's names. States are sorted by their bindings so the report
    /// is deterministic across runs that saw the same states.
    pub fn report(self, manifest: &Manifest) -> Report {
        let mut entries: Vec<(ObservedState, StateInfo)> = self.states.into_iter().collect();
        entries.sort_by(|(a, _), (b, _)| a.values().cmp(b.values()));

        let mut report = Report {
            iterations: self.iterations.into_inner(),
            ..Report::default()
        };
        for (state, info) in entries {
            let bindings = manifest
                .names()
                .map(str::to_owned)
                .zip(state.values().iter().copied())
                .collect();
            report.insert(StateReport { bindings, info });
        }
        report
    }
}

//! Run configuration.

use crate::halt::{HaltKind, Rule};
use crate::permute::PermuteStrategy;
use crate::sync::SyncStrategy;
use std::num::NonZeroUsize;
use std::time::Duration;

/// Parameters for one run of a test module.
#[derive(Clone, Debug)]
pub struct RunConfig {
    /// Total rounds to execute.
    pub iterations: usize,
    /// Tear down and respawn the worker set every this many rounds.
    /// Zero disables rotation.
    pub rotation_period: usize,
    /// Wall-clock bound on the whole run, checked between rounds.
    pub deadline: Option<Duration>,
    /// Round synchroniser.
    pub sync: SyncStrategy,
    /// Thread-id permutation between sessions.
    pub permute: PermuteStrategy,
    /// Seed for the permuter; `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            iterations: 100_000,
            rotation_period: 10_000,
            deadline: None,
            sync: SyncStrategy::default(),
            permute: PermuteStrategy::default(),
            seed: None,
        }
    }
}

impl RunConfig {
    /// The halt rules this configuration implies, exit rules after rotate
    /// rules so an exit verdict survives `max` aggregation on a round where
    /// both fire.
    pub fn halt_rules(&self) -> Vec<Rule> {
        let mut rules = Vec::new();
        if let Some(period) = NonZeroUsize::new(self.rotation_period) {
            rules.push(Rule::EveryNIterations(period, HaltKind::Rotate));
        }
        if let Some(total) = NonZeroUsize::new(self.iterations) {
            rules.push(Rule::EveryNIterations(total, HaltKind::Exit));
        }
        if let Some(deadline) = self.deadline {
            rules.push(Rule::DeadlineExceeded(deadline, HaltKind::Exit));
        }
        rules
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::Summary;
    use litmus_core::{Outcome, StateInfo};

    fn verdict(config: &RunConfig, iterations: usize) -> Option<HaltKind> {
        let summary = Summary {
            iterations,
            info: StateInfo::new(Outcome::Allowed, iterations),
        };
        config
            .halt_rules()
            .iter()
            .filter_map(|rule| rule.fires(&summary, Duration::ZERO))
            .max()
    }

    #[test]
    fn test_default_rules_rotate_then_exit() {
        let config = RunConfig::default();
        assert_eq!(verdict(&config, 9_999), None);
        assert_eq!(verdict(&config, 10_000), Some(HaltKind::Rotate));
        assert_eq!(verdict(&config, 100_000), Some(HaltKind::Exit));
    }

    #[test]
    fn test_exit_beats_rotate_when_both_fire() {
        let config = RunConfig {
            iterations: 100,
            rotation_period: 100,
            ..RunConfig::default()
        };
        assert_eq!(verdict(&config, 100), Some(HaltKind::Exit));
    }

    #[test]
    fn test_zero_rotation_disables_rotate_rule() {
        let config = RunConfig {
            rotation_period: 0,
            ..RunConfig::default()
        };
        assert_eq!(verdict(&config, 10_000), None);
    }
}

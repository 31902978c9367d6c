//! Halt rules: when a session should tear down, and whether the run is over.

use crate::collector::Summary;
use std::num::NonZeroUsize;
use std::time::Duration;

/// What firing a rule means for the run.
///
/// Kinds are ordered by severity so that `max` over all fired rules picks
/// the binding verdict: an exit always beats a rotation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum HaltKind {
    /// Tear the worker set down, then respawn it and keep iterating.
    Rotate = 1,
    /// Tear the worker set down and finish the run.
    Exit = 2,
}

impl HaltKind {
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn from_u8(raw: u8) -> Option<Self> {
        match raw {
            1 => Some(Self::Rotate),
            2 => Some(Self::Exit),
            _ => None,
        }
    }
}

/// A condition checked by the leader after every observed round.
#[derive(Copy, Clone, Debug)]
pub enum Rule {
    /// Fires on every iteration count divisible by the period.
    EveryNIterations(NonZeroUsize, HaltKind),
    /// Fires once the run's wall-clock time exceeds the deadline.
    DeadlineExceeded(Duration, HaltKind),
}

impl Rule {
    /// Returns the rule's verdict if it fires on this round.
    pub fn fires(&self, summary: &Summary, elapsed: Duration) -> Option<HaltKind> {
        match *self {
            Self::EveryNIterations(period, kind) if summary.iterations % period == 0 => Some(kind),
            Self::DeadlineExceeded(deadline, kind) if elapsed > deadline => Some(kind),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use litmus_core::{Outcome, StateInfo};

    fn summary(iterations: usize) -> Summary {
        Summary {
            iterations,
            info: StateInfo::new(Outcome::Allowed, iterations),
        }
    }

    #[test]
    fn test_kind_ordering() {
        assert!(HaltKind::Exit > HaltKind::Rotate);
        assert_eq!(
            [HaltKind::Rotate, HaltKind::Exit, HaltKind::Rotate]
                .into_iter()
                .max(),
            Some(HaltKind::Exit)
        );
    }

    #[test]
    fn test_kind_u8_round_trip() {
        for kind in [HaltKind::Rotate, HaltKind::Exit] {
            assert_eq!(HaltKind::from_u8(kind.as_u8()), Some(kind));
        }
        assert_eq!(HaltKind::from_u8(0), None);
        assert_eq!(HaltKind::from_u8(3), None);
    }

    #[test]
    fn test_every_n_fires_on_multiples() {
        let rule = Rule::EveryNIterations(NonZeroUsize::new(100).unwrap(), HaltKind::Rotate);
        assert_eq!(rule.fires(&summary(99), Duration::ZERO), None);
        assert_eq!(
            rule.fires(&summary(100), Duration::ZERO),
            Some(HaltKind::Rotate)
        );
        assert_eq!(rule.fires(&summary(101), Duration::ZERO), None);
        assert_eq!(
            rule.fires(&summary(200), Duration::ZERO),
            Some(HaltKind::Rotate)
        );
    }

    #[test]
    fn test_deadline_fires_after_elapsed() {
        let rule = Rule::DeadlineExceeded(Duration::from_secs(5), HaltKind::Exit);
        assert_eq!(rule.fires(&summary(1), Duration::from_secs(4)), None);
        assert_eq!(
            rule.fires(&summary(1), Duration::from_secs(6)),
            Some(HaltKind::Exit)
        );
    }
}

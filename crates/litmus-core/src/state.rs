//! Observed states and their bookkeeping.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;
use std::str::FromStr;

/// A snapshot of every slot value at the instant a round completed: atomic
/// slots in slot order, then plain slots.
///
/// Equality and hashing are element-wise by value; two rounds producing the
/// same slot values are the same observed state regardless of when they
/// occurred.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ObservedState {
    values: SmallVec<[i32; 8]>,
}

impl ObservedState {
    pub fn new(values: impl IntoIterator<Item = i32>) -> Self {
        Self {
            values: values.into_iter().collect(),
        }
    }

    /// The snapshot values, atomic slots first.
    pub fn values(&self) -> &[i32] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Classification of an observed state by the test module's postcondition.
///
/// Outcomes are ordered so that `max` over an iterator aggregates correctly:
/// any forbidden state makes the aggregate forbidden.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum Outcome {
    /// The state is consistent with the model under test.
    Allowed,
    /// The state contradicts the model under test.
    Forbidden,
}

impl Outcome {
    /// Converts a postcondition result into an outcome.
    pub fn from_check(allowed: bool) -> Self {
        if allowed {
            Self::Allowed
        } else {
            Self::Forbidden
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Allowed => "allowed",
            Self::Forbidden => "forbidden",
        })
    }
}

impl FromStr for Outcome {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "allowed" => Ok(Self::Allowed),
            "forbidden" => Ok(Self::Forbidden),
            other => Err(other.to_string()),
        }
    }
}

/// Bookkeeping for one distinct observed state.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateInfo {
    /// The (1-based) iteration at which the state was first observed.
    pub first_seen: usize,
    /// Number of rounds that produced the state.
    pub occurs: usize,
    /// The postcondition's verdict, evaluated once at first sighting and
    /// stable thereafter.
    pub outcome: Outcome,
}

impl StateInfo {
    /// A record for a state seen for the first time.
    pub fn new(outcome: Outcome, first_seen: usize) -> Self {
        Self {
            first_seen,
            occurs: 1,
            outcome,
        }
    }

    /// Bumps the occurrence count, saturating at `usize::MAX`.
    pub fn inc(&mut self) {
        self.occurs = self.occurs.saturating_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_state_equality_by_value() {
        let a = ObservedState::new([1, 1, 0, 0]);
        let b = ObservedState::new([1, 1, 0, 0]);
        let c = ObservedState::new([1, 1, 0, 1]);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_state_dedups_in_map() {
        let mut map: HashMap<ObservedState, usize> = HashMap::new();
        for _ in 0..3 {
            *map.entry(ObservedState::new([0, 1])).or_insert(0) += 1;
        }
        *map.entry(ObservedState::new([1, 0])).or_insert(0) += 1;
        assert_eq!(map.len(), 2);
        assert_eq!(map[&ObservedState::new([0, 1])], 3);
    }

    #[test]
    fn test_outcome_max_aggregates() {
        let all_allowed = vec![Outcome::Allowed, Outcome::Allowed];
        assert_eq!(all_allowed.into_iter().max(), Some(Outcome::Allowed));

        let mixed = vec![Outcome::Allowed, Outcome::Forbidden, Outcome::Allowed];
        assert_eq!(mixed.into_iter().max(), Some(Outcome::Forbidden));

        let none: Vec<Outcome> = vec![];
        assert_eq!(none.into_iter().max(), None);
    }

    #[test]
    fn test_outcome_round_trip() {
        for outcome in [Outcome::Allowed, Outcome::Forbidden] {
            assert_eq!(outcome.to_string().parse::<Outcome>(), Ok(outcome));
        }
        assert!("maybe".parse::<Outcome>().is_err());
    }

    #[test]
    fn test_info_inc_saturates() {
        let mut info = StateInfo::new(Outcome::Allowed, 1);
        info.occurs = usize::MAX;
        info.inc();
        assert_eq!(info.occurs, usize::MAX);
        assert_eq!(info.outcome, Outcome::Allowed);
    }
}

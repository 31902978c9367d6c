//! Round synchronisers.
//!
//! Every round runs in two phases. In phase A all workers execute the test
//! body; in phase B one worker (the leader) observes the environment while
//! the rest wait. A synchroniser fences the two phases: no worker may enter
//! phase B until every worker has finished phase A, and no worker may start
//! the next round until the leader has finished observing.

use crate::error::{HarnessError, Result};
use std::sync::atomic::{AtomicIsize, Ordering};
use std::sync::{Arc, Barrier};

/// What a worker does during phase B of a round.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Role {
    /// Elected to observe the environment this round. Exactly one per round.
    Leader,
    /// Waits for the leader's observation to complete.
    Follower,
}

/// A two-phase round synchroniser.
///
/// # Safety
///
/// Implementations must guarantee, for a fixed set of `threads` workers each
/// driving the same call sequence per round:
///
/// 1. `run` returns only after all `threads` workers have called it, and
///    returns [`Role::Leader`] to exactly one of them per round;
/// 2. `observe` (leader) and `wait` (followers) return only after the leader
///    has called `observe`;
/// 3. every return edge above is a happens-before edge.
///
/// The engine relies on (1)-(3) to read plain environment slots, written
/// without atomics during phase A, from the leader thread during phase B.
pub unsafe trait Synchroniser: Send + Sync {
    /// Ends phase A: blocks until every worker arrives, then elects a leader.
    fn run(&self) -> Role;

    /// Ends phase B from the leader, releasing the followers.
    fn observe(&self);

    /// Ends phase B from a follower, blocking until the leader observed.
    fn wait(&self);
}

// Safety: `Barrier::wait` blocks until all `threads` participants arrive and
// hands `is_leader` to exactly one of them, and barrier arrival/release
// edges synchronise-with each other.
unsafe impl Synchroniser for Barrier {
    fn run(&self) -> Role {
        if Barrier::wait(self).is_leader() {
            Role::Leader
        } else {
            Role::Follower
        }
    }

    fn observe(&self) {
        Barrier::wait(self);
    }

    fn wait(&self) {
        Barrier::wait(self);
    }
}

/// A busy-wait synchroniser built on one signed counter.
///
/// The counter's sign encodes the phase: positive while workers drain into
/// phase B, negative while they drain back out. The worker that brings the
/// count to one (the last to arrive) is the leader; its phase-B `observe`
/// flips the sign back and releases the spinning followers.
///
/// Spinning keeps workers hot on their cores between phases, which perturbs
/// instruction timing far more aggressively than parking on a futex.
pub struct Spinner {
    threads: isize,
    phase: AtomicIsize,
}

impl Spinner {
    pub fn new(threads: usize) -> Result<Self> {
        let threads = isize::try_from(threads)?;
        Ok(Self {
            threads,
            phase: AtomicIsize::new(threads),
        })
    }

    fn release(&self) {
        let count = self.phase.fetch_add(1, Ordering::AcqRel);
        if count == -1 {
            self.phase.store(self.threads, Ordering::Release);
        } else {
            while self.phase.load(Ordering::Acquire) <= 0 {
                std::hint::spin_loop();
            }
        }
    }
}

// Safety: all workers decrement the positive counter in `run`; the last one
// (reading 1) becomes leader and flips it to `-threads`, so nobody returns
// from `run` before all have arrived. `release` mirrors this on the negative
// side, so nobody starts the next round before the leader's `observe`. The
// AcqRel RMWs on one cell form a release sequence, making each drain a
// happens-before edge.
unsafe impl Synchroniser for Spinner {
    fn run(&self) -> Role {
        let count = self.phase.fetch_sub(1, Ordering::AcqRel);
        if count == 1 {
            self.phase.store(-self.threads, Ordering::Release);
            Role::Leader
        } else {
            while self.phase.load(Ordering::Acquire) >= 0 {
                std::hint::spin_loop();
            }
            Role::Follower
        }
    }

    fn observe(&self) {
        self.release();
    }

    fn wait(&self) {
        self.release();
    }
}

/// Which synchroniser a run uses.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum SyncStrategy {
    /// Busy-wait sign-flip counter.
    #[default]
    Spinner,
    /// `std::sync::Barrier`.
    Barrier,
}

impl SyncStrategy {
    /// Builds a synchroniser for `threads` workers.
    pub fn build(self, threads: usize) -> Result<Arc<dyn Synchroniser>> {
        if threads == 0 {
            return Err(HarnessError::Manifest(
                litmus_core::ManifestError::NoThreads,
            ));
        }
        Ok(match self {
            Self::Spinner => Arc::new(Spinner::new(threads)?),
            Self::Barrier => Arc::new(Barrier::new(threads)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::thread;

    fn exercise(sync: Arc<dyn Synchroniser>, threads: usize, rounds: usize) {
        let leaders = Arc::new(AtomicUsize::new(0));
        thread::scope(|scope| {
            for _ in 0..threads {
                let sync = Arc::clone(&sync);
                let leaders = Arc::clone(&leaders);
                scope.spawn(move || {
                    for _ in 0..rounds {
                        match sync.run() {
                            Role::Leader => {
                                leaders.fetch_add(1, Ordering::Relaxed);
                                sync.observe();
                            }
                            Role::Follower => sync.wait(),
                        }
                    }
                });
            }
        });
        assert_eq!(leaders.load(Ordering::Relaxed), rounds);
    }

    #[test]
    fn test_spinner_elects_one_leader_per_round() {
        let sync = SyncStrategy::Spinner.build(4).unwrap();
        exercise(sync, 4, 200);
    }

    #[test]
    fn test_barrier_elects_one_leader_per_round() {
        let sync = SyncStrategy::Barrier.build(4).unwrap();
        exercise(sync, 4, 200);
    }

    #[test]
    fn test_single_thread_is_always_leader() {
        let sync = SyncStrategy::Spinner.build(1).unwrap();
        for _ in 0..10 {
            assert_eq!(sync.run(), Role::Leader);
            sync.observe();
        }
    }

    #[test]
    fn test_zero_threads_rejected() {
        assert!(SyncStrategy::Spinner.build(0).is_err());
        assert!(SyncStrategy::Barrier.build(0).is_err());
    }
}

//! The contract between the engine and a litmus test.

use crate::env::Environment;
use crate::manifest::Manifest;

/// A litmus test module: a static manifest, a per-thread body, and a
/// postcondition over final states.
///
/// Test bodies are trusted code. The engine does not sandbox them; a fault
/// inside `run` is fatal to the whole run, not a recoverable condition.
pub trait TestModule: Send + Sync {
    /// Describes the threads and variable slots the test needs.
    fn manifest(&self) -> Manifest;

    /// The per-thread test body, invoked exactly once per round for each
    /// `tid` in `0..manifest().threads`.
    ///
    /// Bodies perform relaxed (or whatever ordering the test probes) atomic
    /// accesses on the environment's atomic slots and record observed values
    /// in plain slots, one non-overlapping result area per thread.
    fn run(&self, tid: usize, env: &Environment);

    /// Pure postcondition over a round's final state; `true` means the
    /// state is consistent with the model being validated.
    ///
    /// Invoked by the collector exactly once per distinct observed state.
    fn check(&self, env: &Environment) -> bool;
}

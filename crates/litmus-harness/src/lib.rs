//! Execution engine for litmus tests.
//!
//! The engine runs a [`TestModule`](litmus_core::TestModule) for many rounds
//! against a shared [`Environment`](litmus_core::Environment), synchronising
//! worker threads between rounds, deduplicating the final states it observes,
//! and classifying each distinct state with the module's postcondition. It
//! samples behaviour empirically; it proves nothing about states it never
//! happens to see.

pub mod collector;
pub mod config;
pub mod error;
pub mod halt;
pub mod permute;
pub mod runner;
pub mod sync;

pub use collector::{snapshot, Collector, Summary};
pub use config::RunConfig;
pub use error::{HarnessError, Result};
pub use halt::{HaltKind, Rule};
pub use permute::{PermuteStrategy, Permuter};
pub use runner::Runner;
pub use sync::{Role, SyncStrategy, Synchroniser};

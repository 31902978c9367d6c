//! Engine errors.

use std::num::TryFromIntError;
use thiserror::Error;

/// Errors surfaced by the engine.
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error(transparent)]
    Env(#[from] litmus_core::EnvError),

    #[error(transparent)]
    Manifest(#[from] litmus_core::ManifestError),

    /// The manifest's thread count does not fit the synchroniser's counter.
    #[error("thread count out of range: {0}")]
    TooManyThreads(#[from] TryFromIntError),

    /// The OS refused to spawn a worker thread.
    #[error("failed to spawn worker {tid}: {source}")]
    Spawn {
        tid: usize,
        #[source]
        source: std::io::Error,
    },

    /// A test module panicked in its body or postcondition; the run's
    /// observations are unusable.
    #[error("worker {tid} panicked inside the test module")]
    WorkerPanic { tid: usize },
}

pub type Result<T> = std::result::Result<T, HarnessError>;

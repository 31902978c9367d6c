//! The shared test environment: a fixed-shape, reference-counted block of
//! typed variable slots.

use crate::manifest::Manifest;
use std::cell::UnsafeCell;
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;
use thiserror::Error;

/// Error raised when an environment cannot be constructed.
#[derive(Debug, Error)]
pub enum EnvError {
    #[error("failed to allocate environment storage: {0}")]
    Alloc(#[from] std::collections::TryReserveError),
}

/// Backing storage shared by every handle to one environment.
///
/// Atomic slots are raced on deliberately by test threads; that race is the
/// object under test. Plain slots are written by at most one thread each
/// (partitioned by thread id, by convention) and bulk-read only after every
/// worker of a round has synchronised.
struct Storage {
    atomics: Box<[AtomicI32]>,
    plains: Box<[UnsafeCell<i32>]>,
}

// Safety: the atomic slots are `AtomicI32`. The plain slots are
// `UnsafeCell<i32>` whose accessor contract (one writer per slot during a
// round, reads only once all workers of the round have synchronised) rules
// out the data races the type system cannot see.
unsafe impl Send for Storage {}
unsafe impl Sync for Storage {}

/// A handle to a shared test environment.
///
/// Handles are reference counted: `clone` shares the same storage without
/// copying slot contents, and the storage is freed exactly when the last
/// handle drops. Slot counts are fixed at construction.
///
/// Every accessor is bounds checked. Out-of-range reads return zero and
/// out-of-range writes are silently ignored, so malformed or defensively
/// written test code cannot corrupt engine state.
#[derive(Clone)]
pub struct Environment {
    storage: Arc<Storage>,
}

impl Environment {
    /// Constructs an environment with the given slot counts, all zeroed.
    ///
    /// Allocation failure surfaces as [`EnvError::Alloc`]; any partially
    /// reserved storage is dropped before the error returns.
    pub fn new(n_atomic: usize, n_plain: usize) -> Result<Self, EnvError> {
        let mut atomics = Vec::new();
        atomics.try_reserve_exact(n_atomic)?;
        atomics.resize_with(n_atomic, || AtomicI32::new(0));

        let mut plains = Vec::new();
        plains.try_reserve_exact(n_plain)?;
        plains.resize_with(n_plain, || UnsafeCell::new(0));

        Ok(Self {
            storage: Arc::new(Storage {
                atomics: atomics.into_boxed_slice(),
                plains: plains.into_boxed_slice(),
            }),
        })
    }

    /// Constructs an environment shaped and initialised by `manifest`.
    pub fn for_manifest(manifest: &Manifest) -> Result<Self, EnvError> {
        let env = Self::new(manifest.atomic_ints.len(), manifest.ints.len())?;
        env.reset(manifest);
        Ok(env)
    }

    /// Number of atomic slots.
    pub fn n_atomic(&self) -> usize {
        self.storage.atomics.len()
    }

    /// Number of plain slots.
    pub fn n_plain(&self) -> usize {
        self.storage.plains.len()
    }

    /// Loads the atomic slot at `index` with relaxed ordering.
    /// Out-of-range indices read as zero.
    pub fn get_atomic(&self, index: usize) -> i32 {
        self.storage
            .atomics
            .get(index)
            .map_or(0, |slot| slot.load(Ordering::Relaxed))
    }

    /// Stores `value` into the atomic slot at `index` with relaxed ordering.
    /// Out-of-range writes are ignored.
    pub fn set_atomic(&self, index: usize, value: i32) {
        if let Some(slot) = self.storage.atomics.get(index) {
            slot.store(value, Ordering::Relaxed);
        }
    }

    /// Reads the plain slot at `index`. Out-of-range indices read as zero.
    ///
    /// Callers must not race this with a write to the same slot; the engine
    /// only bulk-reads plain slots after all workers of a round have
    /// synchronised.
    pub fn get_plain(&self, index: usize) -> i32 {
        self.storage
            .plains
            .get(index)
            .map_or(0, |slot| unsafe { *slot.get() })
    }

    /// Writes the plain slot at `index`. Out-of-range writes are ignored.
    ///
    /// At most one thread may write a given plain slot during a round.
    pub fn set_plain(&self, index: usize, value: i32) {
        if let Some(slot) = self.storage.plains.get(index) {
            unsafe { *slot.get() = value }
        }
    }

    /// Rewrites every slot to the manifest's initial values.
    ///
    /// Must not be called while any worker is executing a round against
    /// this environment.
    pub fn reset(&self, manifest: &Manifest) {
        for (i, var) in manifest.atomic_ints.iter().enumerate() {
            self.set_atomic(i, var.initial);
        }
        for (i, var) in manifest.ints.iter().enumerate() {
            self.set_plain(i, var.initial);
        }
    }
}

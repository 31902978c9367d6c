//! Test manifests.

use thiserror::Error;

/// A variable slot declaration: a diagnostic name plus an initial value.
///
/// Names carry no semantic weight in the engine; they exist so reports can
/// bind values back to the variables the test talks about.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VarSpec {
    pub name: String,
    pub initial: i32,
}

impl VarSpec {
    pub fn new(name: impl Into<String>, initial: i32) -> Self {
        Self {
            name: name.into(),
            initial,
        }
    }
}

/// Static description of a test module: its thread count and the variable
/// slots of each kind, in slot order (slot index = position in the vector).
///
/// A manifest is constant for the duration of a run and is passed by value
/// into the engine; the engine never mutates it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Manifest {
    /// Number of worker threads the test body expects.
    pub threads: usize,
    /// Atomic integer slots.
    pub atomic_ints: Vec<VarSpec>,
    /// Plain integer slots (by convention, per-thread result areas).
    pub ints: Vec<VarSpec>,
}

/// Error raised by [`Manifest::validate`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ManifestError {
    #[error("test manifest declares zero threads")]
    NoThreads,
}

impl Manifest {
    /// Checks the manifest is runnable.
    pub fn validate(&self) -> Result<(), ManifestError> {
        if self.threads == 0 {
            return Err(ManifestError::NoThreads);
        }
        Ok(())
    }

    /// Iterates over every slot name, atomic slots first, in slot order.
    ///
    /// The order matches the snapshot order of observed states.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.atomic_ints
            .iter()
            .chain(self.ints.iter())
            .map(|v| v.name.as_str())
    }
}

//! Shared substrate for the litmus harness: the test environment, test
//! manifests, observed states, and the contract between the engine and a
//! test module.

pub mod env;
pub mod manifest;
pub mod module;
pub mod report;
pub mod state;

pub use env::{EnvError, Environment};
pub use manifest::{Manifest, ManifestError, VarSpec};
pub use module::TestModule;
pub use report::{Report, StateReport};
pub use state::{ObservedState, Outcome, StateInfo};

//! Built-in litmus tests, statically registered and selected by name.

use litmus_core::TestModule;
use std::sync::Arc;

mod lb;
mod mp;
mod sb;

pub use lb::LoadBuffering;
pub use mp::MessagePassing;
pub use sb::StoreBuffering;

/// Names of every built-in test, in listing order.
pub const NAMES: &[&str] = &["lb", "mp", "sb"];

/// Looks a built-in test up by name.
pub fn by_name(name: &str) -> Option<Arc<dyn TestModule>> {
    Some(match name {
        "lb" => Arc::new(LoadBuffering),
        "mp" => Arc::new(MessagePassing),
        "sb" => Arc::new(StoreBuffering),
        _ => return None,
    })
}

/// One-line description of a built-in test.
pub fn describe(name: &str) -> Option<&'static str> {
    Some(match name {
        "lb" => "load buffering: forbids r0 == 1 && r1 == 1",
        "mp" => "message passing: forbids rflag == 1 && rdata == 0",
        "sb" => "store buffering: forbids r0 == 0 && r1 == 0",
        _ => return None,
    })
}

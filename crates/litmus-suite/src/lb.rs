//! Load buffering.
//!
//! ```text
//! T0: r0 = x;  y = 1;        T1: r1 = y;  x = 1;
//! ```
//!
//! `r0 == 1 && r1 == 1` needs each thread's load to read the other's later
//! store, a cycle no sequentially consistent interleaving can produce. The
//! relaxed memory model permits it; most hardware does not exhibit it.

use litmus_core::{Environment, Manifest, TestModule, VarSpec};

const X: usize = 0;
const Y: usize = 1;
const R0: usize = 0;
const R1: usize = 1;

pub struct LoadBuffering;

impl TestModule for LoadBuffering {
    fn manifest(&self) -> Manifest {
        Manifest {
            threads: 2,
            atomic_ints: vec![VarSpec::new("x", 0), VarSpec::new("y", 0)],
            ints: vec![VarSpec::new("r0", 0), VarSpec::new("r1", 0)],
        }
    }

    fn run(&self, tid: usize, env: &Environment) {
        match tid {
            0 => {
                env.set_plain(R0, env.get_atomic(X));
                env.set_atomic(Y, 1);
            }
            _ => {
                env.set_plain(R1, env.get_atomic(Y));
                env.set_atomic(X, 1);
            }
        }
    }

    fn check(&self, env: &Environment) -> bool {
        !(env.get_plain(R0) == 1 && env.get_plain(R1) == 1)
    }
}

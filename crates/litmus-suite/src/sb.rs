//! Store buffering.
//!
//! ```text
//! T0: x = 1;  r0 = y;        T1: y = 1;  r1 = x;
//! ```
//!
//! `r0 == 0 && r1 == 0` means both loads ran before either store became
//! visible, which no sequentially consistent interleaving allows. With
//! relaxed accesses it shows up readily on stock hardware, store buffers
//! being exactly the mechanism that produces it.

use litmus_core::{Environment, Manifest, TestModule, VarSpec};

const X: usize = 0;
const Y: usize = 1;
const R0: usize = 0;
const R1: usize = 1;

pub struct StoreBuffering;

impl TestModule for StoreBuffering {
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
                env.set_atomic(X, 1);
                env.set_plain(R0, env.get_atomic(Y));
            }
            _ => {
                env.set_atomic(Y, 1);
                env.set_plain(R1, env.get_atomic(X));
            }
        }
    }

    fn check(&self, env: &Environment) -> bool {
        !(env.get_plain(R0) == 0 && env.get_plain(R1) == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_forbids_double_zero() {
        let m = StoreBuffering.manifest();
        for (r0, r1) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
            let env = Environment::for_manifest(&m).unwrap();
            env.set_plain(R0, r0);
            env.set_plain(R1, r1);
            assert_eq!(StoreBuffering.check(&env), !(r0 == 0 && r1 == 0));
        }
    }

    #[test]
    fn test_sequential_round_is_allowed() {
        let m = StoreBuffering.manifest();
        let env = Environment::for_manifest(&m).unwrap();
        StoreBuffering.run(0, &env);
        StoreBuffering.run(1, &env);
        assert_eq!(env.get_plain(R0), 0);
        assert_eq!(env.get_plain(R1), 1);
        assert!(StoreBuffering.check(&env));
    }
}

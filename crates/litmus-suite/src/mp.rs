//! Message passing.
//!
//! ```text
//! T0: data = 42;  flag = 1;        T1: rflag = flag;  rdata = data;
//! ```
//!
//! With relaxed accesses the flag does not order the data store, so the
//! reader can see the flag raised while the payload is still stale:
//! `rflag == 1 && rdata == 0`. Release/acquire on the flag is the usual fix;
//! this module deliberately omits it to probe for the reorder.

use litmus_core::{Environment, Manifest, TestModule, VarSpec};

const DATA: usize = 0;
const FLAG: usize = 1;
const RFLAG: usize = 0;
const RDATA: usize = 1;

const PAYLOAD: i32 = 42;

pub struct MessagePassing;

impl TestModule for MessagePassing {
    fn manifest(&self) -> Manifest {
        Manifest {
            threads: 2,
            atomic_ints: vec![VarSpec::new("data", 0), VarSpec::new("flag", 0)],
            ints: vec![VarSpec::new("rflag", 0), VarSpec::new("rdata", 0)],
        }
    }

    fn run(&self, tid: usize, env: &Environment) {
        match tid {
            0 => {
                env.set_atomic(DATA, PAYLOAD);
                env.set_atomic(FLAG, 1);
            }
            _ => {
                env.set_plain(RFLAG, env.get_atomic(FLAG));
                env.set_plain(RDATA, env.get_atomic(DATA));
            }
        }
    }

    fn check(&self, env: &Environment) -> bool {
        !(env.get_plain(RFLAG) == 1 && env.get_plain(RDATA) == 0)
    }
}

//! Differential fuzzing of the environment against a trivial model: every
//! in-range slot behaves like a plain array cell, every out-of-range access
//! reads zero and writes nothing, through arbitrary interleavings of clones,
//! drops, and resets.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use litmus_core::{Environment, Manifest, VarSpec};

#[derive(Arbitrary, Debug)]
enum Op {
    SetAtomic { index: u8, value: i32 },
    SetPlain { index: u8, value: i32 },
    GetAtomic { index: u8 },
    GetPlain { index: u8 },
    Clone,
    DropClone,
    Reset,
}

#[derive(Arbitrary, Debug)]
struct Script {
    n_atomic: u8,
    n_plain: u8,
    ops: Vec<Op>,
}

fuzz_target!(|script: Script| {
    let n_atomic = script.n_atomic as usize % 16;
    let n_plain = script.n_plain as usize % 16;
    let manifest = Manifest {
        threads: 1,
        atomic_ints: (0..n_atomic).map(|i| VarSpec::new(format!("a{i}"), i as i32)).collect(),
        ints: (0..n_plain).map(|i| VarSpec::new(format!("p{i}"), -(i as i32))).collect(),
    };

    let env = match Environment::for_manifest(&manifest) {
        Ok(env) => env,
        Err(_) => return,
    };
    let mut model_atomic: Vec<i32> = (0..n_atomic as i32).collect();
    let mut model_plain: Vec<i32> = (0..n_plain as i32).map(|i| -i).collect();
    let mut clones: Vec<Environment> = Vec::new();

    for op in script.ops {
        match op {
            Op::SetAtomic { index, value } => {
                let index = index as usize;
                env.set_atomic(index, value);
                if index < n_atomic {
                    model_atomic[index] = value;
                }
            }
            Op::SetPlain { index, value } => {
                let index = index as usize;
                env.set_plain(index, value);
                if index < n_plain {
                    model_plain[index] = value;
                }
            }
            Op::GetAtomic { index } => {
                let index = index as usize;
                let expected = model_atomic.get(index).copied().unwrap_or(0);
                assert_eq!(env.get_atomic(index), expected);
            }
            Op::GetPlain { index } => {
                let index = index as usize;
                let expected = model_plain.get(index).copied().unwrap_or(0);
                assert_eq!(env.get_plain(index), expected);
            }
            Op::Clone => clones.push(env.clone()),
            Op::DropClone => {
                clones.pop();
            }
            Op::Reset => {
                env.reset(&manifest);
                model_atomic = (0..n_atomic as i32).collect();
                model_plain = (0..n_plain as i32).map(|i| -i).collect();
            }
        }
    }

    // Clones share storage; any survivor must agree with the model.
    if let Some(clone) = clones.first() {
        for (i, &expected) in model_atomic.iter().enumerate() {
            assert_eq!(clone.get_atomic(i), expected);
        }
        for (i, &expected) in model_plain.iter().enumerate() {
            assert_eq!(clone.get_plain(i), expected);
        }
    }
});

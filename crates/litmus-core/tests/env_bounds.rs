//! Property tests for the environment's bounds contract: in-range accesses
//! round-trip, out-of-range accesses read zero and write nothing.

use litmus_core::Environment;
use proptest::prelude::*;

proptest! {
    #[test]
    fn in_range_set_get_round_trips(
        n_atomic in 1usize..16,
        n_plain in 1usize..16,
        value in any::<i32>(),
    ) {
        let env = Environment::new(n_atomic, n_plain).unwrap();
        for i in 0..n_atomic {
            env.set_atomic(i, value.wrapping_add(i as i32));
        }
        for i in 0..n_plain {
            env.set_plain(i, value.wrapping_sub(i as i32));
        }
        for i in 0..n_atomic {
            prop_assert_eq!(env.get_atomic(i), value.wrapping_add(i as i32));
        }
        for i in 0..n_plain {
            prop_assert_eq!(env.get_plain(i), value.wrapping_sub(i as i32));
        }
    }

    #[test]
    fn out_of_range_reads_zero(
        n_atomic in 0usize..8,
        n_plain in 0usize..8,
        beyond in 0usize..1024,
    ) {
        let env = Environment::new(n_atomic, n_plain).unwrap();
        prop_assert_eq!(env.get_atomic(n_atomic + beyond), 0);
        prop_assert_eq!(env.get_plain(n_plain + beyond), 0);
    }

    #[test]
    fn out_of_range_writes_have_no_effect(
        n_atomic in 1usize..8,
        n_plain in 1usize..8,
        beyond in 0usize..1024,
        value in any::<i32>(),
    ) {
        let env = Environment::new(n_atomic, n_plain).unwrap();
        env.set_atomic(n_atomic + beyond, value);
        env.set_plain(n_plain + beyond, value);
        for i in 0..n_atomic {
            prop_assert_eq!(env.get_atomic(i), 0);
        }
        for i in 0..n_plain {
            prop_assert_eq!(env.get_plain(i), 0);
        }
    }
}
